// std
use std::{
	sync::Arc,
	time::{Duration as StdDuration, Instant as StdInstant},
};
// crates.io
use tokio::time::{self, Instant};
// self
use crpt_api::{
	CancellationToken,
	error::{CancelReason, ConfigError, Error},
	limit::{Admission, RateLimiter, Window, WindowUnit},
};

fn limiter(duration: StdDuration, capacity: u32) -> Arc<RateLimiter> {
	Arc::new(
		RateLimiter::with_capacity(duration, capacity)
			.expect("Limiter window should be valid for window tests."),
	)
}

async fn admit_all(limiter: &Arc<RateLimiter>, callers: usize) -> Vec<StdDuration> {
	let start = Instant::now();
	let handles = (0..callers)
		.map(|_| {
			let limiter = Arc::clone(limiter);

			tokio::spawn(async move {
				limiter.acquire().await;

				start.elapsed()
			})
		})
		.collect::<Vec<_>>();
	let mut admitted = Vec::with_capacity(callers);

	for handle in handles {
		admitted.push(handle.await.expect("Admission task should not panic."));
	}

	admitted.sort();

	admitted
}

#[test]
fn zero_capacity_fails_at_construction() {
	let err = RateLimiter::with_capacity(StdDuration::from_secs(1), 0)
		.expect_err("Zero capacity must be rejected when the limiter is built.");

	assert!(matches!(err, Error::Config(ConfigError::ZeroCapacity)));
}

#[tokio::test(start_paused = true)]
async fn five_callers_spread_over_three_windows() {
	let second = StdDuration::from_secs(1);
	let admitted = admit_all(&limiter(second, 2), 5).await;

	assert_eq!(admitted.len(), 5);
	assert_eq!(admitted.iter().filter(|at| **at < second).count(), 2);
	assert_eq!(admitted.iter().filter(|at| **at >= second && **at < second * 2).count(), 2);
	assert!(admitted[4] >= second * 2, "Fifth caller admitted too early: {:?}.", admitted[4]);
	assert!(admitted[4] <= second * 3, "Fifth caller waited too long: {:?}.", admitted[4]);
}

#[tokio::test(start_paused = true)]
async fn admissions_per_window_never_exceed_capacity() {
	let window = StdDuration::from_millis(100);
	let admitted = admit_all(&limiter(window, 3), 50).await;
	let mut per_window = [0_usize; 32];

	for at in &admitted {
		let index = (at.as_millis() / window.as_millis()) as usize;

		per_window[index] += 1;
	}

	assert!(per_window.iter().all(|count| *count <= 3), "Window overfilled: {per_window:?}.");
	assert_eq!(per_window.iter().sum::<usize>(), 50);
	assert!(admitted[49] < window * 17, "Last caller waited too long: {:?}.", admitted[49]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_callers_respect_the_window_in_real_time() {
	let window = StdDuration::from_millis(200);
	let started = StdInstant::now();
	let limiter = limiter(window, 5);
	let handles = (0..20)
		.map(|_| {
			let limiter = Arc::clone(&limiter);

			tokio::spawn(async move {
				limiter.acquire().await;

				started.elapsed()
			})
		})
		.collect::<Vec<_>>();
	let mut admitted = Vec::new();

	for handle in handles {
		admitted.push(handle.await.expect("Admission task should not panic."));
	}

	admitted.sort();

	assert!(admitted[4] < window, "First window admitted late: {:?}.", admitted[4]);
	assert!(admitted[5] >= window, "Sixth caller skipped the window: {:?}.", admitted[5]);
	assert!(admitted[19] >= window * 3, "Four windows finished early: {:?}.", admitted[19]);
	assert!(admitted[19] < window * 10, "Callers waited too long: {:?}.", admitted[19]);
}

#[tokio::test(start_paused = true)]
async fn cancelled_waiter_does_not_consume_admission() {
	let window = StdDuration::from_secs(1);
	let limiter = limiter(window, 1);

	limiter.acquire().await;

	let cancel = CancellationToken::new();
	let waiter = {
		let limiter = Arc::clone(&limiter);
		let cancel = cancel.clone();

		tokio::spawn(async move { limiter.acquire_cancellable(&cancel).await })
	};

	time::sleep(StdDuration::from_millis(100)).await;
	cancel.cancel();

	let err = waiter
		.await
		.expect("Waiter task should not panic.")
		.expect_err("Cancelled waiter must not be admitted.");

	assert!(matches!(err, Error::Cancelled { reason: CancelReason::Token }));
	assert_eq!(limiter.admitted(), 1);

	time::sleep(StdDuration::from_millis(900)).await;

	assert_eq!(limiter.try_acquire(), Admission::Admitted);
	assert!(matches!(limiter.try_acquire(), Admission::Saturated { .. }));
}

#[tokio::test(start_paused = true)]
async fn aborted_waiter_releases_the_queue() {
	let window = StdDuration::from_secs(1);
	let limiter = limiter(window, 1);

	limiter.acquire().await;

	let waiter = {
		let limiter = Arc::clone(&limiter);

		tokio::spawn(async move { limiter.acquire().await })
	};

	time::sleep(StdDuration::from_millis(10)).await;
	waiter.abort();

	assert!(waiter.await.expect_err("Aborted waiter should not finish.").is_cancelled());

	let started = Instant::now();

	limiter
		.acquire_timeout(window * 2)
		.await
		.expect("Fresh caller should be admitted at the next boundary.");

	assert!(started.elapsed() <= window, "Fresh caller waited {:?}.", started.elapsed());
	assert_eq!(limiter.admitted(), 1);
}

#[tokio::test(start_paused = true)]
async fn windows_measured_in_minutes_behave_like_seconds() {
	let limiter = Arc::new(RateLimiter::new(
		Window::per_unit(WindowUnit::Minutes, 10)
			.expect("Ten per minute should be a valid window."),
	));
	let admitted = admit_all(&limiter, 12).await;

	assert!(admitted[..10].iter().all(|at| at.is_zero()));
	assert!(admitted[10] >= StdDuration::from_secs(60));
	assert!(admitted[11] < StdDuration::from_secs(120));
}
