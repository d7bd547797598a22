// crates.io
use tokio::time::{self, Instant};
// self
use crate::{
	_prelude::*,
	error::CancelReason,
	limit::Window,
	obs::{self, CallOutcome, CallSpan, Operation},
};

/// Result of a non-blocking admission probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
	/// The caller was admitted and consumed one unit of the current window.
	Admitted,
	/// The current window is full.
	Saturated {
		/// Time left until the current window ends.
		retry_in: StdDuration,
	},
}
impl Admission {
	/// Returns `true` when the probe consumed an admission.
	pub fn is_admitted(&self) -> bool {
		matches!(self, Self::Admitted)
	}
}

#[derive(Debug)]
struct AdmissionState {
	window_start: Instant,
	admitted: u32,
}
impl AdmissionState {
	fn expired(&self, now: Instant, duration: StdDuration) -> bool {
		now.saturating_duration_since(self.window_start) >= duration
	}

	fn roll(&mut self, now: Instant, duration: StdDuration) {
		if self.expired(now, duration) {
			self.window_start = now;
			self.admitted = 0;
		}
	}

	fn remaining(&self, now: Instant, duration: StdDuration) -> StdDuration {
		duration.saturating_sub(now.saturating_duration_since(self.window_start))
	}
}

/// Fixed-window limiter admitting at most [`Window::capacity`] callers per [`Window::duration`].
///
/// The window opens when the limiter is built. Once the elapsed time since the window start
/// reaches the window duration, the next observation resets the counter and restarts the window
/// at that instant.
///
/// [`acquire`](Self::acquire) and its cancellable variants queue on an internal gate, so at most
/// one waiter sleeps on the window boundary at a time and the rest are released in roughly
/// arrival order. [`try_acquire`](Self::try_acquire) skips the gate and never waits.
pub struct RateLimiter {
	window: Window,
	state: Mutex<AdmissionState>,
	gate: AsyncMutex<()>,
}
impl RateLimiter {
	/// Creates a limiter whose first window starts now.
	pub fn new(window: Window) -> Self {
		Self {
			window,
			state: Mutex::new(AdmissionState { window_start: Instant::now(), admitted: 0 }),
			gate: AsyncMutex::new(()),
		}
	}

	/// Validates `(duration, capacity)` and creates a limiter for it.
	pub fn with_capacity(duration: StdDuration, capacity: u32) -> Result<Self> {
		Ok(Self::new(Window::new(duration, capacity)?))
	}

	/// Window enforced by this limiter.
	pub fn window(&self) -> Window {
		self.window
	}

	/// Admissions counted in the current window.
	pub fn admitted(&self) -> u32 {
		let state = self.state.lock();

		if state.expired(Instant::now(), self.window.duration()) { 0 } else { state.admitted }
	}

	/// Admits the caller if the current window has spare capacity.
	pub fn try_acquire(&self) -> Admission {
		let duration = self.window.duration();
		let now = Instant::now();
		let mut state = self.state.lock();

		state.roll(now, duration);

		if state.admitted < self.window.capacity() {
			state.admitted += 1;

			Admission::Admitted
		} else {
			Admission::Saturated { retry_in: state.remaining(now, duration) }
		}
	}

	/// Waits until the caller is admitted.
	///
	/// Dropping the future before it resolves abandons the wait without consuming an admission.
	pub async fn acquire(&self) {
		const OPERATION: Operation = Operation::Acquire;

		let span = CallSpan::new(OPERATION, "acquire");
		let started = Instant::now();

		span.instrument(async {
			let _gate = self.gate.lock().await;

			while let Admission::Saturated { retry_in } = self.try_acquire() {
				time::sleep(retry_in).await;
			}
		})
		.await;

		obs::record_admission_wait(started.elapsed());
		obs::record_call_outcome(OPERATION, CallOutcome::Success);
	}

	/// Waits for admission until `cancel` fires.
	pub async fn acquire_cancellable(&self, cancel: &CancellationToken) -> Result<()> {
		match cancel.run_until_cancelled(self.acquire()).await {
			Some(()) => Ok(()),
			None => Err(Self::abandoned(CancelReason::Token)),
		}
	}

	/// Waits for admission for at most `limit`.
	pub async fn acquire_timeout(&self, limit: StdDuration) -> Result<()> {
		time::timeout(limit, self.acquire())
			.await
			.map_err(|_| Self::abandoned(CancelReason::TimedOut))
	}

	fn abandoned(reason: CancelReason) -> Error {
		obs::record_call_outcome(Operation::Acquire, CallOutcome::Cancelled);

		Error::Cancelled { reason }
	}
}
impl Debug for RateLimiter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RateLimiter")
			.field("window", &self.window)
			.field("admitted", &self.admitted())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn limiter(duration: StdDuration, capacity: u32) -> RateLimiter {
		RateLimiter::with_capacity(duration, capacity).expect("Test window should be valid.")
	}

	#[tokio::test(start_paused = true)]
	async fn admits_up_to_capacity_then_saturates() {
		let limiter = limiter(StdDuration::from_secs(1), 2);

		assert!(limiter.try_acquire().is_admitted());
		assert!(limiter.try_acquire().is_admitted());
		assert_eq!(
			limiter.try_acquire(),
			Admission::Saturated { retry_in: StdDuration::from_secs(1) }
		);
		assert_eq!(limiter.admitted(), 2);
	}

	#[tokio::test(start_paused = true)]
	async fn window_resets_once_duration_elapses() {
		let limiter = limiter(StdDuration::from_secs(1), 1);

		assert!(limiter.try_acquire().is_admitted());

		time::advance(StdDuration::from_millis(400)).await;

		assert_eq!(
			limiter.try_acquire(),
			Admission::Saturated { retry_in: StdDuration::from_millis(600) }
		);

		time::advance(StdDuration::from_millis(600)).await;

		assert_eq!(limiter.admitted(), 0);
		assert!(limiter.try_acquire().is_admitted());
		assert_eq!(limiter.admitted(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn acquire_sleeps_until_the_boundary() {
		let limiter = limiter(StdDuration::from_secs(1), 1);

		limiter.acquire().await;

		let started = Instant::now();

		limiter.acquire().await;

		let waited = started.elapsed();

		assert!(waited >= StdDuration::from_secs(1), "Waited only {waited:?}.");
		assert!(waited < StdDuration::from_millis(1_010), "Waited too long: {waited:?}.");
		assert_eq!(limiter.admitted(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn timeout_leaves_the_counter_untouched() {
		let limiter = limiter(StdDuration::from_secs(10), 1);

		limiter.acquire().await;

		let err = limiter
			.acquire_timeout(StdDuration::from_secs(1))
			.await
			.expect_err("Saturated window should outlast the timeout.");

		assert!(matches!(err, Error::Cancelled { reason: CancelReason::TimedOut }));
		assert_eq!(limiter.admitted(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn cancelled_token_fails_without_waiting() {
		let limiter = limiter(StdDuration::from_secs(1), 1);
		let cancel = CancellationToken::new();

		cancel.cancel();

		let err = limiter
			.acquire_cancellable(&cancel)
			.await
			.expect_err("Cancelled token must abandon the wait.");

		assert!(matches!(err, Error::Cancelled { reason: CancelReason::Token }));
		assert_eq!(limiter.admitted(), 0);
	}

	#[tokio::test(start_paused = true)]
	async fn huge_windows_do_not_overflow() {
		let limiter = limiter(StdDuration::MAX, 1);

		assert!(limiter.try_acquire().is_admitted());

		time::advance(StdDuration::from_secs(60 * 60 * 24 * 365)).await;

		match limiter.try_acquire() {
			Admission::Saturated { retry_in } => assert!(retry_in > StdDuration::from_secs(1 << 40)),
			Admission::Admitted => panic!("A never-ending window must stay saturated."),
		}
	}
}
