// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for `create` calls.
#[derive(Debug, Default)]
pub struct ClientMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
	cancelled: AtomicU64,
}
impl ClientMetrics {
	/// Returns the total number of `create` calls.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of calls that received a registry response.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of calls that failed to encode or submit.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	/// Returns the number of calls abandoned while waiting for admission.
	pub fn cancellations(&self) -> u64 {
		self.cancelled.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_cancelled(&self) {
		self.cancelled.fetch_add(1, Ordering::Relaxed);
	}
}
