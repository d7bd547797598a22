//! Optional observability helpers for limiter waits and document submissions.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `crpt_api.call` with the `operation` and
//!   `stage` (call site) fields, plus a `warn` event for every failure swallowed by
//!   [`Client::create_or_failed`](crate::client::Client::create_or_failed).
//! - Enable `metrics` to increment the `crpt_api_call_total` counter for every
//!   attempt/success/failure/cancellation, labeled by `operation` + `outcome`, and to record
//!   admission waits in the `crpt_api_admission_wait_seconds` histogram.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Waiting on the rate limiter for admission.
	Acquire,
	/// Submitting a document through the transport.
	Create,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::Acquire => "acquire",
			Operation::Create => "create",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CallOutcome {
	/// Entry to a client helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure reported back to the caller.
	Failure,
	/// The admission wait was abandoned.
	Cancelled,
}
impl CallOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CallOutcome::Attempt => "attempt",
			CallOutcome::Success => "success",
			CallOutcome::Failure => "failure",
			CallOutcome::Cancelled => "cancelled",
		}
	}
}
impl Display for CallOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
