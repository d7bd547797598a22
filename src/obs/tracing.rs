// self
use crate::{_prelude::*, obs::Operation};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedCall<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedCall<F> = F;

/// A span builder used by limiter and client calls.
#[derive(Clone, Debug)]
pub struct CallSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl CallSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(operation: Operation, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("crpt_api.call", operation = operation.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (operation, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedCall<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Reports a failure that is not propagated to the caller as an error value.
pub fn report_swallowed(operation: Operation, error: &Error) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(operation = operation.as_str(), error = %error, "Call failed.");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (operation, error);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::CancelReason;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = CallSpan::new(Operation::Create, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[test]
	fn report_swallowed_accepts_any_error() {
		report_swallowed(Operation::Acquire, &Error::Cancelled { reason: CancelReason::Token });
	}
}
