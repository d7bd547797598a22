// self
use crate::{
	_prelude::*,
	obs::{CallOutcome, Operation},
};

/// Records a call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(operation: Operation, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"crpt_api_call_total",
			"operation" => operation.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (operation, outcome);
	}
}

/// Records how long a caller waited for admission (when enabled).
pub fn record_admission_wait(waited: StdDuration) {
	#[cfg(feature = "metrics")]
	{
		metrics::histogram!("crpt_api_admission_wait_seconds").record(waited.as_secs_f64());
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = waited;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_call_outcome(Operation::Create, CallOutcome::Failure);
		record_admission_wait(StdDuration::from_millis(250));
	}
}
