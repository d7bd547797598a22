//! Registry calendar dates encoded as epoch milliseconds.
//!
//! A date maps to the instant of its midnight at [`REGISTRY_OFFSET`].

// crates.io
use serde::{Deserializer, Serializer};
use time::{UtcOffset, macros::{date, offset}};
// self
use crate::_prelude::*;

/// Fixed UTC offset of the registry's calendar (Moscow time).
pub const REGISTRY_OFFSET: UtcOffset = offset!(+3);
/// Date used when a document leaves a date field unset.
pub const DEFAULT_DATE: Date = date!(2020 - 01 - 23);

/// Error returned when epoch milliseconds fall outside the supported calendar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
#[error("Timestamp {millis} ms is outside the supported calendar range.")]
pub struct DateRangeError {
	/// Rejected timestamp.
	pub millis: i64,
}

/// Returns the epoch milliseconds of `date`'s midnight at [`REGISTRY_OFFSET`].
pub fn to_millis(date: Date) -> i64 {
	date.midnight().assume_offset(REGISTRY_OFFSET).unix_timestamp() * 1_000
}

/// Returns the registry calendar date containing the instant `millis`.
pub fn from_millis(millis: i64) -> Result<Date, DateRangeError> {
	let local_secs = millis
		.div_euclid(1_000)
		.checked_add(i64::from(REGISTRY_OFFSET.whole_seconds()))
		.ok_or(DateRangeError { millis })?;

	OffsetDateTime::from_unix_timestamp(local_secs)
		.map(OffsetDateTime::date)
		.map_err(|_| DateRangeError { millis })
}

pub(crate) fn default_date() -> Date {
	DEFAULT_DATE
}

/// `serde(with = ...)` adapter for dates carried as epoch milliseconds.
pub mod registry_millis {
	// crates.io
	use serde::de::Error as _;
	// self
	use super::*;

	/// Serializes `date` as epoch milliseconds.
	pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_i64(to_millis(*date))
	}

	/// Deserializes epoch milliseconds into a date.
	pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
	where
		D: Deserializer<'de>,
	{
		let millis = i64::deserialize(deserializer)?;

		from_millis(millis).map_err(D::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_date_encodes_as_registry_midnight() {
		assert_eq!(to_millis(DEFAULT_DATE), 1_579_726_800_000);
		assert_eq!(from_millis(1_579_726_800_000), Ok(DEFAULT_DATE));
	}

	#[test]
	fn instants_within_the_local_day_map_to_that_date() {
		let late_evening = 1_579_726_800_000 + (23 * 60 + 59) * 60 * 1_000;

		assert_eq!(from_millis(late_evening), Ok(DEFAULT_DATE));
		assert_eq!(from_millis(1_579_726_800_000 - 1), Ok(date!(2020 - 01 - 22)));
	}

	#[test]
	fn out_of_range_timestamps_are_rejected() {
		assert_eq!(from_millis(i64::MAX), Err(DateRangeError { millis: i64::MAX }));
	}
}
