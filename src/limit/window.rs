// self
use crate::{_prelude::*, error::ConfigError};

/// Time unit used to express window lengths in configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowUnit {
	/// Milliseconds.
	Milliseconds,
	/// Seconds.
	Seconds,
	/// Minutes.
	Minutes,
	/// Hours.
	Hours,
	/// Days.
	Days,
}
impl WindowUnit {
	/// Returns a stable label suitable for configuration and diagnostics.
	pub const fn as_str(self) -> &'static str {
		match self {
			WindowUnit::Milliseconds => "milliseconds",
			WindowUnit::Seconds => "seconds",
			WindowUnit::Minutes => "minutes",
			WindowUnit::Hours => "hours",
			WindowUnit::Days => "days",
		}
	}

	/// Returns `length` units as a duration, or `None` when the product overflows.
	pub fn checked_duration(self, length: u64) -> Option<StdDuration> {
		let (per_unit, millis) = match self {
			WindowUnit::Milliseconds => (1, true),
			WindowUnit::Seconds => (1, false),
			WindowUnit::Minutes => (60, false),
			WindowUnit::Hours => (60 * 60, false),
			WindowUnit::Days => (24 * 60 * 60, false),
		};
		let scaled = length.checked_mul(per_unit)?;

		Some(if millis { StdDuration::from_millis(scaled) } else { StdDuration::from_secs(scaled) })
	}
}
impl Display for WindowUnit {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for WindowUnit {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"milliseconds" | "ms" => Ok(Self::Milliseconds),
			"seconds" | "s" => Ok(Self::Seconds),
			"minutes" | "m" => Ok(Self::Minutes),
			"hours" | "h" => Ok(Self::Hours),
			"days" | "d" => Ok(Self::Days),
			other => Err(format!("Unknown window unit `{other}`.")),
		}
	}
}

/// Immutable `(duration, capacity)` pair enforced by a [`RateLimiter`](crate::limit::RateLimiter).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Window {
	duration: StdDuration,
	capacity: NonZeroU32,
}
impl Window {
	/// Creates a window admitting `capacity` submissions per `duration`.
	pub fn new(duration: StdDuration, capacity: u32) -> Result<Self, ConfigError> {
		if duration.is_zero() {
			return Err(ConfigError::ZeroWindow);
		}

		let capacity = NonZeroU32::new(capacity).ok_or(ConfigError::ZeroCapacity)?;

		Ok(Self { duration, capacity })
	}

	/// Creates a window one `unit` long.
	pub fn per_unit(unit: WindowUnit, capacity: u32) -> Result<Self, ConfigError> {
		Self::from_unit(unit, 1, capacity)
	}

	/// Creates a window `length` units long.
	pub fn from_unit(unit: WindowUnit, length: u64, capacity: u32) -> Result<Self, ConfigError> {
		let duration = unit
			.checked_duration(length)
			.ok_or(ConfigError::WindowOutOfRange { unit, length })?;

		Self::new(duration, capacity)
	}

	/// Time span the capacity applies to.
	pub const fn duration(&self) -> StdDuration {
		self.duration
	}

	/// Maximum number of admissions per window.
	pub const fn capacity(&self) -> u32 {
		self.capacity.get()
	}
}
