// self
use crate::{
	_prelude::*,
	client::DEFAULT_ENDPOINT,
	error::ConfigError,
	limit::{Window, WindowUnit},
};

/// Serializable client settings, loadable from any serde format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
	/// Registry endpoint; the public document-create endpoint when unset.
	#[serde(default)]
	pub endpoint: Option<Url>,
	/// Admission window.
	pub window: WindowConfig,
	/// Per-request timeout in milliseconds.
	#[serde(default)]
	pub request_timeout_ms: Option<u64>,
}
impl ClientConfig {
	/// Creates a builder for a window of `capacity` admissions per one `unit`.
	pub fn builder(unit: WindowUnit, capacity: u32) -> ClientConfigBuilder {
		ClientConfigBuilder::new(unit, capacity)
	}

	/// Resolves the configured endpoint.
	pub fn endpoint(&self) -> Result<Url, ConfigError> {
		match &self.endpoint {
			Some(url) => Ok(url.clone()),
			None => Url::parse(DEFAULT_ENDPOINT)
				.map_err(|source| ConfigError::InvalidEndpoint { source }),
		}
	}

	/// Validates the window settings.
	pub fn window(&self) -> Result<Window, ConfigError> {
		self.window.window()
	}

	/// Validates the request timeout.
	pub fn request_timeout(&self) -> Result<Option<StdDuration>, ConfigError> {
		match self.request_timeout_ms {
			Some(0) => Err(ConfigError::ZeroTimeout),
			Some(ms) => Ok(Some(StdDuration::from_millis(ms))),
			None => Ok(None),
		}
	}

	/// Checks every setting without building anything.
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.endpoint()?;
		self.window()?;
		self.request_timeout()?;

		Ok(())
	}
}

/// Window section of [`ClientConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowConfig {
	/// Unit the window length is expressed in.
	pub unit: WindowUnit,
	/// Number of units per window.
	#[serde(default = "default_length")]
	pub length: u64,
	/// Maximum admissions per window.
	pub capacity: u32,
}
impl WindowConfig {
	/// Validates the settings into a [`Window`].
	pub fn window(&self) -> Result<Window, ConfigError> {
		Window::from_unit(self.unit, self.length, self.capacity)
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	endpoint: Option<Url>,
	window: WindowConfig,
	request_timeout_ms: Option<u64>,
}
impl ClientConfigBuilder {
	/// Creates a builder for a window of `capacity` admissions per one `unit`.
	pub fn new(unit: WindowUnit, capacity: u32) -> Self {
		Self {
			endpoint: None,
			window: WindowConfig { unit, length: default_length(), capacity },
			request_timeout_ms: None,
		}
	}

	/// Overrides the registry endpoint.
	pub fn endpoint(mut self, url: Url) -> Self {
		self.endpoint = Some(url);

		self
	}

	/// Stretches the window to `length` units.
	pub fn window_length(mut self, length: u64) -> Self {
		self.window.length = length;

		self
	}

	/// Sets the per-request timeout.
	pub fn request_timeout(mut self, timeout: StdDuration) -> Self {
		self.request_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));

		self
	}

	/// Validates the collected settings.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let config = ClientConfig {
			endpoint: self.endpoint,
			window: self.window,
			request_timeout_ms: self.request_timeout_ms,
		};

		config.validate()?;

		Ok(config)
	}
}

fn default_length() -> u64 {
	1
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn builder_validates_window_and_timeout() {
		let config = ClientConfig::builder(WindowUnit::Seconds, 2)
			.window_length(30)
			.request_timeout(StdDuration::from_secs(5))
			.build()
			.expect("Valid settings should build.");

		assert_eq!(
			config.window().expect("Window should validate."),
			Window::new(StdDuration::from_secs(30), 2).expect("Reference window should be valid.")
		);
		assert_eq!(
			config.request_timeout().expect("Timeout should validate."),
			Some(StdDuration::from_secs(5))
		);
		assert_eq!(
			config.endpoint().expect("Default endpoint should parse.").as_str(),
			DEFAULT_ENDPOINT
		);
		assert!(matches!(
			ClientConfig::builder(WindowUnit::Minutes, 0).build(),
			Err(ConfigError::ZeroCapacity)
		));
		assert!(matches!(
			ClientConfig::builder(WindowUnit::Minutes, 1)
				.request_timeout(StdDuration::ZERO)
				.build(),
			Err(ConfigError::ZeroTimeout)
		));
	}

	#[test]
	fn config_deserializes_with_defaults() {
		let config: ClientConfig = serde_json::from_str(
			"{\"window\":{\"unit\":\"minutes\",\"capacity\":10},\"endpoint\":\"https://registry.example.com/create\"}",
		)
		.expect("Config JSON should deserialize.");

		assert_eq!(config.window.length, 1);
		assert_eq!(config.request_timeout_ms, None);
		assert_eq!(
			config.endpoint().expect("Explicit endpoint should be kept.").as_str(),
			"https://registry.example.com/create"
		);
		assert_eq!(
			config.window().expect("Window should validate.").duration(),
			StdDuration::from_secs(60)
		);
	}

	#[test]
	fn unknown_fields_are_rejected() {
		let err = serde_json::from_str::<ClientConfig>(
			"{\"window\":{\"unit\":\"seconds\",\"capacity\":1,\"burst\":4}}",
		)
		.expect_err("Unknown window fields must be rejected.");

		assert!(err.to_string().contains("burst"));
	}
}
