//! Client-level error types shared across the limiter, codec, and transport layers.

// self
use crate::{_prelude::*, limit::WindowUnit};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Document could not be encoded or decoded.
	#[error(transparent)]
	Encode(#[from] EncodeError),
	/// Submission reached the transport and failed (DNS, TCP, TLS, body read).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// The wait for admission was abandoned before a slot opened.
	#[error("Admission wait was abandoned: {reason}.")]
	Cancelled {
		/// What ended the wait.
		reason: CancelReason,
	},
}
impl Error {
	/// Returns `true` when the error came from an abandoned admission wait.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled { .. })
	}
}

/// Reason an admission wait ended without an admission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CancelReason {
	/// The caller's cancellation token fired.
	Token,
	/// The caller's wait budget elapsed.
	TimedOut,
}
impl CancelReason {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			CancelReason::Token => "cancelled",
			CancelReason::TimedOut => "timed out",
		}
	}
}
impl Display for CancelReason {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Configuration and validation failures raised while constructing clients and limiters.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Window capacity must admit at least one submission.
	#[error("Window capacity must be positive.")]
	ZeroCapacity,
	/// Window duration must be positive.
	#[error("Window duration must be positive.")]
	ZeroWindow,
	/// Window length cannot be represented as a duration.
	#[error("A window of {length} {unit} exceeds the supported range.")]
	WindowOutOfRange {
		/// Configured unit.
		unit: WindowUnit,
		/// Configured number of units.
		length: u64,
	},
	/// Request timeout must be positive when set.
	#[error("Request timeout must be positive.")]
	ZeroTimeout,
	/// Endpoint URL cannot be parsed.
	#[error("Endpoint URL is invalid.")]
	InvalidEndpoint {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Document encoding failures.
#[derive(Debug, ThisError)]
pub enum EncodeError {
	/// Document could not be serialized.
	#[error("Document could not be serialized.")]
	Serialize(#[source] serde_json::Error),
	/// Payload could not be deserialized back into a document.
	#[error("Payload is not a valid document.")]
	Decode(#[source] serde_path_to_error::Error<serde_json::Error>),
}

/// Transport-level failures (network, IO, unreadable responses).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while submitting the document.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while submitting the document.")]
	Io(#[from] std::io::Error),
	/// Remote response could not be read.
	#[error("Registry returned a response that could not be read.")]
	MalformedResponse {
		/// Transport-specific decoding failure.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// Wraps a failure to read the remote response.
	pub fn malformed(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::MalformedResponse { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_decode() { Self::malformed(e) } else { Self::network(e) }
	}
}
