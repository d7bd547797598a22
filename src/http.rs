//! Transport primitives for document submissions.
//!
//! The module exposes [`DocumentTransport`] alongside [`SubmitResponse`] and
//! [`ResponseMetadata`] so downstream crates can plug in custom HTTP stacks (or test doubles)
//! without touching the client's admission logic. Transports are shared across every caller
//! without extra synchronization, so implementations must not mutate shared state per request.

// crates.io
#[cfg(feature = "reqwest")] use reqwest::header::{CONTENT_TYPE, HeaderMap, RETRY_AFTER};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, error::TransportError, signature::Signature};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Header carrying the base64-encoded detached signature.
pub const SIGNATURE_HEADER: &str = "Signature";

/// Boxed future returned by [`DocumentTransport::submit`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<SubmitResponse, TransportError>> + 'a + Send>>;

/// Abstraction over transports capable of delivering a serialized document to the registry.
///
/// The trait acts as the client's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so one instance can be shared by every concurrent caller, and the
/// futures they return must be `Send` so submissions can hop executors.
pub trait DocumentTransport
where
	Self: 'static + Send + Sync,
{
	/// Submits `payload` together with its detached `signature`.
	///
	/// A response that arrives (whatever its status) is a success; only failures to reach the
	/// registry or to read its reply are errors.
	fn submit<'a>(&'a self, payload: Vec<u8>, signature: &'a Signature) -> TransportFuture<'a>;
}

/// Metadata captured from the registry's HTTP response.
///
/// Additional metadata fields may be added in future releases, so downstream code
/// should construct values using field names instead of struct update syntax.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// HTTP status code returned by the registry, if available.
	pub status: Option<u16>,
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}

/// Registry reply to a submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitResponse {
	/// Response body, verbatim.
	pub body: String,
	/// Status and retry hints observed alongside the body.
	pub metadata: ResponseMetadata,
}
impl SubmitResponse {
	/// Returns `true` when the registry answered with a 2xx status.
	pub fn is_success(&self) -> bool {
		matches!(self.metadata.status, Some(200..=299))
	}
}

/// Reqwest-backed transport posting JSON payloads to a fixed endpoint.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
	client: ReqwestClient,
	endpoint: Url,
}
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Creates a transport for `endpoint` using a default reqwest client.
	pub fn new(endpoint: Url) -> Self {
		Self::with_client(ReqwestClient::default(), endpoint)
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient, endpoint: Url) -> Self {
		Self { client, endpoint }
	}

	/// Creates a transport whose requests give up after `timeout`.
	pub fn with_timeout(endpoint: Url, timeout: StdDuration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().timeout(timeout).build()?;

		Ok(Self::with_client(client, endpoint))
	}

	/// Endpoint every document is posted to.
	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}
}
#[cfg(feature = "reqwest")]
impl DocumentTransport for ReqwestTransport {
	fn submit<'a>(&'a self, payload: Vec<u8>, signature: &'a Signature) -> TransportFuture<'a> {
		Box::pin(async move {
			let response = self
				.client
				.post(self.endpoint.clone())
				.header(CONTENT_TYPE, "application/json")
				.header(SIGNATURE_HEADER, signature.to_base64())
				.body(payload)
				.send()
				.await?;
			let status = response.status();
			let retry_after = parse_retry_after(response.headers());
			let body = response.text().await.map_err(TransportError::malformed)?;

			Ok(SubmitResponse {
				body,
				metadata: ResponseMetadata { status: Some(status.as_u16()), retry_after },
			})
		})
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use reqwest::header::HeaderValue;
	// self
	use super::*;

	#[test]
	fn retry_after_accepts_delta_seconds() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static(" 120 "));

		assert_eq!(parse_retry_after(&headers), Some(Duration::seconds(120)));
	}

	#[test]
	fn retry_after_ignores_past_dates_and_garbage() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"));

		assert_eq!(parse_retry_after(&headers), None);

		headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));

		assert_eq!(parse_retry_after(&headers), None);
		assert_eq!(parse_retry_after(&HeaderMap::new()), None);
	}

	#[test]
	fn success_requires_two_hundred_range() {
		let response = |status| SubmitResponse {
			body: String::new(),
			metadata: ResponseMetadata { status, retry_after: None },
		};

		assert!(response(Some(201)).is_success());
		assert!(!response(Some(429)).is_success());
		assert!(!response(None).is_success());
	}
}
