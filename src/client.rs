//! Rate-limited document submission.
//!
//! [`Client::create`] encodes the document, waits on the shared [`RateLimiter`] for admission,
//! then hands the payload to the [`DocumentTransport`]. Every call consumes its own admission;
//! nothing is deduplicated. Failures come back as a tagged [`Error`];
//! [`Client::create_or_failed`] keeps the legacy contract that collapses every failure into
//! [`FAILED_SENTINEL`].

mod config;
mod metrics;

pub use config::*;
pub use metrics::*;

// self
use crate::{
	_prelude::*,
	codec::{DocumentSerializer, JsonSerializer},
	http::{DocumentTransport, SubmitResponse},
	limit::RateLimiter,
	obs::{self, CallOutcome, CallSpan, Operation},
	signature::Signature,
};
#[cfg(feature = "reqwest")]
use crate::{
	error::ConfigError,
	http::ReqwestTransport,
	limit::{Window, WindowUnit},
};

/// Public registry endpoint for creating documents.
pub const DEFAULT_ENDPOINT: &str = "https://ismp.crpt.ru/api/v3/lk/documents/create";
/// Body returned by [`Client::create_or_failed`] when a call fails.
pub const FAILED_SENTINEL: &str = "FAILED";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestDocumentClient = Client<ReqwestTransport>;

/// Submits documents through a transport while a shared limiter bounds the request rate.
///
/// The limiter is the only shared mutable state; the transport and serializer are used
/// read-only from every caller. Cloning a client shares all three, so clones draw from the
/// same admission budget.
pub struct Client<T, S = JsonSerializer>
where
	T: ?Sized + DocumentTransport,
{
	/// Limiter every submission is admitted through.
	pub limiter: Arc<RateLimiter>,
	/// Transport that delivers payloads to the registry.
	pub transport: Arc<T>,
	/// Encoder applied to documents before admission.
	pub serializer: S,
	/// Shared counters for `create` outcomes.
	pub metrics: Arc<ClientMetrics>,
}
impl<T> Client<T>
where
	T: ?Sized + DocumentTransport,
{
	/// Creates a client that reuses the caller-provided limiter + transport pair.
	pub fn with_transport(limiter: Arc<RateLimiter>, transport: impl Into<Arc<T>>) -> Self {
		Self {
			limiter,
			transport: transport.into(),
			serializer: JsonSerializer::default(),
			metrics: Default::default(),
		}
	}
}
impl<T, S> Client<T, S>
where
	T: ?Sized + DocumentTransport,
{
	/// Replaces the document serializer.
	pub fn with_serializer<S2>(self, serializer: S2) -> Client<T, S2> {
		Client {
			limiter: self.limiter,
			transport: self.transport,
			serializer,
			metrics: self.metrics,
		}
	}

	/// Encodes and submits `document`, waiting as long as admission takes.
	pub async fn create<D>(&self, document: &D, signature: &Signature) -> Result<SubmitResponse>
	where
		D: ?Sized,
		S: DocumentSerializer<D>,
	{
		self.submit(document, signature, async {
			self.limiter.acquire().await;

			Ok::<_, Error>(())
		})
		.await
	}

	/// Like [`create`](Self::create), but abandons the admission wait once `cancel` fires.
	///
	/// Cancellation only applies before admission; an admitted submission runs to completion.
	pub async fn create_cancellable<D>(
		&self,
		document: &D,
		signature: &Signature,
		cancel: &CancellationToken,
	) -> Result<SubmitResponse>
	where
		D: ?Sized,
		S: DocumentSerializer<D>,
	{
		self.submit(document, signature, self.limiter.acquire_cancellable(cancel)).await
	}

	/// Like [`create`](Self::create), but waits at most `limit` for admission.
	pub async fn create_timeout<D>(
		&self,
		document: &D,
		signature: &Signature,
		limit: StdDuration,
	) -> Result<SubmitResponse>
	where
		D: ?Sized,
		S: DocumentSerializer<D>,
	{
		self.submit(document, signature, self.limiter.acquire_timeout(limit)).await
	}

	/// Returns the response body, or [`FAILED_SENTINEL`] when the call fails for any reason.
	///
	/// The failure itself is reported through the observability hooks and [`ClientMetrics`].
	pub async fn create_or_failed<D>(&self, document: &D, signature: &Signature) -> String
	where
		D: ?Sized,
		S: DocumentSerializer<D>,
	{
		match self.create(document, signature).await {
			Ok(response) => response.body,
			Err(e) => {
				obs::report_swallowed(Operation::Create, &e);

				FAILED_SENTINEL.into()
			},
		}
	}

	async fn submit<D, A>(
		&self,
		document: &D,
		signature: &Signature,
		admission: A,
	) -> Result<SubmitResponse>
	where
		D: ?Sized,
		S: DocumentSerializer<D>,
		A: Future<Output = Result<()>>,
	{
		const OPERATION: Operation = Operation::Create;

		let span = CallSpan::new(OPERATION, "create");

		obs::record_call_outcome(OPERATION, CallOutcome::Attempt);
		self.metrics.record_attempt();

		let result = span
			.instrument(async move {
				let payload = self.serializer.serialize(document)?;

				admission.await?;

				let response = self.transport.submit(payload, signature).await?;

				Ok::<_, Error>(response)
			})
			.await;

		match &result {
			Ok(_) => {
				obs::record_call_outcome(OPERATION, CallOutcome::Success);
				self.metrics.record_success();
			},
			Err(e) if e.is_cancelled() => {
				obs::record_call_outcome(OPERATION, CallOutcome::Cancelled);
				self.metrics.record_cancelled();
			},
			Err(_) => {
				obs::record_call_outcome(OPERATION, CallOutcome::Failure);
				self.metrics.record_failure();
			},
		}

		result
	}
}
#[cfg(feature = "reqwest")]
impl Client<ReqwestTransport> {
	/// Creates a client posting to [`DEFAULT_ENDPOINT`] under `window`.
	pub fn new(window: Window) -> Result<Self> {
		let endpoint = Url::parse(DEFAULT_ENDPOINT)
			.map_err(|source| ConfigError::InvalidEndpoint { source })?;

		Ok(Self::with_transport(
			Arc::new(RateLimiter::new(window)),
			ReqwestTransport::new(endpoint),
		))
	}

	/// Creates a client admitting `capacity` submissions per one `unit`.
	pub fn per_unit(unit: WindowUnit, capacity: u32) -> Result<Self> {
		Self::new(Window::per_unit(unit, capacity)?)
	}

	/// Creates a client from validated [`ClientConfig`] settings.
	pub fn from_config(config: &ClientConfig) -> Result<Self> {
		let endpoint = config.endpoint()?;
		let window = config.window()?;
		let transport = match config.request_timeout()? {
			Some(timeout) => ReqwestTransport::with_timeout(endpoint, timeout)?,
			None => ReqwestTransport::new(endpoint),
		};

		Ok(Self::with_transport(Arc::new(RateLimiter::new(window)), transport))
	}
}
impl<T, S> Clone for Client<T, S>
where
	T: ?Sized + DocumentTransport,
	S: Clone,
{
	fn clone(&self) -> Self {
		Self {
			limiter: self.limiter.clone(),
			transport: self.transport.clone(),
			serializer: self.serializer.clone(),
			metrics: self.metrics.clone(),
		}
	}
}
impl<T, S> Debug for Client<T, S>
where
	T: ?Sized + DocumentTransport,
	S: Debug,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Client")
			.field("limiter", &self.limiter)
			.field("serializer", &self.serializer)
			.finish()
	}
}
