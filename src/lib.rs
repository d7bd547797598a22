//! Rate-limited client for the CRPT registry document API. Submit goods-introduction documents
//! from any number of concurrent tasks while a fixed-window admission gate keeps the caller inside
//! the registry's request budget.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod client;
pub mod codec;
pub mod document;
pub mod error;
pub mod http;
pub mod limit;
pub mod obs;
pub mod signature;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for tests; enabled via `cfg(test)` or the `test` crate
	//! feature.

	pub use crate::_prelude::*;

	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use crate::{
		client::Client,
		error::TransportError,
		http::{DocumentTransport, ResponseMetadata, SubmitResponse, TransportFuture},
		limit::{RateLimiter, Window},
		signature::Signature,
	};

	/// Transport double that records every submission it receives.
	#[derive(Debug, Default)]
	pub struct RecordingTransport {
		payloads: Mutex<Vec<(Vec<u8>, Signature)>>,
		failing: bool,
		calls: AtomicUsize,
	}
	impl RecordingTransport {
		/// Builds a transport whose every submission fails with a network error.
		pub fn failing() -> Self {
			Self { failing: true, ..Default::default() }
		}

		/// Returns the number of submissions attempted so far.
		pub fn calls(&self) -> usize {
			self.calls.load(Ordering::SeqCst)
		}

		/// Returns a copy of every recorded payload and signature.
		pub fn payloads(&self) -> Vec<(Vec<u8>, Signature)> {
			self.payloads.lock().clone()
		}
	}
	impl DocumentTransport for RecordingTransport {
		fn submit<'a>(&'a self, payload: Vec<u8>, signature: &'a Signature) -> TransportFuture<'a> {
			Box::pin(async move {
				let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

				if self.failing {
					return Err(TransportError::network(std::io::Error::other(
						"Recording transport refused the submission.",
					)));
				}

				self.payloads.lock().push((payload, signature.clone()));

				Ok(SubmitResponse {
					body: format!("{{\"value\":\"doc-{call}\"}}"),
					metadata: ResponseMetadata { status: Some(200), retry_after: None },
				})
			})
		}
	}

	/// Builds a client backed by [`RecordingTransport`] and a limiter for `window`.
	pub fn build_recording_client(
		window: Window,
	) -> (Client<RecordingTransport>, Arc<RecordingTransport>) {
		let transport = Arc::new(RecordingTransport::default());
		let client = Client::with_transport(Arc::new(RateLimiter::new(window)), transport.clone());

		(client, transport)
	}
}

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		num::NonZeroU32,
		pin::Pin,
		str::FromStr,
		sync::Arc,
		time::Duration as StdDuration,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Date, Duration, OffsetDateTime};
	pub use tokio_util::sync::CancellationToken;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use tokio_util::sync::CancellationToken;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
