//! Demonstrates wiring a custom transport into the rate-limited client.
//!
//! 1. Implement [`DocumentTransport`] so submissions go wherever you need (here: an in-memory
//!    journal that fails every third call).
//! 2. Wrap it in `Arc` and pass it to [`Client::with_transport`] together with a shared
//!    [`RateLimiter`].
//! 3. Fire concurrent `create` calls and watch the limiter space them out.

// std
use std::{
	sync::{
		Arc,
		atomic::{AtomicUsize, Ordering},
	},
	time::{Duration, Instant},
};
// crates.io
use color_eyre::Result;
// self
use crpt_api::{
	client::Client,
	document::{Description, Document, Product},
	error::{Error, TransportError},
	http::{DocumentTransport, ResponseMetadata, SubmitResponse, TransportFuture},
	limit::{RateLimiter, Window},
	signature::Signature,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let limiter = Arc::new(RateLimiter::new(Window::new(Duration::from_secs(1), 2)?));
	let client: Client<JournalTransport> =
		Client::with_transport(limiter, Arc::new(JournalTransport::default()));
	let document = Document {
		doc_id: Some("demo-doc".into()),
		description: Some(Description::new("7700000000")),
		products: vec![Product { uit_code: Some("010461111111111121".into()), ..Default::default() }],
		..Default::default()
	};
	let started = Instant::now();
	let mut tasks = Vec::new();

	for caller in 0..5 {
		let client = client.clone();
		let document = document.clone();

		tasks.push(tokio::spawn(async move {
			let outcome = client.create(&document, &Signature::from("demo-signature")).await;

			(caller, started.elapsed(), outcome)
		}));
	}

	for task in tasks {
		let (caller, elapsed, outcome) = task.await?;

		match outcome {
			Ok(response) => println!("Caller {caller} admitted after {elapsed:?}: {}.", response.body),
			Err(Error::Transport(e)) => println!("Caller {caller} failed after {elapsed:?}: {e}."),
			Err(e) => return Err(e.into()),
		}
	}

	println!(
		"{} attempts, {} successes, {} failures.",
		client.metrics.attempts(),
		client.metrics.successes(),
		client.metrics.failures()
	);

	Ok(())
}

#[derive(Debug, Default)]
struct JournalTransport {
	submitted: AtomicUsize,
}
impl DocumentTransport for JournalTransport {
	fn submit<'a>(&'a self, payload: Vec<u8>, _signature: &'a Signature) -> TransportFuture<'a> {
		Box::pin(async move {
			let number = self.submitted.fetch_add(1, Ordering::SeqCst) + 1;

			if number % 3 == 0 {
				return Err(TransportError::network(std::io::Error::other(
					"Journal rejected every third submission.",
				)));
			}

			Ok(SubmitResponse {
				body: format!("journal entry {number} ({} bytes)", payload.len()),
				metadata: ResponseMetadata { status: Some(200), retry_after: None },
			})
		})
	}
}
