//! Document serialization contracts.
//!
//! The client turns each document into bytes before asking the limiter for admission, so an
//! unencodable document never consumes a slot. [`JsonSerializer`] covers every [`Serialize`]
//! type and doubles as the reference decoder for round-trip checks.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{_prelude::*, error::EncodeError};

/// Deterministic, non-mutating document encoder used by the client.
pub trait DocumentSerializer<D>
where
	Self: Send + Sync,
	D: ?Sized,
{
	/// Encodes `document` into the payload handed to the transport.
	fn serialize(&self, document: &D) -> Result<Vec<u8>, EncodeError>;
}

/// JSON encoder with optional pretty printing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JsonSerializer {
	pretty: bool,
}
impl JsonSerializer {
	/// Creates a compact JSON serializer.
	pub const fn compact() -> Self {
		Self { pretty: false }
	}

	/// Creates a serializer emitting indented JSON.
	pub const fn pretty() -> Self {
		Self { pretty: true }
	}

	/// Decodes a payload produced by [`DocumentSerializer::serialize`].
	///
	/// Failures carry the JSON path of the offending field.
	pub fn deserialize<D>(&self, payload: &[u8]) -> Result<D, EncodeError>
	where
		D: DeserializeOwned,
	{
		let mut deserializer = serde_json::Deserializer::from_slice(payload);

		serde_path_to_error::deserialize(&mut deserializer).map_err(EncodeError::Decode)
	}
}
impl<D> DocumentSerializer<D> for JsonSerializer
where
	D: ?Sized + Serialize,
{
	fn serialize(&self, document: &D) -> Result<Vec<u8>, EncodeError> {
		let encoded = if self.pretty {
			serde_json::to_vec_pretty(document)
		} else {
			serde_json::to_vec(document)
		};

		encoded.map_err(EncodeError::Serialize)
	}
}
