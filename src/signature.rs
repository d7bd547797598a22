//! Detached document signature wrapper that redacts key material.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
// self
use crate::_prelude::*;

/// Redacted signature bytes keeping detached signatures out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);
impl Signature {
	/// Wraps raw signature bytes.
	pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
		Self(bytes.into())
	}

	/// Returns the raw signature bytes. Callers must avoid logging them.
	pub fn expose(&self) -> &[u8] {
		&self.0
	}

	/// Encodes the signature with the standard base64 alphabet.
	pub fn to_base64(&self) -> String {
		STANDARD.encode(&self.0)
	}
}
impl From<Vec<u8>> for Signature {
	fn from(value: Vec<u8>) -> Self {
		Self(value)
	}
}
impl From<&[u8]> for Signature {
	fn from(value: &[u8]) -> Self {
		Self(value.to_vec())
	}
}
impl From<&str> for Signature {
	fn from(value: &str) -> Self {
		Self(value.as_bytes().to_vec())
	}
}
impl AsRef<[u8]> for Signature {
	fn as_ref(&self) -> &[u8] {
		self.expose()
	}
}
impl Debug for Signature {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("Signature").field(&"<redacted>").finish()
	}
}
impl Display for Signature {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn signature_formatters_redact() {
		let signature = Signature::from("some signature");

		assert_eq!(format!("{signature:?}"), "Signature(\"<redacted>\")");
		assert_eq!(format!("{signature}"), "<redacted>");
	}

	#[test]
	fn signature_encodes_as_base64() {
		assert_eq!(Signature::from("some signature").to_base64(), "c29tZSBzaWduYXR1cmU=");
		assert_eq!(Signature::new(Vec::new()).to_base64(), "");
	}
}
