//! Goods-introduction document model submitted to the registry.
//!
//! Field names follow the registry's snake_case wire names; the nested description keeps its
//! camelCase `participantInn`. Calendar dates travel as epoch milliseconds of midnight in the
//! registry's time zone (see [`date`]).

pub mod date;

// self
use crate::_prelude::*;

/// Document type used for goods introduced into circulation.
pub const DEFAULT_DOC_TYPE: &str = "LP_INTRODUCE_GOODS";

/// Goods-introduction document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
	/// Registry document identifier.
	pub doc_id: Option<String>,
	/// Registry document status.
	pub doc_status: Option<String>,
	/// Registry document type.
	#[serde(default = "default_doc_type")]
	pub doc_type: String,
	/// Whether goods are imported.
	#[serde(default = "default_import_request")]
	pub import_request: bool,
	/// Participant description block.
	#[serde(default)]
	pub description: Option<Description>,
	/// Owner taxpayer number.
	pub owner_inn: Option<String>,
	/// Participant taxpayer number.
	pub participant_inn: Option<String>,
	/// Producer taxpayer number.
	pub producer_inn: Option<String>,
	/// Production date.
	#[serde(with = "date::registry_millis", default = "date::default_date")]
	pub production_date: Date,
	/// Production type.
	pub production_type: Option<String>,
	/// Products declared by the document.
	#[serde(default)]
	pub products: Vec<Product>,
	/// Registration date.
	#[serde(with = "date::registry_millis", default = "date::default_date")]
	pub reg_date: Date,
	/// Registration number.
	pub reg_number: Option<String>,
}
impl Default for Document {
	fn default() -> Self {
		Self {
			doc_id: None,
			doc_status: None,
			doc_type: default_doc_type(),
			import_request: default_import_request(),
			description: None,
			owner_inn: None,
			participant_inn: None,
			producer_inn: None,
			production_date: date::DEFAULT_DATE,
			production_type: None,
			products: Vec::new(),
			reg_date: date::DEFAULT_DATE,
			reg_number: None,
		}
	}
}

/// Participant description nested in a [`Document`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
	/// Participant taxpayer number.
	#[serde(rename = "participantInn")]
	pub participant_inn: Option<String>,
}
impl Description {
	/// Creates a description for the given participant.
	pub fn new(participant_inn: impl Into<String>) -> Self {
		Self { participant_inn: Some(participant_inn.into()) }
	}
}

/// Single product line of a [`Document`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
	/// Certificate document kind.
	pub certificate_document: Option<String>,
	/// Certificate issue date.
	#[serde(with = "date::registry_millis", default = "date::default_date")]
	pub certificate_document_date: Date,
	/// Certificate number.
	pub certificate_document_number: Option<String>,
	/// Owner taxpayer number.
	pub owner_inn: Option<String>,
	/// Producer taxpayer number.
	pub producer_inn: Option<String>,
	/// Production date.
	#[serde(with = "date::registry_millis", default = "date::default_date")]
	pub production_date: Date,
	/// Commodity nomenclature code.
	pub tnved_code: Option<String>,
	/// Unit identification code.
	pub uit_code: Option<String>,
	/// Transport package identification code.
	pub uitu_code: Option<String>,
}
impl Default for Product {
	fn default() -> Self {
		Self {
			certificate_document: None,
			certificate_document_date: date::DEFAULT_DATE,
			certificate_document_number: None,
			owner_inn: None,
			producer_inn: None,
			production_date: date::DEFAULT_DATE,
			tnved_code: None,
			uit_code: None,
			uitu_code: None,
		}
	}
}

fn default_doc_type() -> String {
	DEFAULT_DOC_TYPE.into()
}

fn default_import_request() -> bool {
	true
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn defaults_match_registry_expectations() {
		let document = Document::default();

		assert_eq!(document.doc_type, DEFAULT_DOC_TYPE);
		assert!(document.import_request);
		assert_eq!(document.production_date, date::DEFAULT_DATE);
		assert_eq!(document.reg_date, date::DEFAULT_DATE);
		assert!(document.products.is_empty());
	}

	#[test]
	fn missing_fields_fall_back_to_defaults() {
		let document: Document =
			serde_json::from_str("{\"doc_id\":\"abc\"}").expect("Sparse document should parse.");

		assert_eq!(document.doc_id.as_deref(), Some("abc"));
		assert_eq!(document, Document { doc_id: Some("abc".into()), ..Default::default() });
	}

	#[test]
	fn description_keeps_camel_case_name() {
		let value = serde_json::to_value(Description::new("7700000000"))
			.expect("Description should serialize.");

		assert_eq!(value, serde_json::json!({ "participantInn": "7700000000" }));
	}
}
