//! Error taxonomy for the ingestion and export pipeline.
//!
//! Parser failures carry a format prefix in their message ("GraphML parsing
//! failed: ...") so the UI can surface them without further wrapping. A failed
//! load never yields a partial graph.

use thiserror::Error;

use crate::components::export::EXPORT_FORMATS;
use crate::components::model::SUPPORTED_EXTENSIONS;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Everything that can go wrong between raw input and canonical graph.
#[derive(Debug, Error)]
pub enum GraphError {
	/// File extension is not one of the declared formats.
	#[error(
		"Unsupported file format: {extension}. Supported formats: {}",
		SUPPORTED_EXTENSIONS.join(", ")
	)]
	UnsupportedFormat { extension: String },

	/// Export target name is not one of the known exporters.
	#[error(
		"Unsupported export format: {name}. Supported formats: {}",
		EXPORT_FORMATS.join(", ")
	)]
	UnsupportedExportFormat { name: String },

	/// Content is not syntactically valid JSON.
	#[error("JSON parsing failed: {0}")]
	InvalidJson(#[source] serde_json::Error),

	/// JSON parsed but matched none of the known shapes.
	#[error("JSON parsing failed: Unrecognized JSON structure")]
	UnrecognizedStructure,

	/// GraphML content is not well-formed XML.
	#[error("GraphML parsing failed: Invalid XML format: {0}")]
	InvalidXml(#[from] roxmltree::Error),

	/// GML content has a structural problem (e.g. a block never closed).
	#[error("GML parsing failed: {0}")]
	InvalidGml(String),

	/// Content sniffing could not classify the input.
	#[error("Could not detect file format")]
	UnknownFormat,

	/// The remote answered with a non-2xx status.
	#[error("Failed to load from URL: HTTP {status}: {status_text}")]
	NetworkFailure { status: u16, status_text: String },

	/// The request never produced a response.
	#[error("Failed to load from URL: {0}")]
	Transport(String),

	/// A fetched body could not be parsed.
	#[error("Failed to load from URL: {0}")]
	UrlContent(#[source] Box<GraphError>),

	/// A text source could not be read.
	#[error("Failed to read {name}: {reason}")]
	Read { name: String, reason: String },

	/// An edge without a resolvable endpoint after the fallback chain.
	#[error("{format} parsing failed: edge {index} has no resolvable `{endpoint}` endpoint")]
	MalformedEdge {
		format: &'static str,
		index: usize,
		endpoint: &'static str,
	},

	/// Nothing stored under the requested key.
	#[error("No data found in storage with key: {key}")]
	MissingStoredGraph { key: String },

	/// The stored value is not a parseable graph.
	#[error("Failed to parse localStorage data: {0}")]
	StoredContent(#[source] Box<GraphError>),

	/// An export could not be serialized.
	#[error("Failed to serialize export: {0}")]
	Serialize(#[source] serde_json::Error),
}
