//! Explorer configuration.
//!
//! Every field has a default, so a config document only needs to name the
//! values it overrides.

use serde::Deserialize;

use crate::components::model::FileFormat;
use crate::error::{GraphError, Result};

/// Locations of the pre-generated graph files offered as quick options.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct QuickOptions {
	pub json: String,
	pub graphml: String,
	pub gml: String,
}

impl Default for QuickOptions {
	fn default() -> Self {
		Self {
			json: "../graph/knowledge_graph.json".into(),
			graphml: "../graph/knowledge_graph.graphml".into(),
			gml: "../graph/knowledge_graph.gml".into(),
		}
	}
}

impl QuickOptions {
	/// URL configured for a format.
	pub fn url(&self, format: FileFormat) -> &str {
		match format {
			FileFormat::Json => &self.json,
			FileFormat::GraphMl => &self.graphml,
			FileFormat::Gml => &self.gml,
		}
	}
}

/// Settings for generated export files.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
	/// Tag written into the `source` field of JSON export metadata.
	pub source_tag: String,
	/// Number of sample nodes and edges included in the summary export.
	pub sample_size: usize,
}

impl Default for ExportConfig {
	fn default() -> Self {
		Self {
			source_tag: "Knowledge Graph Explorer v2.0".into(),
			sample_size: 10,
		}
	}
}

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
	pub quick_options: QuickOptions,
	pub export: ExportConfig,
}

impl ExplorerConfig {
	/// Parse a (possibly partial) JSON config document.
	pub fn from_json(text: &str) -> Result<Self> {
		serde_json::from_str(text).map_err(GraphError::InvalidJson)
	}
}
