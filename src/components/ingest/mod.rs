//! Multi-format ingestion: parsers, normalizer, auto-detection and merging.
//!
//! Every parser produces a [`RawGraph`] of loosely-typed records, which
//! [`RawGraph::normalize`] turns into the canonical [`Graph`]. A parse either
//! yields a whole graph or an error, never a partial graph.
//!
//! # Example
//!
//! ```
//! use kg_explorer::components::ingest::parse_auto;
//!
//! let graph = parse_auto(r#"[{"source": "a", "target": "b"}]"#).unwrap();
//! assert_eq!(graph.edges[0].label, "related");
//! ```

pub mod detect;
pub mod gml;
pub mod graphml;
pub mod json;
pub mod merge;
pub mod normalize;
pub mod raw;
pub mod source;

use log::info;
use serde_json::{Map, Value};

use self::normalize::{MissingEndpoint, normalize_edges, normalize_nodes};
use self::raw::{RawEdge, RawNode};
use crate::components::model::{FileFormat, Graph, SourceFormat};
use crate::error::{GraphError, Result};

pub use detect::detect;
pub use merge::merge;
pub use source::{Fetcher, HttpResponse, InMemorySource, InMemoryStore, KeyValueStore, Loader, TextSource};

/// Parser output before normalization.
#[derive(Clone, Debug, PartialEq)]
pub struct RawGraph {
	pub nodes: Vec<RawNode>,
	pub edges: Vec<RawEdge>,
	pub format: SourceFormat,
	/// Source-supplied metadata carried into the canonical graph.
	pub metadata: Map<String, Value>,
}

impl RawGraph {
	/// An empty record set for the given dialect.
	pub fn new(format: SourceFormat) -> Self {
		Self {
			nodes: Vec::new(),
			edges: Vec::new(),
			format,
			metadata: Map::new(),
		}
	}

	/// Resolve every record through the fallback chains.
	pub fn normalize(self) -> Result<Graph> {
		let nodes = normalize_nodes(&self.nodes);
		let edges = normalize_edges(&self.edges).map_err(|MissingEndpoint { index, endpoint }| {
			GraphError::MalformedEdge {
				format: self.format.display_name(),
				index,
				endpoint,
			}
		})?;
		let mut graph = Graph::new(nodes, edges, Some(self.format));
		graph.metadata.extra = self.metadata;
		Ok(graph)
	}
}

/// Parse content whose format is already known.
pub fn parse(content: &str, format: FileFormat) -> Result<Graph> {
	let raw = match format {
		FileFormat::Json => json::parse(content)?,
		FileFormat::GraphMl => graphml::parse(content)?,
		FileFormat::Gml => gml::parse(content)?,
	};
	let graph = raw.normalize()?;
	info!(
		"ingest: parsed {} nodes, {} edges as {}",
		graph.nodes.len(),
		graph.edges.len(),
		format.extension()
	);
	Ok(graph)
}

/// Sniff the format of `content`, then parse it.
pub fn parse_auto(content: &str) -> Result<Graph> {
	parse(content, detect(content)?)
}
