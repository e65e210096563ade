//! Canonical graph model shared by every parser, exporter and view.
//!
//! All input dialects converge on these types. Nodes and edges carry no
//! back-references; relationships are resolved by scanning `edges` for
//! matching `from`/`to` ids.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GraphError, Result};

/// File extensions accepted for direct loads, in display order.
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["json", "graphml", "gml"];

/// A format that can be declared by file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
	Json,
	GraphMl,
	Gml,
}

impl FileFormat {
	/// Case-insensitive lookup of a bare extension (no dot).
	pub fn from_extension(extension: &str) -> Option<Self> {
		match extension.to_ascii_lowercase().as_str() {
			"json" => Some(FileFormat::Json),
			"graphml" => Some(FileFormat::GraphMl),
			"gml" => Some(FileFormat::Gml),
			_ => None,
		}
	}

	/// Resolve the declared format of a file name, failing with the supported set.
	pub fn from_file_name(name: &str) -> Result<Self> {
		let extension = extension_of(name);
		Self::from_extension(extension).ok_or_else(|| GraphError::UnsupportedFormat {
			extension: extension.to_ascii_lowercase(),
		})
	}

	pub const fn extension(self) -> &'static str {
		match self {
			FileFormat::Json => "json",
			FileFormat::GraphMl => "graphml",
			FileFormat::Gml => "gml",
		}
	}
}

/// Extension of the last path segment of a file name or URL.
///
/// Query strings and fragments are ignored. Returns an empty string when the
/// last segment has no dot.
pub fn extension_of(path: &str) -> &str {
	let path = path.split(['?', '#']).next().unwrap_or(path);
	let segment = path.rsplit('/').next().unwrap_or(path);
	match segment.rsplit_once('.') {
		Some((_, ext)) => ext,
		None => "",
	}
}

/// The dialect a graph was actually parsed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
	/// Explicit `{nodes, edges}` JSON.
	Json,
	/// Cytoscape `{elements: ...}` JSON.
	Cytoscape,
	/// Bare JSON array of nodes or of edges.
	Array,
	GraphMl,
	Gml,
}

impl SourceFormat {
	/// Human-readable name used in error prefixes.
	pub const fn display_name(self) -> &'static str {
		match self {
			SourceFormat::Json | SourceFormat::Cytoscape | SourceFormat::Array => "JSON",
			SourceFormat::GraphMl => "GraphML",
			SourceFormat::Gml => "GML",
		}
	}
}

/// A canonical node. `id` and `label` are never empty after normalization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
	pub id: String,
	pub label: String,
	/// Classification tag; `"default"` when the source had none.
	pub group: String,
	/// Free-text description shown as a tooltip.
	pub title: String,
}

/// A canonical directed edge. Endpoints reference node ids but are not
/// checked against the node list at parse time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
	pub from: String,
	pub to: String,
	/// Relationship tag; `"related"` when the source had none.
	pub label: String,
	/// Directionality hint for the renderer; `"to"` by default.
	pub arrows: String,
}

/// Per-input provenance recorded by the merger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSummary {
	/// File name or URL the input came from.
	pub file: String,
	pub format: Option<SourceFormat>,
	pub node_count: usize,
	pub edge_count: usize,
}

fn is_false(value: &bool) -> bool {
	!*value
}

/// Provenance attached to every loaded graph.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphMetadata {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub format: Option<SourceFormat>,
	/// Node count; for merges, the post-dedup total.
	pub node_count: usize,
	/// Edge count; for merges, the raw concatenated total.
	pub edge_count: usize,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub sources: Vec<SourceSummary>,
	#[serde(skip_serializing_if = "is_false")]
	pub merged: bool,
	/// Metadata carried verbatim from a JSON source.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// A fully normalized graph, replaced atomically on every load.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
	#[serde(default)]
	pub metadata: GraphMetadata,
}

impl Graph {
	/// Build a graph whose metadata counts match its contents.
	pub fn new(nodes: Vec<Node>, edges: Vec<Edge>, format: Option<SourceFormat>) -> Self {
		let metadata = GraphMetadata {
			format,
			node_count: nodes.len(),
			edge_count: edges.len(),
			..GraphMetadata::default()
		};
		Self {
			nodes,
			edges,
			metadata,
		}
	}

	/// The cleared state: no nodes, no edges.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Small fixture used when no generated graph is available.
	pub fn sample() -> Self {
		let node = |id: &str, label: &str, group: &str, title: &str| Node {
			id: id.into(),
			label: label.into(),
			group: group.into(),
			title: title.into(),
		};
		let edge = |from: &str, to: &str, label: &str| Edge {
			from: from.into(),
			to: to.into(),
			label: label.into(),
			arrows: "to".into(),
		};

		Self::new(
			vec![
				node("ada", "Ada Lovelace", "Person", "Mathematician and writer"),
				node("babbage", "Charles Babbage", "Person", "Inventor of the Analytical Engine"),
				node("engine", "Analytical Engine", "Object", "Proposed mechanical computer"),
				node("notes", "Notes on the Engine", "Book", "Translation with annotations"),
				node("computing", "Computing", "Concept", "Concept"),
			],
			vec![
				edge("ada", "babbage", "COLLABORATED_WITH"),
				edge("babbage", "engine", "DESIGNED"),
				edge("ada", "notes", "WROTE"),
				edge("notes", "engine", "DESCRIBES"),
				edge("engine", "computing", "INSPIRED"),
			],
			Some(SourceFormat::Json),
		)
	}

	/// First node with the given id.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.iter().find(|n| n.id == id)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() && self.edges.is_empty()
	}
}
