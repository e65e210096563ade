//! Canonicalization of raw parser output.
//!
//! Field resolution walks a fixed fallback chain per canonical field; empty
//! strings count as absent. Normalizing an already-canonical list is a no-op.

use log::debug;
use uuid::Uuid;

use super::raw::{RawEdge, RawNode};
use crate::components::model::{Edge, Node};

/// Group assigned to nodes with no classification.
pub const DEFAULT_GROUP: &str = "default";
/// Title assigned when neither a title nor a classification is available.
pub const DEFAULT_TITLE: &str = "Node";
/// Relationship assigned to edges with no label.
pub const DEFAULT_RELATIONSHIP: &str = "related";
/// Directionality assigned to edges with no hint.
pub const DEFAULT_ARROWS: &str = "to";

/// An edge whose endpoint could not be resolved from any alias.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MissingEndpoint {
	/// Position of the edge in its source list.
	pub index: usize,
	/// `"from"` or `"to"`.
	pub endpoint: &'static str,
}

fn pick<'a, const N: usize>(candidates: [&'a Option<String>; N]) -> Option<&'a str> {
	candidates
		.into_iter()
		.filter_map(|c| c.as_deref())
		.find(|s| !s.is_empty())
}

/// Opaque id for a node that had none. Unique within a load, nothing more.
fn synthesize_id() -> String {
	format!("node-{}", Uuid::new_v4().simple())
}

/// Resolve one raw node.
pub fn normalize_node(raw: &RawNode) -> Node {
	let id = match pick([&raw.id, &raw.name]) {
		Some(id) => id.to_string(),
		None => {
			let id = synthesize_id();
			debug!("normalize: node without id, assigned {id}");
			id
		}
	};
	let label = pick([&raw.label, &raw.name]).unwrap_or(&id).to_string();
	let group = pick([&raw.group, &raw.kind, &raw.category])
		.unwrap_or(DEFAULT_GROUP)
		.to_string();
	let title = pick([&raw.title, &raw.description, &raw.group, &raw.kind])
		.unwrap_or(DEFAULT_TITLE)
		.to_string();

	Node {
		id,
		label,
		group,
		title,
	}
}

/// Resolve a raw node list, preserving order.
pub fn normalize_nodes(raw: &[RawNode]) -> Vec<Node> {
	raw.iter().map(normalize_node).collect()
}

/// Resolve one raw edge; `index` is only used for error reporting.
pub fn normalize_edge(index: usize, raw: &RawEdge) -> Result<Edge, MissingEndpoint> {
	let from = pick([&raw.from, &raw.source, &raw.src]).ok_or(MissingEndpoint {
		index,
		endpoint: "from",
	})?;
	let to = pick([&raw.to, &raw.target, &raw.dest]).ok_or(MissingEndpoint {
		index,
		endpoint: "to",
	})?;
	let label = pick([&raw.label, &raw.relationship, &raw.kind]).unwrap_or(DEFAULT_RELATIONSHIP);
	let arrows = pick([&raw.arrows]).unwrap_or(DEFAULT_ARROWS);

	Ok(Edge {
		from: from.to_string(),
		to: to.to_string(),
		label: label.to_string(),
		arrows: arrows.to_string(),
	})
}

/// Resolve a raw edge list, failing on the first edge without endpoints.
pub fn normalize_edges(raw: &[RawEdge]) -> Result<Vec<Edge>, MissingEndpoint> {
	raw.iter()
		.enumerate()
		.map(|(i, e)| normalize_edge(i, e))
		.collect()
}
