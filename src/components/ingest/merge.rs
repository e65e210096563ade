//! Combining several loaded graphs into one.
//!
//! Nodes are deduplicated by id with the first occurrence (in input order)
//! winning; later duplicates are dropped whole, never merged field by field.
//! Edges are concatenated as-is, so overlapping sources yield duplicate edges.

use std::collections::HashSet;

use log::info;

use crate::components::model::{Graph, GraphMetadata, SourceSummary};

/// Merge `(source name, graph)` pairs in the given order.
pub fn merge<S: AsRef<str>>(sources: impl IntoIterator<Item = (S, Graph)>) -> Graph {
	let mut seen = HashSet::new();
	let mut nodes = Vec::new();
	let mut edges = Vec::new();
	let mut summaries = Vec::new();

	for (name, graph) in sources {
		summaries.push(SourceSummary {
			file: name.as_ref().to_string(),
			format: graph.metadata.format,
			node_count: graph.nodes.len(),
			edge_count: graph.edges.len(),
		});
		nodes.extend(
			graph
				.nodes
				.into_iter()
				.filter(|node| seen.insert(node.id.clone())),
		);
		edges.extend(graph.edges);
	}

	info!(
		"merge: {} sources -> {} nodes, {} edges",
		summaries.len(),
		nodes.len(),
		edges.len()
	);

	let metadata = GraphMetadata {
		node_count: nodes.len(),
		edge_count: edges.len(),
		sources: summaries,
		merged: true,
		..GraphMetadata::default()
	};
	Graph {
		nodes,
		edges,
		metadata,
	}
}
