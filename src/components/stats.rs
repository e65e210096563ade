//! Summary statistics over a canonical graph.
//!
//! Density treats the graph as undirected and simple regardless of edge
//! direction or duplicates.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::Serialize;

use super::model::Graph;

/// Figures shown in the stats panel and embedded in summary exports.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
	pub node_count: usize,
	pub edge_count: usize,
	/// Number of distinct node groups.
	pub node_groups: usize,
	/// Number of distinct edge labels.
	pub edge_types: usize,
	/// Mean over nodes with at least one edge, rounded to 2 places.
	pub avg_degree: f64,
	pub max_degree: usize,
	pub group_distribution: BTreeMap<String, usize>,
	/// `2E / (N(N-1))`, rounded to 6 places; 0 for fewer than two nodes.
	pub density: f64,
}

fn round_to(value: f64, places: i32) -> f64 {
	let factor = 10f64.powi(places);
	(value * factor).round() / factor
}

/// Degree per endpoint id. A self-loop counts twice; ids that only appear on
/// edges are included.
pub fn degrees(graph: &Graph) -> HashMap<&str, usize> {
	let mut degrees = HashMap::new();
	for edge in &graph.edges {
		*degrees.entry(edge.from.as_str()).or_insert(0) += 1;
		*degrees.entry(edge.to.as_str()).or_insert(0) += 1;
	}
	degrees
}

/// Compute every statistic in one pass over nodes and edges.
pub fn compute(graph: &Graph) -> GraphStats {
	let node_count = graph.nodes.len();
	let edge_count = graph.edges.len();

	let degrees = degrees(graph);
	let avg_degree = if degrees.is_empty() {
		0.0
	} else {
		round_to(degrees.values().sum::<usize>() as f64 / degrees.len() as f64, 2)
	};
	let max_degree = degrees.values().copied().max().unwrap_or(0);

	let mut group_distribution = BTreeMap::new();
	for node in &graph.nodes {
		*group_distribution.entry(node.group.clone()).or_insert(0) += 1;
	}
	let edge_types = graph
		.edges
		.iter()
		.map(|e| e.label.as_str())
		.collect::<BTreeSet<_>>()
		.len();

	let density = if node_count > 1 {
		let n = node_count as f64;
		round_to(2.0 * edge_count as f64 / (n * (n - 1.0)), 6)
	} else {
		0.0
	};

	GraphStats {
		node_count,
		edge_count,
		node_groups: group_distribution.len(),
		edge_types,
		avg_degree,
		max_degree,
		group_distribution,
		density,
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::model::{Edge, Node};

	fn graph(nodes: &[(&str, &str)], edges: &[(&str, &str, &str)]) -> Graph {
		Graph::new(
			nodes
				.iter()
				.map(|(id, group)| Node {
					id: id.to_string(),
					label: id.to_string(),
					group: group.to_string(),
					title: group.to_string(),
				})
				.collect(),
			edges
				.iter()
				.map(|(from, to, label)| Edge {
					from: from.to_string(),
					to: to.to_string(),
					label: label.to_string(),
					arrows: "to".into(),
				})
				.collect(),
			None,
		)
	}

	#[test]
	fn degrees_count_both_endpoints() {
		let g = graph(
			&[("a", "X"), ("b", "X"), ("c", "Y")],
			&[("a", "b", "r"), ("a", "c", "r"), ("b", "c", "s")],
		);
		let d = degrees(&g);
		assert_eq!((d["a"], d["b"], d["c"]), (2, 2, 2));

		let stats = compute(&g);
		assert_eq!(stats.avg_degree, 2.0);
		assert_eq!(stats.max_degree, 2);
		assert_eq!(stats.node_groups, 2);
		assert_eq!(stats.edge_types, 2);
		assert_eq!(stats.group_distribution["X"], 2);
	}

	#[test]
	fn density_of_three_nodes_two_edges() {
		let g = graph(&[("a", "X"), ("b", "X"), ("c", "X")], &[("a", "b", "r"), ("b", "c", "r")]);
		assert_eq!(compute(&g).density, 0.666667);
	}

	#[test]
	fn isolated_nodes_do_not_lower_the_average() {
		let g = graph(&[("a", "X"), ("b", "X"), ("lonely", "X")], &[("a", "b", "r")]);
		assert_eq!(compute(&g).avg_degree, 1.0);
	}

	#[test]
	fn degenerate_graphs() {
		let empty = compute(&Graph::empty());
		assert_eq!((empty.density, empty.avg_degree, empty.max_degree), (0.0, 0.0, 0));

		let single = compute(&graph(&[("a", "X")], &[("a", "a", "self")]));
		assert_eq!(single.density, 0.0);
		assert_eq!(single.max_degree, 2);
	}

	#[test]
	fn average_is_rounded_to_two_places() {
		let g = graph(&[], &[("a", "b", "r"), ("a", "c", "r")]);
		// degrees a=2, b=1, c=1
		assert_eq!(compute(&g).avg_degree, 1.33);
	}
}
