//! The loaded graph as seen by the UI: keyed collections, filtering, search and
//! neighbourhood lookup.
//!
//! [`Explorer`] owns the current graph explicitly; handlers receive a reference
//! to it instead of reaching for a global. Loading replaces everything at once.

use std::collections::{BTreeSet, HashMap, HashSet};

use log::info;
use serde::{Deserialize, Serialize};

use super::model::{Edge, Graph, Node};
use super::stats::{self, GraphStats};

/// Records that may carry their own key.
pub trait Keyed {
	/// The record's own id, if it has one. Records without one get a
	/// generated key when added to a [`DataSet`].
	fn key(&self) -> Option<&str>;
}

impl Keyed for Node {
	fn key(&self) -> Option<&str> {
		Some(self.id.as_str())
	}
}

impl Keyed for Edge {
	fn key(&self) -> Option<&str> {
		None
	}
}

/// Insertion-ordered collection addressed by key.
///
/// `index` maps each key to its slot in `items`, so lookups and keyed inserts
/// stay constant-time.
#[derive(Clone, Debug, PartialEq)]
pub struct DataSet<T> {
	items: Vec<(String, T)>,
	index: HashMap<String, usize>,
	next_key: usize,
}

impl<T> Default for DataSet<T> {
	fn default() -> Self {
		Self {
			items: Vec::new(),
			index: HashMap::new(),
			next_key: 0,
		}
	}
}

impl<T: Keyed> DataSet<T> {
	pub fn new() -> Self {
		Self::default()
	}

	/// Build from items, dropping any whose key is already taken.
	pub fn from_items(items: impl IntoIterator<Item = T>) -> Self {
		let mut set = Self::new();
		set.add_all(items);
		set
	}

	fn key_for(&mut self, item: &T) -> String {
		match item.key() {
			Some(key) => key.to_string(),
			None => {
				let key = format!("e{}", self.next_key);
				self.next_key += 1;
				key
			}
		}
	}

	fn push(&mut self, key: String, item: T) {
		self.index.insert(key.clone(), self.items.len());
		self.items.push((key, item));
	}

	/// Insert a new item and return its key, or `None` if the key exists.
	pub fn add(&mut self, item: T) -> Option<String> {
		if item.key().is_some_and(|key| self.index.contains_key(key)) {
			return None;
		}
		let key = self.key_for(&item);
		self.push(key.clone(), item);
		Some(key)
	}

	/// Insert many items; returns how many were accepted.
	pub fn add_all(&mut self, items: impl IntoIterator<Item = T>) -> usize {
		items.into_iter().filter_map(|item| self.add(item)).count()
	}

	/// Replace the item with the same key, or insert it.
	pub fn update(&mut self, item: T) -> String {
		if let Some(&slot) = item.key().and_then(|key| self.index.get(key)) {
			self.items[slot].1 = item;
			return self.items[slot].0.clone();
		}
		let key = self.key_for(&item);
		self.push(key.clone(), item);
		key
	}

	/// Upsert many items; returns their keys in input order.
	pub fn update_all(&mut self, items: impl IntoIterator<Item = T>) -> Vec<String> {
		items.into_iter().map(|item| self.update(item)).collect()
	}
}

impl<T> DataSet<T> {
	pub fn get(&self, key: &str) -> Option<&T> {
		self.index.get(key).map(|&slot| &self.items[slot].1)
	}

	pub fn remove(&mut self, key: &str) -> Option<T> {
		let slot = self.index.remove(key)?;
		let (_, item) = self.items.remove(slot);
		for (k, _) in &self.items[slot..] {
			if let Some(i) = self.index.get_mut(k) {
				*i -= 1;
			}
		}
		Some(item)
	}

	/// Items matching `predicate`, in insertion order.
	pub fn filter(&self, predicate: impl Fn(&T) -> bool) -> Vec<&T> {
		self.iter().filter(|item| predicate(*item)).collect()
	}

	pub fn iter(&self) -> impl Iterator<Item = &T> {
		self.items.iter().map(|(_, item)| item)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.items.iter().map(|(k, _)| k.as_str())
	}

	pub fn clear(&mut self) {
		self.items.clear();
		self.index.clear();
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}

/// Which node groups and relationship labels stay visible. An empty set
/// means "no restriction".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterCriteria {
	pub node_groups: BTreeSet<String>,
	pub relationships: BTreeSet<String>,
}

impl FilterCriteria {
	fn keeps_node(&self, node: &Node) -> bool {
		self.node_groups.is_empty() || self.node_groups.contains(&node.group)
	}

	fn keeps_edge(&self, edge: &Edge) -> bool {
		self.relationships.is_empty() || self.relationships.contains(&edge.label)
	}
}

/// Which side of an edge the inspected node is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
	Outgoing,
	Incoming,
}

/// One relationship of an inspected node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Connection<'a> {
	pub edge: &'a Edge,
	/// The node on the other end; `None` for a dangling reference.
	pub node: Option<&'a Node>,
	pub direction: Direction,
}

/// Owner of the loaded graph and its filtered view.
#[derive(Clone, Debug, Default)]
pub struct Explorer {
	original: Graph,
	nodes: DataSet<Node>,
	edges: DataSet<Edge>,
	criteria: FilterCriteria,
}

impl Explorer {
	pub fn new(graph: Graph) -> Self {
		let mut explorer = Self::default();
		explorer.load(graph);
		explorer
	}

	/// Replace the current graph; the view shows everything again.
	pub fn load(&mut self, graph: Graph) {
		info!(
			"explorer: graph updated: {} nodes, {} edges",
			graph.nodes.len(),
			graph.edges.len()
		);
		self.original = graph;
		self.criteria = FilterCriteria::default();
		self.reset();
	}

	/// Drop the graph entirely.
	pub fn clear(&mut self) {
		self.load(Graph::empty());
	}

	/// The graph as loaded, ignoring filters.
	pub fn graph(&self) -> &Graph {
		&self.original
	}

	pub fn criteria(&self) -> &FilterCriteria {
		&self.criteria
	}

	pub fn visible_nodes(&self) -> &DataSet<Node> {
		&self.nodes
	}

	pub fn visible_edges(&self) -> &DataSet<Edge> {
		&self.edges
	}

	/// Show only matching nodes and relationships. Edges whose endpoints are
	/// not visible are hidden as well.
	pub fn apply_filter(&mut self, criteria: FilterCriteria) {
		let nodes: Vec<Node> = self
			.original
			.nodes
			.iter()
			.filter(|n| criteria.keeps_node(n))
			.cloned()
			.collect();
		let visible: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
		let edges: Vec<Edge> = self
			.original
			.edges
			.iter()
			.filter(|e| criteria.keeps_edge(e))
			.filter(|e| visible.contains(e.from.as_str()) && visible.contains(e.to.as_str()))
			.cloned()
			.collect();

		self.edges = DataSet::from_items(edges);
		self.nodes = DataSet::from_items(nodes);
		self.criteria = criteria;
	}

	/// Show the whole loaded graph again.
	pub fn reset(&mut self) {
		self.nodes = DataSet::from_items(self.original.nodes.iter().cloned());
		self.edges = DataSet::from_items(self.original.edges.iter().cloned());
		self.criteria = FilterCriteria::default();
	}

	/// The current view as a standalone graph, e.g. for export.
	pub fn visible_graph(&self) -> Graph {
		let mut graph = Graph::new(
			self.nodes.iter().cloned().collect(),
			self.edges.iter().cloned().collect(),
			self.original.metadata.format,
		);
		graph.metadata.extra = self.original.metadata.extra.clone();
		graph
	}

	/// Statistics over the current view.
	pub fn stats(&self) -> GraphStats {
		stats::compute(&self.visible_graph())
	}

	/// Case-insensitive substring match over node labels and titles.
	pub fn search(&self, query: &str) -> Vec<&Node> {
		let query = query.trim().to_lowercase();
		if query.is_empty() {
			return Vec::new();
		}
		self.original
			.nodes
			.iter()
			.filter(|n| n.label.to_lowercase().contains(&query) || n.title.to_lowercase().contains(&query))
			.collect()
	}

	/// Every edge touching `node_id`, with the node on the other end.
	pub fn connections(&self, node_id: &str) -> Vec<Connection<'_>> {
		self.original
			.edges
			.iter()
			.filter_map(|edge| {
				let (other, direction) = if edge.from == node_id {
					(&edge.to, Direction::Outgoing)
				} else if edge.to == node_id {
					(&edge.from, Direction::Incoming)
				} else {
					return None;
				};
				Some(Connection {
					edge,
					node: self.original.node(other),
					direction,
				})
			})
			.collect()
	}

	/// Distinct node groups, sorted.
	pub fn node_groups(&self) -> Vec<&str> {
		let groups: BTreeSet<&str> = self.original.nodes.iter().map(|n| n.group.as_str()).collect();
		groups.into_iter().collect()
	}

	/// Distinct edge labels, sorted.
	pub fn edge_labels(&self) -> Vec<&str> {
		let labels: BTreeSet<&str> = self.original.edges.iter().map(|e| e.label.as_str()).collect();
		labels.into_iter().collect()
	}
}
