//! JSON dialects: explicit `{nodes, edges}`, Cytoscape `{elements}` and bare arrays.
//!
//! Shapes are tried in that order; anything else is `UnrecognizedStructure`.

use serde_json::{Map, Value};

use super::RawGraph;
use super::raw::{RawEdge, RawNode, scalar_text};
use crate::components::model::SourceFormat;
use crate::error::{GraphError, Result};

/// Metadata keys recomputed on load rather than carried over.
const DERIVED_METADATA_KEYS: [&str; 5] = ["format", "nodeCount", "edgeCount", "sources", "merged"];

/// Parse JSON text into raw records.
pub fn parse(content: &str) -> Result<RawGraph> {
	let value: Value = serde_json::from_str(content).map_err(GraphError::InvalidJson)?;
	from_value(&value)
}

/// Classify an already-parsed JSON document.
pub fn from_value(value: &Value) -> Result<RawGraph> {
	match value {
		Value::Object(object) => {
			if let (Some(Value::Array(nodes)), Some(Value::Array(edges))) =
				(object.get("nodes"), object.get("edges"))
			{
				return parse_node_edge_lists(nodes, edges, object.get("metadata"));
			}
			match object.get("elements") {
				Some(elements) => parse_cytoscape(elements),
				None => Err(GraphError::UnrecognizedStructure),
			}
		}
		Value::Array(items) => parse_array(items),
		_ => Err(GraphError::UnrecognizedStructure),
	}
}

fn objects(items: &[Value]) -> Result<Vec<&Map<String, Value>>> {
	items
		.iter()
		.map(|item| item.as_object().ok_or(GraphError::UnrecognizedStructure))
		.collect()
}

fn text(object: &Map<String, Value>, key: &str) -> Option<String> {
	object.get(key).and_then(scalar_text).filter(|s| !s.is_empty())
}

fn parse_node_edge_lists(nodes: &[Value], edges: &[Value], metadata: Option<&Value>) -> Result<RawGraph> {
	let mut graph = RawGraph::new(SourceFormat::Json);
	graph.nodes = objects(nodes)?.into_iter().map(RawNode::from_json).collect();
	graph.edges = objects(edges)?.into_iter().map(RawEdge::from_json).collect();
	if let Some(Value::Object(meta)) = metadata {
		graph.metadata = meta
			.iter()
			.filter(|(k, _)| !DERIVED_METADATA_KEYS.contains(&k.as_str()))
			.map(|(k, v)| (k.clone(), v.clone()))
			.collect();
	}
	Ok(graph)
}

fn cytoscape_node(data: &Map<String, Value>) -> RawNode {
	let kind = text(data, "type");
	RawNode {
		id: text(data, "id"),
		label: text(data, "label"),
		group: Some(kind.clone().unwrap_or_else(|| "default".into())),
		title: text(data, "title").or(kind).or_else(|| Some("default".into())),
		..RawNode::default()
	}
}

fn cytoscape_edge(data: &Map<String, Value>) -> RawEdge {
	RawEdge {
		source: text(data, "source"),
		target: text(data, "target"),
		label: text(data, "label"),
		kind: text(data, "type"),
		arrows: Some("to".into()),
		..RawEdge::default()
	}
}

fn element_data(element: &Value) -> Result<&Map<String, Value>> {
	element
		.get("data")
		.and_then(Value::as_object)
		.ok_or(GraphError::UnrecognizedStructure)
}

fn parse_cytoscape(elements: &Value) -> Result<RawGraph> {
	let mut graph = RawGraph::new(SourceFormat::Cytoscape);
	match elements {
		// Tagged form: [{group: "nodes", data: {...}}, ...]
		Value::Array(items) => {
			for element in items {
				match element.get("group").and_then(Value::as_str) {
					Some("nodes") => graph.nodes.push(cytoscape_node(element_data(element)?)),
					Some("edges") => graph.edges.push(cytoscape_edge(element_data(element)?)),
					_ => {}
				}
			}
		}
		// Grouped form: {nodes: [{data: {...}}], edges: [...]}
		Value::Object(groups) => {
			let list = |key: &str| groups.get(key).and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]);
			for element in list("nodes") {
				graph.nodes.push(cytoscape_node(element_data(element)?));
			}
			for element in list("edges") {
				graph.edges.push(cytoscape_edge(element_data(element)?));
			}
		}
		_ => return Err(GraphError::UnrecognizedStructure),
	}
	Ok(graph)
}

fn parse_array(items: &[Value]) -> Result<RawGraph> {
	let records = objects(items)?;
	let has = |o: &Map<String, Value>, a: &str, b: &str| text(o, a).is_some() && text(o, b).is_some();
	let is_edge_list = records
		.iter()
		.copied()
		.any(|o| has(o, "from", "to") || has(o, "source", "target"));

	let mut graph = RawGraph::new(SourceFormat::Array);
	if is_edge_list {
		graph.edges = records.into_iter().map(RawEdge::from_json).collect();
	} else {
		graph.nodes = records.into_iter().map(RawNode::from_json).collect();
	}
	Ok(graph)
}
