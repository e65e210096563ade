//! GraphML reader.
//!
//! `<key>` declarations are collected first into an id -> attribute-name table,
//! then every `<node>` and `<edge>` is read with its `<data>` children resolved
//! through that table.

use std::collections::HashMap;

use log::warn;
use roxmltree::{Document, Node as XmlNode, ParsingOptions};

use super::RawGraph;
use super::raw::{RawEdge, RawNode};
use crate::components::model::SourceFormat;
use crate::error::Result;

/// Id -> `attr.name` for every `<key>` that declares one.
fn key_table<'a>(doc: &'a Document<'_>) -> HashMap<&'a str, Option<&'a str>> {
	doc.descendants()
		.filter(|n| n.has_tag_name("key"))
		.filter_map(|key| Some((key.attribute("id")?, key.attribute("attr.name"))))
		.collect()
}

/// `(attribute name, text)` for each direct `<data>` child.
fn data_entries<'a>(
	element: XmlNode<'a, '_>,
	keys: &HashMap<&'a str, Option<&'a str>>,
) -> Vec<(&'a str, String)> {
	element
		.children()
		.filter(|c| c.has_tag_name("data"))
		.filter_map(|data| {
			let key = data.attribute("key")?;
			let name = match keys.get(key) {
				Some(name) => (*name)?,
				None => {
					warn!("graphml: <data key=\"{key}\"> has no <key> declaration, using the key id");
					key
				}
			};
			let text: String = data
				.descendants()
				.filter(|n| n.is_text())
				.filter_map(|n| n.text())
				.collect();
			Some((name, text))
		})
		.collect()
}

fn read_node<'a>(element: XmlNode<'a, '_>, keys: &HashMap<&'a str, Option<&'a str>>) -> RawNode {
	let id = element.attribute("id").map(str::to_string);
	let mut node = RawNode {
		label: id.clone(),
		id,
		..RawNode::default()
	};
	for (name, value) in data_entries(element, keys) {
		match name {
			"label" => node.label = Some(value),
			"group" | "type" => node.group = Some(value),
			"title" | "description" => node.title = Some(value),
			other => node.set(other, value),
		}
	}
	node
}

fn read_edge<'a>(element: XmlNode<'a, '_>, keys: &HashMap<&'a str, Option<&'a str>>) -> RawEdge {
	let mut edge = RawEdge {
		from: element.attribute("source").map(str::to_string),
		to: element.attribute("target").map(str::to_string),
		..RawEdge::default()
	};
	for (name, value) in data_entries(element, keys) {
		match name {
			"label" | "relationship" | "type" => edge.label = Some(value),
			other => edge.set(other, value),
		}
	}
	edge
}

/// Parse GraphML text into raw records.
pub fn parse(content: &str) -> Result<RawGraph> {
	let options = ParsingOptions {
		allow_dtd: true,
		..ParsingOptions::default()
	};
	let doc = Document::parse_with_options(content, options)?;
	let keys = key_table(&doc);

	let mut graph = RawGraph::new(SourceFormat::GraphMl);
	for element in doc.descendants() {
		if element.has_tag_name("node") {
			graph.nodes.push(read_node(element, &keys));
		} else if element.has_tag_name("edge") {
			graph.edges.push(read_edge(element, &keys));
		}
	}
	Ok(graph)
}
