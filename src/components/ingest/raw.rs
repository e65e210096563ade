//! Loosely-typed records produced by the format parsers.
//!
//! Each known attribute name has an explicit slot; anything else lands in
//! `extra`. The normalizer resolves canonical fields from these slots through
//! fixed fallback chains.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::components::model::{Edge, Node};

/// A node as found in the source, before normalization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawNode {
	pub id: Option<String>,
	pub name: Option<String>,
	pub label: Option<String>,
	pub group: Option<String>,
	pub kind: Option<String>,
	pub category: Option<String>,
	pub title: Option<String>,
	pub description: Option<String>,
	/// Attributes with no semantic slot, kept verbatim.
	pub extra: BTreeMap<String, String>,
}

impl RawNode {
	/// Route an attribute to its slot by source name.
	pub fn set(&mut self, key: &str, value: impl Into<String>) {
		let value = value.into();
		match key {
			"id" => self.id = Some(value),
			"name" => self.name = Some(value),
			"label" => self.label = Some(value),
			"group" => self.group = Some(value),
			"type" => self.kind = Some(value),
			"category" => self.category = Some(value),
			"title" => self.title = Some(value),
			"description" => self.description = Some(value),
			_ => {
				self.extra.insert(key.to_string(), value);
			}
		}
	}

	/// Collect the scalar members of a JSON object.
	pub fn from_json(object: &Map<String, Value>) -> Self {
		let mut node = Self::default();
		for (key, value) in object {
			if let Some(text) = scalar_text(value) {
				node.set(key, text);
			}
		}
		node
	}
}

impl From<Node> for RawNode {
	fn from(node: Node) -> Self {
		Self {
			id: Some(node.id),
			label: Some(node.label),
			group: Some(node.group),
			title: Some(node.title),
			..Self::default()
		}
	}
}

/// An edge as found in the source, before normalization.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawEdge {
	pub from: Option<String>,
	pub to: Option<String>,
	pub source: Option<String>,
	pub target: Option<String>,
	pub src: Option<String>,
	pub dest: Option<String>,
	pub label: Option<String>,
	pub relationship: Option<String>,
	pub kind: Option<String>,
	pub arrows: Option<String>,
	/// Attributes with no semantic slot, kept verbatim.
	pub extra: BTreeMap<String, String>,
}

impl RawEdge {
	/// Route an attribute to its slot by source name.
	pub fn set(&mut self, key: &str, value: impl Into<String>) {
		let value = value.into();
		match key {
			"from" => self.from = Some(value),
			"to" => self.to = Some(value),
			"source" => self.source = Some(value),
			"target" => self.target = Some(value),
			"src" => self.src = Some(value),
			"dest" => self.dest = Some(value),
			"label" => self.label = Some(value),
			"relationship" => self.relationship = Some(value),
			"type" => self.kind = Some(value),
			"arrows" => self.arrows = Some(value),
			_ => {
				self.extra.insert(key.to_string(), value);
			}
		}
	}

	/// Collect the scalar members of a JSON object.
	pub fn from_json(object: &Map<String, Value>) -> Self {
		let mut edge = Self::default();
		for (key, value) in object {
			if let Some(text) = scalar_text(value) {
				edge.set(key, text);
			}
		}
		edge
	}
}

impl From<Edge> for RawEdge {
	fn from(edge: Edge) -> Self {
		Self {
			from: Some(edge.from),
			to: Some(edge.to),
			label: Some(edge.label),
			arrows: Some(edge.arrows),
			..Self::default()
		}
	}
}

/// Textual form of a JSON scalar; `None` for null, arrays and objects.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		Value::Null | Value::Array(_) | Value::Object(_) => None,
	}
}
