//! Serializers from the canonical graph back to text.
//!
//! Each export produces one or more [`ExportFile`]s with a fixed file name and
//! MIME type; writing or downloading them is left to the caller. Re-importing a
//! JSON, GraphML or GML export reproduces node ids, labels, groups and edge
//! relationships.

use std::collections::BTreeSet;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use super::model::{Edge, Graph, Node};
use super::stats::{self, GraphStats};
use crate::config::ExportConfig;
use crate::error::{GraphError, Result};

/// Names accepted by [`ExportFormat::from_name`].
pub const EXPORT_FORMATS: [&str; 5] = ["json", "csv", "graphml", "gml", "summary"];

/// Available export targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExportFormat {
	Json,
	/// Two files: nodes and edges.
	Csv,
	GraphMl,
	Gml,
	/// Metadata, statistics and a sample of the graph as JSON.
	Summary,
}

impl ExportFormat {
	/// Lookup by the name the UI uses (`"json"`, `"csv"`, ...).
	pub fn from_name(name: &str) -> Option<Self> {
		match name.to_ascii_lowercase().as_str() {
			"json" => Some(ExportFormat::Json),
			"csv" => Some(ExportFormat::Csv),
			"graphml" => Some(ExportFormat::GraphMl),
			"gml" => Some(ExportFormat::Gml),
			"summary" => Some(ExportFormat::Summary),
			_ => None,
		}
	}
}

/// Generated content ready to be offered as a download.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
	pub filename: &'static str,
	pub mime_type: &'static str,
	pub content: String,
}

/// Metadata block injected into JSON and summary exports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
	pub export_date: String,
	pub node_count: usize,
	pub edge_count: usize,
	pub source: String,
}

impl ExportMetadata {
	fn new(graph: &Graph, config: &ExportConfig, at: DateTime<Utc>) -> Self {
		Self {
			export_date: at.to_rfc3339_opts(SecondsFormat::Millis, true),
			node_count: graph.nodes.len(),
			edge_count: graph.edges.len(),
			source: config.source_tag.clone(),
		}
	}
}

#[derive(Serialize)]
struct JsonExport<'a> {
	nodes: &'a [Node],
	edges: &'a [Edge],
	metadata: ExportMetadata,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryExport<'a> {
	#[serde(flatten)]
	metadata: ExportMetadata,
	statistics: GraphStats,
	node_types: BTreeSet<&'a str>,
	relationship_types: BTreeSet<&'a str>,
	sample_nodes: &'a [Node],
	sample_edges: &'a [Edge],
}

/// Quote a CSV field if it contains a delimiter, quote or line break.
pub fn escape_csv(value: &str) -> String {
	if value.contains([',', '"', '\n', '\r']) {
		format!("\"{}\"", value.replace('"', "\"\""))
	} else {
		value.to_string()
	}
}

/// Replace the five XML special characters with entities.
pub fn escape_xml(value: &str) -> String {
	let mut out = String::with_capacity(value.len());
	for c in value.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			c => out.push(c),
		}
	}
	out
}

/// Backslash-escape a value for a quoted GML string.
pub fn escape_gml(value: &str) -> String {
	let mut out = String::with_capacity(value.len());
	for c in value.chars() {
		match c {
			'\\' => out.push_str("\\\\"),
			'"' => out.push_str("\\\""),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			c => out.push(c),
		}
	}
	out
}

fn json_at(graph: &Graph, config: &ExportConfig, at: DateTime<Utc>) -> Result<String> {
	let export = JsonExport {
		nodes: &graph.nodes,
		edges: &graph.edges,
		metadata: ExportMetadata::new(graph, config, at),
	};
	serde_json::to_string_pretty(&export).map_err(GraphError::Serialize)
}

/// Structural JSON dump with an export metadata block.
pub fn to_json(graph: &Graph, config: &ExportConfig) -> Result<String> {
	json_at(graph, config, Utc::now())
}

/// `id,label,group,title` rows.
pub fn nodes_csv(graph: &Graph) -> String {
	let mut lines = vec!["id,label,group,title".to_string()];
	lines.extend(graph.nodes.iter().map(|n| {
		[&n.id, &n.label, &n.group, &n.title]
			.map(|v| escape_csv(v))
			.join(",")
	}));
	lines.join("\n")
}

/// `from,to,label,relationship_type` rows; the last column mirrors `label`.
pub fn edges_csv(graph: &Graph) -> String {
	let mut lines = vec!["from,to,label,relationship_type".to_string()];
	lines.extend(graph.edges.iter().map(|e| {
		[&e.from, &e.to, &e.label, &e.label]
			.map(|v| escape_csv(v))
			.join(",")
	}));
	lines.join("\n")
}

/// GraphML with `label`/`group`/`title` node keys and a `relationship` edge key.
pub fn to_graphml(graph: &Graph) -> String {
	let mut xml = String::with_capacity(256 + graph.nodes.len() * 160 + graph.edges.len() * 120);
	xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
	xml.push_str("<graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\"\n");
	xml.push_str("         xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\"\n");
	xml.push_str("         xsi:schemaLocation=\"http://graphml.graphdrawing.org/xmlns\n");
	xml.push_str("         http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd\">\n");
	xml.push_str("  <key id=\"label\" for=\"node\" attr.name=\"label\" attr.type=\"string\"/>\n");
	xml.push_str("  <key id=\"group\" for=\"node\" attr.name=\"group\" attr.type=\"string\"/>\n");
	xml.push_str("  <key id=\"title\" for=\"node\" attr.name=\"title\" attr.type=\"string\"/>\n");
	xml.push_str("  <key id=\"relationship\" for=\"edge\" attr.name=\"relationship\" attr.type=\"string\"/>\n");
	xml.push_str("  <graph id=\"knowledge-graph\" edgedefault=\"directed\">\n");

	for node in &graph.nodes {
		xml.push_str(&format!("    <node id=\"{}\">\n", escape_xml(&node.id)));
		xml.push_str(&format!("      <data key=\"label\">{}</data>\n", escape_xml(&node.label)));
		xml.push_str(&format!("      <data key=\"group\">{}</data>\n", escape_xml(&node.group)));
		xml.push_str(&format!("      <data key=\"title\">{}</data>\n", escape_xml(&node.title)));
		xml.push_str("    </node>\n");
	}

	for (index, edge) in graph.edges.iter().enumerate() {
		xml.push_str(&format!(
			"    <edge id=\"e{}\" source=\"{}\" target=\"{}\">\n",
			index,
			escape_xml(&edge.from),
			escape_xml(&edge.to)
		));
		xml.push_str(&format!(
			"      <data key=\"relationship\">{}</data>\n",
			escape_xml(&edge.label)
		));
		xml.push_str("    </edge>\n");
	}

	xml.push_str("  </graph>\n");
	xml.push_str("</graphml>\n");
	xml
}

/// A single `graph [ ... ]` block with quoted string fields.
pub fn to_gml(graph: &Graph, config: &ExportConfig) -> String {
	let mut gml = String::new();
	gml.push_str("graph [\n");
	gml.push_str("  directed 1\n");
	gml.push_str(&format!(
		"  comment \"Knowledge Graph exported from {}\"\n",
		escape_gml(&config.source_tag)
	));

	for node in &graph.nodes {
		gml.push_str("  node [\n");
		gml.push_str(&format!("    id \"{}\"\n", escape_gml(&node.id)));
		gml.push_str(&format!("    label \"{}\"\n", escape_gml(&node.label)));
		gml.push_str(&format!("    group \"{}\"\n", escape_gml(&node.group)));
		gml.push_str(&format!("    title \"{}\"\n", escape_gml(&node.title)));
		gml.push_str("  ]\n");
	}

	for edge in &graph.edges {
		gml.push_str("  edge [\n");
		gml.push_str(&format!("    source \"{}\"\n", escape_gml(&edge.from)));
		gml.push_str(&format!("    target \"{}\"\n", escape_gml(&edge.to)));
		gml.push_str(&format!("    label \"{}\"\n", escape_gml(&edge.label)));
		gml.push_str("  ]\n");
	}

	gml.push_str("]\n");
	gml
}

fn summary_at(graph: &Graph, config: &ExportConfig, at: DateTime<Utc>) -> Result<String> {
	let sample = config.sample_size;
	let summary = SummaryExport {
		metadata: ExportMetadata::new(graph, config, at),
		statistics: stats::compute(graph),
		node_types: graph.nodes.iter().map(|n| n.group.as_str()).collect(),
		relationship_types: graph.edges.iter().map(|e| e.label.as_str()).collect(),
		sample_nodes: &graph.nodes[..graph.nodes.len().min(sample)],
		sample_edges: &graph.edges[..graph.edges.len().min(sample)],
	};
	serde_json::to_string_pretty(&summary).map_err(GraphError::Serialize)
}

/// Metadata, statistics, distinct types and the first few nodes and edges.
pub fn summary(graph: &Graph, config: &ExportConfig) -> Result<String> {
	summary_at(graph, config, Utc::now())
}

/// Produce the file(s) for one export format.
pub fn export(graph: &Graph, format: ExportFormat, config: &ExportConfig) -> Result<Vec<ExportFile>> {
	let file = |filename, mime_type, content| ExportFile {
		filename,
		mime_type,
		content,
	};
	Ok(match format {
		ExportFormat::Json => vec![file("knowledge-graph.json", "application/json", to_json(graph, config)?)],
		ExportFormat::Csv => vec![
			file("knowledge-graph-nodes.csv", "text/csv", nodes_csv(graph)),
			file("knowledge-graph-edges.csv", "text/csv", edges_csv(graph)),
		],
		ExportFormat::GraphMl => vec![file("knowledge-graph.graphml", "application/xml", to_graphml(graph))],
		ExportFormat::Gml => vec![file("knowledge-graph.gml", "text/plain", to_gml(graph, config))],
		ExportFormat::Summary => vec![file(
			"knowledge-graph-summary.json",
			"application/json",
			summary(graph, config)?,
		)],
	})
}

#[cfg(test)]
mod tests {
	use chrono::TimeZone;
	use pretty_assertions::assert_eq;
	use proptest::prelude::*;
	use serde_json::Value;

	use super::*;

	fn fixed_time() -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
	}

	#[test]
	fn csv_quotes_and_doubles() {
		assert_eq!(escape_csv(r#"He said "hi", bye"#), r#""He said ""hi"", bye""#);
		assert_eq!(escape_csv("plain"), "plain");
		assert_eq!(escape_csv("two\nlines"), "\"two\nlines\"");
	}

	#[test]
	fn csv_files_have_headers_and_mirrored_relationship() {
		let graph = Graph::sample();
		let nodes = nodes_csv(&graph);
		let edges = edges_csv(&graph);
		assert_eq!(nodes.lines().next(), Some("id,label,group,title"));
		assert_eq!(nodes.lines().count(), graph.nodes.len() + 1);
		assert_eq!(edges.lines().nth(1), Some("ada,babbage,COLLABORATED_WITH,COLLABORATED_WITH"));
	}

	#[test]
	fn xml_escapes_all_five() {
		assert_eq!(escape_xml(r#"<a href="x">&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;");
	}

	#[test]
	fn gml_escapes_control_characters() {
		assert_eq!(escape_gml("a\\b\"c\nd\re\tf"), "a\\\\b\\\"c\\nd\\re\\tf");
	}

	#[test]
	fn json_export_carries_metadata() {
		let graph = Graph::sample();
		let text = json_at(&graph, &ExportConfig::default(), fixed_time()).unwrap();
		let value: Value = serde_json::from_str(&text).unwrap();
		assert_eq!(value["metadata"]["exportDate"], "2024-05-01T12:00:00.000Z");
		assert_eq!(value["metadata"]["nodeCount"], graph.nodes.len());
		assert_eq!(value["metadata"]["source"], "Knowledge Graph Explorer v2.0");
		assert_eq!(value["edges"][0]["arrows"], "to");
	}

	#[test]
	fn summary_lists_sorted_types_and_samples() {
		let config = ExportConfig {
			sample_size: 2,
			..ExportConfig::default()
		};
		let text = summary_at(&Graph::sample(), &config, fixed_time()).unwrap();
		let value: Value = serde_json::from_str(&text).unwrap();
		assert_eq!(value["nodeTypes"], serde_json::json!(["Book", "Concept", "Object", "Person"]));
		assert_eq!(value["sampleNodes"].as_array().map(Vec::len), Some(2));
		assert_eq!(value["statistics"]["nodeCount"], 5);
		assert_eq!(value["exportDate"], "2024-05-01T12:00:00.000Z");
	}

	#[test]
	fn export_descriptors() {
		let files = export(&Graph::sample(), ExportFormat::Csv, &ExportConfig::default()).unwrap();
		let names: Vec<_> = files.iter().map(|f| (f.filename, f.mime_type)).collect();
		assert_eq!(
			names,
			[
				("knowledge-graph-nodes.csv", "text/csv"),
				("knowledge-graph-edges.csv", "text/csv"),
			]
		);
		assert_eq!(ExportFormat::from_name("GraphML"), Some(ExportFormat::GraphMl));
		assert!(EXPORT_FORMATS.iter().all(|name| ExportFormat::from_name(name).is_some()));
	}

	proptest! {
		#[test]
		fn escaped_csv_fields_never_split(value in ".*") {
			let escaped = escape_csv(&value);
			if value.contains([',', '"', '\n', '\r']) {
				prop_assert!(escaped.starts_with('"') && escaped.ends_with('"'));
				let inner = &escaped[1..escaped.len() - 1];
				prop_assert_eq!(inner.replace("\"\"", "\""), value);
			} else {
				prop_assert_eq!(escaped, value);
			}
		}
	}
}
