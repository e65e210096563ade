//! End-to-end: load, merge, summarize, export and re-import.

use futures::executor::block_on;
use kg_explorer::components::export::{self, ExportFormat};
use kg_explorer::components::ingest::{InMemorySource, merge};
use kg_explorer::components::stats;
use kg_explorer::{Edge, Explorer, ExplorerConfig, FileFormat, Graph, Loader, Node, SourceFormat, parse, parse_auto};
use pretty_assertions::assert_eq;

fn self_loop_graph() -> Graph {
	Graph::new(
		vec![Node {
			id: "1".into(),
			label: "A".into(),
			group: "Person".into(),
			title: "t".into(),
		}],
		vec![Edge {
			from: "1".into(),
			to: "1".into(),
			label: "self".into(),
			arrows: "to".into(),
		}],
		Some(SourceFormat::Json),
	)
}

fn identities(graph: &Graph) -> (Vec<(String, String, String)>, Vec<(String, String, String)>) {
	(
		graph
			.nodes
			.iter()
			.map(|n| (n.id.clone(), n.label.clone(), n.group.clone()))
			.collect(),
		graph
			.edges
			.iter()
			.map(|e| (e.from.clone(), e.to.clone(), e.label.clone()))
			.collect(),
	)
}

#[test]
fn graphml_round_trip() {
	let graph = self_loop_graph();
	let reparsed = parse(&export::to_graphml(&graph), FileFormat::GraphMl).unwrap();
	assert_eq!(identities(&reparsed), identities(&graph));
	assert_eq!(reparsed.nodes[0].title, "t");
}

#[test]
fn gml_round_trip_with_awkward_text() {
	let mut graph = Graph::sample();
	graph.nodes[0].label = "Quote \" and \\ and\nnewline [x]".into();
	graph.edges[0].label = "tab\there".into();

	let text = export::to_gml(&graph, &ExplorerConfig::default().export);
	let reparsed = parse(&text, FileFormat::Gml).unwrap();
	assert_eq!(identities(&reparsed), identities(&graph));
}

#[test]
fn json_round_trip_keeps_the_whole_model() {
	let graph = Graph::sample();
	let text = export::to_json(&graph, &ExplorerConfig::default().export).unwrap();
	let reparsed = parse_auto(&text).unwrap();
	assert_eq!(reparsed.nodes, graph.nodes);
	assert_eq!(reparsed.edges, graph.edges);
	assert!(reparsed.metadata.extra.contains_key("exportDate"));
}

#[test]
fn csv_export_escapes_labels() {
	let mut graph = self_loop_graph();
	graph.nodes[0].label = r#"He said "hi", bye"#.into();
	let files = export::export(&graph, ExportFormat::Csv, &ExplorerConfig::default().export).unwrap();
	assert_eq!(files[0].content, "id,label,group,title\n1,\"He said \"\"hi\"\", bye\",Person,t");
	assert_eq!(files[1].content, "from,to,label,relationship_type\n1,1,self,self");
}

#[test]
fn merge_then_stats() {
	let a = parse(r#"{"nodes":[{"id":"x","label":"A-X"},{"id":"y"}],"edges":[{"from":"x","to":"y"}]}"#, FileFormat::Json).unwrap();
	let b = parse("graph [\n node [\n id x\n label \"B-X\"\n ]\n node [\n id z\n ]\n edge [\n source y\n target z\n ]\n]", FileFormat::Gml).unwrap();

	let merged = merge([("a.json", a), ("b.gml", b)]);
	assert_eq!(merged.node("x").map(|n| n.label.as_str()), Some("A-X"));

	let stats = stats::compute(&merged);
	assert_eq!((stats.node_count, stats.edge_count), (3, 2));
	assert_eq!(stats.density, 0.666667);
	assert_eq!(stats.max_degree, 2);
}

#[test]
fn loader_to_explorer() {
	let sources = [
		InMemorySource::new("people.json", r#"[{"id":"a","type":"Person"},{"id":"b","type":"Person"},{"id":"c","type":"Place"}]"#),
		InMemorySource::new("links.json", r#"[{"source":"a","target":"b","relationship":"KNOWS"},{"source":"a","target":"c","relationship":"VISITED"}]"#),
	];
	let graph = block_on(Loader::default().load_files(&sources)).unwrap();
	assert_eq!(graph.metadata.sources.len(), 2);
	assert_eq!(graph.metadata.sources[1].format, Some(SourceFormat::Array));

	let mut explorer = Explorer::new(graph);
	assert_eq!(explorer.edge_labels(), ["KNOWS", "VISITED"]);
	explorer.apply_filter(kg_explorer::FilterCriteria {
		node_groups: ["Person".to_string()].into(),
		..Default::default()
	});
	assert_eq!(explorer.visible_edges().len(), 1);
	assert_eq!(explorer.connections("a").len(), 2);
}
