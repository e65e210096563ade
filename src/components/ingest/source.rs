//! Injected I/O for the loader: text sources, HTTP fetches and key-value storage.
//!
//! Suspension happens only while reading a source or fetching a body; parsing
//! itself is synchronous. There is no cancellation: a load completes or fails.

use std::collections::HashMap;
use std::future::Future;

use futures::future::try_join_all;
use log::{info, warn};

use super::{merge, parse, parse_auto};
use crate::components::model::{FileFormat, Graph, extension_of};
use crate::config::ExplorerConfig;
use crate::error::{GraphError, Result};

/// Something with a name that can produce text, such as an uploaded file.
pub trait TextSource {
	/// File name; its extension declares the format.
	fn name(&self) -> &str;

	/// Read the whole content.
	fn read_text(&self) -> impl Future<Output = Result<String>>;
}

/// A completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	pub status: u16,
	pub status_text: String,
	pub body: String,
}

impl HttpResponse {
	/// Whether the status is in the 2xx range.
	pub fn is_ok(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Performs HTTP GET requests.
pub trait Fetcher {
	/// Resolve with any response the server produced; reject only when the
	/// transport itself failed.
	fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse>>;
}

/// Synchronous string storage (browser `localStorage` or an in-memory map).
pub trait KeyValueStore {
	fn get_item(&self, key: &str) -> Option<String>;
}

/// A named text source held in memory.
#[derive(Clone, Debug)]
pub struct InMemorySource {
	pub name: String,
	pub content: String,
}

impl InMemorySource {
	pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			content: content.into(),
		}
	}
}

impl TextSource for InMemorySource {
	fn name(&self) -> &str {
		&self.name
	}

	async fn read_text(&self) -> Result<String> {
		Ok(self.content.clone())
	}
}

/// A key-value store backed by a `HashMap`.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore(pub HashMap<String, String>);

impl KeyValueStore for InMemoryStore {
	fn get_item(&self, key: &str) -> Option<String> {
		self.0.get(key).cloned()
	}
}

/// Entry point for every load operation. Each call returns a fresh [`Graph`].
#[derive(Clone, Debug, Default)]
pub struct Loader {
	config: ExplorerConfig,
}

impl Loader {
	pub fn new(config: ExplorerConfig) -> Self {
		Self { config }
	}

	pub fn config(&self) -> &ExplorerConfig {
		&self.config
	}

	/// Load one file. The extension is checked before anything is read.
	pub async fn load_file<S: TextSource>(&self, source: &S) -> Result<Graph> {
		let format = FileFormat::from_file_name(source.name())?;
		let content = source.read_text().await?;
		let graph = parse(&content, format)?;
		info!(
			"loader: {} -> {} nodes, {} edges",
			source.name(),
			graph.nodes.len(),
			graph.edges.len()
		);
		Ok(graph)
	}

	/// Read all files concurrently, then merge them in input order.
	///
	/// Completion order has no effect on the result; the first failure fails
	/// the whole load.
	pub async fn load_files<S: TextSource>(&self, sources: &[S]) -> Result<Graph> {
		let graphs = try_join_all(sources.iter().map(|s| self.load_file(s))).await?;
		Ok(merge(sources.iter().map(TextSource::name).zip(graphs)))
	}

	/// Fetch a URL. A known extension picks the parser, otherwise the content
	/// is sniffed. Non-2xx responses are terminal.
	pub async fn load_url<F: Fetcher>(&self, fetcher: &F, url: &str) -> Result<Graph> {
		let response = fetcher.get(url).await?;
		if !response.is_ok() {
			return Err(GraphError::NetworkFailure {
				status: response.status,
				status_text: response.status_text,
			});
		}
		let graph = match FileFormat::from_extension(extension_of(url)) {
			Some(format) => parse(&response.body, format),
			None => parse_auto(&response.body),
		}
		.map_err(|e| GraphError::UrlContent(Box::new(e)))?;
		info!("loader: {url} -> {} nodes, {} edges", graph.nodes.len(), graph.edges.len());
		Ok(graph)
	}

	/// Load a JSON graph previously saved under `key`.
	pub fn load_stored<K: KeyValueStore>(&self, store: &K, key: &str) -> Result<Graph> {
		let content = store
			.get_item(key)
			.filter(|c| !c.is_empty())
			.ok_or_else(|| GraphError::MissingStoredGraph { key: key.to_string() })?;
		parse(&content, FileFormat::Json).map_err(|e| GraphError::StoredContent(Box::new(e)))
	}

	/// Load one of the configured pre-generated graph files.
	pub async fn load_quick_option<F: Fetcher>(&self, fetcher: &F, format: FileFormat) -> Result<Graph> {
		let url = self.config.quick_options.url(format);
		self.load_url(fetcher, url).await
	}

	/// The pre-generated JSON graph if reachable, else the sample fixture.
	pub async fn load_default<F: Fetcher>(&self, fetcher: &F) -> Graph {
		match self.load_quick_option(fetcher, FileFormat::Json).await {
			Ok(graph) => graph,
			Err(e) => {
				warn!("loader: no generated graph ({e}), using sample data");
				Graph::sample()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use std::task::Poll;

	use futures::executor::block_on;
	use futures::future::poll_fn;
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::model::SourceFormat;

	/// Serves canned responses; unknown URLs fail at the transport level.
	struct StaticFetcher(HashMap<String, HttpResponse>);

	impl StaticFetcher {
		fn with(entries: &[(&str, u16, &str)]) -> Self {
			Self(
				entries
					.iter()
					.map(|(url, status, body)| {
						let response = HttpResponse {
							status: *status,
							status_text: (if *status == 200 { "OK" } else { "Not Found" }).into(),
							body: body.to_string(),
						};
						(url.to_string(), response)
					})
					.collect(),
			)
		}
	}

	impl Fetcher for StaticFetcher {
		async fn get(&self, url: &str) -> Result<HttpResponse> {
			self.0
				.get(url)
				.cloned()
				.ok_or_else(|| GraphError::Transport(format!("connection refused: {url}")))
		}
	}

	/// A source that fails when read.
	struct Broken;

	impl TextSource for Broken {
		fn name(&self) -> &str {
			"broken.json"
		}

		async fn read_text(&self) -> Result<String> {
			Err(GraphError::Read {
				name: "broken.json".into(),
				reason: "permission denied".into(),
			})
		}
	}

	/// Stays pending for `yields` polls before producing its content.
	struct Delayed {
		source: InMemorySource,
		yields: usize,
	}

	impl TextSource for Delayed {
		fn name(&self) -> &str {
			&self.source.name
		}

		async fn read_text(&self) -> Result<String> {
			let mut remaining = self.yields;
			poll_fn(|cx| {
				if remaining == 0 {
					return Poll::Ready(());
				}
				remaining -= 1;
				cx.waker().wake_by_ref();
				Poll::Pending
			})
			.await;
			Ok(self.source.content.clone())
		}
	}

	#[test]
	fn unsupported_extension_fails_before_reading() {
		let loader = Loader::default();
		let err = block_on(loader.load_file(&InMemorySource::new("graph.csv", "id\n1"))).unwrap_err();
		assert!(matches!(err, GraphError::UnsupportedFormat { .. }));
	}

	#[test]
	fn read_failures_propagate() {
		let err = block_on(Loader::default().load_file(&Broken)).unwrap_err();
		assert!(matches!(err, GraphError::Read { ref name, .. } if name == "broken.json"));
	}

	#[test]
	fn multiple_files_merge_in_input_order() {
		let sources = [
			InMemorySource::new("a.json", r#"{"nodes":[{"id":"x","label":"A-X"}],"edges":[]}"#),
			InMemorySource::new("b.GML", "graph [\n node [\n id x\n label \"B-X\"\n ]\n edge [\n source x\n target x\n ]\n]"),
		];
		let graph = block_on(Loader::default().load_files(&sources)).unwrap();
		assert_eq!(graph.nodes.len(), 1);
		assert_eq!(graph.nodes[0].label, "A-X");
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(graph.metadata.sources[1].file, "b.GML");
		assert_eq!(graph.metadata.sources[1].format, Some(SourceFormat::Gml));
	}

	#[test]
	fn slow_first_file_still_wins_the_merge() {
		let sources = [
			Delayed {
				source: InMemorySource::new("slow.json", r#"[{"id":"x","label":"slow"}]"#),
				yields: 3,
			},
			Delayed {
				source: InMemorySource::new("fast.json", r#"[{"id":"x","label":"fast"},{"id":"y"}]"#),
				yields: 0,
			},
		];
		let graph = block_on(Loader::default().load_files(&sources)).unwrap();
		assert_eq!(graph.nodes[0].label, "slow");
		assert_eq!(graph.nodes[1].id, "y");
		let files: Vec<_> = graph.metadata.sources.iter().map(|s| s.file.as_str()).collect();
		assert_eq!(files, ["slow.json", "fast.json"]);
	}

	#[test]
	fn one_bad_file_fails_the_whole_load() {
		let sources = [
			InMemorySource::new("a.json", r#"[{"id":"x"}]"#),
			InMemorySource::new("b.graphml", "<graphml>"),
		];
		let err = block_on(Loader::default().load_files(&sources)).unwrap_err();
		assert!(matches!(err, GraphError::InvalidXml(_)));
	}

	#[test]
	fn url_without_extension_is_sniffed() {
		let fetcher = StaticFetcher::with(&[("https://host/graph", 200, "graph [\n node [\n id 1\n ]\n]")]);
		let graph = block_on(Loader::default().load_url(&fetcher, "https://host/graph")).unwrap();
		assert_eq!(graph.metadata.format, Some(SourceFormat::Gml));
	}

	#[test]
	fn non_ok_status_is_terminal() {
		let fetcher = StaticFetcher::with(&[("https://host/g.json", 404, "")]);
		let err = block_on(Loader::default().load_url(&fetcher, "https://host/g.json")).unwrap_err();
		assert!(matches!(err, GraphError::NetworkFailure { status: 404, .. }));
	}

	#[test]
	fn unparseable_url_body_carries_the_load_prefix() {
		let fetcher = StaticFetcher::with(&[("https://host/g.json", 200, "{not json")]);
		let err = block_on(Loader::default().load_url(&fetcher, "https://host/g.json")).unwrap_err();
		assert!(matches!(&err, GraphError::UrlContent(inner) if matches!(**inner, GraphError::InvalidJson(_))));
		assert!(err.to_string().starts_with("Failed to load from URL: JSON parsing failed: "));
	}

	#[test]
	fn default_load_falls_back_to_sample() {
		let fetcher = StaticFetcher::with(&[]);
		let graph = block_on(Loader::default().load_default(&fetcher));
		assert_eq!(graph, Graph::sample());
	}

	#[test]
	fn default_load_prefers_generated_graph() {
		let url = ExplorerConfig::default().quick_options.json;
		let fetcher = StaticFetcher::with(&[(url.as_str(), 200, r#"[{"id":"only"}]"#)]);
		let graph = block_on(Loader::default().load_default(&fetcher));
		assert_eq!(graph.nodes.len(), 1);
	}

	#[test]
	fn stored_graphs_load_as_json() {
		let mut store = InMemoryStore::default();
		store.0.insert("graph".into(), r#"[{"id":"s"}]"#.into());
		let loader = Loader::default();
		assert_eq!(loader.load_stored(&store, "graph").unwrap().nodes[0].id, "s");
		assert!(matches!(
			loader.load_stored(&store, "missing"),
			Err(GraphError::MissingStoredGraph { .. })
		));
	}

	#[test]
	fn corrupt_stored_graph_carries_the_storage_prefix() {
		let mut store = InMemoryStore::default();
		store.0.insert("graph".into(), "42".into());
		let err = Loader::default().load_stored(&store, "graph").unwrap_err();
		assert_eq!(
			err.to_string(),
			"Failed to parse localStorage data: JSON parsing failed: Unrecognized JSON structure"
		);
	}
}
