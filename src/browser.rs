//! Browser bindings: DOM-backed text sources and the functions exported to the
//! JavaScript UI.
//!
//! Graphs cross the boundary as canonical JSON strings. Errors surface as JS
//! `Error` objects carrying the pipeline's message.

use js_sys::Array;
use log::{info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlScriptElement, Response, Storage};

use crate::components::export::{self, ExportFormat};
use crate::components::ingest::{Fetcher, HttpResponse, KeyValueStore, Loader, TextSource, parse_auto};
use crate::components::model::Graph;
use crate::components::stats;
use crate::config::ExplorerConfig;
use crate::error::{GraphError, Result};

/// Element holding an optional JSON config document.
const CONFIG_ELEMENT_ID: &str = "explorer-config";

fn describe(value: JsValue) -> String {
	value
		.as_string()
		.or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
		.unwrap_or_else(|| format!("{value:?}"))
}

/// Text content of a `<script>` element, if present.
fn script_text(id: &str) -> Option<String> {
	let document = web_sys::window()?.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

fn config() -> ExplorerConfig {
	match script_text(CONFIG_ELEMENT_ID) {
		Some(text) => ExplorerConfig::from_json(&text).unwrap_or_else(|e| {
			warn!("kg-explorer: ignoring invalid config: {e}");
			ExplorerConfig::default()
		}),
		None => ExplorerConfig::default(),
	}
}

/// An uploaded file.
pub struct BrowserFile {
	name: String,
	file: File,
}

impl From<File> for BrowserFile {
	fn from(file: File) -> Self {
		Self {
			name: file.name(),
			file,
		}
	}
}

impl TextSource for BrowserFile {
	fn name(&self) -> &str {
		&self.name
	}

	async fn read_text(&self) -> Result<String> {
		let read_error = |reason: String| GraphError::Read {
			name: self.name.clone(),
			reason,
		};
		let value = JsFuture::from(self.file.text())
			.await
			.map_err(|e| read_error(describe(e)))?;
		value
			.as_string()
			.ok_or_else(|| read_error("content is not text".into()))
	}
}

/// `window.fetch`.
pub struct BrowserFetcher;

impl Fetcher for BrowserFetcher {
	async fn get(&self, url: &str) -> Result<HttpResponse> {
		let window = web_sys::window().ok_or_else(|| GraphError::Transport("no window".into()))?;
		let value = JsFuture::from(window.fetch_with_str(url))
			.await
			.map_err(|e| GraphError::Transport(describe(e)))?;
		let response: Response = value
			.dyn_into()
			.map_err(|e| GraphError::Transport(describe(e)))?;

		let mut body = String::new();
		if response.ok() {
			let promise = response.text().map_err(|e| GraphError::Transport(describe(e)))?;
			body = JsFuture::from(promise)
				.await
				.map_err(|e| GraphError::Transport(describe(e)))?
				.as_string()
				.unwrap_or_default();
		}
		Ok(HttpResponse {
			status: response.status(),
			status_text: response.status_text(),
			body,
		})
	}
}

/// `window.localStorage`.
pub struct LocalStore(Storage);

impl LocalStore {
	pub fn open() -> Option<Self> {
		web_sys::window()?.local_storage().ok().flatten().map(Self)
	}
}

impl KeyValueStore for LocalStore {
	fn get_item(&self, key: &str) -> Option<String> {
		self.0.get_item(key).ok().flatten()
	}
}

fn to_json(graph: &Graph) -> Result<String> {
	serde_json::to_string(graph).map_err(GraphError::Serialize)
}

fn from_json(text: &str) -> Result<Graph> {
	serde_json::from_str(text).map_err(GraphError::InvalidJson)
}

#[wasm_bindgen(start)]
pub fn start() {
	crate::init_logging();
}

/// Parse text, using `file_name`'s extension when given and sniffing otherwise.
#[wasm_bindgen(js_name = parseGraph)]
pub fn parse_graph(content: &str, file_name: Option<String>) -> std::result::Result<String, JsError> {
	let graph = match file_name {
		Some(name) => crate::components::ingest::parse(content, crate::FileFormat::from_file_name(&name)?)?,
		None => parse_auto(content)?,
	};
	Ok(to_json(&graph)?)
}

/// Parse the graph embedded in a `<script>` element (e.g. `graph-data`).
#[wasm_bindgen(js_name = loadEmbedded)]
pub fn load_embedded(element_id: &str) -> std::result::Result<String, JsError> {
	let text = script_text(element_id).ok_or_else(|| GraphError::Read {
		name: element_id.to_string(),
		reason: "no such script element".into(),
	})?;
	Ok(to_json(&parse_auto(&text)?)?)
}

/// Read and merge an array of `File`s.
#[wasm_bindgen(js_name = loadFiles)]
pub async fn load_files(files: Array) -> std::result::Result<String, JsError> {
	let sources: Vec<BrowserFile> = files
		.iter()
		.filter_map(|value| value.dyn_into::<File>().ok())
		.map(BrowserFile::from)
		.collect();
	info!("kg-explorer: loading {} file(s)", sources.len());
	let loader = Loader::new(config());
	let graph = match sources.as_slice() {
		[single] => loader.load_file(single).await?,
		_ => loader.load_files(&sources).await?,
	};
	Ok(to_json(&graph)?)
}

#[wasm_bindgen(js_name = loadUrl)]
pub async fn load_url(url: String) -> std::result::Result<String, JsError> {
	let graph = Loader::new(config()).load_url(&BrowserFetcher, &url).await?;
	Ok(to_json(&graph)?)
}

/// `format` is one of `json`, `graphml`, `gml`.
#[wasm_bindgen(js_name = loadQuickOption)]
pub async fn load_quick_option(format: String) -> std::result::Result<String, JsError> {
	let format = crate::FileFormat::from_extension(&format)
		.ok_or(GraphError::UnsupportedFormat { extension: format })?;
	let graph = Loader::new(config())
		.load_quick_option(&BrowserFetcher, format)
		.await?;
	Ok(to_json(&graph)?)
}

/// The generated JSON graph if reachable, else the sample fixture.
#[wasm_bindgen(js_name = loadDefault)]
pub async fn load_default() -> std::result::Result<String, JsError> {
	let graph = Loader::new(config()).load_default(&BrowserFetcher).await;
	Ok(to_json(&graph)?)
}

#[wasm_bindgen(js_name = loadStored)]
pub fn load_stored(key: &str) -> std::result::Result<String, JsError> {
	let store = LocalStore::open().ok_or_else(|| GraphError::MissingStoredGraph { key: key.to_string() })?;
	let graph = Loader::new(config()).load_stored(&store, key)?;
	Ok(to_json(&graph)?)
}

#[wasm_bindgen(js_name = graphStats)]
pub fn graph_stats(graph_json: &str) -> std::result::Result<String, JsError> {
	let graph = from_json(graph_json)?;
	Ok(serde_json::to_string(&stats::compute(&graph)).map_err(GraphError::Serialize)?)
}

/// Returns a JSON array of `{filename, mimeType, content}`.
#[wasm_bindgen(js_name = exportGraph)]
pub fn export_graph(graph_json: &str, format: &str) -> std::result::Result<String, JsError> {
	let graph = from_json(graph_json)?;
	let format = ExportFormat::from_name(format).ok_or_else(|| GraphError::UnsupportedExportFormat {
		name: format.to_string(),
	})?;
	let files = export::export(&graph, format, &config().export)?;
	Ok(serde_json::to_string(&files).map_err(GraphError::Serialize)?)
}
