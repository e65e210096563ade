//! kg-explorer: multi-format graph ingestion for an in-browser knowledge graph
//! explorer.
//!
//! Raw JSON, Cytoscape, GraphML and GML input is parsed, normalized into one
//! canonical node/edge model, optionally merged across sources, summarized and
//! exported again. Rendering and layout belong to the UI; the canonical
//! [`Graph`] is the only contract between the two.

pub mod components;
pub mod config;
pub mod error;

#[cfg(target_arch = "wasm32")]
pub mod browser;

pub use components::{
	DataSet, Edge, Explorer, ExportFile, ExportFormat, FileFormat, FilterCriteria, Graph, GraphStats, Loader,
	Node, SourceFormat, parse, parse_auto,
};
pub use config::ExplorerConfig;
pub use error::{GraphError, Result};

/// Initialize logging and panic hooks for the WASM target.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
	use log::{Level, info};

	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("kg-explorer: logging initialized");
}
