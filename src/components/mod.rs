//! Pipeline components, leaves first: the canonical model, ingestion
//! (parsers, normalizer, detection, merging), statistics, export and the
//! explorer view the UI consumes.

pub mod explorer;
pub mod export;
pub mod ingest;
pub mod model;
pub mod stats;

pub use explorer::{Connection, DataSet, Direction, Explorer, FilterCriteria};
pub use export::{ExportFile, ExportFormat};
pub use ingest::{Loader, parse, parse_auto};
pub use model::{Edge, FileFormat, Graph, GraphMetadata, Node, SourceFormat, SourceSummary};
pub use stats::GraphStats;
