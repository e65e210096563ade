//! Content sniffing for inputs without a declared extension.

use log::debug;

use crate::components::model::FileFormat;
use crate::error::{GraphError, Result};

/// Classify raw text by its leading characters and tell-tale substrings.
pub fn detect(content: &str) -> Result<FileFormat> {
	let content = content.trim();
	let format = if content.starts_with('{') || content.starts_with('[') {
		FileFormat::Json
	} else if content.contains("<?xml") || content.contains("<graphml") {
		FileFormat::GraphMl
	} else if content.contains("graph [") || content.contains("node [") {
		FileFormat::Gml
	} else {
		return Err(GraphError::UnknownFormat);
	};
	debug!("detect: classified content as {}", format.extension());
	Ok(format)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn classifies_by_content() {
		assert_eq!(detect("graph [\n node [ id 1 ]\n]").ok(), Some(FileFormat::Gml));
		assert_eq!(detect("<?xml version=\"1.0\"?><graphml/>").ok(), Some(FileFormat::GraphMl));
		assert_eq!(detect("  <graphml></graphml>").ok(), Some(FileFormat::GraphMl));
		assert_eq!(detect("[{\"id\": 1}]").ok(), Some(FileFormat::Json));
		assert_eq!(detect("\n{\"nodes\": []}").ok(), Some(FileFormat::Json));
	}

	#[test]
	fn leading_bracket_wins_over_gml_markers() {
		assert_eq!(detect("[\"node [\"]").ok(), Some(FileFormat::Json));
	}

	#[test]
	fn unclassifiable_content_fails() {
		assert!(matches!(detect("id,label\n1,A"), Err(GraphError::UnknownFormat)));
		assert!(matches!(detect(""), Err(GraphError::UnknownFormat)));
	}
}
