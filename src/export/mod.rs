mod json;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use json::{export_json, import_json, read_json_file, write_json_file};

/// Version stamped into exported diagram files
pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid ERD data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid node data structure at index {index}: {reason}")]
    InvalidNode { index: usize, reason: &'static str },
    #[error("Invalid edge data structure at index {index}: {reason}")]
    InvalidEdge { index: usize, reason: &'static str },
}

/// Descriptive header written alongside an exported diagram
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ExportMetadata {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }
}

/// Metadata found in an imported file, stamped with the import time
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportMetadata {
    pub name: Option<String>,
    pub description: Option<String>,
    pub exported_at: Option<i64>,
    pub version: Option<String>,
    pub imported_at: i64,
}

/// A diagram read back from a JSON export
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedDiagram {
    pub diagram: crate::types::Diagram,
    pub metadata: ImportMetadata,
}
