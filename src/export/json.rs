use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::info;

use super::{ExportMetadata, ImportError, ImportMetadata, ImportedDiagram, EXPORT_VERSION};
use crate::types::Diagram;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    #[serde(flatten)]
    diagram: &'a Diagram,
    metadata: StampedMetadata<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StampedMetadata<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    exported_at: i64,
    version: &'static str,
}

#[derive(Deserialize)]
struct ImportDocument {
    #[serde(flatten)]
    diagram: Diagram,
    #[serde(default)]
    metadata: Option<RawMetadata>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RawMetadata {
    name: Option<String>,
    description: Option<String>,
    exported_at: Option<i64>,
    version: Option<String>,
}

/// Render a diagram as a pretty-printed export document
pub fn export_json(diagram: &Diagram, metadata: &ExportMetadata) -> Result<String> {
    let document = ExportDocument {
        diagram,
        metadata: StampedMetadata {
            name: metadata.name.as_deref(),
            description: metadata.description.as_deref(),
            exported_at: Utc::now().timestamp_millis(),
            version: EXPORT_VERSION,
        },
    };
    serde_json::to_string_pretty(&document).context("Failed to serialize JSON")
}

/// Parse and validate an export document
pub fn import_json(json: &str) -> Result<ImportedDiagram, ImportError> {
    let document: ImportDocument = serde_json::from_str(json)?;
    validate(&document.diagram)?;

    let raw = document.metadata.unwrap_or_default();
    Ok(ImportedDiagram {
        diagram: document.diagram,
        metadata: ImportMetadata {
            name: raw.name,
            description: raw.description,
            exported_at: raw.exported_at,
            version: raw.version,
            imported_at: Utc::now().timestamp_millis(),
        },
    })
}

fn validate(diagram: &Diagram) -> Result<(), ImportError> {
    for (index, node) in diagram.nodes.iter().enumerate() {
        if node.id.is_empty() {
            return Err(ImportError::InvalidNode {
                index,
                reason: "missing id",
            });
        }
        if node.data.label.is_empty() {
            return Err(ImportError::InvalidNode {
                index,
                reason: "missing label",
            });
        }
    }

    for (index, edge) in diagram.edges.iter().enumerate() {
        let reason = if edge.id.is_empty() {
            "missing id"
        } else if edge.source.is_empty() {
            "missing source"
        } else if edge.target.is_empty() {
            "missing target"
        } else {
            continue;
        };
        return Err(ImportError::InvalidEdge { index, reason });
    }

    Ok(())
}

/// Export a diagram to a JSON file
pub fn write_json_file(diagram: &Diagram, metadata: &ExportMetadata, output_path: &Path) -> Result<()> {
    let output = export_json(diagram, metadata)?;

    let mut file = File::create(output_path)
        .with_context(|| format!("Failed to create output file: {}", output_path.display()))?;
    file.write_all(output.as_bytes())
        .context("Failed to write JSON file")?;
    file.flush().context("Failed to flush file")?;

    info!(path = %output_path.display(), tables = diagram.nodes.len(), "exported diagram");
    Ok(())
}

/// Import a diagram from a JSON file
pub fn read_json_file(input_path: &Path) -> Result<ImportedDiagram> {
    let json = std::fs::read_to_string(input_path)
        .with_context(|| format!("Failed to read diagram file: {}", input_path.display()))?;
    import_json(&json).with_context(|| format!("Failed to import diagram: {}", input_path.display()))
}
