use serde::{Deserialize, Serialize};

use crate::types::{DisplaySettings, RelationshipEdge, TableNode};

/// Canvas contents of a saved view
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewData {
    pub nodes: Vec<TableNode>,
    pub edges: Vec<RelationshipEdge>,
    #[serde(default)]
    pub hide_prefix: Vec<String>,
    #[serde(default)]
    pub filter: String,
}

/// A named, saved arrangement of a diagram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErdView {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Milliseconds since the Unix epoch
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub settings: DisplaySettings,
    pub data: ViewData,
}
