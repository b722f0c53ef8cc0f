use serde::{Deserialize, Serialize};

use crate::types::Column;

/// Node kind the renderer draws as a table card
pub const TABLE_NODE_KIND: &str = "tableNode";

/// Edge kind used for relationships restored from a share link
pub const DEFAULT_EDGE_KIND: &str = "default";

/// Canvas position of a node
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Per-node payload: the table name and its columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    pub label: String,
    pub columns: Vec<Column>,
}

/// A table on the diagram canvas
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableNode {
    pub id: String,
    #[serde(rename = "type", default = "default_node_kind")]
    pub kind: String,
    pub position: Position,
    pub data: TableData,
}

fn default_node_kind() -> String {
    TABLE_NODE_KIND.to_string()
}

impl TableNode {
    /// Build a table node whose id and label are both the table name
    pub fn new(name: impl Into<String>, position: Position, columns: Vec<Column>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            kind: default_node_kind(),
            position,
            data: TableData {
                label: name,
                columns,
            },
        }
    }
}

/// Shape drawn at the end of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    Arrow,
    ArrowClosed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeMarker {
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl EdgeMarker {
    pub fn arrow() -> Self {
        Self {
            kind: MarkerKind::Arrow,
            color: None,
            width: None,
            height: None,
        }
    }
}

/// A relationship between two tables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type", default = "default_edge_kind")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker_end: Option<EdgeMarker>,
}

fn default_edge_kind() -> String {
    DEFAULT_EDGE_KIND.to_string()
}

impl RelationshipEdge {
    /// Edge with the id derived from its endpoints and default rendering
    pub fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{}-{}", source, target),
            source,
            target,
            kind: default_edge_kind(),
            label: None,
            marker_end: Some(EdgeMarker::arrow()),
        }
    }
}

/// Display flags for a diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    pub hide_timestamps: bool,
    pub hide_meta_fields: bool,
    pub show_fields: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            hide_timestamps: false,
            hide_meta_fields: false,
            show_fields: true,
        }
    }
}

impl DisplaySettings {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Complete diagram data with all tables and relationships
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Diagram {
    pub nodes: Vec<TableNode>,
    pub edges: Vec<RelationshipEdge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<DisplaySettings>,
}

impl Diagram {
    pub fn new(nodes: Vec<TableNode>, edges: Vec<RelationshipEdge>) -> Self {
        Self {
            nodes,
            edges,
            settings: None,
        }
    }

    pub fn with_settings(mut self, settings: DisplaySettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }
}
