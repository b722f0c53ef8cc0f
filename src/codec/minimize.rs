//! Mapping between a full [`Diagram`] and the positional schema carried in share links.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codec::columns;
use crate::codec::error::CodecError;
use crate::types::{Diagram, DisplaySettings, Position, RelationshipEdge, TableData, TableNode};

/// Largest integer a browser can hold exactly
const MAX_COORDINATE: f64 = 9_007_199_254_740_991.0;

/// Table node reduced to id, rounded position, label and compressed columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinNode {
    #[serde(rename = "i")]
    pub id: String,
    pub x: i64,
    pub y: i64,
    #[serde(rename = "l")]
    pub label: String,
    #[serde(rename = "c")]
    pub columns: String,
}

/// Relationship reduced to its endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinEdge {
    #[serde(rename = "s")]
    pub source: String,
    #[serde(rename = "t")]
    pub target: String,
}

/// Transport-only form of a diagram
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MinimalSchema {
    #[serde(rename = "n")]
    pub nodes: Vec<MinNode>,
    #[serde(rename = "e")]
    pub edges: Vec<MinEdge>,
    /// Compact JSON settings, only when they differ from the defaults
    #[serde(rename = "s")]
    pub settings: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CompactSettings {
    ht: bool,
    hm: bool,
    sf: bool,
}

impl From<DisplaySettings> for CompactSettings {
    fn from(settings: DisplaySettings) -> Self {
        Self {
            ht: settings.hide_timestamps,
            hm: settings.hide_meta_fields,
            sf: settings.show_fields,
        }
    }
}

impl From<CompactSettings> for DisplaySettings {
    fn from(compact: CompactSettings) -> Self {
        Self {
            hide_timestamps: compact.ht,
            hide_meta_fields: compact.hm,
            show_fields: compact.sf,
        }
    }
}

/// Reduce a diagram to its minimal schema
pub fn minimize(diagram: &Diagram) -> Result<MinimalSchema, CodecError> {
    let nodes = diagram
        .nodes
        .iter()
        .map(minimize_node)
        .collect::<Result<Vec<_>, _>>()?;

    let edges = diagram
        .edges
        .iter()
        .map(|edge| MinEdge {
            source: edge.source.clone(),
            target: edge.target.clone(),
        })
        .collect();

    let settings = match diagram.settings {
        Some(settings) if !settings.is_default() => {
            Some(serde_json::to_string(&CompactSettings::from(settings))?)
        }
        _ => None,
    };

    debug!(
        nodes = diagram.nodes.len(),
        edges = diagram.edges.len(),
        has_settings = settings.is_some(),
        "minimized diagram"
    );

    Ok(MinimalSchema {
        nodes,
        edges,
        settings,
    })
}

fn minimize_node(node: &TableNode) -> Result<MinNode, CodecError> {
    let invalid = || CodecError::Coordinate {
        node: node.id.clone(),
        x: node.position.x,
        y: node.position.y,
    };
    let x = round_coordinate(node.position.x).ok_or_else(invalid)?;
    let y = round_coordinate(node.position.y).ok_or_else(invalid)?;

    Ok(MinNode {
        id: node.id.clone(),
        x,
        y,
        label: node.data.label.clone(),
        columns: columns::compress(&node.data.columns),
    })
}

/// Round to the nearest integer, halves toward positive infinity
fn round_coordinate(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let floor = value.floor();
    let rounded = if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    };
    if rounded.abs() > MAX_COORDINATE {
        return None;
    }
    Some(rounded as i64)
}

/// Rebuild a diagram from its minimal schema
///
/// Edges get an id of `source-target` and default arrow styling; whatever
/// styling the original diagram had is not recoverable.
pub fn restore(schema: MinimalSchema) -> Result<Diagram, CodecError> {
    let settings = schema
        .settings
        .as_deref()
        .map(serde_json::from_str::<CompactSettings>)
        .transpose()?
        .map(DisplaySettings::from);

    let nodes = schema
        .nodes
        .into_iter()
        .map(|node| TableNode {
            id: node.id,
            kind: crate::types::TABLE_NODE_KIND.to_string(),
            position: Position::new(node.x as f64, node.y as f64),
            data: TableData {
                label: node.label,
                columns: columns::decompress(&node.columns),
            },
        })
        .collect();

    let edges = schema
        .edges
        .into_iter()
        .map(|edge| RelationshipEdge::between(edge.source, edge.target))
        .collect();

    Ok(Diagram {
        nodes,
        edges,
        settings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Column, EdgeMarker, MarkerKind};
    use pretty_assertions::assert_eq;

    fn sample() -> Diagram {
        let users = TableNode::new(
            "users",
            Position::new(100.0, 100.0),
            vec![
                Column::new("id", "uuid").with_constraints("PRIMARY KEY"),
                Column::new("email", "text"),
            ],
        );
        let posts = TableNode::new(
            "posts",
            Position::new(600.0, 100.0),
            vec![
                Column::new("id", "uuid").with_constraints("PRIMARY KEY"),
                Column::new("author_id", "uuid").with_constraints("FOREIGN KEY"),
            ],
        );
        let mut edge = RelationshipEdge::between("posts", "users");
        edge.id = "fk_posts_author".to_string();
        edge.kind = "smoothstep".to_string();
        edge.label = Some("author_id".to_string());
        Diagram::new(vec![users, posts], vec![edge])
    }

    #[test]
    fn minimize_uses_positional_records() {
        let schema = minimize(&sample()).unwrap();
        assert_eq!(
            schema.nodes[0],
            MinNode {
                id: "users".to_string(),
                x: 100,
                y: 100,
                label: "users".to_string(),
                columns: "id|uuid|PRIMARY KEY,email|text".to_string(),
            }
        );
        assert_eq!(
            schema.edges,
            vec![MinEdge {
                source: "posts".to_string(),
                target: "users".to_string(),
            }]
        );
        assert_eq!(schema.settings, None);
    }

    #[test]
    fn restore_round_trips_nodes_and_endpoints() {
        let original = sample();
        let restored = restore(minimize(&original).unwrap()).unwrap();

        assert_eq!(restored.nodes, original.nodes);
        assert_eq!(restored.edges.len(), 1);
        let edge = &restored.edges[0];
        assert_eq!(edge.source, "posts");
        assert_eq!(edge.target, "users");
    }

    #[test]
    fn restore_fabricates_edge_defaults() {
        let restored = restore(minimize(&sample()).unwrap()).unwrap();
        let edge = &restored.edges[0];
        assert_eq!(edge.id, "posts-users");
        assert_eq!(edge.kind, "default");
        assert_eq!(edge.label, None);
        assert_eq!(
            edge.marker_end,
            Some(EdgeMarker {
                kind: MarkerKind::Arrow,
                color: None,
                width: None,
                height: None,
            })
        );
    }

    #[test]
    fn positions_round_to_nearest() {
        let diagram = Diagram::new(
            vec![TableNode::new("t", Position::new(10.4, 10.6), vec![])],
            vec![],
        );
        let restored = restore(minimize(&diagram).unwrap()).unwrap();
        assert_eq!(restored.nodes[0].position, Position::new(10.0, 11.0));
    }

    #[test]
    fn halves_round_toward_positive_infinity() {
        assert_eq!(round_coordinate(2.5), Some(3));
        assert_eq!(round_coordinate(-2.5), Some(-2));
        assert_eq!(round_coordinate(-2.6), Some(-3));
        assert_eq!(round_coordinate(0.0), Some(0));
    }

    #[test]
    fn non_finite_position_is_rejected() {
        let diagram = Diagram::new(
            vec![TableNode::new("t", Position::new(f64::NAN, 0.0), vec![])],
            vec![],
        );
        assert!(matches!(
            minimize(&diagram),
            Err(CodecError::Coordinate { .. })
        ));
        assert_eq!(round_coordinate(f64::INFINITY), None);
        assert_eq!(round_coordinate(1e300), None);
    }

    #[test]
    fn default_settings_are_omitted() {
        let diagram = sample().with_settings(DisplaySettings::default());
        let schema = minimize(&diagram).unwrap();
        assert_eq!(schema.settings, None);
        assert_eq!(restore(schema).unwrap().settings, None);
    }

    #[test]
    fn changed_settings_use_short_keys() {
        let settings = DisplaySettings {
            show_fields: false,
            ..DisplaySettings::default()
        };
        let schema = minimize(&sample().with_settings(settings)).unwrap();
        assert_eq!(
            schema.settings.as_deref(),
            Some(r#"{"ht":false,"hm":false,"sf":false}"#)
        );
        assert_eq!(restore(schema).unwrap().settings, Some(settings));
    }

    #[test]
    fn malformed_settings_fail_restore() {
        let schema = MinimalSchema {
            settings: Some("{ht:".to_string()),
            ..MinimalSchema::default()
        };
        assert!(matches!(restore(schema), Err(CodecError::Settings(_))));
    }

    #[test]
    fn restored_nodes_are_table_nodes() {
        let mut diagram = sample();
        diagram.nodes[0].kind = "custom".to_string();
        let restored = restore(minimize(&diagram).unwrap()).unwrap();
        assert!(restored.nodes.iter().all(|n| n.kind == "tableNode"));
    }
}
