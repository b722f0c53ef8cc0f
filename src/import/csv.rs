//! Schema dumps (one row per column) to diagrams.
//!
//! Expected columns: `table_name, column_name, ordinal_position, data_type,
//! max_length, constraint_type, ref_table_schema, ref_table_name,
//! ref_column_name`. The first row is a header.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

use super::{GRID_OFFSET, HORIZONTAL_SPACING, TABLES_PER_ROW, VERTICAL_SPACING};
use crate::types::{Column, Diagram, EdgeMarker, Position, RelationshipEdge, TableNode};

const MIN_FIELDS: usize = 9;
const EDGE_COLOR: &str = "#94a3b8";

/// One column of a schema dump
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRow {
    pub table_name: String,
    pub column_name: String,
    pub data_type: String,
    pub constraint_type: Option<String>,
    pub ref_table_name: Option<String>,
}

impl SchemaRow {
    fn parse<S: AsRef<str>>(fields: &[S]) -> Option<Self> {
        if fields.len() < MIN_FIELDS {
            return None;
        }
        let field = |i: usize| fields[i].as_ref().to_string();
        let optional = |i: usize| Some(field(i)).filter(|s| !s.is_empty());

        let table_name = field(0);
        let column_name = field(1);
        if table_name.is_empty() || column_name.is_empty() {
            return None;
        }

        Some(Self {
            table_name,
            column_name,
            data_type: field(3),
            constraint_type: optional(5),
            ref_table_name: optional(7),
        })
    }
}

struct TableColumns {
    name: String,
    rows: Vec<SchemaRow>,
}

fn group_by_table(rows: Vec<SchemaRow>) -> Vec<TableColumns> {
    let mut tables: Vec<TableColumns> = Vec::new();
    for row in rows {
        match tables.iter_mut().find(|t| t.name == row.table_name) {
            Some(table) => table.rows.push(row),
            None => tables.push(TableColumns {
                name: row.table_name.clone(),
                rows: vec![row],
            }),
        }
    }
    tables
}

fn place_tables(tables: &[TableColumns]) -> Vec<TableNode> {
    tables
        .iter()
        .enumerate()
        .map(|(index, table)| {
            let row = index / TABLES_PER_ROW;
            let col = index % TABLES_PER_ROW;
            let position = Position::new(
                col as f64 * HORIZONTAL_SPACING + GRID_OFFSET,
                row as f64 * VERTICAL_SPACING + GRID_OFFSET,
            );

            let columns = table
                .rows
                .iter()
                .map(|r| Column {
                    name: r.column_name.clone(),
                    data_type: r.data_type.clone(),
                    constraints: r.constraint_type.clone(),
                    cardinality: r.ref_table_name.as_ref().map(|_| "n:1".to_string()),
                })
                .collect();

            TableNode::new(table.name.clone(), position, columns)
        })
        .collect()
}

fn link_tables(tables: &[TableColumns]) -> Vec<RelationshipEdge> {
    let mut edges = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();

    for table in tables {
        for row in &table.rows {
            let Some(target) = &row.ref_table_name else {
                continue;
            };
            let forward = (table.name.clone(), target.clone());
            let reverse = (target.clone(), table.name.clone());
            if seen.contains(&forward) || seen.contains(&reverse) {
                continue;
            }

            let mut edge = RelationshipEdge::between(table.name.clone(), target.clone());
            edge.kind = "smoothstep".to_string();
            edge.label = Some(row.column_name.clone());
            edge.marker_end = Some(EdgeMarker {
                color: Some(EDGE_COLOR.to_string()),
                width: Some(20.0),
                height: Some(20.0),
                ..EdgeMarker::arrow()
            });
            edges.push(edge);
            seen.insert(forward);
        }
    }
    edges
}

/// Build a diagram from raw CSV rows, header included
pub fn diagram_from_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> Diagram {
    if rows.len() < 2 {
        warn!(rows = rows.len(), "schema dump has no data rows");
        return Diagram::default();
    }

    let parsed: Vec<SchemaRow> = rows[1..].iter().filter_map(|r| SchemaRow::parse(r)).collect();
    let skipped = rows.len() - 1 - parsed.len();
    if skipped > 0 {
        debug!(skipped, "skipped incomplete schema rows");
    }

    let tables = group_by_table(parsed);
    let nodes = place_tables(&tables);
    let edges = link_tables(&tables);
    Diagram::new(nodes, edges)
}

/// Read a schema dump from any reader
pub fn diagram_from_csv<R: Read>(reader: R) -> Result<Diagram> {
    let mut csv_reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record.context("Failed to read CSV row")?;
        rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
    }

    Ok(diagram_from_rows(&rows))
}

/// Read a schema dump from a file
pub fn read_csv_file(input_path: &Path) -> Result<Diagram> {
    let file = File::open(input_path)
        .with_context(|| format!("Failed to open CSV file: {}", input_path.display()))?;
    let diagram = diagram_from_csv(file)?;
    info!(
        path = %input_path.display(),
        tables = diagram.nodes.len(),
        relationships = diagram.edges.len(),
        "imported schema dump"
    );
    Ok(diagram)
}
