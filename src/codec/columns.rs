//! Column lists as a single delimited string.
//!
//! Columns are joined with `,` and the fields of a column with `|`:
//! `name|type` or `name|type|constraints`. There is no escaping, so a
//! name or type containing either separator does not survive a round trip.

use crate::types::Column;

const COLUMN_SEPARATOR: char = ',';
const FIELD_SEPARATOR: char = '|';

/// Compress columns to `name|type[|constraints]` joined by `,`
pub fn compress(columns: &[Column]) -> String {
    let mut out = String::new();
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            out.push(COLUMN_SEPARATOR);
        }
        out.push_str(&column.name);
        out.push(FIELD_SEPARATOR);
        out.push_str(&column.data_type);
        if let Some(constraints) = &column.constraints {
            out.push(FIELD_SEPARATOR);
            out.push_str(constraints);
        }
    }
    out
}

/// Expand a compressed column string
pub fn decompress(compressed: &str) -> Vec<Column> {
    if compressed.is_empty() {
        return Vec::new();
    }

    compressed
        .split(COLUMN_SEPARATOR)
        .map(|raw| {
            let mut fields = raw.split(FIELD_SEPARATOR);
            let name = fields.next().unwrap_or_default();
            let data_type = fields.next().unwrap_or_default();
            Column {
                name: name.to_string(),
                data_type: data_type.to_string(),
                constraints: fields.next().map(str::to_string),
                cardinality: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_without_constraint_has_two_fields() {
        let columns = vec![Column::new("id", "int")];
        let compressed = compress(&columns);
        assert_eq!(compressed, "id|int");

        let restored = decompress(&compressed);
        assert_eq!(restored, columns);
        assert_eq!(restored[0].constraints, None);
    }

    #[test]
    fn column_with_constraint_has_three_fields() {
        let columns = vec![Column::new("id", "int").with_constraints("PRIMARY KEY")];
        let compressed = compress(&columns);
        assert_eq!(compressed, "id|int|PRIMARY KEY");
        assert_eq!(decompress(&compressed), columns);
    }

    #[test]
    fn empty_constraint_is_kept_distinct_from_none() {
        let columns = vec![Column::new("note", "text").with_constraints("")];
        let compressed = compress(&columns);
        assert_eq!(compressed, "note|text|");
        assert_eq!(decompress(&compressed)[0].constraints.as_deref(), Some(""));
    }

    #[test]
    fn multiple_columns_keep_order() {
        let columns = vec![
            Column::new("id", "uuid").with_constraints("PRIMARY KEY"),
            Column::new("email", "varchar"),
            Column::new("org_id", "uuid").with_constraints("FOREIGN KEY"),
        ];
        let compressed = compress(&columns);
        assert_eq!(
            compressed,
            "id|uuid|PRIMARY KEY,email|varchar,org_id|uuid|FOREIGN KEY"
        );
        assert_eq!(decompress(&compressed), columns);
    }

    #[test]
    fn empty_list_is_empty_string() {
        assert_eq!(compress(&[]), "");
        assert!(decompress("").is_empty());
    }

    #[test]
    fn empty_type_survives() {
        let columns = vec![Column::new("blob", "")];
        assert_eq!(compress(&columns), "blob|");
        assert_eq!(decompress("blob|"), columns);
    }

    #[test]
    fn missing_type_field_decodes_as_empty() {
        let restored = decompress("orphan");
        assert_eq!(restored, vec![Column::new("orphan", "")]);
    }

    #[test]
    fn separator_in_name_is_not_escaped() {
        let columns = vec![Column::new("a,b", "int")];
        let restored = decompress(&compress(&columns));
        assert_ne!(restored, columns);
        assert_eq!(restored.len(), 2);
    }

    #[test]
    fn cardinality_is_not_carried() {
        let mut column = Column::new("org_id", "uuid");
        column.cardinality = Some("n:1".to_string());
        let restored = decompress(&compress(&[column]));
        assert_eq!(restored[0].cardinality, None);
    }
}
