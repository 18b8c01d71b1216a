use crate::results::AssocRow;

use super::{ColumnDef, ColumnType, TableSchema};

/// Build a descriptor from the `name`/`type`/`comment` rows of a metadata query.
///
/// NULL or blank comments leave the type without a comment. No rows gives an
/// empty column set.
#[must_use]
pub fn schema_from_rows(table: &str, rows: &[AssocRow]) -> TableSchema {
    let mut schema = TableSchema::new(table);
    for row in rows {
        let name = row.get_string("name");
        if name.is_empty() {
            continue;
        }
        let comment = row.get_string("comment");
        schema.push(ColumnDef {
            name,
            column_type: ColumnType::new(row.get_string("type"), Some(comment.as_str())),
        });
    }
    schema
}

/// The `name` column of each row, rendered as text.
#[must_use]
pub fn names_from_rows(rows: &[AssocRow]) -> Vec<String> {
    rows.iter()
        .filter_map(|row| row.get("name").map(ToString::to_string))
        .collect()
}
