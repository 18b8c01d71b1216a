use crate::conversion::{CoercionPolicy, coerce};
use crate::cursor::RowCursor;
use crate::error::SqlDbError;

use super::row::{AssocRow, Rows};

/// Drain a cursor into associative rows.
///
/// Column types are looked up once, before the row loop. Any scan or coercion failure
/// aborts the whole decode and discards the rows read so far. The cursor is consumed
/// and therefore released on every path.
///
/// # Errors
/// Returns the first `SqlDbError` raised while scanning or coercing a value.
pub fn decode(mut cursor: RowCursor, policy: CoercionPolicy) -> Result<Rows, SqlDbError> {
    let names = cursor.column_names();
    let types = cursor.column_types();
    let column_types: Vec<(&str, &str)> = names
        .iter()
        .map(|name| {
            let type_name = types.get(name).map_or("", String::as_str);
            (name.as_str(), type_name)
        })
        .collect();

    let mut rows = Rows::new();
    while cursor.advance() {
        let raw = cursor.scan()?;
        let mut row = AssocRow::new();
        for ((name, type_name), value) in column_types.iter().zip(raw) {
            row.insert(*name, coerce(policy, name, type_name, value)?);
        }
        rows.push(row);
    }
    cursor.close();
    Ok(rows)
}
