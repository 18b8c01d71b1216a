use crate::error::SqlDbError;
use crate::identifier::{validate_direction, validate_identifier, validate_select_column};

/// SELECT over one table.
///
/// No columns selects `*`. The restriction is used verbatim as the WHERE clause.
/// The direction applies only when there are sort keys.
///
/// # Errors
/// Returns `SqlDbError::InvalidIdentifier` for a bad table, column, sort key or direction.
pub fn build_select(
    table: &str,
    columns: &[&str],
    restriction: &str,
    sort_keys: &[&str],
    direction: &str,
) -> Result<String, SqlDbError> {
    let table = validate_identifier(table)?;
    let columns = if columns.is_empty() {
        "*".to_string()
    } else {
        columns
            .iter()
            .copied()
            .map(validate_select_column)
            .collect::<Result<Vec<_>, _>>()?
            .join(", ")
    };

    let mut query = format!("SELECT {columns} FROM {table}");
    if !restriction.trim().is_empty() {
        query.push_str(" WHERE ");
        query.push_str(restriction);
    }

    let sort_keys: Vec<&str> = sort_keys.iter().copied().filter(|k| !k.is_empty()).collect();
    let direction = validate_direction(direction)?;
    if !sort_keys.is_empty() {
        for key in &sort_keys {
            validate_identifier(key)?;
        }
        query.push_str(" ORDER BY ");
        query.push_str(&sort_keys.join(", "));
        if !direction.is_empty() {
            query.push(' ');
            query.push_str(direction);
        }
    }
    Ok(query)
}
