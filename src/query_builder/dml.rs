use crate::dialect::Dialect;
use crate::error::SqlDbError;
use crate::identifier::validate_identifier;
use crate::results::AssocRow;
use crate::schema::TableSchema;

use super::format_for_sql;

/// Format every field of `record` against the live column types, skipping `id` when asked.
fn typed_fields<'r>(
    dialect: &dyn Dialect,
    schema: &TableSchema,
    record: &'r AssocRow,
    skip_id: bool,
) -> Result<Vec<(&'r str, String)>, SqlDbError> {
    let mut fields = Vec::with_capacity(record.len());
    for (column, value) in record.iter() {
        if skip_id && column == "id" {
            continue;
        }
        validate_identifier(column)?;
        let column_type = schema.get(column).ok_or_else(|| {
            SqlDbError::ParameterError(format!(
                "column `{column}` does not exist in table `{}`",
                schema.name
            ))
        })?;
        fields.push((
            column.as_str(),
            format_for_sql(dialect, &column_type.native, value),
        ));
    }
    Ok(fields)
}

fn record_id(record: &AssocRow) -> Result<i64, SqlDbError> {
    record.id().ok_or(SqlDbError::MissingId)
}

/// INSERT for one record, reporting the generated id the dialect's way.
///
/// # Errors
/// Returns `SqlDbError::ParameterError` when the record names a column the table does
/// not have, or `SqlDbError::InvalidIdentifier` for a bad name.
pub fn insert_statement(
    dialect: &dyn Dialect,
    schema: &TableSchema,
    record: &AssocRow,
) -> Result<String, SqlDbError> {
    let table = validate_identifier(&schema.name)?;
    let fields = typed_fields(dialect, schema, record, false)?;
    let (columns, values): (Vec<&str>, Vec<String>) = fields.into_iter().unzip();
    Ok(dialect.insert_sql(table, &columns, &values))
}

/// UPDATE scoped to the record's `id`; `id` itself is never assigned.
///
/// # Errors
/// Returns `SqlDbError::MissingId` without an integer `id`, and
/// `SqlDbError::ParameterError` for unknown columns or when nothing is left to assign.
pub fn update_statement(
    dialect: &dyn Dialect,
    schema: &TableSchema,
    record: &AssocRow,
) -> Result<String, SqlDbError> {
    let table = validate_identifier(&schema.name)?;
    let id = record_id(record)?;
    let fields = typed_fields(dialect, schema, record, true)?;
    if fields.is_empty() {
        return Err(SqlDbError::ParameterError(format!(
            "update of `{table}` id {id} has no columns to set"
        )));
    }
    let assignments = fields
        .iter()
        .map(|(column, value)| format!("{column} = {value}"))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("UPDATE {table} SET {assignments} WHERE id = {id}"))
}

/// DELETE of the row matching the record's `id`.
///
/// # Errors
/// Returns `SqlDbError::MissingId` without an integer `id`.
pub fn delete_statement(table: &str, record: &AssocRow) -> Result<String, SqlDbError> {
    let table = validate_identifier(table)?;
    let id = record_id(record)?;
    Ok(format!("DELETE FROM {table} WHERE id = {id}"))
}

/// DELETE with a caller-supplied predicate, used verbatim.
///
/// # Errors
/// Returns `SqlDbError::ParameterError` for a blank predicate.
pub fn delete_where_statement(table: &str, predicate: &str) -> Result<String, SqlDbError> {
    let table = validate_identifier(table)?;
    if predicate.trim().is_empty() {
        return Err(SqlDbError::ParameterError(
            "delete predicate is empty".to_string(),
        ));
    }
    Ok(format!("DELETE FROM {table} WHERE {predicate}"))
}
