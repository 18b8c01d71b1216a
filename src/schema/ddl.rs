use crate::dialect::Dialect;
use crate::error::SqlDbError;
use crate::identifier::{validate_identifier, validate_type_token};

use super::{ColumnType, TableSchema};

/// A structural statement plus the per-column comment statements that must follow it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDdl {
    pub statement: String,
    /// `(column, statement)` pairs, run in order after `statement` succeeds.
    pub annotations: Vec<(String, String)>,
}

fn checked_type(column: &str, column_type: &ColumnType) -> Result<ColumnType, SqlDbError> {
    validate_identifier(column)?;
    validate_type_token(&column_type.native)?;
    Ok(column_type.clone())
}

fn annotation(
    dialect: &dyn Dialect,
    table: &str,
    column: &str,
    column_type: &ColumnType,
) -> Option<(String, String)> {
    let comment = column_type.comment()?;
    dialect
        .comment_statement(table, column, comment)
        .map(|sql| (column.to_string(), sql))
}

/// Build `CREATE TABLE` for a descriptor.
///
/// A column named `id` always becomes the engine's auto-incrementing primary key,
/// whatever type the descriptor gives it.
///
/// # Errors
/// Returns `SqlDbError::InvalidIdentifier` for a bad table, column or type token and
/// `SqlDbError::ParameterError` when the descriptor has no columns.
pub fn create_table(dialect: &dyn Dialect, schema: &TableSchema) -> Result<TableDdl, SqlDbError> {
    let table = validate_identifier(&schema.name)?;
    if schema.is_empty() {
        return Err(SqlDbError::ParameterError(format!(
            "table `{table}` has no columns"
        )));
    }

    let mut definitions = Vec::with_capacity(schema.columns.len());
    let mut annotations = Vec::new();
    for column in &schema.columns {
        let mut column_type = checked_type(&column.name, &column.column_type)?;
        if column.name == "id" {
            column_type.native = dialect.primary_key_definition().to_string();
        }
        definitions.push(dialect.column_definition(&column.name, &column_type));
        annotations.extend(annotation(dialect, table, &column.name, &column_type));
    }

    Ok(TableDdl {
        statement: format!("CREATE TABLE {table} ( {} )", definitions.join(", ")),
        annotations,
    })
}

/// `DROP TABLE` followed by the dialect's sequence cleanup, if any.
///
/// # Errors
/// Returns `SqlDbError::InvalidIdentifier` for a bad table name.
pub fn drop_table(dialect: &dyn Dialect, table: &str) -> Result<Vec<String>, SqlDbError> {
    let table = validate_identifier(table)?;
    let mut statements = vec![format!("DROP TABLE {table}")];
    statements.extend(dialect.drop_sequence_sql(table));
    Ok(statements)
}

/// `ALTER TABLE ... ADD` for one column, plus its comment statement when needed.
///
/// # Errors
/// Returns `SqlDbError::InvalidIdentifier` for a bad table, column or type token.
pub fn add_column(
    dialect: &dyn Dialect,
    table: &str,
    column: &str,
    column_type: &ColumnType,
) -> Result<TableDdl, SqlDbError> {
    let table = validate_identifier(table)?;
    let column_type = checked_type(column, column_type)?;
    Ok(TableDdl {
        statement: format!(
            "ALTER TABLE {table} ADD {}",
            dialect.column_definition(column, &column_type)
        ),
        annotations: annotation(dialect, table, column, &column_type)
            .into_iter()
            .collect(),
    })
}

/// `ALTER TABLE ... DROP COLUMN`.
///
/// # Errors
/// Returns `SqlDbError::InvalidIdentifier` for a bad table or column name.
pub fn drop_column(table: &str, column: &str) -> Result<String, SqlDbError> {
    let table = validate_identifier(table)?;
    let column = validate_identifier(column)?;
    Ok(format!("ALTER TABLE {table} DROP COLUMN {column}"))
}
