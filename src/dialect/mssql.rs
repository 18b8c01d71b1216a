use crate::conversion::CoercionPolicy;
use crate::cursor::InsertIdStrategy;
use crate::identifier::split_qualified;
use crate::types::DatabaseType;

use super::{Dialect, column_list};

#[derive(Debug, Clone, Copy, Default)]
pub struct MssqlDialect;

impl MssqlDialect {
    /// Schema expression for a possibly qualified table; bare names use the caller's
    /// default schema.
    fn schema_of(&self, schema: Option<&str>) -> String {
        schema.map_or_else(|| "SCHEMA_NAME()".to_string(), |s| self.quote_literal(s))
    }
}

impl Dialect for MssqlDialect {
    fn engine(&self) -> DatabaseType {
        DatabaseType::Sqlserver
    }

    fn coercion_policy(&self) -> CoercionPolicy {
        CoercionPolicy::Reparse
    }

    fn list_tables_sql(&self) -> &'static str {
        "SELECT TABLE_NAME AS name FROM INFORMATION_SCHEMA.TABLES \
         WHERE TABLE_SCHEMA = SCHEMA_NAME() AND TABLE_TYPE = 'BASE TABLE' \
         ORDER BY TABLE_NAME"
    }

    fn list_sequences_sql(&self) -> Option<&'static str> {
        Some("SELECT name FROM sys.sequences WHERE schema_id = SCHEMA_ID() ORDER BY name")
    }

    fn introspect_columns_sql(&self, table: &str) -> String {
        let (schema, table) = split_qualified(table);
        format!(
            "SELECT c.COLUMN_NAME AS name, \
             c.DATA_TYPE + COALESCE('(' + CASE WHEN c.CHARACTER_MAXIMUM_LENGTH = -1 THEN 'max' \
             ELSE CAST(c.CHARACTER_MAXIMUM_LENGTH AS VARCHAR(10)) END + ')', '') AS type, \
             CAST(ep.value AS NVARCHAR(4000)) AS comment \
             FROM INFORMATION_SCHEMA.COLUMNS c \
             LEFT JOIN sys.extended_properties ep \
             ON ep.major_id = OBJECT_ID(QUOTENAME(c.TABLE_SCHEMA) + '.' + QUOTENAME(c.TABLE_NAME)) \
             AND ep.minor_id = COLUMNPROPERTY(ep.major_id, c.COLUMN_NAME, 'ColumnId') \
             AND ep.name = 'MS_Description' \
             WHERE c.TABLE_SCHEMA = {} AND c.TABLE_NAME = {} \
             ORDER BY c.ORDINAL_POSITION",
            self.schema_of(schema),
            self.quote_literal(table)
        )
    }

    fn quote_literal(&self, value: &str) -> String {
        format!("N'{}'", value.replace('\'', "''"))
    }

    fn render_bool(&self, value: bool) -> &'static str {
        if value { "1" } else { "0" }
    }

    fn primary_key_definition(&self) -> &'static str {
        "INT IDENTITY(1,1) PRIMARY KEY"
    }

    fn comment_statement(&self, table: &str, column: &str, comment: &str) -> Option<String> {
        // sp_addextendedproperty takes no function calls as arguments.
        let (schema, table) = split_qualified(table);
        Some(format!(
            "DECLARE @schema sysname = {}; \
             EXEC sp_addextendedproperty @name = N'MS_Description', @value = {}, \
             @level0type = N'SCHEMA', @level0name = @schema, \
             @level1type = N'TABLE', @level1name = {}, \
             @level2type = N'COLUMN', @level2name = {}",
            self.schema_of(schema),
            self.quote_literal(comment),
            self.quote_literal(table),
            self.quote_literal(column)
        ))
    }

    fn insert_id_strategy(&self) -> InsertIdStrategy {
        InsertIdStrategy::OutputInserted
    }

    fn insert_sql(&self, table: &str, columns: &[&str], values: &[String]) -> String {
        if columns.is_empty() {
            return format!("INSERT INTO {table} OUTPUT INSERTED.id DEFAULT VALUES");
        }
        let (columns, values) = column_list(columns, values);
        format!("INSERT INTO {table} ({columns}) OUTPUT INSERTED.id VALUES ({values})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn national_literals() {
        assert_eq!(MssqlDialect.quote_literal("it's"), "N'it''s'");
        assert_eq!(MssqlDialect.quote_literal(r"a\b"), r"N'a\b'");
    }

    #[test]
    fn extended_property_comment() {
        let sql = MssqlDialect
            .comment_statement("items", "name", "Item name")
            .unwrap();
        assert!(sql.starts_with("DECLARE @schema sysname = SCHEMA_NAME(); EXEC"));
        assert!(sql.contains("sp_addextendedproperty @name = N'MS_Description'"));
        assert!(sql.contains("@value = N'Item name'"));
        assert!(sql.contains("@level0name = @schema"));
        assert!(sql.contains("@level1name = N'items'"));
        assert!(sql.contains("@level2name = N'name'"));
    }

    #[test]
    fn listing_and_introspection_share_the_default_schema() {
        assert!(
            MssqlDialect
                .list_tables_sql()
                .contains("TABLE_SCHEMA = SCHEMA_NAME()")
        );
        let sql = MssqlDialect.introspect_columns_sql("items");
        assert!(sql.contains("WHERE c.TABLE_SCHEMA = SCHEMA_NAME() AND c.TABLE_NAME = N'items'"));
        let sql = MssqlDialect.introspect_columns_sql("sales.items");
        assert!(sql.contains("WHERE c.TABLE_SCHEMA = N'sales' AND c.TABLE_NAME = N'items'"));
        let sql = MssqlDialect
            .comment_statement("sales.items", "name", "x")
            .unwrap();
        assert!(sql.starts_with("DECLARE @schema sysname = N'sales';"));
        assert!(sql.contains("@level1name = N'items'"));
    }

    #[test]
    fn insert_outputs_identity() {
        assert_eq!(
            MssqlDialect.insert_sql("items", &["qty"], &["5".into()]),
            "INSERT INTO items (qty) OUTPUT INSERTED.id VALUES (5)"
        );
        assert_eq!(MssqlDialect.render_bool(true), "1");
    }
}
