use crate::conversion::CoercionPolicy;
use crate::cursor::InsertIdStrategy;
use crate::identifier::split_qualified;
use crate::schema::ColumnType;
use crate::types::DatabaseType;

use super::{Dialect, column_list};

#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlDialect;

impl Dialect for MysqlDialect {
    fn engine(&self) -> DatabaseType {
        DatabaseType::Mysql
    }

    fn coercion_policy(&self) -> CoercionPolicy {
        CoercionPolicy::Reparse
    }

    fn list_tables_sql(&self) -> &'static str {
        "SELECT TABLE_NAME AS name FROM information_schema.TABLES \
         WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE' \
         ORDER BY TABLE_NAME"
    }

    fn list_sequences_sql(&self) -> Option<&'static str> {
        None
    }

    fn introspect_columns_sql(&self, table: &str) -> String {
        let (schema, table) = split_qualified(table);
        let schema = schema.map_or_else(
            || "DATABASE()".to_string(),
            |s| self.quote_literal(s),
        );
        format!(
            "SELECT COLUMN_NAME AS name, \
             CONCAT(DATA_TYPE, COALESCE(CONCAT('(', CHARACTER_MAXIMUM_LENGTH, ')'), '')) AS type, \
             COLUMN_COMMENT AS comment \
             FROM information_schema.COLUMNS \
             WHERE TABLE_SCHEMA = {schema} AND TABLE_NAME = {} \
             ORDER BY ORDINAL_POSITION",
            self.quote_literal(table)
        )
    }

    fn quote_literal(&self, value: &str) -> String {
        format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
    }

    fn column_definition(&self, name: &str, column_type: &ColumnType) -> String {
        match column_type.comment() {
            Some(comment) => format!(
                "{name} {} COMMENT {}",
                column_type.native,
                self.quote_literal(comment)
            ),
            None => format!("{name} {}", column_type.native),
        }
    }

    fn comment_statement(&self, _table: &str, _column: &str, _comment: &str) -> Option<String> {
        None
    }

    // MySQL has no sequences to clean up after a drop.
    fn drop_sequence_sql(&self, _table: &str) -> Option<String> {
        None
    }

    fn insert_id_strategy(&self) -> InsertIdStrategy {
        InsertIdStrategy::LastInsertId
    }

    fn insert_sql(&self, table: &str, columns: &[&str], values: &[String]) -> String {
        let (columns, values) = column_list(columns, values);
        format!("INSERT INTO {table} ({columns}) VALUES ({values})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_literal_escapes_backslash_and_quote() {
        let d = MysqlDialect;
        assert_eq!(d.quote_literal("it's"), "'it''s'");
        assert_eq!(d.quote_literal(r"C:\tmp"), r"'C:\\tmp'");
    }

    #[test]
    fn comments_are_inline() {
        let d = MysqlDialect;
        let ct = ColumnType::parse("varchar(50)|The name");
        assert_eq!(
            d.column_definition("name", &ct),
            "name varchar(50) COMMENT 'The name'"
        );
        assert!(d.comment_statement("items", "name", "x").is_none());
        assert!(d.drop_sequence_sql("items").is_none());
    }

    #[test]
    fn qualified_tables_use_their_database() {
        let sql = MysqlDialect.introspect_columns_sql("shop.items");
        assert!(sql.contains("WHERE TABLE_SCHEMA = 'shop' AND TABLE_NAME = 'items'"));
        let sql = MysqlDialect.introspect_columns_sql("items");
        assert!(sql.contains("WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = 'items'"));
    }

    #[test]
    fn insert_has_no_returning_clause() {
        assert_eq!(
            MysqlDialect.insert_sql("items", &["qty"], &["5".into()]),
            "INSERT INTO items (qty) VALUES (5)"
        );
        assert_eq!(
            MysqlDialect.insert_sql("items", &[], &[]),
            "INSERT INTO items () VALUES ()"
        );
    }
}
