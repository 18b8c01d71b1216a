use crate::conversion::CoercionPolicy;
use crate::cursor::InsertIdStrategy;
use crate::identifier::split_qualified;
use crate::types::DatabaseType;

use super::{Dialect, column_list};

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn engine(&self) -> DatabaseType {
        DatabaseType::Postgres
    }

    fn coercion_policy(&self) -> CoercionPolicy {
        CoercionPolicy::Passthrough
    }

    fn list_tables_sql(&self) -> &'static str {
        "SELECT table_name::varchar AS name FROM information_schema.tables \
         WHERE table_schema = current_schema() AND table_type = 'BASE TABLE' \
         ORDER BY table_name"
    }

    fn list_sequences_sql(&self) -> Option<&'static str> {
        Some(
            "SELECT sequence_name::varchar AS name FROM information_schema.sequences \
             WHERE sequence_schema = current_schema() ORDER BY sequence_name",
        )
    }

    // col_description is resolved per row so a missing table yields no rows instead of a
    // regclass cast error.
    fn introspect_columns_sql(&self, table: &str) -> String {
        let (schema, table) = split_qualified(table);
        let schema = schema.map_or_else(
            || "current_schema()".to_string(),
            |s| self.quote_literal(s),
        );
        format!(
            "SELECT column_name::varchar AS name, \
             REPLACE(REPLACE(data_type::varchar, 'character varying', 'varchar'), 'character', 'char') \
             || COALESCE('(' || character_maximum_length || ')', '') AS type, \
             col_description((quote_ident(table_schema) || '.' || quote_ident(table_name))::regclass, \
             ordinal_position::int)::varchar AS comment \
             FROM information_schema.columns \
             WHERE table_schema = {schema} AND table_name = {} \
             ORDER BY ordinal_position",
            self.quote_literal(table)
        )
    }

    fn quote_literal(&self, value: &str) -> String {
        let doubled = value.replace('\'', "''");
        if doubled.contains('\\') {
            format!(" E'{}'", doubled.replace('\\', "\\\\"))
        } else {
            format!("'{doubled}'")
        }
    }

    fn comment_statement(&self, table: &str, column: &str, comment: &str) -> Option<String> {
        Some(format!(
            "COMMENT ON COLUMN {table}.{column} IS {}",
            self.quote_literal(comment)
        ))
    }

    fn insert_id_strategy(&self) -> InsertIdStrategy {
        InsertIdStrategy::Returning
    }

    fn insert_sql(&self, table: &str, columns: &[&str], values: &[String]) -> String {
        if columns.is_empty() {
            return format!("INSERT INTO {table} DEFAULT VALUES RETURNING id");
        }
        let (columns, values) = column_list(columns, values);
        format!("INSERT INTO {table} ({columns}) VALUES ({values}) RETURNING id")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quote_literal_matches_pq() {
        let d = PostgresDialect;
        assert_eq!(d.quote_literal("abc"), "'abc'");
        assert_eq!(d.quote_literal("it's"), "'it''s'");
        assert_eq!(d.quote_literal(""), "''");
        assert_eq!(d.quote_literal(r"a\b"), r" E'a\\b'");
    }

    #[test]
    fn insert_returns_id() {
        let d = PostgresDialect;
        assert_eq!(
            d.insert_sql("items", &["name", "qty"], &["'widget'".into(), "5".into()]),
            "INSERT INTO items (name, qty) VALUES ('widget', 5) RETURNING id"
        );
        assert_eq!(
            d.insert_sql("items", &[], &[]),
            "INSERT INTO items DEFAULT VALUES RETURNING id"
        );
    }

    #[test]
    fn qualified_tables_are_looked_up_in_their_schema() {
        let d = PostgresDialect;
        let sql = d.introspect_columns_sql("audit.items");
        assert!(sql.contains("WHERE table_schema = 'audit' AND table_name = 'items'"));
        let sql = d.introspect_columns_sql("items");
        assert!(sql.contains("WHERE table_schema = current_schema() AND table_name = 'items'"));
        assert_eq!(
            d.drop_sequence_sql("audit.items").as_deref(),
            Some("DROP SEQUENCE IF EXISTS audit.sq_items")
        );
    }

    #[test]
    fn comments_are_separate_statements() {
        let d = PostgresDialect;
        assert_eq!(
            d.comment_statement("items", "name", "Item's name").as_deref(),
            Some("COMMENT ON COLUMN items.name IS 'Item''s name'")
        );
        assert_eq!(
            d.drop_sequence_sql("items").as_deref(),
            Some("DROP SEQUENCE IF EXISTS sq_items")
        );
    }
}
