// Query builder module - renders values and records into SQL text
//
// - dml: INSERT / UPDATE / DELETE from a live table descriptor and a record
// - select: SELECT with optional restriction and ordering
//
// There is no parameter binding; every value is serialized here.

pub mod dml;
pub mod select;

use std::sync::LazyLock;

use regex::Regex;

use crate::dialect::Dialect;
use crate::types::RowValues;

pub use dml::{delete_statement, delete_where_statement, insert_statement, update_statement};
pub use select::build_select;

static NUMERIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$")
        .unwrap_or_else(|e| panic!("numeric pattern is invalid: {e}"))
});

const QUOTED_TYPE_MARKERS: [&str; 4] = ["char", "text", "date", "timestamp"];

/// Render one value for a column of the given native type.
///
/// - NULL is `NULL`.
/// - An empty rendering is `NULL` unless the type is a `char` type.
/// - `char`, `text`, `date` and `timestamp` types get a quoted literal.
/// - Anything else is written as is, except text that is not a plain number,
///   which is quoted so it cannot change the statement.
///
/// Quoted text for a numeric column is converted by the engine, not rejected here:
/// `PostgreSQL` and strict-mode `MySQL` fail the statement, but non-strict `MySQL`
/// truncates `'12abc'` to `12` with only a warning.
#[must_use]
pub fn format_for_sql(dialect: &dyn Dialect, native_type: &str, value: &RowValues) -> String {
    if value.is_null() {
        return "NULL".to_string();
    }
    let lower = native_type.to_ascii_lowercase();
    let text = value.to_string();
    if !lower.contains("char") && text.is_empty() {
        return "NULL".to_string();
    }
    if QUOTED_TYPE_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return dialect.quote_literal(&text);
    }
    match value {
        RowValues::Bool(b) => dialect.render_bool(*b).to_string(),
        RowValues::Text(s) if !NUMERIC.is_match(s.trim()) => dialect.quote_literal(s),
        _ => text,
    }
}

/// Quote a string with the `PostgreSQL` literal rules.
#[must_use]
pub fn quote(value: &str) -> String {
    crate::dialect::PostgresDialect.quote_literal(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MssqlDialect, MysqlDialect, PostgresDialect};

    #[test]
    fn empty_value_law() {
        let pg = PostgresDialect;
        let empty = RowValues::Text(String::new());
        assert_eq!(format_for_sql(&pg, "integer", &empty), "NULL");
        assert_eq!(format_for_sql(&pg, "varchar(10)", &empty), "''");
        assert_eq!(format_for_sql(&pg, "timestamp", &empty), "NULL");
        assert_eq!(format_for_sql(&pg, "integer", &RowValues::Null), "NULL");
        assert_eq!(format_for_sql(&pg, "varchar(10)", &RowValues::Null), "NULL");
    }

    #[test]
    fn quoted_types() {
        let pg = PostgresDialect;
        let v = RowValues::Text("O'Brien".into());
        assert_eq!(format_for_sql(&pg, "varchar(50)", &v), "'O''Brien'");
        assert_eq!(format_for_sql(&pg, "TEXT", &v), "'O''Brien'");
        assert_eq!(
            format_for_sql(&pg, "date", &RowValues::Text("2024-05-01".into())),
            "'2024-05-01'"
        );
        assert_eq!(
            format_for_sql(&MssqlDialect, "nvarchar(20)", &RowValues::Int(7)),
            "N'7'"
        );
    }

    #[test]
    fn unquoted_types() {
        let pg = PostgresDialect;
        assert_eq!(format_for_sql(&pg, "integer", &RowValues::Int(5)), "5");
        assert_eq!(
            format_for_sql(&pg, "integer", &RowValues::Text("12".into())),
            "12"
        );
        assert_eq!(format_for_sql(&pg, "real", &RowValues::Float(1.25)), "1.25");
        assert_eq!(format_for_sql(&pg, "boolean", &RowValues::Bool(true)), "true");
        assert_eq!(
            format_for_sql(&MssqlDialect, "bit", &RowValues::Bool(true)),
            "1"
        );
    }

    #[test]
    fn non_numeric_text_is_never_raw() {
        let v = RowValues::Text("0; DROP TABLE items".into());
        assert_eq!(
            format_for_sql(&PostgresDialect, "integer", &v),
            "'0; DROP TABLE items'"
        );
        assert_eq!(
            format_for_sql(&MysqlDialect, "int", &RowValues::Text(r"1\".into())),
            r"'1\\'"
        );
        // Left for the engine to accept or reject.
        assert_eq!(
            format_for_sql(&MysqlDialect, "int", &RowValues::Text("12abc".into())),
            "'12abc'"
        );
        assert_eq!(
            format_for_sql(&MysqlDialect, "int", &RowValues::Text(" 12 ".into())),
            " 12 "
        );
    }

    #[test]
    fn quote_helper() {
        assert_eq!(quote("a'b"), "'a''b'");
    }
}
