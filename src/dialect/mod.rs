// Dialect module - one capability object per engine
//
// Everything that differs between engines when building SQL text lives here:
// - postgres: `PostgreSQL`
// - mysql: `MySQL` / `MariaDB`
// - mssql: SQL Server

pub mod mssql;
pub mod mysql;
pub mod postgres;

use std::fmt;

use crate::conversion::CoercionPolicy;
use crate::cursor::InsertIdStrategy;
use crate::identifier::split_qualified;
use crate::schema::ColumnType;
use crate::types::DatabaseType;

pub use mssql::MssqlDialect;
pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;

/// Engine-specific SQL generation.
///
/// Identifiers passed in have already been validated; literal text is escaped
/// only through [`Dialect::quote_literal`].
pub trait Dialect: Send + Sync + fmt::Debug {
    fn engine(&self) -> DatabaseType;

    /// How values coming back from this engine's driver are decoded.
    fn coercion_policy(&self) -> CoercionPolicy;

    /// Query returning one `name` column per base table.
    fn list_tables_sql(&self) -> &'static str;

    /// Query returning one `name` column per sequence, when the engine has sequences.
    fn list_sequences_sql(&self) -> Option<&'static str>;

    /// Query returning `name`, `type` and `comment` per column of `table`, in ordinal order.
    ///
    /// A `schema.table` name is looked up in that schema, a bare name in the session's
    /// current one.
    fn introspect_columns_sql(&self, table: &str) -> String;

    /// Render `value` as an escaped string literal.
    fn quote_literal(&self, value: &str) -> String;

    fn render_bool(&self, value: bool) -> &'static str {
        if value { "true" } else { "false" }
    }

    /// Column type used for a column named `id`.
    fn primary_key_definition(&self) -> &'static str {
        "SERIAL PRIMARY KEY"
    }

    /// `<name> <type>` fragment of a CREATE TABLE or ADD COLUMN.
    fn column_definition(&self, name: &str, column_type: &ColumnType) -> String {
        format!("{name} {}", column_type.native)
    }

    /// Separate statement attaching `comment` to a column, for engines without inline comments.
    fn comment_statement(&self, table: &str, column: &str, comment: &str) -> Option<String>;

    /// Statement dropping the table's companion sequence, if the engine has sequences.
    fn drop_sequence_sql(&self, table: &str) -> Option<String> {
        Some(match split_qualified(table) {
            (Some(schema), bare) => format!("DROP SEQUENCE IF EXISTS {schema}.sq_{bare}"),
            (None, bare) => format!("DROP SEQUENCE IF EXISTS sq_{bare}"),
        })
    }

    fn insert_id_strategy(&self) -> InsertIdStrategy;

    /// INSERT statement that reports the generated id per [`Dialect::insert_id_strategy`].
    fn insert_sql(&self, table: &str, columns: &[&str], values: &[String]) -> String;
}

static POSTGRES: PostgresDialect = PostgresDialect;
static MYSQL: MysqlDialect = MysqlDialect;
static MSSQL: MssqlDialect = MssqlDialect;

/// The dialect for an engine.
#[must_use]
pub fn dialect_for(engine: DatabaseType) -> &'static dyn Dialect {
    match engine {
        DatabaseType::Postgres => &POSTGRES,
        DatabaseType::Mysql => &MYSQL,
        DatabaseType::Sqlserver => &MSSQL,
    }
}

pub(crate) fn column_list(columns: &[&str], values: &[String]) -> (String, String) {
    (columns.join(", "), values.join(", "))
}
