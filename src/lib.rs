//! Driver-agnostic data access over `PostgreSQL`, `MySQL` and SQL Server.
//!
//! A [`Db`] pairs an engine [`Dialect`] with a [`CursorAdapter`]. Queries come back as
//! ordered [`AssocRow`]s with engine values coerced into [`RowValues`]; tables are
//! described by [`TableSchema`] descriptors (`"type|comment"` per column) that drive
//! DDL, a JSON schema file, and INSERT/UPDATE/DELETE of plain records.

pub mod conversion;
pub mod cursor;
pub mod db;
pub mod dialect;
pub mod error;
pub mod exports;
pub mod identifier;
pub mod prelude;
pub mod query_builder;
pub mod results;
pub mod schema;
pub mod types;

#[cfg(any(feature = "postgres", feature = "mysql", feature = "mssql"))]
pub mod pool;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "mysql")]
pub mod mysql;

#[cfg(feature = "mssql")]
pub mod mssql;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use conversion::{CoercionPolicy, coerce};
pub use cursor::{CursorAdapter, InsertIdStrategy, RawValue, RowCursor};
pub use db::{Db, SchemaReport, Table};
pub use dialect::{Dialect, dialect_for};
pub use error::SqlDbError;
pub use query_builder::{format_for_sql, quote};
pub use results::{AssocRow, Rows};
pub use schema::{ColumnDef, ColumnType, Link, TableSchema};
pub use types::{DatabaseType, RowValues};

#[cfg(any(feature = "postgres", feature = "mysql", feature = "mssql"))]
pub use pool::{ConfigAndPool, MiddlewarePool};
