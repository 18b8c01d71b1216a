//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::cursor::{CursorAdapter, InsertIdStrategy, RawValue, RowCursor};
pub use crate::db::{Db, SchemaReport, Table};
pub use crate::dialect::{Dialect, dialect_for};
pub use crate::error::SqlDbError;
pub use crate::query_builder::{build_select, format_for_sql, quote};
pub use crate::results::{AssocRow, Rows};
pub use crate::schema::{ColumnDef, ColumnType, Link, TableSchema};
pub use crate::types::{DatabaseType, RowValues};

#[cfg(any(feature = "postgres", feature = "mysql", feature = "mssql"))]
pub use crate::pool::{ConfigAndPool, MiddlewarePool};

#[cfg(feature = "postgres")]
pub use crate::exports::{PgConfig, PostgresAdapter};

#[cfg(feature = "mysql")]
pub use crate::exports::{MysqlAdapter, MysqlOptions};

#[cfg(feature = "mssql")]
pub use crate::exports::{MssqlAdapter, MssqlOptions};
