//! Database-specific type exports.
//!
//! This module contains all the conditional feature exports for different
//! database backends, keeping them organized in one place.

// PostgreSQL exports
#[cfg(feature = "postgres")]
pub use crate::postgres::PostgresAdapter;
#[cfg(feature = "postgres")]
pub use crate::postgres::build_cursor as postgres_build_cursor;
#[cfg(feature = "postgres")]
pub use deadpool_postgres::Config as PgConfig;

// MySQL exports
#[cfg(feature = "mysql")]
pub use crate::mysql::MysqlAdapter;
#[cfg(feature = "mysql")]
pub use crate::mysql::MysqlOptions;
#[cfg(feature = "mysql")]
pub use crate::mysql::build_cursor as mysql_build_cursor;

// SQL Server exports
#[cfg(feature = "mssql")]
pub use crate::mssql::MssqlAdapter;
#[cfg(feature = "mssql")]
pub use crate::mssql::MssqlOptions;
#[cfg(feature = "mssql")]
pub use crate::mssql::build_cursor as mssql_build_cursor;
