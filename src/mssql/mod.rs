// MSSQL module - provides the SQL Server cursor adapter
//
// This module is split into several sub-modules for better organization:
// - config: Connection options and pool setup
// - query: Column type naming and row extraction into raw cursor values
// - executor: The `CursorAdapter` implementation over a deadpool pool

pub mod config;
pub mod executor;
pub mod query;

// Re-export the public API
pub use config::{MssqlOptions, MssqlOptionsBuilder};
pub use executor::MssqlAdapter;
pub use query::{build_cursor, mssql_extract_value, mssql_type_name};
