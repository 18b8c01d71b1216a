// PostgreSQL module - provides the PostgreSQL cursor adapter
//
// This module is split into several sub-modules for better organization:
// - config: Connection configuration and pool setup
// - query: Row extraction into raw cursor values
// - executor: The `CursorAdapter` implementation over a deadpool pool

pub mod config;
pub mod executor;
pub mod query;

// Re-export the public API
pub use executor::PostgresAdapter;
pub use query::{build_cursor, postgres_extract_value};
