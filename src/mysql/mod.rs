// MySQL module - provides the MySQL cursor adapter
//
// - config: Connection options and pool setup
// - query: Column type naming and text-protocol value extraction
// - executor: The `CursorAdapter` implementation over a mysql_async pool

pub mod config;
pub mod executor;
pub mod query;

pub use config::{MysqlOptions, MysqlOptionsBuilder};
pub use executor::MysqlAdapter;
pub use query::{build_cursor, mysql_extract_value, mysql_type_name};
