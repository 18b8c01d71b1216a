pub mod types;

use std::sync::Arc;

pub use types::MiddlewarePool;

use crate::db::Db;
use crate::types::DatabaseType;

/// Configuration and connection pool for a database
///
/// This struct holds both the connection pool and the engine it talks to;
/// [`ConfigAndPool::database`] wraps it in a [`Db`] handle.
#[derive(Clone, Debug)]
pub struct ConfigAndPool {
    /// The connection pool
    pub pool: MiddlewarePool,
    /// The database type
    pub db_type: DatabaseType,
}

impl ConfigAndPool {
    /// A `Db` handle backed by this pool's driver adapter.
    #[must_use]
    pub fn database(&self) -> Db {
        match &self.pool {
            #[cfg(feature = "postgres")]
            MiddlewarePool::Postgres(pool) => Db::new(
                DatabaseType::Postgres,
                Arc::new(crate::postgres::PostgresAdapter::new(pool.clone())),
            ),
            #[cfg(feature = "mysql")]
            MiddlewarePool::Mysql(pool) => Db::new(
                DatabaseType::Mysql,
                Arc::new(crate::mysql::MysqlAdapter::new(pool.clone())),
            ),
            #[cfg(feature = "mssql")]
            MiddlewarePool::Mssql(pool) => Db::new(
                DatabaseType::Sqlserver,
                Arc::new(crate::mssql::MssqlAdapter::new(pool.clone())),
            ),
        }
    }
}
