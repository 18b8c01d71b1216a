use deadpool_postgres::Config as PgConfig;
use tokio_postgres::NoTls;

use crate::error::SqlDbError;
use crate::pool::{ConfigAndPool, MiddlewarePool};
use crate::types::DatabaseType;

impl ConfigAndPool {
    /// Asynchronous initializer for `ConfigAndPool` with Postgres
    ///
    /// # Errors
    /// Returns `SqlDbError::ConfigError` if required config fields are missing or
    /// `SqlDbError::ConnectionError` if pool creation fails.
    #[allow(clippy::unused_async)]
    pub async fn new_postgres(pg_config: PgConfig) -> Result<Self, SqlDbError> {
        // Validate all required config fields are present
        if pg_config.dbname.is_none() {
            return Err(SqlDbError::ConfigError("dbname is required".to_string()));
        }
        if pg_config.host.is_none() {
            return Err(SqlDbError::ConfigError("host is required".to_string()));
        }
        if pg_config.port.is_none() {
            return Err(SqlDbError::ConfigError("port is required".to_string()));
        }
        if pg_config.user.is_none() {
            return Err(SqlDbError::ConfigError("user is required".to_string()));
        }
        if pg_config.password.is_none() {
            return Err(SqlDbError::ConfigError("password is required".to_string()));
        }

        let pg_pool = pg_config
            .create_pool(Some(deadpool_postgres::Runtime::Tokio1), NoTls)
            .map_err(|e| {
                SqlDbError::ConnectionError(format!("Failed to create Postgres pool: {e}"))
            })?;

        Ok(ConfigAndPool {
            pool: MiddlewarePool::Postgres(pg_pool),
            db_type: DatabaseType::Postgres,
        })
    }
}
