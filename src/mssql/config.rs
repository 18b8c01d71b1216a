use crate::error::SqlDbError;
use crate::pool::{ConfigAndPool, MiddlewarePool};
use crate::types::DatabaseType;

/// Options for configuring an MSSQL pool.
#[derive(Debug, Clone)]
pub struct MssqlOptions {
    pub server: String,
    pub database: String,
    pub user: String,
    pub password: String,
    pub port: Option<u16>,
    pub instance_name: Option<String>,
}

impl MssqlOptions {
    #[must_use]
    pub fn new(server: String, database: String, user: String, password: String) -> Self {
        Self {
            server,
            database,
            user,
            password,
            port: None,
            instance_name: None,
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    #[must_use]
    pub fn with_instance_name(mut self, instance_name: Option<String>) -> Self {
        self.instance_name = instance_name;
        self
    }
}

/// Fluent builder for MSSQL options.
#[derive(Debug, Clone)]
pub struct MssqlOptionsBuilder {
    opts: MssqlOptions,
}

impl MssqlOptionsBuilder {
    #[must_use]
    pub fn new(server: String, database: String, user: String, password: String) -> Self {
        Self {
            opts: MssqlOptions::new(server, database, user, password),
        }
    }

    #[must_use]
    pub fn port(mut self, port: Option<u16>) -> Self {
        self.opts.port = port;
        self
    }

    #[must_use]
    pub fn instance_name(mut self, instance_name: Option<String>) -> Self {
        self.opts.instance_name = instance_name;
        self
    }

    #[must_use]
    pub fn finish(self) -> MssqlOptions {
        self.opts
    }

    /// Build a `ConfigAndPool` for SQL Server.
    ///
    /// # Errors
    ///
    /// Returns `SqlDbError` if pool creation fails.
    pub async fn build(self) -> Result<ConfigAndPool, SqlDbError> {
        ConfigAndPool::new_mssql(self.finish()).await
    }
}

impl ConfigAndPool {
    #[must_use]
    pub fn mssql_builder(
        server: String,
        database: String,
        user: String,
        password: String,
    ) -> MssqlOptionsBuilder {
        MssqlOptionsBuilder::new(server, database, user, password)
    }

    /// Asynchronous initializer for `ConfigAndPool` with SQL Server (MSSQL).
    ///
    /// Connections are opened lazily on first checkout.
    ///
    /// # Errors
    /// Returns `SqlDbError::ConnectionError` if MSSQL pool creation fails.
    #[allow(clippy::unused_async)]
    pub async fn new_mssql(opts: MssqlOptions) -> Result<Self, SqlDbError> {
        let mut manager = deadpool_tiberius::Manager::new()
            .host(&opts.server)
            .port(opts.port.unwrap_or(1433))
            .basic_authentication(&opts.user, &opts.password)
            .database(&opts.database)
            .trust_cert()
            .max_size(20);
        if let Some(instance) = &opts.instance_name {
            manager = manager.instance_name(instance);
        }

        let pool = manager.create_pool().map_err(|e| {
            SqlDbError::ConnectionError(format!("Failed to create SQL Server pool: {e}"))
        })?;

        Ok(ConfigAndPool {
            pool: MiddlewarePool::Mssql(pool),
            db_type: DatabaseType::Sqlserver,
        })
    }
}
