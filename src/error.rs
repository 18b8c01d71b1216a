use thiserror::Error;

#[cfg(feature = "mysql")]
use mysql_async;
#[cfg(feature = "mssql")]
use tiberius;
#[cfg(feature = "postgres")]
use tokio_postgres;

#[derive(Debug, Error)]
pub enum SqlDbError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PoolErrorPostgres(#[from] deadpool_postgres::PoolError),

    #[cfg(feature = "mysql")]
    #[error(transparent)]
    MysqlError(#[from] mysql_async::Error),

    #[cfg(feature = "mssql")]
    #[error(transparent)]
    MssqlError(#[from] tiberius::error::Error),

    /// The engine discriminator named no supported driver.
    #[error("no driver for engine `{0}` (expected postgres, mysql or sqlserver)")]
    NoDriver(String),

    /// A raw column value could not be re-parsed as its declared type.
    #[error("cannot decode column `{column}` as {type_name}: {message}")]
    DecodeError {
        column: String,
        type_name: String,
        message: String,
    },

    /// The table was created but annotating one of its columns failed.
    #[error("table `{table}` created but comment on column `{column}` failed: {source}")]
    PartialDdl {
        table: String,
        column: String,
        #[source]
        source: Box<SqlDbError>,
    },

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("record has no usable integer `id` field")]
    MissingId,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Unimplemented feature: {0}")]
    Unimplemented(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}
