#[cfg(feature = "postgres")]
use deadpool_postgres::Pool as DeadpoolPostgresPool;

#[cfg(feature = "mysql")]
use mysql_async::Pool as MysqlPool;

#[cfg(feature = "mssql")]
use deadpool_tiberius::Pool as TiberiusPool;

/// Connection pool for database access
///
/// This enum wraps the different connection pool types for the
/// supported database engines.
#[derive(Clone)]
pub enum MiddlewarePool {
    /// `PostgreSQL` connection pool
    #[cfg(feature = "postgres")]
    Postgres(DeadpoolPostgresPool),
    /// `MySQL` connection pool
    #[cfg(feature = "mysql")]
    Mysql(MysqlPool),
    /// SQL Server connection pool
    #[cfg(feature = "mssql")]
    Mssql(TiberiusPool),
}

// Manual Debug implementation because deadpool_tiberius::Manager doesn't implement Debug
impl std::fmt::Debug for MiddlewarePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "postgres")]
            Self::Postgres(pool) => f.debug_tuple("Postgres").field(pool).finish(),
            #[cfg(feature = "mysql")]
            Self::Mysql(pool) => f.debug_tuple("Mysql").field(pool).finish(),
            #[cfg(feature = "mssql")]
            Self::Mssql(_) => f.debug_tuple("Mssql").field(&"<TiberiusPool>").finish(),
        }
    }
}
