use async_trait::async_trait;
use deadpool_tiberius::Pool;

use super::query::build_cursor;
use crate::cursor::{CursorAdapter, InsertIdStrategy, RowCursor, first_id};
use crate::error::SqlDbError;

/// `CursorAdapter` over a deadpool-tiberius pool.
#[derive(Clone)]
pub struct MssqlAdapter {
    pool: Pool,
}

impl MssqlAdapter {
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

fn checkout_error(e: impl std::fmt::Display) -> SqlDbError {
    SqlDbError::ConnectionError(format!("Failed to get SQL Server connection: {e}"))
}

// Manual Debug implementation because deadpool_tiberius::Manager doesn't implement Debug
impl std::fmt::Debug for MssqlAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MssqlAdapter")
            .field("pool", &"<TiberiusPool>")
            .finish()
    }
}

#[async_trait]
impl CursorAdapter for MssqlAdapter {
    async fn execute(&self, sql: &str) -> Result<RowCursor, SqlDbError> {
        let mut conn = self.pool.get().await.map_err(checkout_error)?;
        let stream = conn.simple_query(sql).await?;
        build_cursor(stream).await
    }

    async fn execute_dml(&self, sql: &str) -> Result<u64, SqlDbError> {
        let mut conn = self.pool.get().await.map_err(checkout_error)?;
        let result = conn.execute(sql, &[]).await?;
        Ok(result.total())
    }

    async fn insert_returning_id(
        &self,
        sql: &str,
        strategy: InsertIdStrategy,
    ) -> Result<i64, SqlDbError> {
        if strategy != InsertIdStrategy::OutputInserted {
            tracing::warn!(?strategy, "sql server reports insert ids through OUTPUT INSERTED");
        }
        first_id(self.execute(sql).await?)
    }
}
