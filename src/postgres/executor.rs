use async_trait::async_trait;
use deadpool_postgres::Pool;

use super::query::build_cursor;
use crate::cursor::{CursorAdapter, InsertIdStrategy, RowCursor, first_id};
use crate::error::SqlDbError;

/// `CursorAdapter` over a deadpool-postgres pool. Each call checks out a client for
/// its own duration.
#[derive(Clone)]
pub struct PostgresAdapter {
    pool: Pool,
}

impl PostgresAdapter {
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

impl std::fmt::Debug for PostgresAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresAdapter")
            .field("status", &self.pool.status())
            .finish()
    }
}

#[async_trait]
impl CursorAdapter for PostgresAdapter {
    async fn execute(&self, sql: &str) -> Result<RowCursor, SqlDbError> {
        let client = self.pool.get().await?;
        let stmt = client.prepare(sql).await?;
        let rows = client.query(&stmt, &[]).await?;
        build_cursor(&stmt, &rows)
    }

    async fn execute_dml(&self, sql: &str) -> Result<u64, SqlDbError> {
        let client = self.pool.get().await?;
        Ok(client.execute(sql, &[]).await?)
    }

    async fn insert_returning_id(
        &self,
        sql: &str,
        strategy: InsertIdStrategy,
    ) -> Result<i64, SqlDbError> {
        if strategy != InsertIdStrategy::Returning {
            tracing::warn!(?strategy, "postgres reports insert ids through RETURNING");
        }
        first_id(self.execute(sql).await?)
    }
}
