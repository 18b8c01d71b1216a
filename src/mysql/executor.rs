use async_trait::async_trait;
use mysql_async::prelude::Queryable;
use mysql_async::{Conn, Pool, Row};

use super::query::build_cursor;
use crate::cursor::{CursorAdapter, InsertIdStrategy, RowCursor};
use crate::error::SqlDbError;

/// `CursorAdapter` over a `mysql_async` pool, using the text protocol.
#[derive(Debug, Clone)]
pub struct MysqlAdapter {
    pool: Pool,
}

impl MysqlAdapter {
    #[must_use]
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    async fn checkout(&self) -> Result<Conn, SqlDbError> {
        Ok(self.pool.get_conn().await?)
    }
}

#[async_trait]
impl CursorAdapter for MysqlAdapter {
    async fn execute(&self, sql: &str) -> Result<RowCursor, SqlDbError> {
        let mut conn = self.checkout().await?;
        let mut result = conn.query_iter(sql).await?;
        let columns = result.columns();
        let rows: Vec<Row> = result.collect().await?;
        result.drop_result().await?;
        Ok(build_cursor(columns.as_deref().unwrap_or_default(), &rows))
    }

    async fn execute_dml(&self, sql: &str) -> Result<u64, SqlDbError> {
        let mut conn = self.checkout().await?;
        conn.query_drop(sql).await?;
        Ok(conn.affected_rows())
    }

    async fn insert_returning_id(
        &self,
        sql: &str,
        strategy: InsertIdStrategy,
    ) -> Result<i64, SqlDbError> {
        if strategy != InsertIdStrategy::LastInsertId {
            tracing::warn!(?strategy, "mysql reports insert ids through LAST_INSERT_ID");
        }
        // Same connection for the insert and the id lookup.
        let mut conn = self.checkout().await?;
        conn.query_drop(sql).await?;
        let id = conn.last_insert_id().ok_or_else(|| {
            SqlDbError::ExecutionError("insert produced no auto-increment id".to_string())
        })?;
        i64::try_from(id)
            .map_err(|e| SqlDbError::ExecutionError(format!("insert id {id} out of range: {e}")))
    }
}
