//! In-memory `CursorAdapter` that records statements and serves canned results.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::cursor::{CursorAdapter, InsertIdStrategy, RawValue, RowCursor, first_id};
use crate::error::SqlDbError;
use crate::types::RowValues;

#[derive(Debug, Clone)]
enum Reply {
    Rows {
        columns: Vec<(String, String)>,
        rows: Vec<Vec<RawValue>>,
    },
    Fail(String),
}

#[derive(Debug, Default)]
struct State {
    statements: Vec<String>,
    replies: Vec<(String, Reply)>,
}

/// Records every statement it is handed. Row-returning statements are answered
/// by the most recently registered reply whose fragment occurs in the SQL, or an
/// empty cursor when none matches.
#[derive(Debug, Clone, Default)]
pub struct RecordingAdapter {
    state: Arc<Mutex<State>>,
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
    next_id: Arc<AtomicI64>,
}

impl RecordingAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Answer statements containing `fragment` with these columns and rows.
    pub fn respond(
        &self,
        fragment: &str,
        columns: &[(&str, &str)],
        rows: Vec<Vec<RawValue>>,
    ) -> &Self {
        let columns = columns
            .iter()
            .map(|(n, t)| ((*n).to_string(), (*t).to_string()))
            .collect();
        self.lock()
            .replies
            .push((fragment.to_string(), Reply::Rows { columns, rows }));
        self
    }

    /// Fail statements containing `fragment` with an execution error.
    pub fn fail(&self, fragment: &str, message: &str) -> &Self {
        self.lock()
            .replies
            .push((fragment.to_string(), Reply::Fail(message.to_string())));
        self
    }

    /// Every statement seen so far, in order.
    #[must_use]
    pub fn statements(&self) -> Vec<String> {
        self.lock().statements.clone()
    }

    /// Forget recorded statements; registered replies stay.
    pub fn clear(&self) {
        self.lock().statements.clear();
    }

    #[must_use]
    pub fn cursors_opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn cursors_closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    fn record(&self, sql: &str) -> Option<Reply> {
        let mut state = self.lock();
        state.statements.push(sql.to_string());
        state
            .replies
            .iter()
            .rev()
            .find(|(fragment, _)| sql.contains(fragment.as_str()))
            .map(|(_, reply)| reply.clone())
    }

    fn cursor(&self, columns: Vec<(String, String)>, rows: Vec<Vec<RawValue>>) -> RowCursor {
        self.opened.fetch_add(1, Ordering::SeqCst);
        let closed = Arc::clone(&self.closed);
        RowCursor::new(columns, rows).with_close_hook(move || {
            closed.fetch_add(1, Ordering::SeqCst);
        })
    }
}

#[async_trait]
impl CursorAdapter for RecordingAdapter {
    async fn execute(&self, sql: &str) -> Result<RowCursor, SqlDbError> {
        match self.record(sql) {
            Some(Reply::Fail(message)) => Err(SqlDbError::ExecutionError(message)),
            Some(Reply::Rows { columns, rows }) => Ok(self.cursor(columns, rows)),
            None => Ok(self.cursor(Vec::new(), Vec::new())),
        }
    }

    async fn execute_dml(&self, sql: &str) -> Result<u64, SqlDbError> {
        match self.record(sql) {
            Some(Reply::Fail(message)) => Err(SqlDbError::ExecutionError(message)),
            _ => Ok(1),
        }
    }

    async fn insert_returning_id(
        &self,
        sql: &str,
        strategy: InsertIdStrategy,
    ) -> Result<i64, SqlDbError> {
        if let Some(Reply::Fail(message)) = self.record(sql) {
            return Err(SqlDbError::ExecutionError(message));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        match strategy {
            InsertIdStrategy::LastInsertId => Ok(id),
            InsertIdStrategy::Returning | InsertIdStrategy::OutputInserted => first_id(
                self.cursor(
                    vec![("id".to_string(), "INT".to_string())],
                    vec![vec![RawValue::Native(RowValues::Int(id))]],
                ),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_registered_reply_wins() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let adapter = RecordingAdapter::new();
        adapter
            .respond("FROM items", &[("n", "INT")], vec![vec![RawValue::from("1")]])
            .respond("FROM items", &[("n", "INT")], vec![]);
        let mut cursor = rt.block_on(adapter.execute("SELECT n FROM items")).unwrap();
        assert!(!cursor.advance());
        cursor.close();
        assert_eq!(adapter.cursors_opened(), 1);
        assert_eq!(adapter.cursors_closed(), 1);
        assert_eq!(adapter.statements(), vec!["SELECT n FROM items".to_string()]);
    }

    #[test]
    fn insert_ids_increment() {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let adapter = RecordingAdapter::new();
        let a = rt
            .block_on(adapter.insert_returning_id("INSERT", InsertIdStrategy::Returning))
            .unwrap();
        let b = rt
            .block_on(adapter.insert_returning_id("INSERT", InsertIdStrategy::LastInsertId))
            .unwrap();
        assert_eq!((a, b), (1, 2));
        adapter.fail("INSERT", "boom");
        assert!(rt
            .block_on(adapter.insert_returning_id("INSERT", InsertIdStrategy::Returning))
            .is_err());
    }
}
