// Cursor module - the narrow boundary between the mapping layer and a live connection
//
// Drivers execute SQL text (no parameter binding) and hand back a buffered
// `RowCursor`; the decoder walks it one row at a time.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;

use crate::error::SqlDbError;
use crate::types::RowValues;

/// A column value as handed over by a driver, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Database NULL
    Null,
    /// Textual or binary wire representation (`MySQL` text protocol, SQL Server rendering)
    Bytes(Vec<u8>),
    /// Value the driver already decoded into a native type
    Native(RowValues),
}

impl RawValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }

    /// Generic textual rendering of the raw slot.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            RawValue::Null => String::new(),
            RawValue::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            RawValue::Native(value) => value.to_string(),
        }
    }

    /// True when the slot holds no characters at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Null => true,
            RawValue::Bytes(bytes) => bytes.is_empty(),
            RawValue::Native(RowValues::Text(s)) => s.is_empty(),
            RawValue::Native(_) => false,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Bytes(value.as_bytes().to_vec())
    }
}

impl From<RowValues> for RawValue {
    fn from(value: RowValues) -> Self {
        RawValue::Native(value)
    }
}

type CloseHook = Box<dyn FnOnce() + Send>;

/// Row-at-a-time view over one executed statement.
///
/// The cursor is released exactly once: either by an explicit [`RowCursor::close`]
/// or when it is dropped.
pub struct RowCursor {
    columns: Vec<(String, String)>,
    rows: std::vec::IntoIter<Vec<RawValue>>,
    current: Option<Vec<RawValue>>,
    on_close: Option<CloseHook>,
    closed: bool,
}

impl fmt::Debug for RowCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowCursor")
            .field("columns", &self.columns)
            .field("remaining", &self.rows.len())
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl RowCursor {
    /// Build a cursor from `(column name, native type name)` pairs and buffered rows.
    #[must_use]
    pub fn new(columns: Vec<(String, String)>, rows: Vec<Vec<RawValue>>) -> Self {
        tracing::debug!(columns = columns.len(), rows = rows.len(), "cursor opened");
        Self {
            columns,
            rows: rows.into_iter(),
            current: None,
            on_close: None,
            closed: false,
        }
    }

    /// Run `hook` when the cursor is released.
    #[must_use]
    pub fn with_close_hook(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.on_close = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Column name to engine-declared type name.
    #[must_use]
    pub fn column_types(&self) -> HashMap<String, String> {
        self.columns.iter().cloned().collect()
    }

    /// Move to the next row. Returns `false` once the rows are exhausted or the cursor is closed.
    pub fn advance(&mut self) -> bool {
        if self.closed {
            self.current = None;
            return false;
        }
        self.current = self.rows.next();
        self.current.is_some()
    }

    /// Raw values of the current row, in column order.
    ///
    /// # Errors
    /// Returns `SqlDbError::ExecutionError` if there is no current row or the row's
    /// width does not match the column count.
    pub fn scan(&self) -> Result<&[RawValue], SqlDbError> {
        let row = self.current.as_deref().ok_or_else(|| {
            SqlDbError::ExecutionError("scan called without a current row".to_string())
        })?;
        if row.len() != self.columns.len() {
            return Err(SqlDbError::ExecutionError(format!(
                "row has {} values but statement returned {} columns",
                row.len(),
                self.columns.len()
            )));
        }
        Ok(row)
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Release the cursor. Calling it again is a no-op.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.current = None;
        if let Some(hook) = self.on_close.take() {
            hook();
        }
        tracing::debug!("cursor closed");
    }
}

impl Drop for RowCursor {
    fn drop(&mut self) {
        self.close();
    }
}

/// How an engine reports the key generated by an INSERT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertIdStrategy {
    /// `INSERT ... RETURNING id`, read from the single result row
    Returning,
    /// Plain insert, then the driver's last-insert-id on the same connection
    LastInsertId,
    /// `INSERT ... OUTPUT INSERTED.id ...`, read from the single result row
    OutputInserted,
}

/// Executes SQL text against one live connection source.
#[async_trait]
pub trait CursorAdapter: Send + Sync {
    /// Run a row-returning statement.
    ///
    /// # Errors
    /// Returns the driver's error when the statement fails.
    async fn execute(&self, sql: &str) -> Result<RowCursor, SqlDbError>;

    /// Run a statement that returns no rows; yields the affected row count.
    ///
    /// # Errors
    /// Returns the driver's error when the statement fails.
    async fn execute_dml(&self, sql: &str) -> Result<u64, SqlDbError>;

    /// Run an INSERT and report the generated `id`.
    ///
    /// # Errors
    /// Returns the driver's error when the statement fails or no id is produced.
    async fn insert_returning_id(
        &self,
        sql: &str,
        strategy: InsertIdStrategy,
    ) -> Result<i64, SqlDbError>;
}

/// Read the generated id out of a `RETURNING`/`OUTPUT` cursor.
///
/// # Errors
/// Returns `SqlDbError::ExecutionError` if the cursor yields no integer in its first column.
pub fn first_id(mut cursor: RowCursor) -> Result<i64, SqlDbError> {
    if !cursor.advance() {
        return Err(SqlDbError::ExecutionError(
            "insert returned no id row".to_string(),
        ));
    }
    let value = cursor.scan()?.first().cloned().unwrap_or(RawValue::Null);
    let id = match value {
        RawValue::Native(v) => v.as_int(),
        RawValue::Bytes(bytes) => String::from_utf8_lossy(&bytes).trim().parse::<i64>().ok(),
        RawValue::Null => None,
    };
    cursor.close();
    id.ok_or_else(|| SqlDbError::ExecutionError("insert returned a non-integer id".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn two_rows() -> RowCursor {
        RowCursor::new(
            vec![("id".into(), "INT".into()), ("name".into(), "VARCHAR".into())],
            vec![
                vec![RawValue::from("1"), RawValue::from("a")],
                vec![RawValue::from("2"), RawValue::Null],
            ],
        )
    }

    #[test]
    fn close_hook_runs_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let hits = Arc::clone(&count);
        let mut cursor = two_rows().with_close_hook(move || {
            hits.fetch_add(1, Ordering::SeqCst);
        });
        assert!(cursor.advance());
        cursor.close();
        cursor.close();
        assert!(!cursor.advance());
        drop(cursor);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn drop_releases_abandoned_cursor() {
        let count = Arc::new(AtomicUsize::new(0));
        let hits = Arc::clone(&count);
        {
            let mut cursor = two_rows().with_close_hook(move || {
                hits.fetch_add(1, Ordering::SeqCst);
            });
            cursor.advance();
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn scan_requires_current_row() {
        let mut cursor = two_rows();
        assert!(cursor.scan().is_err());
        assert!(cursor.advance());
        assert_eq!(cursor.scan().unwrap()[1], RawValue::from("a"));
        assert!(cursor.advance());
        assert!(!cursor.advance());
        assert!(cursor.scan().is_err());
    }

    #[test]
    fn ragged_row_is_rejected() {
        let mut cursor = RowCursor::new(
            vec![("a".into(), "INT".into())],
            vec![vec![RawValue::from("1"), RawValue::from("2")]],
        );
        assert!(cursor.advance());
        assert!(matches!(cursor.scan(), Err(SqlDbError::ExecutionError(_))));
    }

    #[test]
    fn first_id_reads_text_and_native() {
        let cursor = RowCursor::new(
            vec![("id".into(), "INT".into())],
            vec![vec![RawValue::from("42")]],
        );
        assert_eq!(first_id(cursor).unwrap(), 42);
        let cursor = RowCursor::new(
            vec![("id".into(), "int4".into())],
            vec![vec![RawValue::Native(RowValues::Int(9))]],
        );
        assert_eq!(first_id(cursor).unwrap(), 9);
        let empty = RowCursor::new(vec![("id".into(), "int4".into())], vec![]);
        assert!(first_id(empty).is_err());
    }
}
