use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::cursor::CursorAdapter;
use crate::dialect::{Dialect, dialect_for};
use crate::error::SqlDbError;
use crate::identifier::validate_identifier;
use crate::query_builder::{
    build_select, delete_statement, delete_where_statement, insert_statement, update_statement,
};
use crate::results::{AssocRow, Rows, decode};
use crate::schema::file::{read_schema_file, write_schema_file};
use crate::schema::introspect::{names_from_rows, schema_from_rows};
use crate::schema::{ColumnType, Link, TableDdl, TableSchema, build_links, ddl};
use crate::types::DatabaseType;

/// One logical database: an engine dialect plus the adapter that reaches it.
///
/// The engine never changes after construction. Cloning is cheap and shares the adapter.
///
/// ```rust,no_run
/// # use sqldb_middleware::prelude::*;
/// # async fn demo(db: Db) -> Result<(), SqlDbError> {
/// let id = db
///     .table("items")
///     .insert(&AssocRow::new().with("name", "widget").with("qty", 5))
///     .await?;
/// let rows = db.table("items").select(&[], &format!("id = {id}"), &[], "").await?;
/// assert_eq!(rows[0].get_int("qty"), Some(5));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Db {
    dialect: &'static dyn Dialect,
    adapter: Arc<dyn CursorAdapter>,
}

impl fmt::Debug for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db")
            .field("engine", &self.dialect.engine())
            .field("adapter", &"<CursorAdapter>")
            .finish()
    }
}

/// Outcome of a bulk schema import or clear: tables handled and per-table failures.
#[derive(Debug, Default)]
pub struct SchemaReport {
    pub applied: Vec<String>,
    pub failed: Vec<(String, SqlDbError)>,
}

impl SchemaReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

impl Db {
    #[must_use]
    pub fn new(engine: DatabaseType, adapter: Arc<dyn CursorAdapter>) -> Self {
        Self {
            dialect: dialect_for(engine),
            adapter,
        }
    }

    /// Build a handle from a driver name (`postgres`, `mysql` or `sqlserver`).
    ///
    /// # Errors
    /// Returns `SqlDbError::NoDriver` for any other name.
    pub fn from_driver_name(
        driver: &str,
        adapter: Arc<dyn CursorAdapter>,
    ) -> Result<Self, SqlDbError> {
        Ok(Self::new(driver.parse()?, adapter))
    }

    #[must_use]
    pub fn engine(&self) -> DatabaseType {
        self.dialect.engine()
    }

    #[must_use]
    pub fn dialect(&self) -> &'static dyn Dialect {
        self.dialect
    }

    /// Handle for one table of this database.
    #[must_use]
    pub fn table(&self, name: impl Into<String>) -> Table<'_> {
        Table {
            db: self,
            name: name.into(),
        }
    }

    /// Run a row-returning statement and decode every row.
    ///
    /// # Errors
    /// Returns the driver error, or the first decoding error; no partial rows are returned.
    pub async fn query_associative_array(&self, sql: &str) -> Result<Rows, SqlDbError> {
        tracing::debug!(sql, "query");
        let cursor = self.adapter.execute(sql).await.inspect_err(|e| {
            tracing::warn!(error = %e, sql, "query failed");
        })?;
        decode(cursor, self.dialect.coercion_policy())
    }

    /// Run a statement that returns no rows.
    ///
    /// # Errors
    /// Returns the driver error.
    pub async fn exec(&self, sql: &str) -> Result<u64, SqlDbError> {
        tracing::debug!(sql, "exec");
        self.adapter.execute_dml(sql).await.inspect_err(|e| {
            tracing::warn!(error = %e, sql, "statement failed");
        })
    }

    async fn insert_returning_id(&self, sql: &str) -> Result<i64, SqlDbError> {
        tracing::debug!(sql, "insert");
        self.adapter
            .insert_returning_id(sql, self.dialect.insert_id_strategy())
            .await
            .inspect_err(|e| {
                tracing::warn!(error = %e, sql, "insert failed");
            })
    }

    /// Names of every base table, in the engine's listing order.
    ///
    /// # Errors
    /// Returns the driver or decoding error.
    pub async fn list_tables(&self) -> Result<Vec<String>, SqlDbError> {
        let rows = self
            .query_associative_array(self.dialect.list_tables_sql())
            .await?;
        Ok(names_from_rows(&rows))
    }

    /// Names of every sequence.
    ///
    /// # Errors
    /// Returns `SqlDbError::Unimplemented` on engines without sequences, otherwise the
    /// driver or decoding error.
    pub async fn list_sequences(&self) -> Result<Vec<String>, SqlDbError> {
        let sql = self.dialect.list_sequences_sql().ok_or_else(|| {
            SqlDbError::Unimplemented(format!("{} has no sequences", self.engine()))
        })?;
        let rows = self.query_associative_array(sql).await?;
        Ok(names_from_rows(&rows))
    }

    /// Read a table's live descriptor. A missing table has no columns.
    ///
    /// # Errors
    /// Returns `SqlDbError::InvalidIdentifier` for a bad name, otherwise the driver or
    /// decoding error.
    pub async fn fetch_schema(&self, table: &str) -> Result<TableSchema, SqlDbError> {
        let table = validate_identifier(table)?;
        let rows = self
            .query_associative_array(&self.dialect.introspect_columns_sql(table))
            .await?;
        Ok(schema_from_rows(table, &rows))
    }

    /// Descriptors of every base table, in listing order. Any failure aborts the whole call.
    ///
    /// # Errors
    /// Returns the first listing or introspection error.
    pub async fn fetch_all_schemas(&self) -> Result<Vec<TableSchema>, SqlDbError> {
        let mut schemas = Vec::new();
        for table in self.list_tables().await? {
            schemas.push(self.fetch_schema(&table).await?);
        }
        Ok(schemas)
    }

    /// Run a structural statement, then its comment statements.
    ///
    /// A failing comment leaves the structure in place and reports `PartialDdl`.
    async fn apply_ddl(&self, table: &str, ddl: TableDdl) -> Result<(), SqlDbError> {
        self.exec(&ddl.statement).await?;
        for (column, sql) in ddl.annotations {
            if let Err(source) = self.exec(&sql).await {
                return Err(SqlDbError::PartialDdl {
                    table: table.to_string(),
                    column,
                    source: Box::new(source),
                });
            }
        }
        Ok(())
    }

    /// Create a table from a descriptor; a column named `id` becomes the primary key.
    ///
    /// # Errors
    /// Returns the validation or driver error of the create, or `SqlDbError::PartialDdl`
    /// if a column comment could not be applied afterwards.
    pub async fn create_table(&self, schema: &TableSchema) -> Result<(), SqlDbError> {
        let ddl = ddl::create_table(self.dialect, schema)?;
        self.apply_ddl(&schema.name, ddl).await
    }

    /// Links inferred from `<table>_id` columns across the whole database.
    ///
    /// # Errors
    /// Returns the introspection error.
    pub async fn links(&self) -> Result<Vec<Link>, SqlDbError> {
        Ok(build_links(&self.fetch_all_schemas().await?))
    }

    /// Write every table's descriptor to a JSON file.
    ///
    /// # Errors
    /// Returns the introspection, serialization or I/O error.
    pub async fn save_schema(&self, path: impl AsRef<Path>) -> Result<(), SqlDbError> {
        let schemas = self.fetch_all_schemas().await?;
        write_schema_file(path, &schemas)
    }

    /// Create every table listed in a schema file. A failing table is logged and skipped.
    ///
    /// # Errors
    /// Returns an error only when the file cannot be read; per-table failures are in the report.
    pub async fn import_schema(&self, path: impl AsRef<Path>) -> Result<SchemaReport, SqlDbError> {
        let mut report = SchemaReport::default();
        for schema in read_schema_file(path)? {
            match self.create_table(&schema).await {
                Ok(()) => report.applied.push(schema.name),
                Err(e) => {
                    tracing::warn!(table = %schema.name, error = %e, "schema import failed");
                    report.failed.push((schema.name, e));
                }
            }
        }
        Ok(report)
    }

    /// Drop every table listed in a schema file. A failing table is logged and skipped.
    ///
    /// # Errors
    /// Returns an error only when the file cannot be read; per-table failures are in the report.
    pub async fn clear_import_schema(
        &self,
        path: impl AsRef<Path>,
    ) -> Result<SchemaReport, SqlDbError> {
        let mut report = SchemaReport::default();
        for schema in read_schema_file(path)? {
            match self.table(schema.name.as_str()).delete_table().await {
                Ok(()) => report.applied.push(schema.name),
                Err(e) => {
                    tracing::warn!(table = %schema.name, error = %e, "schema clear failed");
                    report.failed.push((schema.name, e));
                }
            }
        }
        Ok(report)
    }
}

/// Record id meaning "not stored yet" for [`Table::upsert`].
pub const NEW_RECORD_ID: i64 = -1;

/// A table of a [`Db`]. Holds no schema; mutations re-read the live one.
#[derive(Debug, Clone)]
pub struct Table<'db> {
    db: &'db Db,
    name: String,
}

impl Table<'_> {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// # Errors
    /// See [`Db::fetch_schema`].
    pub async fn fetch_schema(&self) -> Result<TableSchema, SqlDbError> {
        self.db.fetch_schema(&self.name).await
    }

    /// Select rows; `restriction` is a raw WHERE predicate and may be empty.
    ///
    /// # Errors
    /// Returns `SqlDbError::InvalidIdentifier` for bad names, otherwise the driver or
    /// decoding error.
    pub async fn select(
        &self,
        columns: &[&str],
        restriction: &str,
        sort_keys: &[&str],
        direction: &str,
    ) -> Result<Rows, SqlDbError> {
        let sql = build_select(&self.name, columns, restriction, sort_keys, direction)?;
        self.db.query_associative_array(&sql).await
    }

    /// Drop the table, then its `sq_<name>` sequence where the engine has sequences.
    ///
    /// # Errors
    /// Returns the first failing statement's error.
    pub async fn delete_table(&self) -> Result<(), SqlDbError> {
        for sql in ddl::drop_table(self.db.dialect, &self.name)? {
            self.db.exec(&sql).await?;
        }
        Ok(())
    }

    /// Add one column; a non-blank comment is attached the engine's way.
    ///
    /// # Errors
    /// Returns the validation or driver error, or `SqlDbError::PartialDdl` if only the
    /// comment failed.
    pub async fn add_column(
        &self,
        name: &str,
        native_type: &str,
        comment: &str,
    ) -> Result<(), SqlDbError> {
        let column_type = ColumnType::new(native_type, Some(comment));
        let ddl = ddl::add_column(self.db.dialect, &self.name, name, &column_type)?;
        self.db.apply_ddl(&self.name, ddl).await
    }

    /// # Errors
    /// Returns the validation or driver error.
    pub async fn delete_column(&self, name: &str) -> Result<(), SqlDbError> {
        self.db.exec(&ddl::drop_column(&self.name, name)?).await?;
        Ok(())
    }

    /// Insert a record and return the generated id.
    ///
    /// # Errors
    /// Returns `SqlDbError::ParameterError` when a field is not a live column, otherwise
    /// the driver error.
    pub async fn insert(&self, record: &AssocRow) -> Result<i64, SqlDbError> {
        let schema = self.fetch_schema().await?;
        let sql = insert_statement(self.db.dialect, &schema, record)?;
        self.db.insert_returning_id(&sql).await
    }

    /// Update the row selected by the record's `id`.
    ///
    /// # Errors
    /// Returns `SqlDbError::MissingId` without an integer id, `SqlDbError::ParameterError`
    /// for unknown fields, otherwise the driver error.
    pub async fn update(&self, record: &AssocRow) -> Result<(), SqlDbError> {
        let schema = self.fetch_schema().await?;
        let sql = update_statement(self.db.dialect, &schema, record)?;
        self.db.exec(&sql).await?;
        Ok(())
    }

    /// Delete the row selected by the record's `id`.
    ///
    /// # Errors
    /// Returns `SqlDbError::MissingId` without an integer id, otherwise the driver error.
    pub async fn delete(&self, record: &AssocRow) -> Result<(), SqlDbError> {
        self.db.exec(&delete_statement(&self.name, record)?).await?;
        Ok(())
    }

    /// Delete every row matching a raw predicate; returns the affected row count.
    ///
    /// # Errors
    /// Returns `SqlDbError::ParameterError` for a blank predicate, otherwise the driver error.
    pub async fn delete_where(&self, predicate: &str) -> Result<u64, SqlDbError> {
        self.db
            .exec(&delete_where_statement(&self.name, predicate)?)
            .await
    }

    /// Update when the record carries an integer `id`, insert when it is absent,
    /// non-numeric or the `-1` sentinel.
    ///
    /// On the insert path an unusable `id` field is dropped so the engine generates one.
    ///
    /// # Errors
    /// Returns the error of whichever operation ran.
    pub async fn upsert(&self, record: &AssocRow) -> Result<i64, SqlDbError> {
        match record.id() {
            Some(id) if id != NEW_RECORD_ID => {
                self.update(record).await?;
                Ok(id)
            }
            _ => {
                let mut fresh = record.clone();
                fresh.remove("id");
                self.insert(&fresh).await
            }
        }
    }
}
