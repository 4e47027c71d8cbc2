//! High-level database facade.
//!
//! [`Database`] ties the connection manager, schema introspection, row
//! mapping, builders, and export together behind one handle-shaped type.
//! All schema knowledge is re-derived from the live connection on every
//! call; nothing is cached.

use std::path::{Path, PathBuf};

use litebase_core::{DataFrame, Entry, Value};

use crate::builder::{InsertBuilder, SelectBuilder, UpdateBuilder};
use crate::connection::ConnectionManager;
use crate::convert;
use crate::error::{DbError, Result};
use crate::export;
use crate::schema;

/// A handle to one SQLite database file.
///
/// Owns the single open connection for that file, exposing schema
/// introspection, entry-oriented reads and writes, fluent query builders,
/// CSV export, and snapshot comparison.
///
/// ```no_run
/// use litebase_sqlite::Database;
///
/// let mut db = Database::open("music.db")?;
///
/// for name in db.table_names()? {
///     println!("{name}: {} columns", db.columns(&name)?.len());
/// }
///
/// let mut first = db.entry_by_id("customers", "CustomerId", 1)?;
/// first["FirstName"] = "Ada".into();
/// db.update_entry(&first)?;
///
/// db.close()?;
/// # Ok::<(), litebase_sqlite::DbError>(())
/// ```
#[derive(Debug)]
pub struct Database {
    manager: ConnectionManager,
}

impl Database {
    /// Opens an existing database file.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Connection`] if the path does not exist or the
    /// file is not a valid SQLite database (validated eagerly, see
    /// [`ConnectionManager::open`]).
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            manager: ConnectionManager::open(path)?,
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> PathBuf {
        self.manager.path().to_path_buf()
    }

    /// Returns `true` while the handle is open.
    pub fn is_open(&self) -> bool {
        self.manager.is_open()
    }

    /// Closes the handle. Further operations fail with
    /// [`DbError::ClosedConnection`] until [`reconnect`](Self::reconnect).
    pub fn close(&mut self) -> Result<()> {
        self.manager.close()
    }

    /// Reopens the handle to the same path after a close.
    pub fn reconnect(&mut self) -> Result<()> {
        self.manager.reconnect()
    }

    /// The underlying connection manager, for raw statement execution.
    pub fn manager(&self) -> &ConnectionManager {
        &self.manager
    }

    // --- schema introspection -------------------------------------------

    /// User table names, in catalog order.
    pub fn table_names(&self) -> Result<Vec<String>> {
        schema::table_names(&self.manager)
    }

    /// Returns `true` if `name` is a user table.
    pub fn is_table(&self, name: &str) -> Result<bool> {
        schema::is_table(&self.manager, name)
    }

    /// A table's column names, in declaration order.
    pub fn columns(&self, table: &str) -> Result<Vec<String>> {
        schema::table_columns(&self.manager, table)
    }

    // --- reads -----------------------------------------------------------

    /// A table's full contents as raw fixed-width rows.
    pub fn table_raw(&self, table: &str) -> Result<Vec<Vec<Value>>> {
        // Introspect first so an unknown table surfaces as UnknownTable.
        schema::table_columns(&self.manager, table)?;
        self.select().from(table).run_raw()
    }

    /// A table's full contents as entries, optionally tagged with an id
    /// column.
    pub fn table_entries(&self, table: &str, id_field: Option<&str>) -> Result<Vec<Entry>> {
        let columns = schema::table_columns(&self.manager, table)?;
        self.select()
            .from(table)
            .run_raw()?
            .into_iter()
            .map(|raw| convert::map_row(raw, &columns, table, id_field))
            .collect()
    }

    /// Fetches the single row where `id_field = id`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::EntryNotFound`] if no row matches.
    pub fn entry_by_id(
        &self,
        table: &str,
        id_field: &str,
        id: impl Into<Value>,
    ) -> Result<Entry> {
        let id = id.into();
        let columns = schema::table_columns(&self.manager, table)?;
        let rows = self
            .select()
            .from(table)
            .where_eq(id_field, id.clone())
            .run_raw()?;

        let raw = rows.into_iter().next().ok_or_else(|| DbError::EntryNotFound {
            table: table.to_string(),
            id_field: id_field.to_string(),
            id,
        })?;
        convert::map_row(raw, &columns, table, Some(id_field))
    }

    /// Widens an entry to its table's full column set, substituting
    /// [`Value::Null`] for absent columns.
    pub fn fill_null(&self, entry: &Entry) -> Result<Entry> {
        let columns = schema::table_columns(&self.manager, &entry.table)?;
        Ok(convert::fill_null(entry, &columns))
    }

    // --- writes ----------------------------------------------------------

    /// Persists an entry's current field values back to its row.
    ///
    /// The SET mapping is every non-id field; the WHERE clause comes from
    /// the entry's id column and value. Returns the number of affected rows.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::MissingIdField`] if the entry carries no id column
    /// or no value for it.
    pub fn update_entry(&self, entry: &Entry) -> Result<usize> {
        let id_field = entry
            .id_field
            .as_deref()
            .ok_or_else(|| DbError::MissingIdField(entry.table.clone()))?;
        let id_value = entry
            .get(id_field)
            .ok_or_else(|| DbError::MissingIdField(entry.table.clone()))?
            .clone();

        let assignments: Vec<(String, Value)> = entry
            .iter()
            .filter(|(column, _)| *column != id_field)
            .map(|(column, value)| (column.to_string(), value.clone()))
            .collect();

        self.update(&entry.table)
            .set(assignments)
            .where_eq(id_field, id_value)
            .run()
    }

    /// Inserts an entry as a new row in its table.
    ///
    /// With `fill_null` the entry is widened first so every declared column
    /// receives an explicit value (null where unspecified); otherwise only
    /// the present fields are inserted and the engine applies its own
    /// column defaults for the rest. Returns the number of inserted rows.
    pub fn insert_entry(&self, entry: &Entry, fill_null: bool) -> Result<usize> {
        let entry = if fill_null {
            self.fill_null(entry)?
        } else {
            entry.clone()
        };

        let values: Vec<(String, Value)> = entry
            .iter()
            .map(|(column, value)| (column.to_string(), value.clone()))
            .collect();
        self.insert_into(&entry.table).values(values).run()
    }

    // --- builders --------------------------------------------------------

    /// Starts a SELECT builder (all columns unless
    /// [`columns`](SelectBuilder::columns) narrows it).
    pub fn select(&self) -> SelectBuilder<'_> {
        SelectBuilder::new(&self.manager)
    }

    /// Starts an UPDATE builder against `table`.
    pub fn update(&self, table: impl Into<String>) -> UpdateBuilder<'_> {
        UpdateBuilder::new(&self.manager, table)
    }

    /// Starts an INSERT builder against `table`.
    pub fn insert_into(&self, table: impl Into<String>) -> InsertBuilder<'_> {
        InsertBuilder::new(&self.manager, table)
    }

    // --- export / interchange -------------------------------------------

    /// Writes one `<table>.csv` per selected table into `dir` (default:
    /// every table). Returns the written paths. Fields containing the
    /// delimiter, a double quote, or a line break are double-quoted.
    pub fn export_csv(
        &self,
        dir: impl AsRef<Path>,
        tables: Option<&[String]>,
        delimiter: char,
    ) -> Result<Vec<PathBuf>> {
        export::export_csv(&self.manager, dir, tables, delimiter)
    }

    /// Reads a table's full contents into a [`DataFrame`].
    pub fn table_to_frame(&self, table: &str) -> Result<DataFrame> {
        export::table_to_frame(&self.manager, table)
    }

    /// Creates a new table from a frame's columns and rows.
    pub fn frame_to_table(&self, name: &str, frame: &DataFrame) -> Result<()> {
        export::frame_to_table(&self.manager, name, frame)
    }

    // --- comparison ------------------------------------------------------

    /// Compares the full contents of two database handles.
    ///
    /// Equal means: the same set of table names, and for every table the
    /// same ordered rows, compared as entries. The handles may point at
    /// different files; only contents matter.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ClosedConnection`] if either handle is closed —
    /// "cannot compare" is never reported as "not equal".
    pub fn snapshot_eq(&self, other: &Database) -> Result<bool> {
        self.manager.handle()?;
        other.manager.handle()?;

        let mut ours = self.table_names()?;
        let mut theirs = other.table_names()?;
        ours.sort_unstable();
        theirs.sort_unstable();
        if ours != theirs {
            return Ok(false);
        }

        for table in &ours {
            let a = self.table_entries(table, None)?;
            let b = other.table_entries(table, None)?;
            if a != b {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
