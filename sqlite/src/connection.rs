//! Connection lifecycle and raw statement execution.
//!
//! [`ConnectionManager`] owns the single rusqlite handle for one database
//! file: it opens it with eager validation, executes parameterized
//! statements, and supports explicit close/reconnect. All parameters are
//! bound positionally; caller values are never interpolated into statement
//! text.

use std::path::{Path, PathBuf};

use litebase_core::Value;
use rusqlite::{Connection, OpenFlags, params_from_iter};

use crate::convert::{value_from_sql, value_to_sql};
use crate::error::{DbError, Result};

/// Owns the lifecycle of one SQLite handle: open, execute, close, reconnect.
///
/// Exactly one handle is open per manager at a time. After [`close`]
/// (Self::close), every execution fails with [`DbError::ClosedConnection`]
/// until [`reconnect`](Self::reconnect) reopens the same path. Writes go
/// straight to the backing file under SQLite's autocommit; each call is its
/// own atomic unit.
#[derive(Debug)]
pub struct ConnectionManager {
    path: PathBuf,
    conn: Option<Connection>,
}

impl ConnectionManager {
    /// Opens the database file at `path`.
    ///
    /// The file must already exist and be a valid SQLite database; validity
    /// is checked up front by reading the schema catalog, so an invalid file
    /// is rejected here rather than on first use. A zero-byte file is a
    /// valid (empty) database.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Connection`] if the path does not exist or the
    /// file cannot be read as a database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(DbError::Connection {
                path: path.display().to_string(),
                reason: "file does not exist".to_string(),
            });
        }

        let conn = Self::connect(&path)?;
        tracing::debug!(path = %path.display(), "opened database");
        Ok(Self {
            path,
            conn: Some(conn),
        })
    }

    fn connect(path: &Path) -> Result<Connection> {
        // READ_WRITE without CREATE: opening must never invent a new file.
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| DbError::Connection {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        // Eager validation: a non-database file fails its first catalog read.
        conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
            row.get::<_, i64>(0)
        })
        .map_err(|e| DbError::Connection {
            path: path.display().to_string(),
            reason: format!("not a valid database file: {e}"),
        })?;

        Ok(conn)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` while a handle is open.
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    /// Executes a read statement and collects every result row as a
    /// fixed-width vector of [`Value`]s, in result order.
    ///
    /// Parameters bind positionally to `?1..?N` placeholders.
    pub fn execute(&self, sql: &str, params: &[Value]) -> Result<Vec<Vec<Value>>> {
        let conn = self.handle()?;
        tracing::debug!(%sql, params = params.len(), "executing query");

        let mut stmt = conn.prepare(sql)?;
        let width = stmt.column_count();

        let mut out = Vec::new();
        let mut rows = stmt.query(params_from_iter(params.iter().map(value_to_sql)))?;
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for i in 0..width {
                values.push(value_from_sql(row.get_ref(i)?));
            }
            out.push(values);
        }
        Ok(out)
    }

    /// Executes a write statement (INSERT/UPDATE/DELETE) and returns the
    /// number of affected rows. Commits immediately under autocommit.
    pub fn execute_write(&self, sql: &str, params: &[Value]) -> Result<usize> {
        let conn = self.handle()?;
        tracing::debug!(%sql, params = params.len(), "executing write");

        let changed = conn.execute(sql, params_from_iter(params.iter().map(value_to_sql)))?;
        Ok(changed)
    }

    /// Closes the handle. Safe to call on an already-closed manager.
    pub fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, e)| DbError::Sqlite(e))?;
            tracing::debug!(path = %self.path.display(), "closed database");
        }
        Ok(())
    }

    /// Reopens a handle to the same path after a close.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Connection`] if a handle is already open, or if
    /// the file can no longer be opened.
    pub fn reconnect(&mut self) -> Result<()> {
        if self.conn.is_some() {
            return Err(DbError::Connection {
                path: self.path.display().to_string(),
                reason: "connection is already open".to_string(),
            });
        }
        self.conn = Some(Self::connect(&self.path)?);
        tracing::debug!(path = %self.path.display(), "reconnected database");
        Ok(())
    }

    /// The live handle, or [`DbError::ClosedConnection`].
    pub(crate) fn handle(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(DbError::ClosedConnection)
    }
}
