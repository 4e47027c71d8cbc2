//! Error types for database operations.
//!
//! Provides a unified error type covering connection lifecycle, schema
//! introspection, row mapping, query building, and engine failures.

use litebase_core::{FrameError, Value};
use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// The file could not be opened as a SQLite database.
    #[error("cannot open database at '{path}': {reason}")]
    Connection {
        /// Path that was given to open.
        path: String,
        /// What went wrong (missing file, invalid file, engine message).
        reason: String,
    },

    /// An operation was attempted on a closed handle. The connection stays
    /// closed until an explicit reconnect; there is no automatic retry.
    #[error("connection is closed; reconnect before further use")]
    ClosedConnection,

    /// The named table does not exist in the database.
    #[error("no such table: {0}")]
    UnknownTable(String),

    /// A raw row's width did not match the column list during mapping.
    #[error("row has {actual} values but {expected} columns were given")]
    RowShape {
        /// Number of column names supplied.
        expected: usize,
        /// Number of values in the raw row.
        actual: usize,
    },

    /// A required clause was missing when a builder was rendered or run.
    #[error("incomplete {statement} statement: missing {clause} clause")]
    MissingClause {
        /// Statement kind (SELECT, UPDATE, INSERT).
        statement: &'static str,
        /// The absent clause.
        clause: &'static str,
    },

    /// An entry-level write needed an id column the entry does not carry.
    #[error("entry for table '{0}' has no id field to derive a WHERE clause from")]
    MissingIdField(String),

    /// A fetch by id matched no row.
    #[error("no row in '{table}' with {id_field} = {id}")]
    EntryNotFound {
        /// Table that was searched.
        table: String,
        /// Id column used for the lookup.
        id_field: String,
        /// Id value that missed.
        id: Value,
    },

    /// Tabular interchange shape failure.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// SQLite engine failure, propagated unwrapped.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// File I/O failure during export.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results with [`DbError`].
pub type Result<T> = std::result::Result<T, DbError>;
