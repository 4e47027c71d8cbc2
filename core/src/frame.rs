//! Generic tabular interchange structure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Value;

/// Errors from building or filling a [`DataFrame`].
#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    /// A column name appears more than once.
    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    /// A pushed row's width does not match the column count.
    #[error("row has {actual} values but the frame has {expected} columns")]
    WidthMismatch {
        /// Number of columns in the frame.
        expected: usize,
        /// Number of values in the rejected row.
        actual: usize,
    },
}

/// An in-memory table: ordered named columns and ordered rows of [`Value`]s.
///
/// `DataFrame` is the boundary type for moving whole tables in and out of a
/// database. Column names and their order round-trip exactly through the
/// conversion operations.
///
/// ```
/// use litebase_core::{DataFrame, Value};
///
/// let mut frame = DataFrame::new(["id", "name"]).unwrap();
/// frame.push_row(vec![Value::Integer(1), Value::from("first")]).unwrap();
///
/// assert_eq!(frame.len(), 1);
/// assert_eq!(frame.columns(), ["id", "name"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFrame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl DataFrame {
    /// Creates an empty frame with the given column names.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::DuplicateColumn`] if a name repeats.
    pub fn new<I, S>(columns: I) -> Result<Self, FrameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        for (i, name) in columns.iter().enumerate() {
            if columns[..i].contains(name) {
                return Err(FrameError::DuplicateColumn(name.clone()));
            }
        }
        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Appends one row.
    ///
    /// # Errors
    ///
    /// Returns [`FrameError::WidthMismatch`] if the row's length differs
    /// from the column count.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), FrameError> {
        if row.len() != self.columns.len() {
            return Err(FrameError::WidthMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows, in order.
    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the frame holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
