//! Fluent query builders for SELECT, UPDATE, and INSERT.
//!
//! Each builder accumulates clause state through chained calls and renders
//! it into a parameterized statement plus a positional parameter list.
//! Rendering is a pure function of the builder's state: it never mutates the
//! builder, so a builder can be rendered or run repeatedly and clause order
//! does not affect the output. Calling a clause that was already set
//! overwrites it.
//!
//! Column and table names are double-quote-escaped; all caller values travel
//! as bound `?N` parameters.
//!
//! # Raw predicates
//!
//! [`where_raw`](SelectBuilder::where_raw) splices the given fragment into
//! the statement verbatim, **without parameterization**. This is deliberate:
//! it is the escape hatch for non-equality predicates (`"Total > 5"`,
//! `"Name LIKE 'A%'"`), and the fragment is trusted caller input. Never pass
//! unsanitized external strings through it.

use litebase_core::{Entry, Value};

use crate::connection::ConnectionManager;
use crate::convert::map_row;
use crate::error::{DbError, Result};
use crate::schema;

/// Quotes an identifier for safe inclusion in statement text.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// A WHERE clause: either a parameterized equality test or a trusted raw
/// fragment.
#[derive(Debug, Clone)]
enum Filter {
    Eq(String, Value),
    Raw(String),
}

impl Filter {
    /// Renders the clause body, appending any bound value to `params`.
    fn render(&self, params: &mut Vec<Value>) -> String {
        match self {
            Filter::Eq(column, value) => {
                params.push(value.clone());
                format!("{} = ?{}", quote_ident(column), params.len())
            }
            Filter::Raw(predicate) => predicate.clone(),
        }
    }
}

/// Builder for `SELECT <columns> FROM <table> [WHERE ...]`.
///
/// Created by [`Database::select`](crate::Database::select). Without an
/// explicit column list it selects `*`.
///
/// ```no_run
/// use litebase_sqlite::Database;
///
/// let db = Database::open("music.db")?;
/// let rows = db
///     .select()
///     .columns(["FirstName", "LastName"])
///     .from("customers")
///     .where_eq("CustomerId", 1)
///     .run()?;
/// # Ok::<(), litebase_sqlite::DbError>(())
/// ```
#[derive(Debug)]
pub struct SelectBuilder<'a> {
    manager: &'a ConnectionManager,
    columns: Option<Vec<String>>,
    table: Option<String>,
    filter: Option<Filter>,
}

impl<'a> SelectBuilder<'a> {
    pub(crate) fn new(manager: &'a ConnectionManager) -> Self {
        Self {
            manager,
            columns: None,
            table: None,
            filter: None,
        }
    }

    /// Restricts the selection to an explicit ordered column list.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the table to select from. Required before render or run.
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Filters on `column = value`, parameterized.
    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some(Filter::Eq(column.into(), value.into()));
        self
    }

    /// Filters on a raw predicate fragment, spliced in verbatim.
    ///
    /// See the module docs on the trust boundary this implies.
    pub fn where_raw(mut self, predicate: impl Into<String>) -> Self {
        self.filter = Some(Filter::Raw(predicate.into()));
        self
    }

    /// Renders the statement text and its positional parameters.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::MissingClause`] if no table was set.
    pub fn render(&self) -> Result<(String, Vec<Value>)> {
        let table = self.table.as_deref().ok_or(DbError::MissingClause {
            statement: "SELECT",
            clause: "FROM",
        })?;

        let column_list = match &self.columns {
            Some(columns) => columns
                .iter()
                .map(|c| quote_ident(c))
                .collect::<Vec<_>>()
                .join(", "),
            None => "*".to_string(),
        };

        let mut params = Vec::new();
        let mut sql = format!("SELECT {column_list} FROM {}", quote_ident(table));
        if let Some(filter) = &self.filter {
            let clause = filter.render(&mut params);
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }
        Ok((sql, params))
    }

    /// Executes the query and maps each row to an [`Entry`].
    ///
    /// With an explicit column list the entries carry exactly those columns;
    /// with `*` they carry the table's full declared column set. Mapped
    /// entries have no id column tag.
    pub fn run(&self) -> Result<Vec<Entry>> {
        let table = self.table.as_deref().ok_or(DbError::MissingClause {
            statement: "SELECT",
            clause: "FROM",
        })?;
        let (sql, params) = self.render()?;

        let mapping_columns = match &self.columns {
            Some(columns) => columns.clone(),
            None => schema::table_columns(self.manager, table)?,
        };

        self.manager
            .execute(&sql, &params)?
            .into_iter()
            .map(|raw| map_row(raw, &mapping_columns, table, None))
            .collect()
    }

    /// Executes the query and returns the raw fixed-width rows unmapped.
    pub fn run_raw(&self) -> Result<Vec<Vec<Value>>> {
        let (sql, params) = self.render()?;
        self.manager.execute(&sql, &params)
    }
}

/// Builder for `UPDATE <table> SET ... WHERE ...`.
///
/// Both SET and WHERE are mandatory; an unconditional mass update will not
/// render. Created by [`Database::update`](crate::Database::update).
#[derive(Debug)]
pub struct UpdateBuilder<'a> {
    manager: &'a ConnectionManager,
    table: String,
    assignments: Vec<(String, Value)>,
    filter: Option<Filter>,
}

impl<'a> UpdateBuilder<'a> {
    pub(crate) fn new(manager: &'a ConnectionManager, table: impl Into<String>) -> Self {
        Self {
            manager,
            table: table.into(),
            assignments: Vec::new(),
            filter: None,
        }
    }

    /// Sets the full assignment mapping, replacing any previous one.
    pub fn set<I, K, V>(mut self, assignments: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.assignments = assignments
            .into_iter()
            .map(|(column, value)| (column.into(), value.into()))
            .collect();
        self
    }

    /// Restricts the update to rows where `column = value`, parameterized.
    pub fn where_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filter = Some(Filter::Eq(column.into(), value.into()));
        self
    }

    /// Restricts the update with a raw predicate fragment, spliced in
    /// verbatim (see the module docs on trust).
    pub fn where_raw(mut self, predicate: impl Into<String>) -> Self {
        self.filter = Some(Filter::Raw(predicate.into()));
        self
    }

    /// Renders the statement text and its positional parameters.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::MissingClause`] if SET is empty or WHERE is
    /// missing.
    pub fn render(&self) -> Result<(String, Vec<Value>)> {
        if self.assignments.is_empty() {
            return Err(DbError::MissingClause {
                statement: "UPDATE",
                clause: "SET",
            });
        }
        let filter = self.filter.as_ref().ok_or(DbError::MissingClause {
            statement: "UPDATE",
            clause: "WHERE",
        })?;

        let mut params = Vec::new();
        let assignments = self
            .assignments
            .iter()
            .map(|(column, value)| {
                params.push(value.clone());
                format!("{} = ?{}", quote_ident(column), params.len())
            })
            .collect::<Vec<_>>()
            .join(", ");

        let clause = filter.render(&mut params);
        let sql = format!(
            "UPDATE {} SET {assignments} WHERE {clause}",
            quote_ident(&self.table)
        );
        Ok((sql, params))
    }

    /// Executes the update and returns the number of affected rows.
    pub fn run(&self) -> Result<usize> {
        let (sql, params) = self.render()?;
        self.manager.execute_write(&sql, &params)
    }
}

/// Builder for `INSERT INTO <table> (...) VALUES (...)`.
///
/// Created by [`Database::insert_into`](crate::Database::insert_into).
#[derive(Debug)]
pub struct InsertBuilder<'a> {
    manager: &'a ConnectionManager,
    table: String,
    values: Vec<(String, Value)>,
}

impl<'a> InsertBuilder<'a> {
    pub(crate) fn new(manager: &'a ConnectionManager, table: impl Into<String>) -> Self {
        Self {
            manager,
            table: table.into(),
            values: Vec::new(),
        }
    }

    /// Sets the full value mapping, replacing any previous one.
    pub fn values<I, K, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.values = values
            .into_iter()
            .map(|(column, value)| (column.into(), value.into()))
            .collect();
        self
    }

    /// Renders the statement text and its positional parameters.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::MissingClause`] if no values were set.
    pub fn render(&self) -> Result<(String, Vec<Value>)> {
        if self.values.is_empty() {
            return Err(DbError::MissingClause {
                statement: "INSERT",
                clause: "VALUES",
            });
        }

        let columns = self
            .values
            .iter()
            .map(|(column, _)| quote_ident(column))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=self.values.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let params = self
            .values
            .iter()
            .map(|(_, value)| value.clone())
            .collect();

        let sql = format!(
            "INSERT INTO {} ({columns}) VALUES ({placeholders})",
            quote_ident(&self.table)
        );
        Ok((sql, params))
    }

    /// Executes the insert and returns the number of inserted rows.
    pub fn run(&self) -> Result<usize> {
        let (sql, params) = self.render()?;
        self.manager.execute_write(&sql, &params)
    }
}
