//! Schema introspection against the live catalog.
//!
//! Table and column lists are always re-derived from the connection rather
//! than cached, so they reflect the database as it currently is — including
//! tables created through the same handle moments earlier.

use litebase_core::Value;

use crate::connection::ConnectionManager;
use crate::error::{DbError, Result};

/// Lists user table names in catalog (creation) order.
///
/// Internal `sqlite_*` tables are excluded.
pub(crate) fn table_names(manager: &ConnectionManager) -> Result<Vec<String>> {
    let rows = manager.execute(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        &[],
    )?;
    Ok(rows
        .into_iter()
        .filter_map(|row| row.into_iter().next())
        .filter_map(|value| match value {
            Value::Text(name) => Some(name),
            _ => None,
        })
        .collect())
}

/// Returns `true` if `name` is a user table in the database.
pub(crate) fn is_table(manager: &ConnectionManager, name: &str) -> Result<bool> {
    Ok(table_names(manager)?.iter().any(|t| t == name))
}

/// Lists a table's column names in declaration order.
///
/// # Errors
///
/// Returns [`DbError::UnknownTable`] if the table does not exist.
pub(crate) fn table_columns(manager: &ConnectionManager, table: &str) -> Result<Vec<String>> {
    // pragma_table_info is table-valued, so the name stays a bound parameter.
    let rows = manager.execute(
        "SELECT name FROM pragma_table_info(?1) ORDER BY cid",
        &[Value::from(table)],
    )?;
    if rows.is_empty() {
        return Err(DbError::UnknownTable(table.to_string()));
    }
    Ok(rows
        .into_iter()
        .filter_map(|row| row.into_iter().next())
        .filter_map(|value| match value {
            Value::Text(name) => Some(name),
            _ => None,
        })
        .collect())
}
