//! Row mapping and value bridging.
//!
//! Converts the raw fixed-width rows produced by the connection layer into
//! [`Entry`] values, widens partial entries to a table's full column set
//! ("null-filling"), and bridges between [`Value`] and rusqlite's own value
//! types for parameter binding and result reading.

use litebase_core::{Entry, Value};
use rusqlite::types::ValueRef;

use crate::error::{DbError, Result};

/// Zips a raw row with its column names into an [`Entry`].
///
/// # Errors
///
/// Returns [`DbError::RowShape`] if the value and column counts differ.
pub(crate) fn map_row(
    raw: Vec<Value>,
    columns: &[String],
    table: &str,
    id_field: Option<&str>,
) -> Result<Entry> {
    if raw.len() != columns.len() {
        return Err(DbError::RowShape {
            expected: columns.len(),
            actual: raw.len(),
        });
    }
    Ok(Entry::from_pairs(
        columns.iter().map(String::as_str).zip(raw),
        table,
        id_field,
    ))
}

/// Widens `entry` to cover every column in `full_columns`.
///
/// Columns already present keep their value; absent ones become
/// [`Value::Null`]. The result's field order follows `full_columns`, so an
/// insert built from it supplies an explicit value for every declared
/// column instead of leaving the engine to apply defaults.
pub(crate) fn fill_null(entry: &Entry, full_columns: &[String]) -> Entry {
    Entry::from_pairs(
        full_columns.iter().map(|column| {
            (
                column.as_str(),
                entry.get(column).cloned().unwrap_or(Value::Null),
            )
        }),
        entry.table.clone(),
        entry.id_field.as_deref(),
    )
}

/// Converts a [`Value`] into rusqlite's owned value type for binding.
///
/// Going through the owned type keeps [`Value`] free of any driver
/// dependency while still binding positionally.
pub(crate) fn value_to_sql(value: &Value) -> rusqlite::types::Value {
    match value {
        Value::Null => rusqlite::types::Value::Null,
        Value::Integer(i) => rusqlite::types::Value::Integer(*i),
        Value::Real(r) => rusqlite::types::Value::Real(*r),
        Value::Text(s) => rusqlite::types::Value::Text(s.clone()),
        Value::Blob(b) => rusqlite::types::Value::Blob(b.clone()),
    }
}

/// Converts a result-cell reference into a [`Value`].
pub(crate) fn value_from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(s) => Value::Text(String::from_utf8_lossy(s).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_map_row_zips_in_order() {
        let entry = map_row(
            vec![Value::Integer(1), Value::from("Ada")],
            &columns(&["CustomerId", "FirstName"]),
            "customers",
            Some("CustomerId"),
        )
        .unwrap();

        assert_eq!(entry.table, "customers");
        assert_eq!(entry.id_field.as_deref(), Some("CustomerId"));
        assert_eq!(
            entry.columns().collect::<Vec<_>>(),
            ["CustomerId", "FirstName"]
        );
        assert_eq!(entry["FirstName"], Value::from("Ada"));
    }

    #[test]
    fn test_map_row_rejects_width_mismatch() {
        let err = map_row(
            vec![Value::Integer(1)],
            &columns(&["a", "b"]),
            "t",
            None,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            DbError::RowShape {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_fill_null_widens_and_preserves() {
        let partial = Entry::from_pairs(
            [("FirstName", Value::from("Ada"))],
            "customers",
            None,
        );
        let full = fill_null(&partial, &columns(&["CustomerId", "FirstName", "Email"]));

        assert_eq!(full.len(), 3);
        assert_eq!(full["FirstName"], Value::from("Ada"));
        assert_eq!(full["CustomerId"], Value::Null);
        assert_eq!(full["Email"], Value::Null);
        assert_eq!(
            full.columns().collect::<Vec<_>>(),
            ["CustomerId", "FirstName", "Email"]
        );
    }

    #[test]
    fn test_value_bridging_round_trip() {
        let values = [
            Value::Null,
            Value::Integer(-7),
            Value::Real(0.5),
            Value::from("text"),
            Value::Blob(vec![1, 2, 3]),
        ];
        for value in &values {
            let owned = value_to_sql(value);
            let back = value_from_sql(ValueRef::from(&owned));
            assert_eq!(&back, value);
        }
    }
}
