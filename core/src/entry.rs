//! Row entries: one table row as an ordered field mapping.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::Value;

/// One table row, represented as an ordered column → value mapping.
///
/// An entry is tagged with the table it belongs to and, optionally, the
/// column that uniquely identifies the row. Both tags are metadata: equality
/// compares the field mapping only, so entries fetched through different
/// routes (with or without an id column) still compare equal when their
/// values match. Field order follows the table's declared column order and
/// is preserved across clones, but does not affect equality.
///
/// Entries are produced by row fetches, or built directly by callers holding
/// a partial mapping before insertion (e.g. before an autoincrement key
/// exists):
///
/// ```
/// use litebase_core::{Entry, Value};
///
/// let mut entry = Entry::new("customers", None);
/// entry.set("FirstName", "Grace");
/// entry["LastName"] = Value::from("Hopper");
///
/// assert_eq!(entry.columns().collect::<Vec<_>>(), ["FirstName", "LastName"]);
/// assert_eq!(entry["LastName"], Value::from("Hopper"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    /// Name of the table this entry belongs to.
    pub table: String,
    /// Column treated as the row's unique identifier, if any.
    pub id_field: Option<String>,
    // Ordered, with unique column names; uniqueness is enforced by `set`.
    fields: Vec<(String, Value)>,
}

impl Entry {
    /// Creates an empty entry for the given table.
    pub fn new(table: impl Into<String>, id_field: Option<&str>) -> Self {
        Self {
            table: table.into(),
            id_field: id_field.map(String::from),
            fields: Vec::new(),
        }
    }

    /// Creates an entry from ordered `(column, value)` pairs.
    ///
    /// Later pairs overwrite earlier ones with the same column name, keeping
    /// the first occurrence's position.
    ///
    /// ```
    /// use litebase_core::{Entry, Value};
    ///
    /// let entry = Entry::from_pairs(
    ///     [("id", Value::Integer(1)), ("name", Value::from("a"))],
    ///     "things",
    ///     Some("id"),
    /// );
    /// assert_eq!(entry.len(), 2);
    /// assert_eq!(entry.id_value(), Some(&Value::Integer(1)));
    /// ```
    pub fn from_pairs<I, K, V>(pairs: I, table: impl Into<String>, id_field: Option<&str>) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut entry = Self::new(table, id_field);
        for (column, value) in pairs {
            entry.set(column, value);
        }
        entry
    }

    /// Number of fields in the entry.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the entry holds no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Looks up a field's value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Returns `true` if the entry has a field with the given column name.
    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Sets a field's value, overwriting in place when the column already
    /// exists and appending it otherwise.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| *name == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column, value)),
        }
    }

    /// Iterates over `(column, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Iterates over column names in field order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Iterates over values in field order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, value)| value)
    }

    /// Returns the value stored under [`id_field`](Self::id_field), if the
    /// entry carries an id column and a field for it.
    pub fn id_value(&self) -> Option<&Value> {
        self.id_field.as_deref().and_then(|id| self.get(id))
    }
}

/// Entries compare as mappings: same columns, same values, regardless of
/// field order or of the `table`/`id_field` tags.
impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

impl Index<&str> for Entry {
    type Output = Value;

    /// Panics if the column is not present; use [`Entry::get`] for a
    /// fallible lookup.
    fn index(&self, column: &str) -> &Value {
        self.get(column)
            .unwrap_or_else(|| panic!("no field '{column}' in entry for table '{}'", self.table))
    }
}

impl IndexMut<&str> for Entry {
    /// Inserts a [`Value::Null`] field first when the column is new, so
    /// `entry["col"] = value` works for both existing and new columns.
    fn index_mut(&mut self, column: &str) -> &mut Value {
        let pos = match self.fields.iter().position(|(name, _)| name == column) {
            Some(pos) => pos,
            None => {
                self.fields.push((column.to_string(), Value::Null));
                self.fields.len() - 1
            }
        };
        &mut self.fields[pos].1
    }
}
