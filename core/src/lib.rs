//! Core data model for litebase.
//!
//! This crate defines the types that flow between a SQLite database and
//! calling code, independent of any database driver:
//!
//! - [`Value`] — a scalar matching SQLite's storage classes (null, integer,
//!   real, text, blob).
//! - [`Entry`] — one table row as an ordered column → value mapping, tagged
//!   with its source table and optional id column.
//! - [`DataFrame`] — a generic tabular structure (ordered named columns,
//!   ordered rows) used as the interchange boundary with external tooling.
//!
//! # Example
//!
//! ```
//! use litebase_core::{Entry, Value};
//!
//! let mut entry = Entry::new("customers", Some("CustomerId"));
//! entry.set("FirstName", "Ada");
//! entry.set("LastName", "Lovelace");
//! entry["Email"] = Value::Null;
//!
//! assert_eq!(entry.len(), 3);
//! assert_eq!(entry["FirstName"], Value::from("Ada"));
//! ```

mod entry;
mod frame;
mod value;

pub use entry::Entry;
pub use frame::{DataFrame, FrameError};
pub use value::Value;
