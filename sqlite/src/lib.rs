//! Ergonomic, entry-oriented access to SQLite database files.
//!
//! This crate is a convenience layer over a single SQLite file: it opens the
//! database with eager validation, introspects its schema, maps rows to
//! ordered [`Entry`] values, and exposes small fluent builders that compile
//! to parameterized SQL. Whole tables move in and out through CSV export and
//! the [`DataFrame`] interchange type.
//!
//! # Architecture
//!
//! - **`connection`** — handle lifecycle (open/close/reconnect) and raw
//!   parameterized statement execution
//! - **`schema`** — live catalog introspection (never cached)
//! - **`convert`** — row ↔ entry mapping and null-filling
//! - **`builder`** — SELECT / UPDATE / INSERT builders with pure rendering
//! - **`export`** — CSV export and [`DataFrame`] interchange
//! - **`database`** — the [`Database`] facade over all of the above
//!
//! # Quick start
//!
//! ```no_run
//! use litebase_sqlite::Database;
//!
//! let db = Database::open("music.db")?;
//!
//! let locals = db
//!     .select()
//!     .columns(["FirstName", "Email"])
//!     .from("customers")
//!     .where_eq("City", "Oslo")
//!     .run()?;
//!
//! for customer in &locals {
//!     println!("{} <{}>", customer["FirstName"], customer["Email"]);
//! }
//! # Ok::<(), litebase_sqlite::DbError>(())
//! ```
//!
//! # Model
//!
//! Usage is single-threaded and synchronous: one open handle per
//! [`Database`], every call runs to completion on the caller's thread, and
//! writes commit immediately under SQLite's autocommit. Concurrent external
//! writers are unsupported.

mod builder;
mod connection;
mod convert;
mod database;
mod error;
mod export;
mod schema;

pub use builder::{InsertBuilder, SelectBuilder, UpdateBuilder};
pub use connection::ConnectionManager;
pub use database::Database;
pub use error::{DbError, Result};

pub use litebase_core::{DataFrame, Entry, FrameError, Value};
