//! Integration tests for the litebase-sqlite crate.

use std::fs;
use std::path::{Path, PathBuf};

use litebase_sqlite::{Database, DbError, Entry, Value};
use tempfile::TempDir;

/// Creates a small music-store fixture database at `dir/music.db`.
fn fixture_db(dir: &Path) -> PathBuf {
    let path = dir.join("music.db");
    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE artists (
            ArtistId INTEGER PRIMARY KEY,
            Name TEXT
        );
        CREATE TABLE customers (
            CustomerId INTEGER PRIMARY KEY,
            FirstName TEXT,
            LastName TEXT,
            Email TEXT
        );
        INSERT INTO artists (Name) VALUES ('AC/DC'), ('Accept');
        INSERT INTO customers (FirstName, LastName, Email) VALUES
            ('Luis', 'Goncalves', 'luisg@embraer.com.br'),
            ('Leonie', 'Koehler', 'leonekohler@surfeu.de'),
            ('Francois', 'Tremblay', 'ftremblay@gmail.com');
        "#,
    )
    .unwrap();
    conn.close().unwrap();
    path
}

/// Opens a fresh fixture database, returning the temp dir to keep it alive.
fn setup() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let path = fixture_db(dir.path());
    let db = Database::open(path).unwrap();
    (dir, db)
}

// =============================================================================
// Opening
// =============================================================================

#[test]
fn test_open_nonexistent_path_fails() {
    let err = Database::open("does_not_exist.db").unwrap_err();
    assert!(matches!(err, DbError::Connection { .. }));
}

#[test]
fn test_open_invalid_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("not_a_db.db");
    fs::write(&path, "this is just text, not a database").unwrap();

    let err = Database::open(&path).unwrap_err();
    assert!(matches!(err, DbError::Connection { .. }));
}

#[test]
fn test_open_empty_file_is_valid_empty_database() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("empty.db");
    fs::write(&path, b"").unwrap();

    let db = Database::open(&path).unwrap();
    assert!(db.table_names().unwrap().is_empty());
}

// =============================================================================
// Schema introspection
// =============================================================================

#[test]
fn test_table_names_and_is_table() {
    let (_dir, db) = setup();
    let names = db.table_names().unwrap();

    assert_eq!(names, ["artists", "customers"]);
    assert!(db.is_table("artists").unwrap());
    assert!(!db.is_table("sqlite_master").unwrap());
    assert!(!db.is_table("nope").unwrap());
}

#[test]
fn test_columns_in_declaration_order() {
    let (_dir, db) = setup();
    assert_eq!(
        db.columns("customers").unwrap(),
        ["CustomerId", "FirstName", "LastName", "Email"]
    );

    let err = db.columns("nope").unwrap_err();
    assert!(matches!(err, DbError::UnknownTable(name) if name == "nope"));
}

#[test]
fn test_raw_rows_match_column_width() {
    let (_dir, db) = setup();
    for table in db.table_names().unwrap() {
        let columns = db.columns(&table).unwrap();
        for row in db.table_raw(&table).unwrap() {
            assert_eq!(row.len(), columns.len());
        }
    }
}

// =============================================================================
// Entries
// =============================================================================

#[test]
fn test_entry_round_trip_by_id() {
    let (_dir, db) = setup();

    let from_table = db.table_entries("customers", Some("CustomerId")).unwrap();
    let by_id = db.entry_by_id("customers", "CustomerId", 1).unwrap();

    assert_eq!(from_table.len(), 3);
    assert_eq!(by_id.len(), from_table[0].len());
    assert_eq!(by_id, from_table[0]);
    assert_eq!(by_id.table, "customers");
    assert_eq!(by_id.id_field.as_deref(), Some("CustomerId"));
}

#[test]
fn test_entry_by_id_miss_fails() {
    let (_dir, db) = setup();
    let err = db.entry_by_id("customers", "CustomerId", 999).unwrap_err();
    assert!(matches!(err, DbError::EntryNotFound { .. }));
}

#[test]
fn test_fill_null_widens_to_table_width() {
    let (_dir, db) = setup();

    let partial = Entry::from_pairs(
        [("FirstName", Value::from("TestName"))],
        "customers",
        None,
    );
    let filled = db.fill_null(&partial).unwrap();

    assert_eq!(filled.len(), db.columns("customers").unwrap().len());
    assert_eq!(filled["FirstName"], Value::from("TestName"));
    assert_eq!(filled["Email"], Value::Null);
}

// =============================================================================
// SELECT builder
// =============================================================================

#[test]
fn test_select_matches_table_fetch() {
    let (_dir, db) = setup();

    let q = db.select().from("customers");
    let table = db.table_entries("customers", None).unwrap();

    assert_eq!(q.run().unwrap(), table);
    assert_eq!(q.run_raw().unwrap(), db.table_raw("customers").unwrap());
}

#[test]
fn test_select_where_eq_and_raw_agree() {
    let (_dir, db) = setup();
    let table = db.table_entries("customers", None).unwrap();

    let eq = db
        .select()
        .from("customers")
        .where_eq("CustomerId", 1)
        .run()
        .unwrap();
    let raw = db
        .select()
        .from("customers")
        .where_raw("CustomerId = 1")
        .run()
        .unwrap();

    assert_eq!(eq[0], table[0]);
    assert_eq!(raw[0], table[0]);
}

#[test]
fn test_select_explicit_columns_narrow_entries() {
    let (_dir, db) = setup();

    let narrow = db
        .select()
        .columns(["FirstName", "LastName"])
        .from("customers")
        .run()
        .unwrap();
    assert_eq!(narrow[0].len(), 2);

    let narrower = db
        .select()
        .columns(["FirstName"])
        .from("customers")
        .where_eq("CustomerId", 1)
        .run()
        .unwrap();
    assert_eq!(narrower.len(), 1);
    assert_eq!(narrower[0].len(), 1);
}

#[test]
fn test_select_without_from_fails_at_run() {
    let (_dir, db) = setup();
    let err = db.select().run().unwrap_err();
    assert!(matches!(err, DbError::MissingClause { clause: "FROM", .. }));
}

// =============================================================================
// INSERT
// =============================================================================

#[test]
fn test_insert_builder_and_refetch() {
    let (_dir, db) = setup();
    let before = db.table_entries("customers", None).unwrap();

    let inserted = db
        .insert_into("customers")
        .values([
            ("FirstName", "TestFirst"),
            ("LastName", "TestLast"),
            ("Email", "test@mail.com"),
        ])
        .run()
        .unwrap();
    assert_eq!(inserted, 1);

    let after = db.table_entries("customers", None).unwrap();
    assert_eq!(after.len(), before.len() + 1);

    let last = after.last().unwrap();
    assert_eq!(last["FirstName"], Value::from("TestFirst"));
    assert_eq!(last["LastName"], Value::from("TestLast"));
    assert_eq!(last["Email"], Value::from("test@mail.com"));
}

#[test]
fn test_insert_entry_with_fill_null() {
    let (_dir, db) = setup();
    let before = db.table_entries("customers", None).unwrap();

    let entry = Entry::from_pairs(
        [("FirstName", Value::from("OnlyFirst"))],
        "customers",
        None,
    );
    db.insert_entry(&entry, true).unwrap();

    let after = db.table_entries("customers", None).unwrap();
    assert_eq!(after.len(), before.len() + 1);

    let last = after.last().unwrap();
    assert_eq!(last["FirstName"], Value::from("OnlyFirst"));
    assert_eq!(last["Email"], Value::Null);
    // The null-filled primary key still autoincrements.
    assert_eq!(last["CustomerId"], Value::Integer(4));
}

// =============================================================================
// UPDATE
// =============================================================================

#[test]
fn test_update_builder_changes_one_field_only() {
    let (_dir, db) = setup();
    let before = db.entry_by_id("customers", "CustomerId", 1).unwrap();

    db.update("customers")
        .set([("FirstName", "TestName")])
        .where_eq("CustomerId", 1)
        .run()
        .unwrap();

    let after = db.entry_by_id("customers", "CustomerId", 1).unwrap();
    assert_eq!(after["FirstName"], Value::from("TestName"));
    for column in ["CustomerId", "LastName", "Email"] {
        assert_eq!(after[column], before[column]);
    }
}

#[test]
fn test_update_entry_round_trip() {
    let (_dir, db) = setup();

    let mut entry = db.entry_by_id("customers", "CustomerId", 1).unwrap();
    entry["FirstName"] = Value::from("TestName");
    db.update_entry(&entry).unwrap();

    let refetched = db.table_entries("customers", None).unwrap();
    assert_eq!(refetched[0]["FirstName"], Value::from("TestName"));
    assert_eq!(entry, refetched[0]);
}

#[test]
fn test_update_entry_without_id_field_fails() {
    let (_dir, db) = setup();
    let entry = Entry::from_pairs(
        [("FirstName", Value::from("X"))],
        "customers",
        None,
    );
    let err = db.update_entry(&entry).unwrap_err();
    assert!(matches!(err, DbError::MissingIdField(table) if table == "customers"));
}

// =============================================================================
// Close / reconnect
// =============================================================================

#[test]
fn test_operations_after_close_fail_until_reconnect() {
    let (_dir, mut db) = setup();

    db.close().unwrap();
    assert!(!db.is_open());
    assert!(matches!(
        db.table_names().unwrap_err(),
        DbError::ClosedConnection
    ));
    assert!(matches!(
        db.select().from("customers").run().unwrap_err(),
        DbError::ClosedConnection
    ));

    db.reconnect().unwrap();
    assert!(db.is_open());
    assert_eq!(db.table_names().unwrap().len(), 2);
}

#[test]
fn test_reconnect_while_open_fails() {
    let (_dir, mut db) = setup();
    assert!(matches!(
        db.reconnect().unwrap_err(),
        DbError::Connection { .. }
    ));
}

// =============================================================================
// Snapshot comparison
// =============================================================================

#[test]
fn test_snapshot_eq_diverges_and_converges() {
    let dir = TempDir::new().unwrap();
    let original = fixture_db(dir.path());
    let copy = dir.path().join("copy.db");
    fs::copy(&original, &copy).unwrap();

    let db1 = Database::open(&copy).unwrap();
    let db2 = Database::open(&original).unwrap();
    assert!(db1.snapshot_eq(&db2).unwrap());

    let mut entry = db1.entry_by_id("customers", "CustomerId", 1).unwrap();
    entry["FirstName"] = Value::from("Different Name");
    db1.update_entry(&entry).unwrap();
    assert!(!db1.snapshot_eq(&db2).unwrap());

    // Applying the same change to the other file converges them again.
    db2.update_entry(&entry).unwrap();
    assert!(db1.snapshot_eq(&db2).unwrap());
}

#[test]
fn test_snapshot_eq_detects_table_set_mismatch() {
    let dir = TempDir::new().unwrap();
    let original = fixture_db(dir.path());
    let copy = dir.path().join("copy.db");
    fs::copy(&original, &copy).unwrap();

    let db1 = Database::open(&copy).unwrap();
    let db2 = Database::open(&original).unwrap();

    db1.manager()
        .execute_write("CREATE TABLE extra (Id INTEGER PRIMARY KEY)", &[])
        .unwrap();
    assert!(!db1.snapshot_eq(&db2).unwrap());
}

#[test]
fn test_snapshot_eq_against_closed_handle_fails() {
    let dir = TempDir::new().unwrap();
    let original = fixture_db(dir.path());
    let copy = dir.path().join("copy.db");
    fs::copy(&original, &copy).unwrap();

    let db1 = Database::open(&copy).unwrap();
    let mut db2 = Database::open(&original).unwrap();
    db2.close().unwrap();

    assert!(matches!(
        db1.snapshot_eq(&db2).unwrap_err(),
        DbError::ClosedConnection
    ));
    assert!(matches!(
        db2.snapshot_eq(&db1).unwrap_err(),
        DbError::ClosedConnection
    ));
}

// =============================================================================
// CSV export
// =============================================================================

#[test]
fn test_export_csv_subset_and_all() {
    let (_dir, db) = setup();
    let out = TempDir::new().unwrap();

    let subset = vec!["customers".to_string()];
    let written = db.export_csv(out.path(), Some(&subset), ',').unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(fs::read_dir(out.path()).unwrap().count(), 1);

    let written = db.export_csv(out.path(), None, ',').unwrap();
    assert_eq!(written.len(), db.table_names().unwrap().len());
    assert_eq!(
        fs::read_dir(out.path()).unwrap().count(),
        db.table_names().unwrap().len()
    );
}

#[test]
fn test_export_csv_content_and_quoting() {
    let (_dir, db) = setup();
    let out = TempDir::new().unwrap();

    // 'AC/DC' is plain; a name containing the delimiter must be quoted.
    db.insert_into("artists")
        .values([("Name", "Crosby, Stills & Nash")])
        .run()
        .unwrap();

    let subset = vec!["artists".to_string()];
    db.export_csv(out.path(), Some(&subset), ',').unwrap();

    let content = fs::read_to_string(out.path().join("artists.csv")).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("ArtistId,Name"));
    assert_eq!(lines.next(), Some("1,AC/DC"));
    assert_eq!(lines.next(), Some("2,Accept"));
    assert_eq!(lines.next(), Some("3,\"Crosby, Stills & Nash\""));
}

#[test]
fn test_export_csv_custom_delimiter() {
    let (_dir, db) = setup();
    let out = TempDir::new().unwrap();

    let subset = vec!["artists".to_string()];
    db.export_csv(out.path(), Some(&subset), ';').unwrap();

    let content = fs::read_to_string(out.path().join("artists.csv")).unwrap();
    assert!(content.starts_with("ArtistId;Name\n"));
}

#[test]
fn test_export_csv_unknown_table_fails() {
    let (_dir, db) = setup();
    let out = TempDir::new().unwrap();

    let subset = vec!["nope".to_string()];
    let err = db.export_csv(out.path(), Some(&subset), ',').unwrap_err();
    assert!(matches!(err, DbError::UnknownTable(name) if name == "nope"));
}

// =============================================================================
// DataFrame interchange
// =============================================================================

#[test]
fn test_frame_round_trip() {
    let (_dir, db) = setup();

    let frame = db.table_to_frame("customers").unwrap();
    assert_eq!(frame.columns(), db.columns("customers").unwrap().as_slice());
    assert_eq!(frame.len(), 3);

    db.frame_to_table("customers_copy", &frame).unwrap();

    // The new table lands at the end of the catalog.
    assert_eq!(db.table_names().unwrap().last().unwrap(), "customers_copy");

    let copied = db.table_entries("customers_copy", None).unwrap();
    let source = db.table_entries("customers", None).unwrap();
    assert_eq!(copied.len(), source.len());
    for (copy, original) in copied.iter().zip(&source) {
        assert_eq!(copy, original);
    }

    // And the frame itself reads back unchanged.
    assert_eq!(db.table_to_frame("customers_copy").unwrap(), frame);
}

#[test]
fn test_frame_to_existing_table_fails() {
    let (_dir, db) = setup();
    let frame = db.table_to_frame("artists").unwrap();
    let err = db.frame_to_table("artists", &frame).unwrap_err();
    assert!(matches!(err, DbError::Sqlite(_)));
}
