//! Bulk export and tabular interchange.
//!
//! Writes whole tables out as delimited text files and converts between
//! tables and the in-memory [`DataFrame`] structure. Both directions of the
//! frame conversion preserve column names and order exactly, so a table
//! created from a frame reads back equal to the frame's contents.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use litebase_core::DataFrame;

use crate::builder::quote_ident;
use crate::connection::ConnectionManager;
use crate::error::{DbError, Result};
use crate::schema;

/// Escapes one field for delimited output.
///
/// Fields containing the delimiter, a double quote, or a line break are
/// wrapped in double quotes with embedded quotes doubled.
fn csv_field(field: &str, delimiter: char) -> String {
    if field.contains(delimiter) || field.contains('"') || field.contains('\n') || field.contains('\r')
    {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Writes one `<table>.csv` per selected table into `dir`.
///
/// `tables = None` exports every user table; an explicit subset exports
/// exactly those, failing with [`DbError::UnknownTable`] on an unknown name.
/// The first line of each file holds the column headers. Returns the paths
/// written, in export order.
pub(crate) fn export_csv(
    manager: &ConnectionManager,
    dir: impl AsRef<Path>,
    tables: Option<&[String]>,
    delimiter: char,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let all = schema::table_names(manager)?;

    let selected: Vec<String> = match tables {
        Some(subset) => {
            for name in subset {
                if !all.contains(name) {
                    return Err(DbError::UnknownTable(name.clone()));
                }
            }
            subset.to_vec()
        }
        None => all,
    };

    let mut written = Vec::with_capacity(selected.len());
    for table in &selected {
        let path = dir.join(format!("{table}.csv"));
        write_table(manager, table, &path, delimiter)?;
        tracing::debug!(%table, path = %path.display(), "exported table");
        written.push(path);
    }
    Ok(written)
}

fn write_table(
    manager: &ConnectionManager,
    table: &str,
    path: &Path,
    delimiter: char,
) -> Result<()> {
    let columns = schema::table_columns(manager, table)?;
    let rows = manager.execute(&format!("SELECT * FROM {}", quote_ident(table)), &[])?;

    let mut out = BufWriter::new(File::create(path)?);
    let mut delim = [0u8; 4];
    let delim = delimiter.encode_utf8(&mut delim).as_bytes();

    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            out.write_all(delim)?;
        }
        out.write_all(csv_field(column, delimiter).as_bytes())?;
    }
    out.write_all(b"\n")?;

    for row in &rows {
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                out.write_all(delim)?;
            }
            out.write_all(csv_field(&value.to_string(), delimiter).as_bytes())?;
        }
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

/// Reads a table's full contents into a [`DataFrame`].
pub(crate) fn table_to_frame(manager: &ConnectionManager, table: &str) -> Result<DataFrame> {
    let columns = schema::table_columns(manager, table)?;
    let rows = manager.execute(&format!("SELECT * FROM {}", quote_ident(table)), &[])?;

    let mut frame = DataFrame::new(columns)?;
    for row in rows {
        frame.push_row(row)?;
    }
    Ok(frame)
}

/// Creates a new table named `name` from a frame and inserts every row.
///
/// Columns are created without declared types; SQLite's affinity rules keep
/// the stored values identical to the frame's, so the new table reads back
/// equal to the frame. Fails if a table with that name already exists.
pub(crate) fn frame_to_table(
    manager: &ConnectionManager,
    name: &str,
    frame: &DataFrame,
) -> Result<()> {
    let columns = frame
        .columns()
        .iter()
        .map(|c| quote_ident(c))
        .collect::<Vec<_>>()
        .join(", ");
    manager.execute_write(
        &format!("CREATE TABLE {} ({columns})", quote_ident(name)),
        &[],
    )?;

    let placeholders = (1..=frame.columns().len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let insert = format!(
        "INSERT INTO {} ({columns}) VALUES ({placeholders})",
        quote_ident(name)
    );
    for row in frame.rows() {
        manager.execute_write(&insert, row)?;
    }
    tracing::debug!(table = %name, rows = frame.len(), "created table from frame");
    Ok(())
}

#[cfg(test)]
mod tests {
    use litebase_core::Value;

    use super::*;

    #[test]
    fn test_csv_field_plain() {
        assert_eq!(csv_field("plain", ','), "plain");
        assert_eq!(csv_field("", ','), "");
    }

    #[test]
    fn test_csv_field_quotes_delimiter_and_specials() {
        assert_eq!(csv_field("a,b", ','), "\"a,b\"");
        assert_eq!(csv_field("a,b", ';'), "a,b");
        assert_eq!(csv_field("say \"hi\"", ','), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_field("two\nlines", ','), "\"two\nlines\"");
    }

    #[test]
    fn test_csv_field_renders_values() {
        assert_eq!(csv_field(&Value::Null.to_string(), ','), "");
        assert_eq!(csv_field(&Value::Integer(42).to_string(), ','), "42");
    }
}
