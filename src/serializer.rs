//! Pipe-delimited `.tbl` output.
//!
//! Each row type's `Display` impl renders one record in column order with `|`
//! between fields. Values never contain the delimiter, so nothing is quoted.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, SynthError};
use crate::table::Table;

pub const DELIMITER: char = '|';

/// A generated record that can be written as one `.tbl` line.
pub trait TblRow: Display {
    const TABLE: Table;
}

/// Writes the optional header and then one line per row.
pub fn write_rows<W, T>(out: &mut W, rows: &[T], header: bool) -> io::Result<()>
where
    W: Write,
    T: TblRow,
{
    if header {
        let columns = T::TABLE.columns().join(&DELIMITER.to_string());
        writeln!(out, "{columns}")?;
    }
    for row in rows {
        writeln!(out, "{row}")?;
    }
    Ok(())
}

/// Sibling path `<path>.tmp` that output is written to before the rename.
pub(crate) fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

/// Writes `rows` to `path`.
///
/// The data goes to `<path>.tmp` first and is renamed into place once fully
/// flushed, so a failed write never leaves a truncated file under the
/// conventional name. The staging file is not removed on failure.
pub fn write_table<T: TblRow>(rows: &[T], path: &Path, header: bool) -> Result<()> {
    let staged = staging_path(path);
    let wrap = |source: io::Error, path: &Path| SynthError::Write {
        table: T::TABLE,
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(&staged).map_err(|e| wrap(e, &staged))?;
    let mut writer = BufWriter::new(file);
    write_rows(&mut writer, rows, header).map_err(|e| wrap(e, &staged))?;
    writer
        .into_inner()
        .map_err(|e| wrap(e.into_error(), &staged))?
        .sync_all()
        .map_err(|e| wrap(e, &staged))?;
    fs::rename(&staged, path).map_err(|e| wrap(e, path))?;

    debug!(table = %T::TABLE, rows = rows.len(), path = %path.display(), "wrote table");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{nations, regions};

    #[test]
    fn header_then_rows() {
        let mut buf = Vec::new();
        write_rows(&mut buf, regions(), true).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "r_regionkey|r_name|r_comment");
        assert_eq!(lines[1], "0|AFRICA|lar deposits. blithely final packages cajole.");
    }

    #[test]
    fn no_header() {
        let mut buf = Vec::new();
        write_rows(&mut buf, nations(), false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 25);
        assert!(text.starts_with("0|ALGERIA|0|"));
    }

    #[test]
    fn write_table_renames_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("region.tbl");
        write_table(regions(), &path, false).unwrap();
        assert!(path.exists());
        assert!(!staging_path(&path).exists());
        assert_eq!(fs::read_to_string(&path).unwrap().lines().count(), 5);
    }

    #[test]
    fn missing_directory_names_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("nation.tbl");
        let err = write_table(nations(), &path, true).unwrap_err();
        match err {
            SynthError::Write { table, .. } => assert_eq!(table, Table::Nation),
            other => panic!("unexpected error: {other}"),
        }
    }
}
