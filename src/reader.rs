//! Reads `.tbl` files back the way the bulk loader does.
//!
//! Blank lines are skipped, as is a leading header whose first field is the
//! table's first column name. Every other line must carry exactly the
//! table's column count.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Result, SynthError};
use crate::serializer::DELIMITER;
use crate::table::Table;

/// One data line of a `.tbl` file, with fields trimmed.
#[derive(Debug)]
pub struct Record<'a> {
    pub table: Table,
    pub path: &'a Path,
    /// 1-based line number in the file
    pub line: usize,
    pub fields: Vec<&'a str>,
}

impl Record<'_> {
    /// Parses column `index`, reporting the column name on failure.
    pub fn parse<T: FromStr>(&self, index: usize) -> Result<T> {
        let raw = self.fields[index];
        raw.parse().map_err(|_| SynthError::BadValue {
            path: self.path.to_path_buf(),
            line: self.line,
            column: self.table.columns()[index],
            value: raw.to_string(),
        })
    }

    pub fn text(&self, index: usize) -> &str {
        self.fields[index]
    }
}

/// Calls `visit` for every data record in `path`, returning the record count.
pub fn for_each_record<F>(path: &Path, table: Table, mut visit: F) -> Result<u64>
where
    F: FnMut(&Record<'_>) -> Result<()>,
{
    let read_err = |source| SynthError::Read {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(read_err)?;
    let reader = BufReader::new(file);
    let columns = table.columns();

    let mut seen_data = false;
    let mut records = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(read_err)?;
        let fields: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
        if fields.iter().all(|f| f.is_empty()) {
            continue;
        }
        if !seen_data && fields[0] == columns[0] {
            seen_data = true;
            continue;
        }
        seen_data = true;

        if fields.len() != columns.len() {
            return Err(SynthError::MalformedRow {
                path: path.to_path_buf(),
                line: index + 1,
                expected: columns.len(),
                found: fields.len(),
            });
        }
        visit(&Record {
            table,
            path,
            line: index + 1,
            fields,
        })?;
        records += 1;
    }
    Ok(records)
}

/// Conventional location of a table's `.tbl` file inside `dir`.
pub fn tbl_path(dir: &Path, table: Table) -> PathBuf {
    dir.join(table.file_name("tbl"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn skips_header_and_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "region.tbl",
            "r_regionkey|r_name|r_comment\n\n0|AFRICA|x\n  \n1|AMERICA|y\n",
        );
        let mut names = Vec::new();
        let count = for_each_record(&path, Table::Region, |r| {
            names.push(r.text(1).to_string());
            Ok(())
        })
        .unwrap();
        assert_eq!(count, 2);
        assert_eq!(names, ["AFRICA", "AMERICA"]);
    }

    #[test]
    fn header_only_skipped_when_leading() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "region.tbl", "0|AFRICA|x\nr_regionkey|r_name|r_comment\n");
        let err = for_each_record(&path, Table::Region, |r| r.parse::<i64>(0).map(|_| ())).unwrap_err();
        assert!(matches!(err, SynthError::BadValue { line: 2, column: "r_regionkey", .. }));
    }

    #[test]
    fn wrong_field_count_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "nation.tbl", "0|ALGERIA|0\n");
        let err = for_each_record(&path, Table::Nation, |_| Ok(())).unwrap_err();
        assert!(matches!(
            err,
            SynthError::MalformedRow {
                line: 1,
                expected: 4,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = for_each_record(&tbl_path(dir.path(), Table::Part), Table::Part, |_| Ok(()))
            .unwrap_err();
        assert!(matches!(err, SynthError::Read { .. }));
    }
}
