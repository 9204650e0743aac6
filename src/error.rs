use std::path::PathBuf;

use thiserror::Error;

use crate::table::Table;

/// Errors surfaced by dataset generation, serialization and verification.
#[derive(Debug, Error)]
pub enum SynthError {
    #[error("scale factor must be a positive finite number, got {0}")]
    InvalidScaleFactor(f64),

    #[error("row count for {table} must be positive, got {count}")]
    InvalidCount { table: Table, count: i64 },

    #[error("unknown table '{0}'")]
    UnknownTable(String),

    #[error("unknown output format '{0}' (expected tbl or parquet)")]
    UnknownFormat(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("failed to write {table} to {path:?}: {source}")]
    Write {
        table: Table,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to create output directory {path:?}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open log directory {path:?}: {source}")]
    LogDir {
        path: PathBuf,
        #[source]
        source: tracing_appender::rolling::InitError,
    },

    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {table} as parquet: {source}")]
    Parquet {
        table: Table,
        #[source]
        source: arrow2::error::Error,
    },

    #[error("{path:?} line {line}: expected {expected} fields, found {found}")]
    MalformedRow {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{path:?} line {line}: cannot parse column {column} value '{value}'")]
    BadValue {
        path: PathBuf,
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// Convenient alias for results returned by this crate.
pub type Result<T> = std::result::Result<T, SynthError>;
