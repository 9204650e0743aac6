//! Run configuration.
//!
//! Values are layered: serde defaults, then an optional TOML file, then
//! `TPCH_SYNTH_*` environment variables. The binary applies command line
//! flags on top before calling [`SynthConfig::validate`].

use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::cardinality::{Cardinalities, ScaleFactor};
use crate::error::{Result, SynthError};
use crate::table::Table;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_NAME: &str = "tpch_synth";
pub const ENV_PREFIX: &str = "TPCH_SYNTH";
pub const DEFAULT_SCALE_FACTOR: f64 = 0.1;
pub const DEFAULT_OUTPUT_DIR: &str = "tpch_data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pipe-delimited text, one `<table>.tbl` per table
    #[default]
    Tbl,
    /// Apache Parquet, one `<table>.parquet` per table
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Tbl => "tbl",
            OutputFormat::Parquet => "parquet",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = SynthError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tbl" => Ok(OutputFormat::Tbl),
            "parquet" => Ok(OutputFormat::Parquet),
            _ => Err(SynthError::UnknownFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SynthConfig {
    #[serde(default = "default_scale_factor")]
    pub scale_factor: f64,
    /// Seed for every random stream; drawn from entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Table names or aliases; all tables when absent.
    #[serde(default)]
    pub tables: Option<Vec<String>>,
    #[serde(default)]
    pub format: OutputFormat,
    /// Write the column names as the first line of each `.tbl` file.
    #[serde(default = "default_header")]
    pub header: bool,
    /// Also write logs to a daily-rolling file in this directory.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_scale_factor() -> f64 {
    DEFAULT_SCALE_FACTOR
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

fn default_header() -> bool {
    true
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            scale_factor: DEFAULT_SCALE_FACTOR,
            seed: None,
            output_dir: default_output_dir(),
            tables: None,
            format: OutputFormat::default(),
            header: true,
            log_dir: None,
        }
    }
}

/// A configuration that passed validation, with every value resolved.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub scale_factor: ScaleFactor,
    pub counts: Cardinalities,
    pub seed: u64,
    pub tables: Vec<Table>,
    pub output_dir: PathBuf,
    pub format: OutputFormat,
    pub header: bool,
}

impl SynthConfig {
    /// Loads the layered configuration. `path` must exist when given; the
    /// default file name is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };
        let cfg = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("tables"),
            )
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    /// Resolved table selection in generation order, duplicates removed.
    pub fn selected_tables(&self) -> Result<Vec<Table>> {
        let Some(names) = &self.tables else {
            return Ok(Table::ALL.to_vec());
        };
        let mut tables = names
            .iter()
            .map(|name| name.parse())
            .collect::<Result<Vec<Table>>>()?;
        tables.sort();
        tables.dedup();
        Ok(tables)
    }

    /// Rejects bad input before any generation starts.
    pub fn validate(&self) -> Result<ValidatedConfig> {
        let scale_factor = ScaleFactor::new(self.scale_factor)?;
        let counts = Cardinalities::for_scale(scale_factor)?;
        let tables = self.selected_tables()?;
        Ok(ValidatedConfig {
            scale_factor,
            counts,
            seed: self.seed.unwrap_or_else(rand::random),
            tables,
            output_dir: self.output_dir.clone(),
            format: self.format,
            header: self.header,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn defaults_validate() {
        let validated = SynthConfig::default().validate().unwrap();
        assert_eq!(validated.counts.customers, 15_000);
        assert_eq!(validated.tables, Table::ALL.to_vec());
        assert_eq!(validated.format, OutputFormat::Tbl);
        assert!(validated.header);
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("synth.toml");
        fs::write(
            &path,
            "scale_factor = 0.01\nseed = 7\ntables = [\"orders\", \"L\", \"orders\"]\nformat = \"parquet\"\nheader = false\n",
        )
        .unwrap();
        let cfg = SynthConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.seed, Some(7));
        assert!(!cfg.header);
        assert_eq!(cfg.format, OutputFormat::Parquet);

        let validated = cfg.validate().unwrap();
        assert_eq!(validated.seed, 7);
        assert_eq!(validated.tables, vec![Table::Orders, Table::Lineitem]);
        assert_eq!(validated.counts.suppliers, 100);
    }

    #[test]
    fn missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = SynthConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(err, SynthError::Config(_)));
    }

    #[test]
    fn invalid_values_rejected() {
        let cfg = SynthConfig {
            scale_factor: -0.5,
            ..SynthConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(SynthError::InvalidScaleFactor(_))));

        let cfg = SynthConfig {
            tables: Some(vec!["warehouse".into()]),
            ..SynthConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(SynthError::UnknownTable(_))));

        assert!(matches!(
            "csv".parse::<OutputFormat>(),
            Err(SynthError::UnknownFormat(_))
        ));
    }
}
