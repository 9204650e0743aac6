//! Synthetic TPC-H style dataset generator.
//!
//! Produces the eight TPC-H tables at a chosen scale factor with consistent
//! foreign keys, sequential primary keys and a unique `(partkey, suppkey)`
//! relation, then writes them as `|`-delimited `.tbl` files (or Parquet)
//! ready for bulk loading.
//!
//! ```
//! use tpch_synth::cardinality::{Cardinalities, ScaleFactor};
//! use tpch_synth::generator::Dataset;
//!
//! let counts = Cardinalities::for_scale(ScaleFactor::new(0.001).unwrap()).unwrap();
//! let data = Dataset::generate(counts, 42).unwrap();
//! assert_eq!(data.customers.len(), 150);
//! assert_eq!(data.nations.len(), 25);
//! ```
//!
//! Row counts for customer, supplier, part and orders are fixed by the scale
//! factor. PARTSUPP and LINEITEM sizes depend on random fan-outs and are
//! reproducible for a fixed seed.

pub mod cardinality;
pub mod config;
pub mod entities;
pub mod error;
pub mod generator;
pub mod log;
pub mod orders;
pub mod parquet;
pub mod partsupp;
pub mod reader;
pub mod reference;
pub mod sampling;
pub mod serializer;
pub mod table;
pub mod values;
pub mod verify;

pub use config::{OutputFormat, SynthConfig, ValidatedConfig};
pub use error::{Result, SynthError};
pub use generator::{run, Dataset, RunSummary};
pub use table::Table;
