//! End-to-end dataset generation.
//!
//! Tables are produced in dependency order. Each collection is generated,
//! handed to the writer and dropped before the next one is built; only row
//! counts flow between steps, so a table never needs its parents in memory.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::cardinality::Cardinalities;
use crate::config::{OutputFormat, ValidatedConfig};
use crate::entities::{generate_customers, generate_parts, generate_suppliers, Customer, Part, Supplier};
use crate::error::{Result, SynthError};
use crate::orders::{generate_orders, LineItem, Order, OrderHierarchy, OrderKeySpace};
use crate::parquet::{write_parquet, ArrowRow};
use crate::partsupp::{generate_partsupp, PartSupp, PartSuppOutcome, SeenPairs, MAX_SUPPLIERS_PER_PART};
use crate::reference::{nations, regions, Nation, Region};
use crate::sampling::{table_rng, BoundedRetry};
use crate::serializer::write_table;
use crate::table::Table;

/// Outcome of writing one table.
#[derive(Debug, Clone)]
pub struct TableSummary {
    pub table: Table,
    pub rows: u64,
    pub path: PathBuf,
    pub elapsed: Duration,
}

/// Outcome of a full run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub seed: u64,
    pub counts: Cardinalities,
    pub tables: Vec<TableSummary>,
    /// PARTSUPP slots abandoned after exhausting their retries.
    pub dropped_partsupp_slots: u64,
}

impl RunSummary {
    pub fn rows(&self, table: Table) -> Option<u64> {
        self.tables.iter().find(|t| t.table == table).map(|t| t.rows)
    }
}

/// Every table held in memory at once. Intended for tests and small scale
/// factors; [`run`] streams table by table instead.
#[derive(Debug)]
pub struct Dataset {
    pub regions: Vec<Region>,
    pub nations: Vec<Nation>,
    pub customers: Vec<Customer>,
    pub suppliers: Vec<Supplier>,
    pub parts: Vec<Part>,
    pub partsupp: PartSuppOutcome,
    pub orders: OrderHierarchy,
}

impl Dataset {
    pub fn generate(counts: Cardinalities, seed: u64) -> Result<Self> {
        counts.validate()?;
        Ok(Dataset {
            regions: regions().to_vec(),
            nations: nations().to_vec(),
            customers: customers(counts, seed),
            suppliers: suppliers(counts, seed),
            parts: parts(counts, seed),
            partsupp: partsupp(counts, seed),
            orders: order_hierarchy(counts, seed)?,
        })
    }
}

fn customers(counts: Cardinalities, seed: u64) -> Vec<Customer> {
    generate_customers(&mut table_rng(seed, Table::Customer), counts.customers, nations())
}

fn suppliers(counts: Cardinalities, seed: u64) -> Vec<Supplier> {
    generate_suppliers(&mut table_rng(seed, Table::Supplier), counts.suppliers, nations())
}

fn parts(counts: Cardinalities, seed: u64) -> Vec<Part> {
    generate_parts(&mut table_rng(seed, Table::Part), counts.parts)
}

fn partsupp(counts: Cardinalities, seed: u64) -> PartSuppOutcome {
    let capacity = (counts.parts * (MAX_SUPPLIERS_PER_PART + 1) / 2) as usize;
    let outcome = generate_partsupp(
        &mut table_rng(seed, Table::Partsupp),
        counts.parts,
        counts.suppliers,
        SeenPairs::with_capacity(capacity),
        BoundedRetry::default(),
    );
    info!(
        requested = outcome.requested_slots,
        dropped = outcome.dropped_slots,
        fill_ratio = outcome.fill_ratio(),
        "partsupp slots filled"
    );
    outcome
}

/// Orders and line items share one random stream since line items are
/// spawned while walking the orders.
fn order_hierarchy(counts: Cardinalities, seed: u64) -> Result<OrderHierarchy> {
    generate_orders(
        &mut table_rng(seed, Table::Orders),
        counts.orders,
        OrderKeySpace {
            customers: counts.customers,
            parts: counts.parts,
            suppliers: counts.suppliers,
        },
    )
}

struct Writer<'a> {
    config: &'a ValidatedConfig,
    summaries: Vec<TableSummary>,
}

impl Writer<'_> {
    fn wants(&self, table: Table) -> bool {
        self.config.tables.contains(&table)
    }

    fn emit<T: ArrowRow>(&mut self, rows: &[T], started: Instant) -> Result<()> {
        let table = T::TABLE;
        let path = self
            .config
            .output_dir
            .join(table.file_name(self.config.format.extension()));
        match self.config.format {
            OutputFormat::Tbl => write_table(rows, &path, self.config.header)?,
            OutputFormat::Parquet => write_parquet(rows, &path)?,
        }
        let elapsed = started.elapsed();
        info!(%table, rows = rows.len(), ?elapsed, path = %path.display(), "generated");
        self.summaries.push(TableSummary {
            table,
            rows: rows.len() as u64,
            path,
            elapsed,
        });
        Ok(())
    }
}

/// Generates and writes every selected table.
pub fn run(config: &ValidatedConfig) -> Result<RunSummary> {
    let counts = config.counts;
    let seed = config.seed;
    info!(
        scale_factor = config.scale_factor.get(),
        seed,
        customers = counts.customers,
        suppliers = counts.suppliers,
        parts = counts.parts,
        orders = counts.orders,
        expected_lineitems = counts.expected_lineitems(),
        "starting generation"
    );

    fs::create_dir_all(&config.output_dir).map_err(|source| SynthError::OutputDir {
        path: config.output_dir.clone(),
        source,
    })?;

    let mut writer = Writer {
        config,
        summaries: Vec::with_capacity(config.tables.len()),
    };
    let mut dropped_partsupp_slots = 0;

    if writer.wants(Table::Region) {
        writer.emit(regions(), Instant::now())?;
    }
    if writer.wants(Table::Nation) {
        writer.emit(nations(), Instant::now())?;
    }
    if writer.wants(Table::Customer) {
        let started = Instant::now();
        writer.emit(&customers(counts, seed), started)?;
    }
    if writer.wants(Table::Supplier) {
        let started = Instant::now();
        writer.emit(&suppliers(counts, seed), started)?;
    }
    if writer.wants(Table::Part) {
        let started = Instant::now();
        writer.emit(&parts(counts, seed), started)?;
    }
    if writer.wants(Table::Partsupp) {
        let started = Instant::now();
        let outcome = partsupp(counts, seed);
        dropped_partsupp_slots = outcome.dropped_slots;
        writer.emit::<PartSupp>(&outcome.rows, started)?;
    }
    if writer.wants(Table::Orders) || writer.wants(Table::Lineitem) {
        let started = Instant::now();
        let hierarchy = order_hierarchy(counts, seed)?;
        debug!(
            orders = hierarchy.orders.len(),
            lineitems = hierarchy.lineitems.len(),
            "order hierarchy built"
        );
        let OrderHierarchy { orders, lineitems } = hierarchy;
        if writer.wants(Table::Orders) {
            writer.emit::<Order>(&orders, started)?;
        }
        drop(orders);
        // line items are generated alongside orders; time only their write
        if writer.wants(Table::Lineitem) {
            writer.emit::<LineItem>(&lineitems, Instant::now())?;
        }
    }

    let summary = RunSummary {
        seed,
        counts,
        tables: writer.summaries,
        dropped_partsupp_slots,
    };
    let total_rows: u64 = summary.tables.iter().map(|t| t.rows).sum();
    info!(tables = summary.tables.len(), total_rows, "generation complete");
    Ok(summary)
}
