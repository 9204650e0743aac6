//! Command line entry point: `generate` writes a dataset, `verify` checks one.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use tpch_synth::config::OutputFormat;
use tpch_synth::verify::verify_dir;
use tpch_synth::{log, run, SynthConfig, Table};

#[derive(Parser)]
#[command(name = "tpch-synth", version)]
#[command(
    about = "Synthetic TPC-H dataset generator",
    long_about = r#"
Generates the eight TPC-H tables with consistent foreign keys and writes one
pipe-delimited file per table to <output_dir>/<table>.tbl.

Settings are read from tpch_synth.toml (or --config), then TPCH_SYNTH_*
environment variables (a .env file is honored), then command line flags.

Examples

# Scale factor 0.1 into ./tpch_data with a fixed seed
tpch-synth generate -s 0.1 --seed 42

# Only orders and line items, as parquet
tpch-synth generate -s 1 -T orders,lineitem --format parquet -o /tmp/tpch

# Check a generated directory
tpch-synth verify tpch_data
"#
)]
struct Cli {
    /// Verbose output (debug level unless RUST_LOG is set)
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the dataset
    Generate(GenerateArgs),
    /// Check key sequences, foreign keys and value ranges of a .tbl directory
    Verify {
        /// Directory holding the <table>.tbl files
        dir: PathBuf,
    },
}

#[derive(Args)]
struct GenerateArgs {
    /// Config file (TOML); defaults to ./tpch_synth.toml when present
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scale factor, must be > 0
    #[arg(short, long)]
    scale_factor: Option<f64>,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Tables to generate (names or aliases r,n,c,s,P,S,O,L), default all
    #[arg(short = 'T', long, value_delimiter = ',')]
    tables: Option<Vec<String>>,

    /// Output format: tbl or parquet
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Omit the column-name header line from .tbl files
    #[arg(long, default_value_t = false)]
    no_header: bool,

    /// Also write logs to a daily-rolling file in this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

impl GenerateArgs {
    fn into_config(self) -> anyhow::Result<SynthConfig> {
        let mut cfg = SynthConfig::load(self.config.as_deref()).context("loading configuration")?;
        if let Some(scale_factor) = self.scale_factor {
            cfg.scale_factor = scale_factor;
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }
        if let Some(dir) = self.output_dir {
            cfg.output_dir = dir;
        }
        if self.tables.is_some() {
            cfg.tables = self.tables;
        }
        if let Some(format) = self.format {
            cfg.format = format;
        }
        if self.no_header {
            cfg.header = false;
        }
        if self.log_dir.is_some() {
            cfg.log_dir = self.log_dir;
        }
        Ok(cfg)
    }
}

fn generate(args: GenerateArgs, verbose: bool) -> anyhow::Result<()> {
    let cfg = args.into_config()?;
    let _guard = log::init(verbose, cfg.log_dir.as_deref()).context("invalid configuration")?;

    let validated = cfg.validate().context("invalid configuration")?;
    let summary = run(&validated).context("dataset generation failed")?;
    for table in &summary.tables {
        info!(
            table = %table.table,
            rows = table.rows,
            path = %table.path.display(),
            "wrote"
        );
    }
    info!(seed = summary.seed, "rerun with --seed {} to reproduce", summary.seed);
    Ok(())
}

fn verify(dir: PathBuf, verbose: bool) -> anyhow::Result<()> {
    let _guard = log::init(verbose, None)?;
    let report = verify_dir(&dir).with_context(|| format!("verifying {}", dir.display()))?;
    if report.missing.len() == Table::ALL.len() {
        bail!("no .tbl files found in {}", dir.display());
    }
    for violation in &report.violations {
        error!(%violation);
    }
    if !report.is_clean() {
        bail!("{} integrity violations found", report.violation_count);
    }
    info!(tables = report.row_counts.len(), "dataset is consistent");
    Ok(())
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Generate(args) => generate(args, cli.verbose),
        Command::Verify { dir } => verify(dir, cli.verbose),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
