use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use voxel_bench::config::Config;
use voxel_bench::data::loader::load_dataset;
use voxel_bench::data::record::{ConstructionSample, RenderSample, SizeSample};
use voxel_bench::report::{comparison, construction, rendering, TextSummary};

/// Reduce voxel format benchmark logs to comparison tables
#[derive(Parser, Debug)]
#[command(name = "voxel-bench", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// JSON config overriding the default slices, comparisons and markers
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    format: OutputFormat,

    /// Write the report here instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Size against frame time (or rate) Pareto frontiers, 4-line size/fps records
    Rendering { log: PathBuf },
    /// Construction time and peak memory, 4-line duration/memory records
    Construction { log: PathBuf },
    /// Baseline/variant size ratios, 3-line size records
    SizeComparison { log: PathBuf },
    /// Variant/baseline frame rate ratios, 4-line size/fps records
    RateComparison { log: PathBuf },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn emit<R: Serialize + TextSummary>(report: &R, cli: &Cli) -> Result<()> {
    let text = match cli.format {
        OutputFormat::Table => report.render(),
        OutputFormat::Json => serde_json::to_string_pretty(report)?,
    };
    match &cli.output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            info!(path = %path.display(), "wrote report");
        }
        None => println!("{text}"),
    }
    Ok(())
}

fn context(log: &Path) -> String {
    format!("analysing {}", log.display())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    run(&cli)
}

/// Load the config and the log named by the subcommand, then write its report.
fn run(cli: &Cli) -> Result<()> {
    let cfg = match &cli.config {
        Some(path) => {
            Config::load(path).with_context(|| format!("loading config {}", path.display()))?
        }
        None => Config::default(),
    };

    match &cli.command {
        Command::Rendering { log } => {
            let table = load_dataset::<RenderSample>(log, &cfg).with_context(|| context(log))?;
            emit(&rendering::build(&table, &cfg).with_context(|| context(log))?, cli)
        }
        Command::Construction { log } => {
            let table =
                load_dataset::<ConstructionSample>(log, &cfg).with_context(|| context(log))?;
            emit(&construction::build(&table, &cfg).with_context(|| context(log))?, cli)
        }
        Command::SizeComparison { log } => {
            let table = load_dataset::<SizeSample>(log, &cfg).with_context(|| context(log))?;
            emit(
                &comparison::size_comparison(&table, &cfg).with_context(|| context(log))?,
                cli,
            )
        }
        Command::RateComparison { log } => {
            let table = load_dataset::<RenderSample>(log, &cfg).with_context(|| context(log))?;
            emit(
                &comparison::rate_comparison(&table, &cfg).with_context(|| context(log))?,
                cli,
            )
        }
    }
}
