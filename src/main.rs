// SPDX-License-Identifier: MIT
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use num_format::{Locale, ToFormattedString};
use tracing_subscriber::EnvFilter;

use txnbench::benchmark::Benchmark;
use txnbench::benchmark::collector::BenchmarksCollector;
use txnbench::benchmark::writer::BenchmarkWriter;
use txnbench::datasource::DataSource;
use txnbench::session::ProfileSession;
use txnbench::txn::collector::Loader;
use txnbench::txn::loader::BenchmarkLoader;
use txnbench::txn::{CounterFilter, TransactionCollection, TransactionRepo};
use txnbench::types::{CpuInfo, Event};

#[derive(Parser)]
#[command(
    name = "txnbench",
    about = "txnbench: create, discover and load profiling benchmarks"
)]
struct Cli {
    /// Log discovery details (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Freeze profiling runs into a new benchmark
    Make {
        /// Directory that will hold the `benchmark` subdirectory
        destination: PathBuf,
        #[arg(short, long)]
        app_info: PathBuf,
        #[arg(short, long = "samples", required = true)]
        samples: Vec<PathBuf>,
        #[arg(long, default_value = "unknown")]
        cpu_id: String,
        #[arg(long, default_value = "0")]
        cpu_frequency: u64,
        #[arg(short, long = "event")]
        events: Vec<String>,
        #[arg(short, long)]
        legend: Option<String>,
    },
    /// List benchmarks found under candidate directories
    List {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[arg(short = 'n', long, default_value = "10")]
        max_count: usize,
    },
    /// Load benchmark transactions and print a summary
    Load {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        #[arg(short = 'n', long, default_value = "10")]
        max_count: usize,
        #[arg(short = 'x', long = "exclude-counter")]
        exclude_counters: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Make {
            destination,
            app_info,
            samples,
            cpu_id,
            cpu_frequency,
            events,
            legend,
        } => cmd_make(
            &destination,
            &app_info,
            samples,
            CpuInfo::new(cpu_id, cpu_frequency),
            events,
            legend,
        ),
        Commands::List { paths, max_count } => {
            cmd_list(paths, max_count);
            Ok(())
        }
        Commands::Load {
            paths,
            max_count,
            exclude_counters,
        } => cmd_load(paths, max_count, exclude_counters),
    }
}

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "txnbench=debug"
    } else {
        "txnbench=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// ---------------------------------------------------------------------------
// Make subcommand
// ---------------------------------------------------------------------------

fn cmd_make(
    destination: &Path,
    app_info: &Path,
    samples: Vec<PathBuf>,
    cpu_info: CpuInfo,
    events: Vec<String>,
    legend: Option<String>,
) -> Result<()> {
    let data_sources = samples
        .into_iter()
        .map(|run| DataSource::new(app_info, run))
        .collect::<Result<Vec<_>>>()?;

    let session = ProfileSession {
        cpu_info,
        events: events.into_iter().map(Event::user).collect(),
        legend,
        transaction_repo: TransactionRepo::new(TransactionCollection::new(
            "current",
            data_sources,
        )),
    };

    let path = BenchmarkWriter::new()
        .make_benchmark(&session, destination)
        .with_context(|| format!("failed to make benchmark in {}", destination.display()))?;

    eprintln!("Benchmark written to {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// List subcommand
// ---------------------------------------------------------------------------

fn cmd_list(paths: Vec<PathBuf>, max_count: usize) {
    let benchmarks = BenchmarksCollector::new(paths).gather_benchmarks(max_count);

    if benchmarks.is_empty() {
        eprintln!("No benchmarks found.");
        return;
    }

    for benchmark in &benchmarks {
        print_benchmark(benchmark);
    }
}

fn print_benchmark(benchmark: &Benchmark) {
    println!("{}  [{}]", benchmark.name, benchmark.legend);
    println!("  path:   {}", benchmark.path.display());
    println!("  cpu:    {}", benchmark.cpu_info);
    if !benchmark.events.is_empty() {
        let events: Vec<String> = benchmark.events.iter().map(ToString::to_string).collect();
        println!("  events: {}", events.join(", "));
    }
    for source in &benchmark.data_sources {
        println!("  run:    {}", source.samples_path().display());
    }
}

// ---------------------------------------------------------------------------
// Load subcommand
// ---------------------------------------------------------------------------

fn cmd_load(paths: Vec<PathBuf>, max_count: usize, exclude_counters: Vec<String>) -> Result<()> {
    let benchmarks = BenchmarksCollector::new(paths).gather_benchmarks(max_count);
    if benchmarks.is_empty() {
        bail!("no benchmarks found");
    }

    let mut repo = TransactionRepo::default();
    let counter_filter = CounterFilter::new(exclude_counters);
    BenchmarksCollector::load_txns(
        &mut repo,
        &counter_filter,
        &benchmarks,
        |benchmark| -> Box<dyn Loader> { Box::new(BenchmarkLoader::new(benchmark)) },
    )?;

    for collection in repo.benchmarks() {
        println!(
            "{}  [{}]: {} run(s), {} sample file(s), {} bytes, counters: {}",
            collection.name,
            collection.legend,
            collection.data_sources.len(),
            collection.sample_files.len(),
            collection.sample_bytes.to_formatted_string(&Locale::en),
            collection.counters.join(", ")
        );
    }

    eprintln!("Loaded {} benchmark(s)", repo.benchmarks().len());
    Ok(())
}
