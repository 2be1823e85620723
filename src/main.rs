//! xspeculate - speculative vs sequential branch execution benchmark

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use xspeculate::report::print_summary;
use xspeculate::{
    run_bench, summarize_csv, until_signal, BenchConfig, BenchOptions, CancelScope, CsvSink,
    Engine, RunMode,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    /// One speculative run
    Spec,
    /// One sequential run
    Seq,
    /// Repeated runs of both modes plus speedup
    Bench,
}

#[derive(Parser, Debug)]
#[command(name = "xspeculate")]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(long, value_enum, default_value = "spec")]
    mode: Mode,

    /// JSON config file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Oracle matrix dimension
    #[arg(short = 'n', long)]
    dimension: Option<usize>,

    /// Oracle threshold; trace >= threshold keeps branch A
    #[arg(long, allow_hyphen_values = true)]
    threshold: Option<i64>,

    /// Output CSV file
    #[arg(long, default_value = "metrics.csv")]
    out: PathBuf,

    /// Seed string for the commitment search
    #[arg(long)]
    seed_input: Option<String>,

    /// Leading zero characters the commitment digest must have
    #[arg(long)]
    difficulty: Option<usize>,

    /// Upper bound of the prime enumeration
    #[arg(long)]
    bound: Option<u64>,

    /// Oracle matrix generator seed
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Repetitions per mode for bench
    #[arg(long, default_value_t = 30)]
    runs: u32,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

impl Cli {
    fn load_config(&self) -> Result<BenchConfig> {
        let mut config = match &self.config {
            Some(path) => BenchConfig::from_json_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => BenchConfig::default(),
        };
        if let Some(dimension) = self.dimension {
            config.oracle_dimension = dimension;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(seed) = &self.seed_input {
            config.commitment_seed = seed.clone();
        }
        if let Some(difficulty) = self.difficulty {
            config.commitment_difficulty = difficulty;
        }
        if let Some(bound) = self.bound {
            config.enumeration_bound = bound;
        }
        if self.rng_seed.is_some() {
            config.rng_seed = self.rng_seed;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let config = cli.load_config()?;
    let shutdown = CancelScope::new();
    let engine = Engine::new(config)
        .context("invalid configuration")?
        .with_shutdown(shutdown.clone());

    let interrupt = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
        tracing::warn!("interrupt received; cancelling in-flight runs");
    };

    match until_signal(execute(&cli, &engine), interrupt, &shutdown).await {
        Ok(result) => result,
        Err(_) => {
            // Blocking workloads may still be running; do not wait for them.
            eprintln!("interrupted");
            std::process::exit(130);
        }
    }
}

async fn execute(cli: &Cli, engine: &Engine) -> Result<()> {
    match cli.mode {
        Mode::Spec | Mode::Seq => {
            let mode = match cli.mode {
                Mode::Seq => RunMode::Sequential,
                _ => RunMode::Speculative,
            };
            let mut sink = CsvSink::new(&cli.out);
            let record = engine
                .run_and_record(1, mode, &mut sink)
                .await
                .with_context(|| format!("{} run failed", mode))?;
            print_summary(&record);
        }
        Mode::Bench => {
            if let Some(seed) = engine.config().rng_seed {
                println!("Seed: {}", seed);
            }
            CsvSink::truncate(&cli.out)?;
            let mut sink = CsvSink::new(&cli.out);
            let options = BenchOptions {
                runs: cli.runs,
                ..BenchOptions::default()
            };
            run_bench(engine, &options, &mut sink)
                .await
                .context("bench failed")?;
            let summary = summarize_csv(&cli.out)
                .with_context(|| format!("summarizing {}", cli.out.display()))?;
            println!("{}", summary.render());
        }
    }

    Ok(())
}
