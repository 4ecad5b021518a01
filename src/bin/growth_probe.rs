use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use lcs_growth::{
    builder::{DEFAULT_INITIAL_SIZE, DEFAULT_MAX_TIME_SECONDS, DEFAULT_OUTPUT},
    run_interruptible, DriverConfig, RandomLowercase,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "growth_probe")]
#[command(about = "Empirically measure how LCS running time grows with input size")]
#[command(long_about = "
Generates pairs of random lowercase strings, times the dynamic-programming
LCS engine on them and doubles the size until one run takes at least
--max-time-seconds. Every run is appended to a CSV log as it completes.

Press Ctrl-C to stop after the current run; press it again to exit at once.")]
struct Options {
    /// Stop once a single run takes at least this many seconds
    #[arg(long, default_value_t = DEFAULT_MAX_TIME_SECONDS)]
    max_time_seconds: f64,

    /// Length of the first generated pair
    #[arg(long, default_value_t = DEFAULT_INITIAL_SIZE)]
    initial_size: usize,

    /// CSV result log (truncated at start)
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Seed for reproducible inputs (default: OS entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many runs even if the time budget was never hit
    #[arg(long)]
    max_iterations: Option<usize>,

    /// Largest DP table to allocate, in MiB (default: memory available at each step)
    #[arg(long)]
    memory_ceiling_mib: Option<u64>,

    /// Diagnostic log filter written to stderr (e.g. "info", "lcs_growth=trace")
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let options = Options::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&options.log_level))
        .with_writer(std::io::stderr)
        .init();

    let source = match options.seed {
        Some(seed) => RandomLowercase::seeded(seed),
        None => RandomLowercase::from_entropy(),
    };
    let config = DriverConfig {
        max_time_seconds: options.max_time_seconds,
        initial_size: options.initial_size,
        output: options.output.clone(),
        max_iterations: options.max_iterations,
        memory_ceiling_bytes: options.memory_ceiling_mib.map(|mib| mib.saturating_mul(1 << 20)),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let summary = run_interruptible(source, config, &mut out)
        .with_context(|| format!("analysis writing {} failed", options.output.display()))?;

    tracing::info!(
        reason = %summary.reason,
        iterations = summary.iterations(),
        last_size = ?summary.last_tested_size(),
        "analysis finished"
    );
    Ok(())
}
