//! Growth driver: doubles the input size until one LCS run exceeds the budget.
//!
//! Each iteration:
//! 1. draws two independent sequences of the current size,
//! 2. times [`lcs`](crate::lcs::lcs) on them,
//! 3. prints a progress line and appends a row to the CSV log,
//! 4. stops if the run took at least `max_time_seconds`, else doubles the size.
//!
//! Before the engine runs, the size of its DP table is checked against the
//! memory ceiling; a pair that would not fit ends the run with
//! [`StopReason::MemoryLimit`] instead of an allocation failure.
//!
//! Cancellation is cooperative: the [`CancelFlag`] is polled before each
//! iteration. A run already inside the engine completes and is recorded; the
//! loop then exits before starting the next one. [`run_interruptible`] wires
//! the flag to Ctrl-C.
//!
//! ```no_run
//! use lcs_growth::{GrowthDriverBuilder, RandomLowercase};
//!
//! let mut driver = GrowthDriverBuilder::new(RandomLowercase::seeded(7))
//!     .with_max_time_seconds(1.0)
//!     .with_output("lcs_analysis.csv")
//!     .build()
//!     .unwrap();
//! let mut stdout = std::io::stdout();
//! let summary = driver.run_analysis(&mut stdout).unwrap();
//! summary.write_report(&mut stdout).unwrap();
//! ```

use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use crate::builder::DriverConfig;
use crate::cancel::{interrupt_flag, CancelFlag};
use crate::error::{ProbeError, Result};
use crate::generator::RandomLowercase;
use crate::lcs::{is_subsequence, table_bytes, LcsTable};
use crate::record::{CsvLog, Measurement};
use crate::traits::SequenceSource;
use crate::utils::{growth_exponent, next_size, MemorySampler};

const RULE_WIDTH: usize = 60;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last iteration took at least `max_time_seconds`.
    TimeLimit,
    /// The cancel flag was raised.
    Interrupted,
    /// `max_iterations` iterations were recorded.
    IterationCap,
    /// Doubling the size again would overflow `usize`.
    SizeExhausted,
    /// The DP table for `size` does not fit in the memory ceiling.
    MemoryLimit {
        size: usize,
        /// Table bytes; `None` if the count overflows `usize`.
        needed_bytes: Option<usize>,
        /// Ceiling at the time of the check; `None` if unknown.
        ceiling_bytes: Option<u64>,
    },
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StopReason::TimeLimit => "time_limit",
            StopReason::Interrupted => "interrupted",
            StopReason::IterationCap => "iteration_cap",
            StopReason::SizeExhausted => "size_exhausted",
            StopReason::MemoryLimit { .. } => "memory_limit",
        };
        f.write_str(label)
    }
}

/// Outcome of [`GrowthDriver::run_analysis`].
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub reason: StopReason,
    /// Every recorded measurement, in iteration order.
    pub measurements: Vec<Measurement>,
    /// Path of the CSV log.
    pub output: PathBuf,
}

impl RunSummary {
    /// Number of fully recorded iterations.
    pub fn iterations(&self) -> usize {
        self.measurements.len()
    }

    pub fn last_measurement(&self) -> Option<&Measurement> {
        self.measurements.last()
    }

    /// Largest size that was completely tested and logged.
    pub fn last_tested_size(&self) -> Option<usize> {
        self.last_measurement().map(|m| m.input_size)
    }

    /// `(size, log2(t(size) / t(size / 2)))` for every doubling step.
    ///
    /// The exponent is `None` when a timing is zero (below clock resolution).
    pub fn growth_exponents(&self) -> Vec<(usize, Option<f64>)> {
        self.measurements
            .windows(2)
            .map(|w| {
                (
                    w[1].input_size,
                    growth_exponent(w[0].execution_time_s, w[1].execution_time_s),
                )
            })
            .collect()
    }

    /// Print the closing block: stop banner, scaling table and log location.
    pub fn write_report<W: Write>(&self, out: &mut W) -> Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        match self.reason {
            StopReason::Interrupted => {
                writeln!(out)?;
                writeln!(out)?;
                writeln!(out, "Analysis interrupted by user.")?;
                match self.last_tested_size() {
                    Some(size) => writeln!(out, "Last input tested: {size}")?,
                    None => writeln!(out, "Last input tested: none")?,
                }
                writeln!(out, "Total iterations: {}", self.iterations())?;
            }
            reason => {
                let headline = match reason {
                    StopReason::TimeLimit => "TIME LIMIT REACHED!",
                    StopReason::IterationCap => "ITERATION CAP REACHED!",
                    StopReason::MemoryLimit { .. } => "MEMORY LIMIT REACHED!",
                    _ => "INPUT SIZE LIMIT REACHED!",
                };
                writeln!(out)?;
                writeln!(out, "{rule}")?;
                writeln!(out, "{headline}")?;
                if let StopReason::MemoryLimit {
                    size,
                    needed_bytes,
                    ceiling_bytes,
                } = reason
                {
                    writeln!(
                        out,
                        "Size {size} needs {} for its DP table ({} available)",
                        fmt_bytes(needed_bytes.map(|b| b as u64)),
                        fmt_bytes(ceiling_bytes)
                    )?;
                }
                if let Some(last) = self.last_measurement() {
                    writeln!(out, "Input size: {}", last.input_size)?;
                    writeln!(
                        out,
                        "Execution time: {:.2}s ({:.2} minutes)",
                        last.execution_time_s,
                        last.execution_time_s / 60.0
                    )?;
                }
                writeln!(out, "Total iterations: {}", self.iterations())?;
                writeln!(out, "{rule}")?;
            }
        }

        let exponents = self.growth_exponents();
        if !exponents.is_empty() {
            writeln!(out)?;
            writeln!(out, "Scaling (log2 of time ratio per doubling, ~2 for O(n^2)):")?;
            for (size, k) in exponents {
                match k {
                    Some(k) => writeln!(out, "  size {size:>10}: {k:.2}")?,
                    None => writeln!(out, "  size {size:>10}: n/a")?,
                }
            }
        }

        writeln!(out)?;
        writeln!(out, "Results saved in: {}", self.output.display())?;
        writeln!(out)?;
        Ok(())
    }
}

/// Drives the doubling experiment over a [`SequenceSource`].
pub struct GrowthDriver<S: SequenceSource> {
    source: S,
    config: DriverConfig,
    cancel: CancelFlag,
    memory: MemorySampler,
}

impl<S: SequenceSource> GrowthDriver<S> {
    /// Driver with the default configuration (300 s budget, size 10).
    pub fn new(source: S) -> Result<Self> {
        Self::with_config(source, DriverConfig::default())
    }

    /// Driver with an explicit configuration.
    ///
    /// Fails with [`ProbeError::InvalidConfig`](crate::ProbeError::InvalidConfig)
    /// if the configuration cannot describe a terminating doubling schedule.
    pub fn with_config(source: S, config: DriverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            config,
            cancel: CancelFlag::new(),
            memory: MemorySampler::new(),
        })
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// A handle on the flag this driver polls between iterations.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn set_cancel_flag(&mut self, flag: CancelFlag) {
        self.cancel = flag;
    }

    /// Run the experiment, writing progress text to `out`.
    ///
    /// The CSV log is truncated and given its header before the first
    /// iteration. Errors are I/O or CSV failures; an interrupt is not an error
    /// and is reported through [`RunSummary::reason`].
    pub fn run_analysis<W: Write>(&mut self, out: &mut W) -> Result<RunSummary> {
        let span = tracing::info_span!(
            "run_analysis",
            max_time_seconds = self.config.max_time_seconds,
            initial_size = self.config.initial_size
        );
        let _enter = span.enter();

        let log = CsvLog::create(&self.config.output)?;
        self.write_banner(out)?;

        let mut measurements: Vec<Measurement> = Vec::new();
        let mut size = self.config.initial_size;

        let reason = loop {
            if self.cancel.is_cancelled() {
                tracing::warn!(
                    iterations = measurements.len(),
                    "cancellation requested; stopping before next iteration"
                );
                break StopReason::Interrupted;
            }

            let iteration = measurements.len() + 1;
            let x = self.source.next_sequence(size);
            let y = self.source.next_sequence(size);
            let xs: Vec<char> = x.chars().collect();
            let ys: Vec<char> = y.chars().collect();

            let needed_bytes = table_bytes(xs.len(), ys.len());
            let ceiling_bytes = self.memory_ceiling();
            let fits = match (needed_bytes, ceiling_bytes) {
                (None, _) => false,
                (Some(needed), Some(ceiling)) => needed as u64 <= ceiling,
                (Some(_), None) => true,
            };
            if !fits {
                writeln!(
                    out,
                    "Iteration {iteration}: Skipping size {size}: DP table needs {} ({} available)",
                    fmt_bytes(needed_bytes.map(|b| b as u64)),
                    fmt_bytes(ceiling_bytes)
                )?;
                tracing::warn!(
                    size,
                    ?needed_bytes,
                    ?ceiling_bytes,
                    "DP table exceeds memory ceiling"
                );
                break StopReason::MemoryLimit {
                    size,
                    needed_bytes,
                    ceiling_bytes,
                };
            }

            write!(out, "Iteration {iteration}: Testing with size {size}... ")?;
            out.flush()?;

            let m = match self.measure(iteration, size, &xs, &ys) {
                Ok(m) => m,
                Err(ProbeError::TableTooLarge { .. }) => {
                    writeln!(out, "DP table allocation failed")?;
                    tracing::warn!(size, ?needed_bytes, "DP table allocation failed");
                    break StopReason::MemoryLimit {
                        size,
                        needed_bytes,
                        ceiling_bytes,
                    };
                }
                Err(err) => return Err(err),
            };
            debug_assert!(is_subsequence(m.lcs_result.as_bytes(), x.as_bytes()));
            debug_assert!(is_subsequence(m.lcs_result.as_bytes(), y.as_bytes()));
            writeln!(
                out,
                "Time: {:.4}s | LCS: {}",
                m.execution_time_s, m.lcs_result
            )?;
            log.append(&m)?;

            tracing::info!(
                iteration,
                size,
                elapsed_s = m.execution_time_s,
                lcs_len = m.lcs_len(),
                rss_delta_kib = m.rss_delta_kib,
                "iteration recorded"
            );

            let elapsed = m.execution_time_s;
            measurements.push(m);

            if elapsed >= self.config.max_time_seconds {
                break StopReason::TimeLimit;
            }
            if self
                .config
                .max_iterations
                .is_some_and(|cap| measurements.len() >= cap)
            {
                break StopReason::IterationCap;
            }
            match next_size(size) {
                Some(next) => size = next,
                None => {
                    tracing::warn!(size, "doubling would overflow; stopping");
                    break StopReason::SizeExhausted;
                }
            }
        };

        Ok(RunSummary {
            reason,
            measurements,
            output: log.path().to_path_buf(),
        })
    }

    fn write_banner<W: Write>(&self, out: &mut W) -> Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        let max_time = self.config.max_time_seconds;
        writeln!(out, "{rule}")?;
        writeln!(out, "EMPIRICAL ANALYSIS - LONGEST COMMON SUBSEQUENCE")?;
        writeln!(out, "{rule}")?;
        writeln!(
            out,
            "Maximum time: {max_time} seconds ({:.1} minutes)",
            max_time / 60.0
        )?;
        writeln!(out, "Initial size: {}", self.config.initial_size)?;
        if let Some(cap) = self.config.max_iterations {
            writeln!(out, "Iteration cap: {cap}")?;
        }
        writeln!(out, "Strategy: Doubling size each iteration")?;
        writeln!(out, "{rule}")?;
        writeln!(out)?;
        Ok(())
    }

    /// Explicit ceiling if configured, else what the system has available.
    fn memory_ceiling(&mut self) -> Option<u64> {
        match self.config.memory_ceiling_bytes {
            Some(bytes) => Some(bytes),
            None => self.memory.available_bytes(),
        }
    }

    /// Time the engine on one input pair.
    ///
    /// RSS is sampled while the filled table is still alive; the sampling
    /// itself is excluded from the measured time.
    fn measure(
        &mut self,
        iteration: usize,
        size: usize,
        xs: &[char],
        ys: &[char],
    ) -> Result<Measurement> {
        let before = self.memory.rss_kib();
        let start = Instant::now();
        let table = LcsTable::try_build(xs, ys)?;
        let build_time = start.elapsed();

        let peak = self.memory.rss_kib();

        let resume = Instant::now();
        let result: String = table.backtrack(xs, ys).into_iter().collect();
        let elapsed = build_time + resume.elapsed();
        drop(table);

        Ok(Measurement {
            iteration,
            input_size: size,
            execution_time_s: elapsed.as_secs_f64(),
            lcs_result: result,
            rss_delta_kib: peak.saturating_sub(before),
        })
    }
}

fn fmt_bytes(bytes: Option<u64>) -> String {
    match bytes {
        Some(b) => format!("{:.1} MiB", b as f64 / (1024.0 * 1024.0)),
        None => "unknown".to_string(),
    }
}

/// Run a driver over `source` with Ctrl-C wired to its cancel flag, then
/// print the summary report to `out`.
///
/// The process-wide interrupt flag is cleared before the run starts, so this
/// can be called repeatedly.
pub fn run_interruptible<S, W>(source: S, config: DriverConfig, out: &mut W) -> Result<RunSummary>
where
    S: SequenceSource,
    W: Write,
{
    let mut driver = GrowthDriver::with_config(source, config)?;
    let flag = interrupt_flag()?;
    flag.reset();
    driver.set_cancel_flag(flag);

    let summary = driver.run_analysis(out)?;
    summary.write_report(out)?;
    Ok(summary)
}

/// Run with the default random source and log path, printing to stdout.
///
/// Ctrl-C stops the run after the current iteration. Returns the summary
/// after its report has been printed.
pub fn run_analysis(max_time_seconds: f64, initial_size: usize) -> Result<RunSummary> {
    let config = DriverConfig {
        max_time_seconds,
        initial_size,
        ..DriverConfig::default()
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_interruptible(RandomLowercase::from_entropy(), config, &mut out)
}
