use std::path::PathBuf;

use crate::cancel::CancelFlag;
use crate::driver::GrowthDriver;
use crate::error::{ProbeError, Result};
use crate::traits::SequenceSource;

pub const DEFAULT_MAX_TIME_SECONDS: f64 = 300.0;
pub const DEFAULT_INITIAL_SIZE: usize = 10;
pub const DEFAULT_OUTPUT: &str = "lcs_analysis.csv";

/// Parameters of one growth run.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverConfig {
    /// Stop once a single iteration takes at least this many seconds.
    pub max_time_seconds: f64,
    /// Length of the first generated pair.
    pub initial_size: usize,
    /// CSV result log, truncated at the start of the run.
    pub output: PathBuf,
    /// Optional hard cap on the number of iterations.
    pub max_iterations: Option<usize>,
    /// Largest DP table, in bytes, the driver may allocate. `None` means
    /// whatever the system reports as available before each iteration.
    pub memory_ceiling_bytes: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_time_seconds: DEFAULT_MAX_TIME_SECONDS,
            initial_size: DEFAULT_INITIAL_SIZE,
            output: PathBuf::from(DEFAULT_OUTPUT),
            max_iterations: None,
            memory_ceiling_bytes: None,
        }
    }
}

impl DriverConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.max_time_seconds.is_finite() || self.max_time_seconds < 0.0 {
            return Err(ProbeError::InvalidConfig(format!(
                "max_time_seconds must be a finite non-negative number, got {}",
                self.max_time_seconds
            )));
        }
        if self.initial_size == 0 {
            return Err(ProbeError::InvalidConfig(
                "initial_size must be positive; a zero size never grows".to_string(),
            ));
        }
        if self.max_iterations == Some(0) {
            return Err(ProbeError::InvalidConfig(
                "max_iterations must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}

pub struct GrowthDriverBuilder<S: SequenceSource> {
    source: S,
    config: DriverConfig,
    cancel: Option<CancelFlag>,
}

impl<S: SequenceSource> GrowthDriverBuilder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            config: DriverConfig::default(),
            cancel: None,
        }
    }
    pub fn with_config(mut self, config: DriverConfig) -> Self {
        self.config = config;
        self
    }
    pub fn with_max_time_seconds(mut self, seconds: f64) -> Self {
        self.config.max_time_seconds = seconds;
        self
    }
    pub fn with_initial_size(mut self, size: usize) -> Self {
        self.config.initial_size = size;
        self
    }
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output = path.into();
        self
    }
    pub fn with_max_iterations(mut self, cap: usize) -> Self {
        self.config.max_iterations = Some(cap);
        self
    }
    pub fn with_memory_ceiling(mut self, bytes: u64) -> Self {
        self.config.memory_ceiling_bytes = Some(bytes);
        self
    }
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }
    pub fn build(self) -> Result<GrowthDriver<S>> {
        let mut driver = GrowthDriver::with_config(self.source, self.config)?;
        if let Some(flag) = self.cancel {
            driver.set_cancel_flag(flag);
        }
        Ok(driver)
    }
}
