//! LCS Growth Probe
//!
//! Measures how the running time of a full-table Longest Common Subsequence
//! (LCS) computation grows with input size.
//!
//! ## Core idea
//! 1. Generate two random lowercase strings of the current size.
//! 2. Time [`lcs::lcs`] on them and append `(size, seconds, result)` to a CSV log.
//! 3. Double the size and repeat until one run takes longer than the budget,
//!    the next DP table would not fit in memory, or a [`CancelFlag`] is raised.
//!
//! The engine is O(n·m) in time and space, so successive timings should grow
//! by roughly 4x per doubling; [`RunSummary::growth_exponents`] reports the
//! observed `log2` ratios.
//!
//! ## Quick start
//! ```
//! use lcs_growth::lcs::lcs;
//!
//! assert_eq!(lcs("abcde", "ace"), "ace");
//! assert_eq!(lcs("abc", "def"), "");
//! ```
//!
//! Driving a short, deterministic run:
//! ```no_run
//! use lcs_growth::{GrowthDriverBuilder, RandomLowercase, StopReason};
//!
//! let mut driver = GrowthDriverBuilder::new(RandomLowercase::seeded(1))
//!     .with_max_time_seconds(0.5)
//!     .with_initial_size(10)
//!     .build()
//!     .unwrap();
//! let summary = driver.run_analysis(&mut std::io::stdout()).unwrap();
//! assert_eq!(summary.reason, StopReason::TimeLimit);
//! ```

pub mod builder;
pub mod cancel;
pub mod driver;
pub mod error;
pub mod generator;
pub mod lcs;
pub mod record;
pub mod traits;
pub mod utils;

pub use crate::builder::{DriverConfig, GrowthDriverBuilder};
pub use crate::cancel::{interrupt_flag, CancelFlag};
pub use crate::driver::{run_analysis, run_interruptible, GrowthDriver, RunSummary, StopReason};
pub use crate::error::{ProbeError, Result};
pub use crate::generator::RandomLowercase;
pub use crate::record::{CsvLog, Measurement};
pub use crate::traits::SequenceSource;
