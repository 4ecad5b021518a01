//! Assorted helpers for the growth loop.

use sysinfo::{get_current_pid, ProcessRefreshKind, System};

/// Next input size under the doubling schedule, or `None` on overflow.
#[inline]
pub fn next_size(current: usize) -> Option<usize> {
    current.checked_mul(2)
}

/// Empirical growth exponent between two consecutive doublings.
///
/// With sizes `n` and `2n` and times `t0`, `t1`, an O(n^k) algorithm gives
/// `t1 / t0 ≈ 2^k`, so `log2(t1 / t0)` estimates `k`. Returns `None` when
/// either time is too small to be meaningful.
pub fn growth_exponent(t_prev: f64, t_next: f64) -> Option<f64> {
    if t_prev > 0.0 && t_next > 0.0 && t_prev.is_finite() && t_next.is_finite() {
        Some((t_next / t_prev).log2())
    } else {
        None
    }
}

/// Samples process resident memory and system-wide available memory.
pub struct MemorySampler {
    sys: System,
}

impl MemorySampler {
    pub fn new() -> Self {
        Self { sys: System::new() }
    }

    /// Current RSS in KiB, or 0 where the platform does not report it.
    pub fn rss_kib(&mut self) -> u64 {
        self.sys.refresh_processes_specifics(ProcessRefreshKind::new());
        match get_current_pid().ok().and_then(|pid| self.sys.process(pid)) {
            Some(process) => process.memory() / 1024,
            None => 0,
        }
    }

    /// Memory the system can still hand out, in bytes; `None` if unreported.
    pub fn available_bytes(&mut self) -> Option<u64> {
        self.sys.refresh_memory();
        match self.sys.available_memory() {
            0 => None,
            bytes => Some(bytes),
        }
    }
}

impl Default for MemorySampler {
    fn default() -> Self {
        Self::new()
    }
}
