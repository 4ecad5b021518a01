//! Cooperative cancellation between a signal handler and the driver loop.

use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::error::Result;

/// Exit status when a second interrupt arrives before the loop has stopped.
pub const FORCED_EXIT_CODE: i32 = 130;

/// Shared "stop before the next iteration" flag.
///
/// Clones observe the same flag, so one clone can move into a Ctrl-C handler
/// while the driver polls another.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Returns `true` if it was already requested.
    pub fn cancel(&self) -> bool {
        self.0.swap(true, Ordering::SeqCst)
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear a previous request so the flag can guard another run.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

static INTERRUPT: Mutex<Option<CancelFlag>> = Mutex::new(None);

/// The process-wide flag raised by Ctrl-C.
///
/// The first call installs the handler; later calls return the same flag. A
/// first interrupt raises the flag, a second one while it is still raised
/// exits the process with [`FORCED_EXIT_CODE`].
///
/// Fails with [`ProbeError::Interrupt`](crate::ProbeError::Interrupt) if some
/// other code already owns the process's Ctrl-C handler.
pub fn interrupt_flag() -> Result<CancelFlag> {
    let mut slot = INTERRUPT.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(flag) = slot.as_ref() {
        return Ok(flag.clone());
    }

    let flag = CancelFlag::new();
    let handler_flag = flag.clone();
    ctrlc::set_handler(move || {
        if handler_flag.cancel() {
            eprintln!("\nSecond interrupt received; exiting without summary.");
            process::exit(FORCED_EXIT_CODE);
        }
        eprintln!("\nInterrupt received; stopping after the current run.");
    })?;
    tracing::debug!("interrupt handler installed");

    *slot = Some(flag.clone());
    Ok(flag)
}

#[cfg(test)]
mod tests {
    use super::CancelFlag;

    #[test]
    fn clones_share_state() {
        let flag = CancelFlag::new();
        let handler_side = flag.clone();
        assert!(!flag.is_cancelled());
        assert!(!handler_side.cancel());
        assert!(flag.is_cancelled());
        assert!(handler_side.cancel(), "second request reports prior cancel");
    }

    #[test]
    fn reset_clears_for_every_clone() {
        let flag = CancelFlag::new();
        let other = flag.clone();
        flag.cancel();
        other.reset();
        assert!(!flag.is_cancelled());
        assert!(!other.cancel());
    }

    #[test]
    fn visible_across_threads() {
        let flag = CancelFlag::new();
        let remote = flag.clone();
        std::thread::spawn(move || {
            remote.cancel();
        })
        .join()
        .unwrap();
        assert!(flag.is_cancelled());
    }
}
