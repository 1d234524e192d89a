//! At-most-one-batch guard.
//!
//! A shared busy flag that is checked and set in a single atomic step. A
//! successful acquire hands out a [`GuardPermit`]; the flag stays set until
//! the permit is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Busy flag shared between every clone.
///
/// # Example
///
/// ```
/// use shortcut_ingest::pipeline::ConcurrencyGuard;
///
/// let guard = ConcurrencyGuard::new();
/// let shared = guard.clone();
///
/// let permit = guard.try_acquire().expect("guard is free");
/// assert!(shared.is_busy());
/// assert!(shared.try_acquire().is_none());
///
/// drop(permit);
/// assert!(!shared.is_busy());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConcurrencyGuard {
    busy: Arc<AtomicBool>,
}

impl ConcurrencyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the busy flag if it is clear.
    ///
    /// Returns `None` without waiting when another holder is active.
    pub fn try_acquire(&self) -> Option<GuardPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| GuardPermit {
                busy: self.busy.clone(),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Proof of holding the guard. Clears the busy flag on drop.
#[must_use = "the guard is released as soon as the permit is dropped"]
#[derive(Debug)]
pub struct GuardPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for GuardPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
