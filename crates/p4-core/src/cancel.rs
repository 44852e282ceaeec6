//! Cooperative cancellation for long-running document scans.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Something that can be polled to find out whether work should stop.
///
/// Polling must be cheap: the index builder checks it once per line.
pub trait CancellationSignal {
    fn is_cancelled(&self) -> bool;
}

impl CancellationSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl<T: CancellationSignal + ?Sized> CancellationSignal for &T {
    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

/// Shareable cancellation flag.
///
/// Clones observe the same flag, so a server can hand one clone to a
/// background scan and cancel it from the request that supersedes it.
///
/// # Examples
///
/// ```
/// use p4_core::cancel::{CancellationSignal, CancellationToken};
///
/// let token = CancellationToken::new();
/// let worker = token.clone();
/// assert!(!worker.is_cancelled());
/// token.cancel();
/// assert!(worker.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}

impl CancellationSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}
