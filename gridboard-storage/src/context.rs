//! Per-call cancellation and deadlines.
//!
//! Every store and service operation takes a [`CallContext`]. A context that
//! is already done fails the call before the backend is touched; a context
//! that becomes done mid-call interrupts the running SQLite statement. Both
//! surface as [`StorageError::Cancelled`](crate::StorageError::Cancelled).

use std::panic::RefUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Cancellation flag plus optional deadline. Clones share the flag.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl CallContext {
    /// A context with no deadline that is only done once cancelled.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancelled: Arc::default(),
        }
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancels this context and every clone of it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// True once cancelled or past the deadline.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Returns a closure suitable for a SQLite progress handler: it answers
    /// `true` (interrupt) once this context is done.
    pub(crate) fn interrupt_check(&self) -> impl FnMut() -> bool + Send + RefUnwindSafe + 'static {
        let cancelled = Arc::clone(&self.cancelled);
        let deadline = self.deadline;
        move || cancelled.load(Ordering::Acquire) || deadline.is_some_and(|d| Instant::now() >= d)
    }
}
