//! Deadline and cancellation plumbing for searches.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Shared flag that aborts any search holding a clone of it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a search stopped before exhausting its frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    TimedOut,
    Cancelled,
}

/// External limits on a single search.
///
/// Both limits are checked between fetches, never inside one: a
/// `fetch_wins` call that is already running finishes first, so a slow
/// source can overrun the deadline by up to one fetch latency.
#[derive(Debug, Clone, Default)]
pub struct SearchControl {
    deadline: Option<Instant>,
    cancel: CancelToken,
}

impl SearchControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Deadline `timeout` from now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Earlier of the own deadline and `other`.
    pub(crate) fn tightest_deadline(&self, other: Option<Instant>) -> Option<Instant> {
        match (self.deadline, other) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Cancellation wins over an expired deadline.
    pub(crate) fn check(&self, deadline: Option<Instant>) -> Option<Interruption> {
        if self.cancel.is_cancelled() {
            return Some(Interruption::Cancelled);
        }
        match deadline {
            Some(at) if Instant::now() >= at => Some(Interruption::TimedOut),
            _ => None,
        }
    }
}
