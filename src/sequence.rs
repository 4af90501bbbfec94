//! Stale-response guard for fetches.
//!
//! Each request takes a [`Ticket`]; only the response carrying the most
//! recently issued ticket may be shown.

use std::sync::atomic::{ AtomicU64, Ordering };
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        RequestSequence { latest: AtomicU64::new(0) }
    }

    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Passes `value` through if `ticket` is still the latest, drops it otherwise.
    pub fn accept<T>(&self, ticket: Ticket, value: T) -> Option<T> {
        if self.is_latest(ticket) {
            Some(value)
        } else {
            debug!(ticket = ticket.0, "discarding stale response");
            None
        }
    }
}
