//! Monotonic request tickets.
//!
//! Superseded fetches are never aborted. Instead each request takes a
//! ticket before it starts and only publishes if that ticket is still the
//! latest one when the response arrives.

use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies one request issued by a [`RequestGeneration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Hands out increasing tickets and remembers the latest one.
#[derive(Debug, Default)]
pub struct RequestGeneration {
    latest: AtomicU64,
}

impl RequestGeneration {
    /// Creates a counter with no outstanding request.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    /// Issues a new ticket, superseding every earlier one.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst).wrapping_add(1))
    }

    /// Returns `true` if no newer ticket has been issued since `ticket`.
    #[must_use]
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Supersedes every outstanding ticket without issuing a usable one.
    pub fn invalidate(&self) {
        self.latest.fetch_add(1, Ordering::SeqCst);
    }
}
