//! Request Sequencing
//!
//! Search-as-you-type issues overlapping requests. [`RequestSequencer`] tags each
//! request with a ticket so only the newest response is applied, and
//! [`Debouncer`] holds a request back until typing has paused.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::debug;

/// Ticket of one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Latest request wins
#[derive(Debug, Clone, Default)]
pub struct RequestSequencer {
    latest: Arc<AtomicU64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket, superseding every earlier one
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether no newer request has been issued since `ticket`
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}

/// Trailing-edge debounce
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    sequencer: RequestSequencer,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            sequencer: RequestSequencer::new(),
        }
    }

    /// Wait out the delay. Returns `false` when a newer call arrived meanwhile,
    /// in which case the caller should drop its work.
    pub async fn settle(&self) -> bool {
        let ticket = self.sequencer.begin();
        tokio::time::sleep(self.delay).await;
        let current = self.sequencer.is_current(ticket);
        if !current {
            debug!(?ticket, "Debounced call superseded");
        }
        current
    }
}
