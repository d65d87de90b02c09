//! Debounce gate for slider-driven reprocessing.
//!
//! A slider drag fires dozens of edit events per second; each one may
//! not become a backend call. Every [`schedule`](DebounceGate::schedule)
//! hands out a ticket stamped with a fresh generation number and
//! invalidates all earlier tickets, so of all the timers armed during a
//! burst only the one holding the latest ticket fires -- the rest come
//! back stale. Cancellation (teardown, new upload) is the same
//! mechanism: bump the generation so no outstanding ticket matches.

use std::time::Duration;

/// Quiescence window: a debounced dispatch fires only after this much
/// silence since the last edit.
pub const QUIESCENCE: Duration = Duration::from_millis(500);

/// Claim ticket for one armed debounce timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTicket {
    generation: u64,
}

/// Coalesces bursts of schedule calls into at most one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebounceGate {
    generation: u64,
    pending: bool,
}

impl DebounceGate {
    /// Arm (or re-arm) the gate, cancelling any previously scheduled
    /// dispatch. The pending flag sets immediately so the UI can show
    /// a busy state without waiting for the quiescence window.
    pub fn schedule(&mut self) -> DebounceTicket {
        self.generation += 1;
        self.pending = true;
        DebounceTicket {
            generation: self.generation,
        }
    }

    /// Whether a scheduled dispatch has not yet fired or been
    /// cancelled. Drives the immediate visual feedback.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Try to fire for `ticket`. True only for the latest ticket while
    /// still pending; superseded and cancelled tickets return false.
    pub fn try_fire(&mut self, ticket: DebounceTicket) -> bool {
        if self.pending && ticket.generation == self.generation {
            self.pending = false;
            true
        } else {
            false
        }
    }

    /// Cancel any pending dispatch (session teardown, new upload,
    /// image removal). Outstanding tickets become stale.
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.pending = false;
    }
}
