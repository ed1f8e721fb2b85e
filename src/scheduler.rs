//! Fixed-rate deadline timers for the task loops.
//!
//! Every periodic activity in the firmware (sampling, telemetry, pattern
//! frames) runs against a [`PeriodicTimer`] anchored on a fixed grid:
//!
//! ```text
//!  due:   0      20      40      60      80     100   (ms, period = 20)
//!         │───────│───────│───────│───────│───────│
//!  run:   ▲       ▲       ▲            ▲  ▲       ▲
//!                                      │  └ next grid point, no burst
//!                                      └ late run (overran 40→61)
//! ```
//!
//! A late cycle neither triggers catch-up runs nor shifts the grid: the
//! next deadline is always the first grid point strictly after "now".

use log::trace;

/// Periodic timer on a fixed millisecond grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicTimer {
    period_ms: u64,
    next_due_ms: u64,
    /// Grid points skipped because a run overran.
    missed: u64,
}

impl PeriodicTimer {
    /// Timer whose first deadline is `start_ms`. A zero period is treated
    /// as 1 ms so the grid always advances.
    pub fn new(period_ms: u64, start_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            next_due_ms: start_ms,
            missed: 0,
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn next_due_ms(&self) -> u64 {
        self.next_due_ms
    }

    /// Total grid points dropped since construction.
    pub fn missed(&self) -> u64 {
        self.missed
    }

    /// Milliseconds until the next deadline (0 if already due).
    pub fn until_due(&self, now_ms: u64) -> u64 {
        self.next_due_ms.saturating_sub(now_ms)
    }

    /// `true` once the deadline has been reached. When due, the timer
    /// advances to the next grid point after `now_ms`.
    pub fn poll_due(&mut self, now_ms: u64) -> bool {
        if now_ms < self.next_due_ms {
            return false;
        }
        self.advance(now_ms);
        true
    }

    /// Move the deadline to the first grid point strictly after `now_ms`.
    pub fn advance(&mut self, now_ms: u64) {
        let next = self.next_due_ms + self.period_ms;
        if now_ms < next {
            self.next_due_ms = next;
            return;
        }
        let behind = (now_ms - self.next_due_ms) / self.period_ms;
        self.missed += behind;
        self.next_due_ms += (behind + 1) * self.period_ms;
        trace!(
            "timer: skipped {} grid point(s), next due at {}ms",
            behind,
            self.next_due_ms
        );
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
