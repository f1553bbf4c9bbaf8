//! Clock-driven debounce and throttle gates.
//!
//! These hold no timers themselves; the host schedules callbacks and asks
//! the gate whether a callback should still run. Only UI callbacks go
//! through them. Toss recording is never delayed or dropped.

/// Delay before a debounced resize handler runs.
pub const RESIZE_DEBOUNCE_MS: u32 = 250;
/// Lifetime of a transient notification.
pub const NOTIFICATION_MS: u32 = 3_000;
/// Lifetime of the keyboard help notification.
pub const HELP_NOTIFICATION_MS: u32 = 5_000;

/// Identifies one scheduled debounced call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Trailing-edge debounce: only the most recent call fires, once the
/// caller's timer for it elapses.
#[derive(Debug, Clone)]
pub struct Debouncer {
    wait_ms: u32,
    latest: u64,
    pending: bool,
}

impl Debouncer {
    #[must_use]
    pub const fn new(wait_ms: u32) -> Self {
        Self {
            wait_ms,
            latest: 0,
            pending: false,
        }
    }

    #[must_use]
    pub const fn wait_ms(&self) -> u32 {
        self.wait_ms
    }

    /// Register a call, superseding any pending one. The caller schedules
    /// its timer for [`Self::wait_ms`] and hands the ticket back on expiry.
    pub fn call(&mut self) -> Ticket {
        self.latest = self.latest.wrapping_add(1);
        self.pending = true;
        Ticket(self.latest)
    }

    /// Whether the timer for `ticket` should run the callback.
    ///
    /// Consumes the pending call, so a ticket fires at most once.
    pub fn should_fire(&mut self, ticket: Ticket) -> bool {
        if ticket.0 == self.latest && self.pending {
            self.pending = false;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    pub fn cancel(&mut self) {
        self.pending = false;
    }
}

/// Leading-edge throttle: the first call runs, later calls inside the
/// window are dropped.
#[derive(Debug, Clone)]
pub struct Throttler {
    limit_ms: u32,
    open_at_ms: Option<f64>,
}

impl Throttler {
    #[must_use]
    pub const fn new(limit_ms: u32) -> Self {
        Self {
            limit_ms,
            open_at_ms: None,
        }
    }

    #[must_use]
    pub const fn limit_ms(&self) -> u32 {
        self.limit_ms
    }

    /// Returns `true` if a call at `now_ms` may run.
    pub fn try_acquire(&mut self, now_ms: f64) -> bool {
        match self.open_at_ms {
            Some(open_at) if now_ms < open_at => false,
            _ => {
                self.open_at_ms = Some(now_ms + f64::from(self.limit_ms));
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debounce_fires_only_latest_ticket() {
        let mut gate = Debouncer::new(RESIZE_DEBOUNCE_MS);
        let first = gate.call();
        let second = gate.call();
        assert!(!gate.should_fire(first));
        assert!(gate.should_fire(second));
        assert!(!gate.should_fire(second));
        assert!(!gate.is_pending());
    }

    #[test]
    fn cancelled_debounce_does_not_fire() {
        let mut gate = Debouncer::new(10);
        let ticket = gate.call();
        gate.cancel();
        assert!(!gate.should_fire(ticket));
    }

    #[test]
    fn throttle_drops_calls_inside_window() {
        let mut gate = Throttler::new(100);
        assert!(gate.try_acquire(0.0));
        assert!(!gate.try_acquire(50.0));
        assert!(!gate.try_acquire(99.9));
        assert!(gate.try_acquire(100.0));
        assert!(!gate.try_acquire(150.0));
    }
}
