//! Trailing-edge debouncer.
//!
//! Every trigger pushes the deadline to `now + window`, replacing any pending one, so a
//! burst of triggers closer together than the window produces a single firing after the
//! last of them. The debouncer never reads a clock: callers pass `now` in and poll it
//! from their own loop.

use std::time::{Duration, Instant};

pub const DEFAULT_WINDOW: Duration = Duration::from_millis(50);

/// The window older integrations relied on.
pub const LEGACY_WINDOW: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
    coalesced: usize,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl Debouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
            coalesced: 0,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Changes the window. A pending deadline keeps its current value.
    pub fn set_window(&mut self, window: Duration) {
        self.window = window;
    }

    /// Cancels any pending deadline and schedules a new one at `now + window`.
    pub fn trigger(&mut self, now: Instant) {
        if self.deadline.is_some() {
            self.coalesced += 1;
        }
        self.deadline = Some(now + self.window);
    }

    /// Returns `true` exactly once per scheduled deadline, on the first poll at or after
    /// it.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                if self.coalesced > 0 {
                    tracing::trace!(coalesced = self.coalesced, "debounced triggers");
                }
                self.deadline = None;
                self.coalesced = 0;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
        self.coalesced = 0;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Triggers absorbed into the pending deadline so far.
    pub fn coalesced(&self) -> usize {
        self.coalesced
    }
}
