//! Quiescence gate for free-text input.
//!
//! The debouncer never owns a timer. Callers feed it inputs and poll it with
//! the current instant; the pending deadline is exposed so an async driver
//! can sleep until it.

use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebouncePhase {
    Idle,
    Pending { deadline: Instant },
    Fired,
}

#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    settled: T,
    pending: Option<(T, Instant)>,
    fired: bool,
}

impl<T: Clone> Debouncer<T> {
    pub fn new(initial: T, window: Duration) -> Self {
        Self {
            window,
            settled: initial,
            pending: None,
            fired: false,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Last value that stayed stable for a full window.
    pub fn settled(&self) -> &T {
        &self.settled
    }

    pub fn phase(&self) -> DebouncePhase {
        match (&self.pending, self.fired) {
            (Some((_, deadline)), _) => DebouncePhase::Pending {
                deadline: *deadline,
            },
            (None, true) => DebouncePhase::Fired,
            (None, false) => DebouncePhase::Idle,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Records a new input. Any emission still pending for an earlier input is
    /// dropped and the window restarts from `now`.
    pub fn input(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.window));
    }

    /// Emits the pending value once its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => {}
            _ => return None,
        }
        let (value, _) = self.pending.take()?;
        self.settled = value.clone();
        self.fired = true;
        Some(value)
    }

    /// Drops any pending emission and adopts `value` as settled immediately,
    /// returning to `Idle`.
    pub fn settle_now(&mut self, value: T) {
        self.pending = None;
        self.fired = false;
        self.settled = value;
    }
}
