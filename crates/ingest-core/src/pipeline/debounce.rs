//! Trailing-edge debounce as an explicit state machine.
//!
//! The debouncer owns no timer. Callers feed it the current instant and ask
//! for the deadline, which keeps it deterministic under a paused clock.

use std::time::Duration;
use tokio::time::Instant;

/// Observable phase of a [`Debouncer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebouncePhase {
    Idle,
    Armed,
    Fired,
}

#[derive(Debug)]
enum State<T> {
    Idle,
    Armed { deadline: Instant, pending: T },
    Fired,
}

/// Holds the most recent value until the window has been quiet.
///
/// Re-arming while armed replaces the pending value and restarts the window;
/// the replaced value is never delivered.
#[derive(Debug)]
pub struct Debouncer<T> {
    window: Duration,
    state: State<T>,
    superseded: u64,
}

impl<T> Debouncer<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: State::Idle,
            superseded: 0,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Arm with `value` at `now`. Returns `true` if a pending value was superseded.
    pub fn arm(&mut self, value: T, now: Instant) -> bool {
        let superseded = matches!(self.state, State::Armed { .. });
        if superseded {
            self.superseded += 1;
        }
        self.state = State::Armed {
            deadline: now + self.window,
            pending: value,
        };
        superseded
    }

    /// When the pending value becomes due, if armed.
    pub fn deadline(&self) -> Option<Instant> {
        match &self.state {
            State::Armed { deadline, .. } => Some(*deadline),
            _ => None,
        }
    }

    /// Take the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline() {
            Some(deadline) if now >= deadline => {}
            _ => return None,
        }
        match std::mem::replace(&mut self.state, State::Fired) {
            State::Armed { pending, .. } => Some(pending),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Drop the pending value without firing it.
    pub fn cancel(&mut self) -> Option<T> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Armed { pending, .. } => Some(pending),
            State::Fired => {
                self.state = State::Fired;
                None
            }
            State::Idle => None,
        }
    }

    pub fn phase(&self) -> DebouncePhase {
        match self.state {
            State::Idle => DebouncePhase::Idle,
            State::Armed { .. } => DebouncePhase::Armed,
            State::Fired => DebouncePhase::Fired,
        }
    }

    /// Number of values replaced before they could fire.
    pub fn superseded_count(&self) -> u64 {
        self.superseded
    }
}
