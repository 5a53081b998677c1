//! Progress Indicator State Machine
//!
//! ```text
//! Idle
//!   ↓ start
//! Running
//!   ↓ done
//! Idle
//! ```
//!
//! `start` while running and `done` while idle are no-ops. There is no
//! terminal state; the indicator cycles for the lifetime of the application.

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressState {
    /// Nothing is loading
    #[default]
    Idle,
    /// A transition is in flight
    Running,
}

impl ProgressState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgressState::Idle => "idle",
            ProgressState::Running => "running",
        }
    }
}

impl std::fmt::Display for ProgressState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

type ProgressListener = Box<dyn Fn(ProgressState) + Send + Sync>;

/// Loading-state signal shown while a transition is in flight.
///
/// One instance is shared by everything that drives it; the state is only
/// reachable through [`start`](Self::start) and [`done`](Self::done).
/// Listeners are told about every actual state change, never about no-ops.
pub struct ProgressIndicator {
    state: Mutex<ProgressState>,
    listeners: RwLock<Vec<ProgressListener>>,
}

impl ProgressIndicator {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(ProgressState::Idle),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Idle → Running. Already running is a no-op.
    pub fn start(&self) {
        self.transition_to(ProgressState::Running);
    }

    /// Running → Idle. Already idle is a no-op.
    pub fn done(&self) {
        self.transition_to(ProgressState::Idle);
    }

    pub fn state(&self) -> ProgressState {
        *self.state.lock()
    }

    pub fn is_running(&self) -> bool {
        self.state() == ProgressState::Running
    }

    /// Register a listener for state changes
    pub fn subscribe<F>(&self, listener: F)
    where
        F: Fn(ProgressState) + Send + Sync + 'static,
    {
        self.listeners.write().push(Box::new(listener));
    }

    fn transition_to(&self, next: ProgressState) {
        {
            let mut state = self.state.lock();
            if *state == next {
                return;
            }
            *state = next;
        }

        tracing::trace!(state = %next, "Progress indicator changed");

        for listener in self.listeners.read().iter() {
            listener(next);
        }
    }
}

impl Default for ProgressIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProgressIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressIndicator")
            .field("state", &self.state())
            .finish()
    }
}
