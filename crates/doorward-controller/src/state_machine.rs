//! Access controller state machine.
//!
//! Tracks the persisted controller state, validates transitions, and keeps a
//! bounded history for diagnostics. Time is always passed in explicitly so the
//! machine can be driven by a real clock or by a test harness.
//!
//! # States
//!
//! - `Idle`: waiting for motion in front of the door
//! - `AwaitingCredential`: motion seen, reader polled until timeout
//! - `AccessGranted`: door opening, dwelling, or closing after a grant
//! - `ForcedEntryAlarm`: door opened without being unlocked
//!
//! # Valid Transitions
//!
//! - Idle → AwaitingCredential → AccessGranted → Idle
//! - AwaitingCredential → Idle (timeout or mismatch)
//! - Idle/AwaitingCredential → ForcedEntryAlarm → Idle
//!
//! # Examples
//!
//! ```
//! use std::time::Instant;
//! use doorward_controller::{StateMachine, SystemState};
//!
//! let start = Instant::now();
//! let mut machine = StateMachine::new();
//! machine.transition_to(SystemState::AwaitingCredential, start).unwrap();
//! assert_eq!(machine.current_state(), SystemState::AwaitingCredential);
//!
//! assert!(machine.transition_to(SystemState::AccessGranted, start).is_ok());
//! assert!(machine.transition_to(SystemState::ForcedEntryAlarm, start).is_err());
//! ```

use std::collections::VecDeque;
use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use doorward_core::{Error, Result};

/// Maximum number of state transitions to keep in history.
///
/// A full grant cycle is three transitions, so this covers the last thirty
/// or so visitors.
pub const MAX_HISTORY_SIZE: usize = 100;

/// Persisted controller state.
///
/// The vibration alarm is a transient overlay and never appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemState {
    Idle,
    AwaitingCredential,
    AccessGranted,
    ForcedEntryAlarm,
}

impl fmt::Display for SystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            SystemState::Idle => "Idle",
            SystemState::AwaitingCredential => "AwaitingCredential",
            SystemState::AccessGranted => "AccessGranted",
            SystemState::ForcedEntryAlarm => "ForcedEntryAlarm",
        };
        write!(f, "{}", state_str)
    }
}

impl SystemState {
    /// Check if transition to target state is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use doorward_controller::SystemState;
    ///
    /// assert!(SystemState::Idle.can_transition_to(&SystemState::AwaitingCredential));
    /// assert!(!SystemState::Idle.can_transition_to(&SystemState::AccessGranted));
    /// ```
    pub fn can_transition_to(&self, target: &SystemState) -> bool {
        matches!(
            (self, target),
            // From Idle
            (SystemState::Idle, SystemState::AwaitingCredential | SystemState::ForcedEntryAlarm)
            // From AwaitingCredential
            | (
                SystemState::AwaitingCredential,
                SystemState::Idle | SystemState::AccessGranted | SystemState::ForcedEntryAlarm
            )
            // From AccessGranted
            | (SystemState::AccessGranted, SystemState::Idle)
            // From ForcedEntryAlarm
            | (SystemState::ForcedEntryAlarm, SystemState::Idle)
        )
    }

    /// Whether the forced-entry check may fire in this state.
    pub fn is_guarded(&self) -> bool {
        matches!(self, SystemState::Idle | SystemState::AwaitingCredential)
    }
}

/// Represents a single state transition with timestamp.
///
/// # Serialization Note
///
/// The `at` field is not serialized as `Instant` is process-specific.
/// When deserializing, it is set to the time of deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state transitioned from.
    pub from: SystemState,

    /// The state transitioned to.
    pub to: SystemState,

    /// When the transition occurred.
    #[serde(skip, default = "Instant::now")]
    pub at: Instant,
}

impl StateTransition {
    pub fn new(from: SystemState, to: SystemState, at: Instant) -> Self {
        Self { from, to, at }
    }
}

/// State machine for the access controller.
///
/// This struct is not thread-safe by design; the controller owns it
/// exclusively.
#[derive(Debug)]
pub struct StateMachine {
    current_state: SystemState,

    /// History of state transitions (limited to MAX_HISTORY_SIZE).
    history: VecDeque<StateTransition>,
}

impl StateMachine {
    /// Create a new state machine in the Idle state.
    pub fn new() -> Self {
        Self {
            current_state: SystemState::Idle,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub fn current_state(&self) -> SystemState {
        self.current_state
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Transition to a new state, validating the transition.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` if the requested transition is
    /// not valid for the current state. The machine is left unchanged.
    pub fn transition_to(&mut self, new_state: SystemState, at: Instant) -> Result<StateTransition> {
        if !self.current_state.can_transition_to(&new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.current_state.to_string(),
                to: new_state.to_string(),
            });
        }

        let transition = StateTransition::new(self.current_state, new_state, at);
        self.current_state = new_state;
        self.history.push_back(transition.clone());
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
        Ok(transition)
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
