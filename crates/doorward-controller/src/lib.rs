//! Access controller for a single door.
//!
//! The controller is a sans-IO state machine: the node samples its
//! peripherals into [`Inputs`] once per tick, calls
//! [`AccessController::step`], and carries out the returned [`Effect`]s.
//! Every wait (credential timeout, dwell, escalation cooldown, alarm
//! windows, the servo ramp) is a deadline checked against the tick's
//! monotonic instant, so forced-entry and vibration checks are never blocked.
//!
//! The crate also defines the two collaborator contracts the node wires in:
//! [`NotificationSink`] for local feedback and audit events, and
//! [`RemoteCommandSource`] for the optional remote override channel.

pub mod actuator;
pub mod controller;
pub mod escalation;
pub mod notify;
pub mod remote;
pub mod screen;
pub mod state_machine;
pub mod timer;

pub use actuator::{DoorActuator, Motion, MotionComplete};
pub use controller::{AccessController, Effect, Inputs, RemotePoll};
pub use escalation::{EscalationAction, EscalationPlan, tier};
pub use notify::{CompositeSink, LocalSink, NotificationSink};
pub use remote::RemoteCommandSource;
pub use screen::Screen;
pub use state_machine::{MAX_HISTORY_SIZE, StateMachine, StateTransition, SystemState};
pub use timer::Deadline;
