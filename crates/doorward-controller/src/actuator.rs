//! Door actuator ramp as a timed sub-state.
//!
//! Opening engages the unlock relay and then walks the latch servo from home
//! to the open angle in fixed steps; closing walks it back and engages the
//! lock last. Instead of sleeping between steps, the ramp derives the angle
//! from elapsed time on every tick, so the rest of the controller keeps
//! running while the door moves.
//!
//! The commanded lock state only flips to [`LockCommand::Unlocked`] once the
//! opening ramp has finished.

use std::time::Instant;

use doorward_core::{LockCommand, RampConfig, constants::SERVO_HOME_ANGLE};
use tracing::{debug, trace};

use crate::controller::Effect;

/// Direction of an in-flight ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Opening,
    Closing,
}

/// Reported by [`DoorActuator::advance`] on the tick a ramp finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionComplete {
    Opened,
    Closed,
}

#[derive(Debug, Clone, Copy)]
struct Ramp {
    motion: Motion,
    started: Instant,
    from: u8,
}

/// Lock relay and latch servo, driven one tick at a time.
#[derive(Debug, Clone)]
pub struct DoorActuator {
    geometry: RampConfig,
    angle: u8,
    commanded: LockCommand,
    ramp: Option<Ramp>,
}

impl DoorActuator {
    /// Actuator at rest: locked, servo at home.
    pub fn new(geometry: RampConfig) -> Self {
        Self {
            geometry,
            angle: SERVO_HOME_ANGLE,
            commanded: LockCommand::Locked,
            ramp: None,
        }
    }

    pub fn commanded(&self) -> LockCommand {
        self.commanded
    }

    /// Last servo angle written.
    pub fn angle(&self) -> u8 {
        self.angle
    }

    pub fn motion(&self) -> Option<Motion> {
        self.ramp.map(|ramp| ramp.motion)
    }

    pub fn is_moving(&self) -> bool {
        self.ramp.is_some()
    }

    pub fn is_opening(&self) -> bool {
        self.motion() == Some(Motion::Opening)
    }

    pub fn is_closing(&self) -> bool {
        self.motion() == Some(Motion::Closing)
    }

    /// Unlocked and fully open.
    pub fn is_open(&self) -> bool {
        self.commanded == LockCommand::Unlocked && !self.is_moving()
    }

    /// Start opening. Ignored while moving or already open.
    ///
    /// Returns whether a ramp was started.
    pub fn begin_open(&mut self, now: Instant, effects: &mut Vec<Effect>) -> bool {
        if self.is_moving() || self.commanded == LockCommand::Unlocked {
            return false;
        }
        effects.push(Effect::Relay(LockCommand::Unlocked));
        self.ramp = Some(Ramp {
            motion: Motion::Opening,
            started: now,
            from: self.angle,
        });
        debug!(from = self.angle, to = self.geometry.open_angle, "Opening ramp started");
        true
    }

    /// Start closing. Ignored while moving or already locked.
    ///
    /// Nothing is written yet: the relay stays released until the servo
    /// reaches home. Returns whether a ramp was started.
    pub fn begin_close(&mut self, now: Instant) -> bool {
        if self.is_moving() || self.commanded == LockCommand::Locked {
            return false;
        }
        self.ramp = Some(Ramp {
            motion: Motion::Closing,
            started: now,
            from: self.angle,
        });
        debug!(from = self.angle, to = SERVO_HOME_ANGLE, "Closing ramp started");
        true
    }

    /// Move the servo to where the ramp should be at `now`.
    ///
    /// Emits at most one servo write per call. Returns the completed motion on
    /// the tick the ramp reaches its end stop.
    pub fn advance(&mut self, now: Instant, effects: &mut Vec<Effect>) -> Option<MotionComplete> {
        let ramp = self.ramp?;

        let interval_ms = self.geometry.step_interval_ms.max(1);
        let elapsed_ms = now.saturating_duration_since(ramp.started).as_millis();
        let steps = u32::try_from(elapsed_ms / u128::from(interval_ms)).unwrap_or(u32::MAX);
        let travel = steps
            .saturating_mul(u32::from(self.geometry.step_degrees))
            .min(u32::from(u8::MAX)) as u8;

        let target = match ramp.motion {
            Motion::Opening => ramp.from.saturating_add(travel).min(self.geometry.open_angle),
            Motion::Closing => ramp.from.saturating_sub(travel).max(SERVO_HOME_ANGLE),
        };
        if target != self.angle {
            self.angle = target;
            effects.push(Effect::Servo(target));
            trace!(angle = target, "Servo step");
        }

        let done = match ramp.motion {
            Motion::Opening => self.angle >= self.geometry.open_angle,
            Motion::Closing => self.angle <= SERVO_HOME_ANGLE,
        };
        if !done {
            return None;
        }

        self.ramp = None;
        match ramp.motion {
            Motion::Opening => {
                self.commanded = LockCommand::Unlocked;
                debug!("Door fully open");
                Some(MotionComplete::Opened)
            }
            Motion::Closing => {
                effects.push(Effect::Relay(LockCommand::Locked));
                self.commanded = LockCommand::Locked;
                debug!("Door closed and locked");
                Some(MotionComplete::Closed)
            }
        }
    }
}
