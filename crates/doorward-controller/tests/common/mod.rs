//! Common test utilities for controller integration tests.
//!
//! [`Harness`] drives an [`AccessController`] on a simulated clock. Sticky
//! levels (door position) are held by the harness; one-shot inputs (presence,
//! a scanned card, a remote read) are supplied per tick. Every effect the
//! controller emits is kept in `journal` for later assertions.

#![allow(dead_code)]

use std::time::{Duration, Instant};

use doorward_controller::{AccessController, Effect, Inputs, RemotePoll, SystemState};
use doorward_core::{ControllerConfig, CredentialId, DoorCommand, DoorPosition, EventChannel, Indication};

pub const VALID_UID: &str = "E3 87 26 29";
pub const INVALID_UID: &str = "AA BB CC DD";
pub const TICK: Duration = Duration::from_millis(100);

pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

pub fn secs(value: u64) -> Duration {
    Duration::from_secs(value)
}

pub struct Harness {
    pub controller: AccessController,
    pub start: Instant,
    pub now: Instant,
    pub tick: Duration,
    pub door: DoorPosition,
    pub journal: Vec<Effect>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    /// Booted controller with the clock at the boot instant.
    pub fn with_config(config: ControllerConfig) -> Self {
        let start = Instant::now();
        let tick = config.tick_period();
        let mut controller = AccessController::new(&config).expect("valid config");
        let journal = controller.boot(start);
        Self {
            controller,
            start,
            now: start,
            tick,
            door: DoorPosition::Closed,
            journal,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.now - self.start
    }

    pub fn state(&self) -> SystemState {
        self.controller.state()
    }

    /// Step at the current instant with the given one-shot inputs.
    pub fn step_with(&mut self, mut inputs: Inputs) -> Vec<Effect> {
        inputs.door_position = self.door;
        let effects = self.controller.step(self.now, &inputs);
        self.journal.extend(effects.iter().cloned());
        effects
    }

    /// Advance one tick and step with quiet inputs.
    pub fn tick(&mut self) -> Vec<Effect> {
        self.now += self.tick;
        self.step_with(Inputs::default())
    }

    /// Advance one tick and step with the given inputs.
    pub fn tick_with(&mut self, inputs: Inputs) -> Vec<Effect> {
        self.now += self.tick;
        self.step_with(inputs)
    }

    pub fn present(&mut self) -> Vec<Effect> {
        self.tick_with(Inputs {
            presence: true,
            ..Inputs::default()
        })
    }

    pub fn scan(&mut self, uid: &str) -> Vec<Effect> {
        self.tick_with(Inputs {
            credential: Some(CredentialId::normalize(uid).expect("valid uid")),
            ..Inputs::default()
        })
    }

    pub fn remote(&mut self, command: Option<DoorCommand>) -> Vec<Effect> {
        self.tick_with(Inputs {
            remote: RemotePoll::Polled(command),
            ..Inputs::default()
        })
    }

    pub fn vibrate(&mut self) -> Vec<Effect> {
        self.tick_with(Inputs {
            vibration: true,
            ..Inputs::default()
        })
    }

    /// Quiet ticks for at least `span`.
    pub fn run_for(&mut self, span: Duration) -> Vec<Effect> {
        let until = self.now + span;
        let mut effects = Vec::new();
        while self.now < until {
            effects.extend(self.tick());
        }
        effects
    }

    /// Quiet ticks until `done` holds, giving up after `limit`.
    pub fn run_until(&mut self, limit: Duration, mut done: impl FnMut(&Harness) -> bool) -> bool {
        let until = self.now + limit;
        while self.now < until {
            self.tick();
            if done(self) {
                return true;
            }
        }
        false
    }

    /// Present motion until the controller arms, then scan `uid`.
    pub fn attempt(&mut self, uid: &str) -> Vec<Effect> {
        let limit = self.now + secs(120);
        while self.state() != SystemState::AwaitingCredential {
            assert!(self.now < limit, "controller never armed");
            self.present();
        }
        self.scan(uid)
    }

    /// Grant and let the door reach its open stop.
    pub fn open_with_card(&mut self) {
        self.attempt(VALID_UID);
        assert_eq!(self.state(), SystemState::AccessGranted);
        let opened = self.run_until(secs(2), |h| h.controller.door_opened_at().is_some());
        assert!(opened, "door never finished opening");
    }
}

pub fn logs(effects: &[Effect], wanted: EventChannel) -> Vec<String> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Log { channel, message } if *channel == wanted => Some(message.clone()),
            _ => None,
        })
        .collect()
}

pub fn count_indications(effects: &[Effect], wanted: Indication) -> usize {
    effects
        .iter()
        .filter(|effect| **effect == Effect::Indicate(wanted))
        .count()
}

pub fn displays(effects: &[Effect]) -> Vec<(String, String)> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::Display { primary, secondary } => Some((primary.clone(), secondary.clone())),
            _ => None,
        })
        .collect()
}

pub fn reader_resets(effects: &[Effect]) -> usize {
    effects
        .iter()
        .filter(|effect| **effect == Effect::ReinitializeReader)
        .count()
}
