//! The access controller.
//!
//! [`AccessController`] owns every piece of mutable state on the node: the
//! state machine, the attempt counter, the door actuator ramp, and the timed
//! overlays (denial, alarm burst, reader cooldown, vibration alarm). It
//! performs no I/O. Each tick the node samples its peripherals into
//! [`Inputs`], calls [`AccessController::step`], and carries out the returned
//! [`Effect`]s in order.
//!
//! The forced-entry and vibration checks run after the state dispatch on
//! every tick, whatever the state, so no timed sequence can starve them.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use doorward_core::{
    AllowList, ControllerConfig, CredentialId, DoorCommand, DoorPosition, DoorState, EventChannel,
    ForcedEntryPolicy, Indication, LockCommand, Result,
    constants::SERVO_HOME_ANGLE,
};
use tracing::{debug, error, info, warn};

use crate::actuator::{DoorActuator, MotionComplete};
use crate::escalation::{EscalationAction, tier};
use crate::screen::Screen;
use crate::state_machine::{StateMachine, StateTransition, SystemState};
use crate::timer::Deadline;

/// Result of the remote control channel for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RemotePoll {
    /// No read happened this tick.
    #[default]
    NotPolled,
    /// The control key was read; `None` when it held no known command.
    Polled(Option<DoorCommand>),
}

/// Peripheral readings sampled for one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Inputs {
    pub presence: bool,
    pub credential: Option<CredentialId>,
    pub door_position: DoorPosition,
    pub vibration: bool,
    pub remote: RemotePoll,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            presence: false,
            credential: None,
            door_position: DoorPosition::Closed,
            vibration: false,
            remote: RemotePoll::NotPolled,
        }
    }
}

/// Side effect requested by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Replace both display lines.
    Display { primary: String, secondary: String },
    /// Start a local LED/tone pattern.
    Indicate(Indication),
    /// Record an audit event on a named channel.
    Log {
        channel: EventChannel,
        message: String,
    },
    /// Drive the lock relay.
    Relay(LockCommand),
    /// Write the latch servo angle.
    Servo(u8),
    /// Reset the credential reader session.
    ReinitializeReader,
}

impl Effect {
    fn display(screen: Screen) -> Self {
        let (primary, secondary) = screen.lines();
        Self::Display {
            primary: primary.into_owned(),
            secondary: secondary.to_string(),
        }
    }

    fn log(channel: EventChannel, message: impl Into<String>) -> Self {
        Self::Log {
            channel,
            message: message.into(),
        }
    }
}

/// Access controller state machine.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, Instant};
/// use doorward_controller::{AccessController, Inputs, SystemState};
/// use doorward_core::{ControllerConfig, CredentialId};
///
/// let start = Instant::now();
/// let mut controller = AccessController::new(&ControllerConfig::default()).unwrap();
/// controller.boot(start);
///
/// let motion = Inputs { presence: true, ..Inputs::default() };
/// controller.step(start, &motion);
/// assert_eq!(controller.state(), SystemState::AwaitingCredential);
///
/// let card = Inputs {
///     credential: Some(CredentialId::normalize("E3 87 26 29").unwrap()),
///     ..Inputs::default()
/// };
/// controller.step(start + Duration::from_secs(1), &card);
/// assert_eq!(controller.state(), SystemState::AccessGranted);
/// ```
#[derive(Debug)]
pub struct AccessController {
    allow_list: AllowList,
    await_timeout: Duration,
    dwell: Duration,
    control_poll_interval: Duration,
    reader_cooldown: Duration,
    forced_entry: ForcedEntryPolicy,

    machine: StateMachine,
    actuator: DoorActuator,
    attempts: u32,
    sensed: DoorPosition,

    /// Credential wait started on presence.
    awaiting: Option<Deadline>,
    /// Completion of the opening ramp after a grant.
    opened_at: Option<Instant>,
    last_control_poll: Option<Instant>,

    denial: Option<Deadline>,
    burst: Option<Deadline>,
    burst_sounding: bool,
    cooldown: Option<Deadline>,
    vibration: Option<Deadline>,
    alarm_since: Option<Instant>,

    shown: Option<Screen>,
}

impl AccessController {
    /// Build a controller from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is out of range or an allow-list
    /// entry is malformed.
    pub fn new(config: &ControllerConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            allow_list: config.allow_list()?,
            await_timeout: config.await_timeout(),
            dwell: config.dwell(),
            control_poll_interval: config.control_poll_interval(),
            reader_cooldown: config.reader_cooldown(),
            forced_entry: config.forced_entry,
            machine: StateMachine::new(),
            actuator: DoorActuator::new(config.ramp),
            attempts: 0,
            sensed: DoorPosition::Closed,
            awaiting: None,
            opened_at: None,
            last_control_poll: None,
            denial: None,
            burst: None,
            burst_sounding: false,
            cooldown: None,
            vibration: None,
            alarm_since: None,
            shown: None,
        })
    }

    pub fn state(&self) -> SystemState {
        self.machine.current_state()
    }

    /// Consecutive failed credentials since the last grant.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn door_state(&self) -> DoorState {
        DoorState {
            commanded: self.actuator.commanded(),
            sensed: self.sensed,
        }
    }

    pub fn actuator(&self) -> &DoorActuator {
        &self.actuator
    }

    pub fn forced_entry_policy(&self) -> ForcedEntryPolicy {
        self.forced_entry
    }

    /// Recent state transitions, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        self.machine.history()
    }

    /// Screen the display was last told to show.
    pub fn screen(&self) -> Option<Screen> {
        self.shown
    }

    /// Completion time of the opening ramp for the current grant.
    pub fn door_opened_at(&self) -> Option<Instant> {
        self.opened_at
    }

    /// Whether the reader is disabled by an escalation cooldown.
    pub fn reader_cooling_down(&self) -> bool {
        self.cooldown.is_some()
    }

    /// Whether the node should poll the credential reader this tick.
    pub fn wants_credential(&self, now: Instant) -> bool {
        self.state() == SystemState::AwaitingCredential
            && self.awaiting.is_some_and(|wait| !wait.has_timed_out(now))
    }

    /// Whether the remote control key is due for a read.
    pub fn remote_poll_due(&self, now: Instant) -> bool {
        self.last_control_poll
            .is_none_or(|last| now.saturating_duration_since(last) >= self.control_poll_interval)
    }

    /// Power-on sequence: lock engaged, servo home, fresh reader, idle screen.
    pub fn boot(&mut self, now: Instant) -> Vec<Effect> {
        info!(policy = ?self.forced_entry, "Access controller starting");
        let mut effects = vec![
            Effect::Relay(LockCommand::Locked),
            Effect::Servo(SERVO_HOME_ANGLE),
            Effect::ReinitializeReader,
            Effect::Indicate(Indication::AllClear),
        ];
        self.shown = None;
        self.refresh_screen(now, &mut effects);
        effects
    }

    /// Advance the controller by one tick.
    pub fn step(&mut self, now: Instant, inputs: &Inputs) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.sensed = inputs.door_position;

        if let Some(done) = self.actuator.advance(now, &mut effects) {
            self.on_motion_complete(done, now, &mut effects);
        }
        self.advance_overlays(now, &mut effects);

        if let RemotePoll::Polled(command) = inputs.remote {
            self.last_control_poll = Some(now);
            if let Some(command) = command {
                self.apply_remote(command, now, &mut effects);
            }
        }

        match self.state() {
            SystemState::Idle => self.on_idle(now, inputs),
            SystemState::AwaitingCredential => self.on_awaiting(now, inputs, &mut effects),
            SystemState::AccessGranted => self.on_granted(now),
            SystemState::ForcedEntryAlarm => self.on_alarm(now, &mut effects),
        }

        self.check_forced_entry(now, &mut effects);
        self.check_vibration(now, inputs.vibration, &mut effects);
        self.refresh_screen(now, &mut effects);
        effects
    }

    /// Clear an active forced-entry alarm.
    ///
    /// Returns no effects when no alarm is active. If the door is still open
    /// the alarm fires again on the next tick.
    pub fn acknowledge_alarm(&mut self, now: Instant) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.state() == SystemState::ForcedEntryAlarm {
            effects.push(Effect::log(EventChannel::ForcedEntry, "Alarm acknowledged"));
            self.clear_alarm(now, &mut effects);
            self.refresh_screen(now, &mut effects);
        }
        effects
    }

    fn enter(&mut self, state: SystemState, now: Instant) {
        match self.machine.transition_to(state, now) {
            Ok(transition) => info!(from = %transition.from, to = %transition.to, "State transition"),
            Err(e) => error!(error = %e, "Rejected state transition"),
        }
    }

    fn can_arm(&self) -> bool {
        self.denial.is_none()
            && self.burst.is_none()
            && self.cooldown.is_none()
            && self.vibration.is_none()
            && !self.actuator.is_moving()
            && self.actuator.commanded() == LockCommand::Locked
    }

    fn on_idle(&mut self, now: Instant, inputs: &Inputs) {
        if !inputs.presence || !self.can_arm() {
            return;
        }
        debug!("Motion detected, awaiting credential");
        self.awaiting = Some(Deadline::start(now, self.await_timeout));
        self.enter(SystemState::AwaitingCredential, now);
    }

    fn on_awaiting(&mut self, now: Instant, inputs: &Inputs, effects: &mut Vec<Effect>) {
        if self.awaiting.is_none_or(|wait| wait.has_timed_out(now)) {
            info!("No credential presented, returning to idle");
            self.awaiting = None;
            effects.push(Effect::ReinitializeReader);
            self.enter(SystemState::Idle, now);
            return;
        }

        let Some(credential) = &inputs.credential else {
            return;
        };
        if self.allow_list.contains(credential) {
            self.grant(credential, now, effects);
        } else {
            self.deny(credential, now, effects);
        }
    }

    fn grant(&mut self, credential: &CredentialId, now: Instant, effects: &mut Vec<Effect>) {
        info!(credential = %credential, "Access granted");
        self.attempts = 0;
        self.awaiting = None;
        self.opened_at = None;
        self.enter(SystemState::AccessGranted, now);

        effects.push(Effect::Indicate(Indication::Granted));
        effects.push(Effect::log(
            EventChannel::ValidAccess,
            format!("UID: {credential} Access Granted"),
        ));
        effects.push(Effect::ReinitializeReader);
        self.actuator.begin_open(now, effects);
    }

    fn deny(&mut self, credential: &CredentialId, now: Instant, effects: &mut Vec<Effect>) {
        self.attempts = self.attempts.saturating_add(1);
        warn!(credential = %credential, attempts = self.attempts, "Access denied");
        self.awaiting = None;
        self.enter(SystemState::Idle, now);

        effects.push(Effect::log(
            EventChannel::InvalidAccess,
            format!("UID: {credential} Access Denied"),
        ));

        // Follow-up sequences start once the denial sequence has played.
        let denial_len = Indication::Denied.duration().unwrap_or_default();
        let followup = now + denial_len;
        for action in &tier(self.attempts) {
            match action {
                EscalationAction::DenialSequence => {
                    effects.push(Effect::Indicate(Indication::Denied));
                    self.denial = Some(Deadline::start(now, denial_len));
                }
                EscalationAction::NotifyExternal => {
                    effects.push(Effect::log(
                        EventChannel::FailedAttempts,
                        format!("Failed Attempts: {}", self.attempts),
                    ));
                }
                EscalationAction::ReaderCooldown => {
                    warn!(seconds = self.reader_cooldown.as_secs(), "Reader disabled");
                    self.cooldown = Some(Deadline::start(followup, self.reader_cooldown));
                }
                EscalationAction::AlarmBurst => {
                    warn!(attempts = self.attempts, "Attempt alarm");
                    let burst_len = Indication::AttemptAlarm.duration().unwrap_or_default();
                    self.burst = Some(Deadline::start(followup, burst_len));
                    self.burst_sounding = false;
                }
            }
        }

        effects.push(Effect::ReinitializeReader);
    }

    fn on_granted(&mut self, now: Instant) {
        let Some(opened_at) = self.opened_at else {
            return;
        };
        if now.saturating_duration_since(opened_at) > self.dwell && self.actuator.begin_close(now) {
            info!("Dwell elapsed, closing door");
        }
    }

    fn on_alarm(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        let (Some(window), Some(since)) = (self.forced_entry.alarm_window(), self.alarm_since) else {
            return;
        };
        if now.saturating_duration_since(since) > window {
            info!("Forced-entry alarm window elapsed");
            self.clear_alarm(now, effects);
        }
    }

    fn on_motion_complete(&mut self, done: MotionComplete, now: Instant, effects: &mut Vec<Effect>) {
        match done {
            MotionComplete::Opened => {
                if self.state() == SystemState::AccessGranted {
                    self.opened_at = Some(now);
                }
                effects.push(Effect::Indicate(Indication::DoorOpened));
                effects.push(Effect::log(EventChannel::DoorStatus, "Door Opened"));
            }
            MotionComplete::Closed => {
                effects.push(Effect::Indicate(Indication::DoorClosed));
                effects.push(Effect::log(EventChannel::DoorStatus, "Door Closed"));
                if self.state() == SystemState::AccessGranted {
                    self.opened_at = None;
                    effects.push(Effect::ReinitializeReader);
                    self.enter(SystemState::Idle, now);
                }
            }
        }
    }

    fn advance_overlays(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        if self.denial.is_some_and(|denial| denial.has_timed_out(now)) {
            self.denial = None;
        }

        if let Some(burst) = self.burst {
            if !self.burst_sounding && burst.has_started(now) {
                self.burst_sounding = true;
                if self.state() != SystemState::ForcedEntryAlarm {
                    effects.push(Effect::Indicate(Indication::AttemptAlarm));
                }
            }
            if burst.has_timed_out(now) {
                self.burst = None;
                self.burst_sounding = false;
            }
        }

        if self.cooldown.is_some_and(|cooldown| cooldown.has_timed_out(now)) {
            info!("Reader cooldown over, reinitializing");
            self.cooldown = None;
            effects.push(Effect::ReinitializeReader);
        }

        if self.vibration.is_some_and(|vibration| vibration.has_timed_out(now)) {
            self.vibration = None;
        }
    }

    fn apply_remote(&mut self, command: DoorCommand, now: Instant, effects: &mut Vec<Effect>) {
        match command {
            DoorCommand::Open => {
                if self.actuator.is_moving() || self.actuator.commanded() == LockCommand::Unlocked {
                    return;
                }
                if self.state() == SystemState::ForcedEntryAlarm {
                    debug!("Remote open ignored during forced-entry alarm");
                    return;
                }
                if self.state() == SystemState::AwaitingCredential {
                    self.awaiting = None;
                    effects.push(Effect::ReinitializeReader);
                    self.enter(SystemState::Idle, now);
                }
                info!("Remote command: open door");
                self.actuator.begin_open(now, effects);
            }
            DoorCommand::Close => {
                if !self.actuator.is_open() {
                    return;
                }
                if self.state() == SystemState::AccessGranted {
                    debug!("Remote close ignored, grant cycle closes the door");
                    return;
                }
                info!("Remote command: close door");
                self.actuator.begin_close(now);
            }
            DoorCommand::Reset => {
                if self.state() == SystemState::ForcedEntryAlarm {
                    info!("Remote command: acknowledge alarm");
                    effects.push(Effect::log(EventChannel::ForcedEntry, "Alarm acknowledged"));
                    self.clear_alarm(now, effects);
                }
            }
        }
    }

    fn check_forced_entry(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        let forced = self.sensed == DoorPosition::Open
            && self.actuator.commanded() == LockCommand::Locked
            && !self.actuator.is_opening()
            && self.state().is_guarded();
        if !forced {
            return;
        }

        warn!(from = %self.state(), "Forced entry detected");
        if self.state() == SystemState::AwaitingCredential {
            self.awaiting = None;
            effects.push(Effect::ReinitializeReader);
        }
        self.denial = None;
        self.burst = None;
        self.burst_sounding = false;
        self.alarm_since = Some(now);
        self.enter(SystemState::ForcedEntryAlarm, now);

        effects.push(Effect::log(EventChannel::ForcedEntry, "Door forced open!"));
        effects.push(Effect::Indicate(Indication::ForcedEntryAlarm));
    }

    fn check_vibration(&mut self, now: Instant, asserted: bool, effects: &mut Vec<Effect>) {
        if !asserted || self.vibration.is_some() {
            return;
        }

        warn!("Suspicious vibration detected");
        let window = Indication::VibrationAlarm.duration().unwrap_or_default();
        self.vibration = Some(Deadline::start(now, window));
        effects.push(Effect::log(
            EventChannel::SuspiciousActivity,
            "Suspicious vibration detected",
        ));
        if self.state() != SystemState::ForcedEntryAlarm {
            effects.push(Effect::Indicate(Indication::VibrationAlarm));
        }
    }

    fn clear_alarm(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        self.alarm_since = None;
        effects.push(Effect::Indicate(Indication::AllClear));
        self.enter(SystemState::Idle, now);
    }

    fn current_screen(&self, now: Instant) -> Screen {
        if self.state() == SystemState::ForcedEntryAlarm {
            return Screen::ForcedEntry;
        }
        if self.vibration.is_some() {
            return Screen::Vibration;
        }
        if self.denial.is_some() {
            return Screen::Denied;
        }
        match self.state() {
            SystemState::AwaitingCredential => Screen::Prompt,
            SystemState::AccessGranted if self.actuator.is_closing() => Screen::Closing,
            SystemState::AccessGranted => Screen::Granted,
            _ if self.actuator.is_closing() => Screen::Closing,
            _ => match self.cooldown {
                Some(cooldown) if cooldown.has_started(now) => Screen::Cooldown {
                    seconds: cooldown.seconds_remaining(now).max(1),
                },
                _ => Screen::Idle,
            },
        }
    }

    fn refresh_screen(&mut self, now: Instant, effects: &mut Vec<Effect>) {
        let screen = self.current_screen(now);
        if self.shown != Some(screen) {
            effects.push(Effect::display(screen));
            self.shown = Some(screen);
        }
    }
}
