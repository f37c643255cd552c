//! The door node runtime.
//!
//! [`DoorNode`] owns the peripherals, the [`AccessController`], the
//! notification sink, and the optional remote command source. Each tick it
//! samples the sensors, steps the controller, and carries out the returned
//! effects in order. Peripheral failures never reach the controller: a failed
//! read is logged and replaced with a safe default, a failed write is logged
//! and skipped.

use std::future::Future;
use std::time::{Duration, Instant};

use doorward_controller::{
    AccessController, Effect, Inputs, NotificationSink, RemoteCommandSource, RemotePoll,
};
use doorward_core::{ControllerConfig, SystemClock, WallClock};
use doorward_hardware::{
    CredentialReader, DoorPositionSensor, LockActuator, PresenceDetector, VibrationSensor,
};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Physical devices attached to one door.
#[derive(Debug)]
pub struct Peripherals<P, R, D, V, L> {
    pub presence: P,
    pub reader: R,
    pub door: D,
    pub vibration: V,
    pub lock: L,
}

/// One door: peripherals, controller, sinks, and the tick loop.
pub struct DoorNode<P, R, D, V, L, N, C> {
    controller: AccessController,
    peripherals: Peripherals<P, R, D, V, L>,
    sink: N,
    remote: C,
    clock: Box<dyn WallClock + Send>,
    tick_period: Duration,
}

impl<P, R, D, V, L, N, C> DoorNode<P, R, D, V, L, N, C>
where
    P: PresenceDetector,
    R: CredentialReader,
    D: DoorPositionSensor,
    V: VibrationSensor,
    L: LockActuator,
    N: NotificationSink,
    C: RemoteCommandSource,
{
    /// Assemble a node. Event timestamps default to the UTC system clock.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(
        config: &ControllerConfig,
        peripherals: Peripherals<P, R, D, V, L>,
        sink: N,
        remote: C,
    ) -> doorward_core::Result<Self> {
        Ok(Self {
            controller: AccessController::new(config)?,
            peripherals,
            sink,
            remote,
            clock: Box::new(SystemClock::default()),
            tick_period: config.tick_period(),
        })
    }

    /// Use `clock` for event timestamps.
    pub fn with_clock(mut self, clock: impl WallClock + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn controller(&self) -> &AccessController {
        &self.controller
    }

    pub fn peripherals(&self) -> &Peripherals<P, R, D, V, L> {
        &self.peripherals
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Power-on sequence: lock, home the servo, reset the reader, idle screen.
    pub async fn boot(&mut self, now: Instant) -> Vec<Effect> {
        match self.peripherals.reader.info().await {
            Ok(info) => info!(reader = %info.name, model = %info.model, "Credential reader attached"),
            Err(e) => warn!(error = %e, "Credential reader did not identify"),
        }
        let effects = self.controller.boot(now);
        self.dispatch(&effects).await;
        effects
    }

    /// Sample, step, and dispatch once. Returns the effects carried out.
    pub async fn tick(&mut self, now: Instant) -> Vec<Effect> {
        let inputs = self.sample(now).await;
        let effects = self.controller.step(now, &inputs);
        self.dispatch(&effects).await;
        effects
    }

    /// Operator acknowledgment of a forced-entry alarm.
    pub async fn acknowledge_alarm(&mut self, now: Instant) -> Vec<Effect> {
        let effects = self.controller.acknowledge_alarm(now);
        self.dispatch(&effects).await;
        effects
    }

    /// Tick on a fixed period until `shutdown` resolves.
    ///
    /// A tick that overruns delays the next one rather than bursting to
    /// catch up.
    pub async fn run<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(self.tick_period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!(period_ms = self.tick_period.as_millis() as u64, "Tick loop running");
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Shutdown requested, leaving tick loop");
                    break;
                }
                at = interval.tick() => {
                    self.tick(at.into_std()).await;
                }
            }
        }
    }

    async fn sample(&mut self, now: Instant) -> Inputs {
        let devices = &mut self.peripherals;

        let presence = devices.presence.motion_detected().await.unwrap_or_else(|e| {
            warn!(error = %e, "Presence read failed");
            false
        });

        // Keep the last known position so a flaky contact neither raises
        // nor masks an alarm.
        let door_position = match devices.door.position().await {
            Ok(position) => position,
            Err(e) => {
                warn!(error = %e, "Door position read failed");
                self.controller.door_state().sensed
            }
        };

        let vibration = devices.vibration.vibration_detected().await.unwrap_or_else(|e| {
            warn!(error = %e, "Vibration read failed");
            false
        });

        let credential = if self.controller.wants_credential(now) {
            devices.reader.poll().await.unwrap_or_else(|e| {
                warn!(error = %e, "Credential read failed");
                None
            })
        } else {
            None
        };

        let remote = if self.remote.is_available() && self.controller.remote_poll_due(now) {
            RemotePoll::Polled(self.remote.read_command().await)
        } else {
            RemotePoll::NotPolled
        };

        Inputs {
            presence,
            credential,
            door_position,
            vibration,
            remote,
        }
    }

    async fn dispatch(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::Display { primary, secondary } => {
                    self.sink.display(primary, secondary).await;
                }
                Effect::Indicate(indication) => self.sink.indicate(*indication).await,
                Effect::Log { channel, message } => {
                    let timestamp = self.clock.timestamp();
                    self.sink.log_event(*channel, message, &timestamp).await;
                }
                Effect::Relay(command) => {
                    if let Err(e) = self.peripherals.lock.set_lock(*command).await {
                        warn!(error = %e, ?command, "Lock relay write failed");
                    }
                }
                Effect::Servo(angle) => {
                    if let Err(e) = self.peripherals.lock.set_angle(*angle).await {
                        warn!(error = %e, angle, "Servo write failed");
                    }
                }
                Effect::ReinitializeReader => {
                    if let Err(e) = self.peripherals.reader.reinitialize().await {
                        warn!(error = %e, "Reader reinitialization failed");
                    } else {
                        debug!("Reader reinitialized");
                    }
                }
            }
        }
    }
}
