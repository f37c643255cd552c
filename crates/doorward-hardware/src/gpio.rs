//! embedded-hal 1.0 adapters for real pins.
//!
//! Sensor inputs are active-HIGH. The lock relay is active-LOW: driving the
//! pin low energizes the relay and releases the strike. The latch servo takes
//! a standard 50 Hz hobby-servo pulse between 500 and 2500 microseconds.

use core::fmt::Debug;

use doorward_core::{DoorPosition, LockCommand};
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::pwm::SetDutyCycle;
use tracing::trace;

use crate::{
    HardwareError, Result,
    traits::{DoorPositionSensor, LockActuator, PresenceDetector, VibrationSensor},
};

/// Servo frame length.
pub const SERVO_PERIOD_US: u16 = 20_000;
/// Pulse width at 0 degrees.
pub const SERVO_MIN_PULSE_US: u16 = 500;
/// Pulse width at 180 degrees.
pub const SERVO_MAX_PULSE_US: u16 = 2_500;

/// Pulse width for a servo angle, clamped to 180 degrees.
pub fn servo_pulse_us(degrees: u8) -> u16 {
    let degrees = u32::from(degrees.min(180));
    let span = u32::from(SERVO_MAX_PULSE_US - SERVO_MIN_PULSE_US);
    // span * 180 / 180 fits in u16, so the cast cannot truncate.
    SERVO_MIN_PULSE_US + (degrees * span / 180) as u16
}

/// Active-HIGH digital input usable as any binary door sensor.
#[derive(Debug)]
pub struct DigitalInput<P> {
    name: &'static str,
    pin: P,
}

impl<P: InputPin> DigitalInput<P> {
    pub fn new(name: &'static str, pin: P) -> Self {
        Self { name, pin }
    }

    /// Give the pin back.
    pub fn release(self) -> P {
        self.pin
    }

    fn is_high(&mut self) -> Result<bool> {
        self.pin
            .is_high()
            .map_err(|e| HardwareError::pin(self.name, format!("{e:?}")))
    }
}

impl<P: InputPin + Send> PresenceDetector for DigitalInput<P> {
    async fn motion_detected(&mut self) -> Result<bool> {
        self.is_high()
    }
}

impl<P: InputPin + Send> VibrationSensor for DigitalInput<P> {
    async fn vibration_detected(&mut self) -> Result<bool> {
        self.is_high()
    }
}

impl<P: InputPin + Send> DoorPositionSensor for DigitalInput<P> {
    async fn position(&mut self) -> Result<DoorPosition> {
        self.is_high().map(DoorPosition::from_contact)
    }
}

/// Lock relay on a digital output plus latch servo on a PWM channel.
#[derive(Debug)]
pub struct RelayServoLock<O, S> {
    relay: O,
    servo: S,
}

impl<O, S> RelayServoLock<O, S>
where
    O: OutputPin,
    S: SetDutyCycle,
{
    pub fn new(relay: O, servo: S) -> Self {
        Self { relay, servo }
    }

    /// Give both outputs back.
    pub fn release(self) -> (O, S) {
        (self.relay, self.servo)
    }
}

impl<O, S> LockActuator for RelayServoLock<O, S>
where
    O: OutputPin + Send,
    S: SetDutyCycle + Send,
    O::Error: Debug,
    S::Error: Debug,
{
    async fn set_lock(&mut self, command: LockCommand) -> Result<()> {
        let result = match command {
            LockCommand::Unlocked => self.relay.set_low(),
            LockCommand::Locked => self.relay.set_high(),
        };
        result.map_err(|e| HardwareError::pin("relay", format!("{e:?}")))
    }

    async fn set_angle(&mut self, degrees: u8) -> Result<()> {
        let pulse = servo_pulse_us(degrees);
        trace!(degrees, pulse_us = pulse, "Servo write");
        self.servo
            .set_duty_cycle_fraction(pulse, SERVO_PERIOD_US)
            .map_err(|e| HardwareError::pin("servo", format!("{e:?}")))
    }
}
