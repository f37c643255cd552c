//! Peripheral trait definitions.
//!
//! These traits are the contract between the door node and its peripherals:
//! three binary sensors, the proximity credential reader, the lock/servo
//! actuator, and the local feedback device (display, LEDs, buzzer). Every
//! call is a single non-blocking poll or write; timing lives in the
//! controller, never in the device.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT),
//! eliminating the need for the `async_trait` macro.
//!
//! **NOTE**: These traits are NOT object-safe because `async fn` methods
//! return opaque futures. Use generics (`fn foo<R: CredentialReader>(..)`).

#![allow(async_fn_in_trait)]

use doorward_core::{CredentialId, DoorPosition, Indication, LockCommand};

use crate::error::Result;
use crate::types::DeviceInfo;

/// Passive infrared motion input.
pub trait PresenceDetector: Send {
    /// Whether motion is asserted on this tick.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read.
    async fn motion_detected(&mut self) -> Result<bool>;
}

/// Door contact input, independent of the commanded lock state.
pub trait DoorPositionSensor: Send {
    /// Current physical position of the door leaf.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read.
    async fn position(&mut self) -> Result<DoorPosition>;
}

/// Tamper vibration input.
pub trait VibrationSensor: Send {
    /// Whether vibration is asserted on this tick.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read.
    async fn vibration_detected(&mut self) -> Result<bool>;
}

/// Proximity credential reader.
///
/// The reader's internal session must be reset with
/// [`reinitialize`](CredentialReader::reinitialize) after every read attempt
/// and after any disable window; the controller takes care of that.
///
/// # Examples
///
/// ```no_run
/// use doorward_hardware::traits::CredentialReader;
/// use doorward_hardware::Result;
///
/// async fn read_once<R: CredentialReader>(reader: &mut R) -> Result<Option<String>> {
///     let id = reader.poll().await?;
///     reader.reinitialize().await?;
///     Ok(id.map(|id| id.to_string()))
/// }
/// ```
pub trait CredentialReader: Send {
    /// Non-blocking poll for a presented credential.
    ///
    /// Returns `Ok(None)` when nothing is in the field this tick.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The reader is disconnected
    /// - The UID read from the card is malformed
    async fn poll(&mut self) -> Result<Option<CredentialId>>;

    /// Reset the reader session.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader fails to come back up.
    async fn reinitialize(&mut self) -> Result<()>;

    /// Get reader information.
    ///
    /// # Errors
    ///
    /// Returns an error if a communication error occurs.
    async fn info(&self) -> Result<DeviceInfo>;
}

/// Lock relay plus latch servo.
///
/// The ramp between home and open angle is driven by the controller one
/// angle write at a time.
pub trait LockActuator: Send {
    /// Drive the lock relay.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be driven.
    async fn set_lock(&mut self, command: LockCommand) -> Result<()>;

    /// Move the latch servo to `degrees`.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be driven.
    async fn set_angle(&mut self, degrees: u8) -> Result<()>;
}

/// Local two-line display, LEDs, and buzzer.
pub trait FeedbackDevice: Send {
    /// Replace both display lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the display cannot be written.
    async fn show(&mut self, primary: &str, secondary: &str) -> Result<()>;

    /// Start rendering an indication, replacing any running pattern.
    ///
    /// # Errors
    ///
    /// Returns an error if the LEDs or buzzer cannot be driven.
    async fn indicate(&mut self, indication: Indication) -> Result<()>;
}
