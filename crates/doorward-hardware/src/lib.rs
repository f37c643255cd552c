//! Peripheral abstraction layer for the doorward access node.
//!
//! This crate defines the traits the node polls once per tick: presence,
//! door contact, vibration, the proximity credential reader, the lock/servo
//! actuator, and the local feedback device. Mock implementations with
//! controlling handles live in [`mock`]; embedded-hal adapters for real pins
//! live in `gpio` behind the `gpio` feature.
//!
//! # Design Philosophy
//!
//! - **Async-first**: All I/O operations use native `async fn` in traits
//!   (Rust 1.90 + Edition 2024 RPITIT).
//! - **Non-blocking**: Every call is one poll or one write. Timing belongs to
//!   the controller, so a device never sleeps.
//! - **Error-aware**: All operations return [`Result<T>`][error::Result] with a
//!   [`HardwareError`] describing the failure.
//!
//! # Example
//!
//! ```
//! use doorward_hardware::mock::{MockDoorSensor, MockReader};
//! use doorward_hardware::traits::{CredentialReader, DoorPositionSensor};
//! use doorward_core::DoorPosition;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> doorward_hardware::Result<()> {
//!     let (mut door, door_handle) = MockDoorSensor::new();
//!     let (mut reader, reader_handle) = MockReader::new();
//!
//!     door_handle.set_position(DoorPosition::Open);
//!     reader_handle.present_uid(&[0xE3, 0x87, 0x26, 0x29]).await?;
//!
//!     assert_eq!(door.position().await?, DoorPosition::Open);
//!     assert!(reader.poll().await?.is_some());
//!     Ok(())
//! }
//! ```

pub mod error;
#[cfg(feature = "gpio")]
pub mod gpio;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use traits::{
    CredentialReader, DoorPositionSensor, FeedbackDevice, LockActuator, PresenceDetector,
    VibrationSensor,
};
pub use types::{ActuatorOp, DeviceInfo};
