//! Mock binary sensors: presence, vibration, and door contact.

use std::sync::{Arc, Mutex};

use doorward_core::DoorPosition;

use super::lock_state;
use crate::{
    HardwareError, Result,
    traits::{DoorPositionSensor, PresenceDetector, VibrationSensor},
};

#[derive(Debug)]
struct BinaryState<T> {
    level: T,
    fault: Option<String>,
    reads: usize,
}

impl<T: Copy> BinaryState<T> {
    fn read(&mut self, name: &str) -> Result<T> {
        self.reads += 1;
        match &self.fault {
            Some(message) => Err(HardwareError::pin(name, message.clone())),
            None => Ok(self.level),
        }
    }
}

/// Mock active-HIGH digital input, usable as a presence or vibration sensor.
///
/// # Examples
///
/// ```
/// use doorward_hardware::mock::MockBinarySensor;
/// use doorward_hardware::traits::PresenceDetector;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> doorward_hardware::Result<()> {
///     let (mut pir, handle) = MockBinarySensor::new("PIR");
///     assert!(!pir.motion_detected().await?);
///
///     handle.set(true);
///     assert!(pir.motion_detected().await?);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockBinarySensor {
    name: String,
    state: Arc<Mutex<BinaryState<bool>>>,
}

impl MockBinarySensor {
    /// Create a sensor that starts de-asserted.
    pub fn new(name: impl Into<String>) -> (Self, MockBinarySensorHandle) {
        let state = Arc::new(Mutex::new(BinaryState {
            level: false,
            fault: None,
            reads: 0,
        }));
        let sensor = Self {
            name: name.into(),
            state: Arc::clone(&state),
        };
        (sensor, MockBinarySensorHandle { state })
    }

    fn read(&self) -> Result<bool> {
        lock_state(&self.state).read(&self.name)
    }
}

impl PresenceDetector for MockBinarySensor {
    async fn motion_detected(&mut self) -> Result<bool> {
        self.read()
    }
}

impl VibrationSensor for MockBinarySensor {
    async fn vibration_detected(&mut self) -> Result<bool> {
        self.read()
    }
}

/// Handle for driving a [`MockBinarySensor`].
#[derive(Debug, Clone)]
pub struct MockBinarySensorHandle {
    state: Arc<Mutex<BinaryState<bool>>>,
}

impl MockBinarySensorHandle {
    /// Assert or release the input.
    pub fn set(&self, asserted: bool) {
        lock_state(&self.state).level = asserted;
    }

    /// Make subsequent reads fail with a pin error, or clear the fault.
    pub fn set_fault(&self, fault: Option<&str>) {
        lock_state(&self.state).fault = fault.map(str::to_string);
    }

    /// Current input level.
    pub fn is_asserted(&self) -> bool {
        lock_state(&self.state).level
    }

    /// How many times the sensor has been read.
    pub fn read_count(&self) -> usize {
        lock_state(&self.state).reads
    }
}

/// Mock door contact sensor.
#[derive(Debug)]
pub struct MockDoorSensor {
    state: Arc<Mutex<BinaryState<DoorPosition>>>,
}

impl MockDoorSensor {
    /// Create a sensor that reports the door closed.
    pub fn new() -> (Self, MockDoorSensorHandle) {
        let state = Arc::new(Mutex::new(BinaryState {
            level: DoorPosition::Closed,
            fault: None,
            reads: 0,
        }));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockDoorSensorHandle { state },
        )
    }
}

impl Default for MockDoorSensor {
    fn default() -> Self {
        Self::new().0
    }
}

impl DoorPositionSensor for MockDoorSensor {
    async fn position(&mut self) -> Result<DoorPosition> {
        lock_state(&self.state).read("door contact")
    }
}

/// Handle for moving the door leaf seen by a [`MockDoorSensor`].
#[derive(Debug, Clone)]
pub struct MockDoorSensorHandle {
    state: Arc<Mutex<BinaryState<DoorPosition>>>,
}

impl MockDoorSensorHandle {
    pub fn set_position(&self, position: DoorPosition) {
        lock_state(&self.state).level = position;
    }

    /// Make subsequent reads fail with a pin error, or clear the fault.
    pub fn set_fault(&self, fault: Option<&str>) {
        lock_state(&self.state).fault = fault.map(str::to_string);
    }

    pub fn position(&self) -> DoorPosition {
        lock_state(&self.state).level
    }
}
