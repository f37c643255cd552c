//! Console-driven emulated peripherals.
//!
//! The `doorward` binary runs against mock devices. Lines typed on stdin
//! play the physical world: a person walking up, a card in the field, the
//! door being pushed, someone shaking the frame, an operator writing the
//! control key.

use doorward_core::{CredentialId, DoorPosition};
use doorward_hardware::mock::{
    MockBinarySensor, MockBinarySensorHandle, MockDoorSensor, MockDoorSensorHandle, MockLock,
    MockLockHandle, MockReader, MockReaderHandle,
};
use doorward_remote::MemoryStoreHandle;
use tracing::{info, warn};

use crate::node::Peripherals;

/// Mock peripherals wired as a [`Peripherals`] bundle.
pub type EmulatedPeripherals =
    Peripherals<MockBinarySensor, MockReader, MockDoorSensor, MockBinarySensor, MockLock>;

/// Control handles for [`EmulatedPeripherals`].
#[derive(Debug, Clone)]
pub struct EmulatorHandles {
    pub presence: MockBinarySensorHandle,
    pub reader: MockReaderHandle,
    pub door: MockDoorSensorHandle,
    pub vibration: MockBinarySensorHandle,
    pub lock: MockLockHandle,
}

/// Build mock peripherals and their handles.
pub fn emulated_peripherals() -> (EmulatedPeripherals, EmulatorHandles) {
    let (presence, presence_handle) = MockBinarySensor::new("PIR");
    let (reader, reader_handle) = MockReader::new();
    let (door, door_handle) = MockDoorSensor::new();
    let (vibration, vibration_handle) = MockBinarySensor::new("Vibration");
    let (lock, lock_handle) = MockLock::new();

    (
        Peripherals {
            presence,
            reader,
            door,
            vibration,
            lock,
        },
        EmulatorHandles {
            presence: presence_handle,
            reader: reader_handle,
            door: door_handle,
            vibration: vibration_handle,
            lock: lock_handle,
        },
    )
}

/// One console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stimulus {
    /// `motion on|off`
    Motion(bool),
    /// `card <uid>`, e.g. `card E3 87 26 29`
    Card(Vec<u8>),
    /// `door open|closed`
    Door(DoorPosition),
    /// `shake on|off`
    Shake(bool),
    /// `remote <value>`; `remote` alone clears the key
    Remote(Option<String>),
}

fn switch(word: Option<&str>) -> Option<bool> {
    match word? {
        "on" | "1" | "high" => Some(true),
        "off" | "0" | "low" => Some(false),
        _ => None,
    }
}

impl Stimulus {
    /// Parse a console line. Blank or unknown lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        match verb.to_ascii_lowercase().as_str() {
            "motion" => switch(Some(rest)).map(Self::Motion),
            "shake" => switch(Some(rest)).map(Self::Shake),
            "door" => match rest {
                "open" => Some(Self::Door(DoorPosition::Open)),
                "closed" | "close" => Some(Self::Door(DoorPosition::Closed)),
                _ => None,
            },
            "card" => {
                let id = CredentialId::normalize(rest).ok()?;
                let bytes = id
                    .as_str()
                    .split(' ')
                    .map(|pair| u8::from_str_radix(pair, 16))
                    .collect::<Result<Vec<u8>, _>>()
                    .ok()?;
                Some(Self::Card(bytes))
            }
            "remote" if rest.is_empty() => Some(Self::Remote(None)),
            "remote" => Some(Self::Remote(Some(rest.to_string()))),
            _ => None,
        }
    }
}

/// Apply a stimulus through the device handles.
pub async fn apply(
    stimulus: Stimulus,
    handles: &EmulatorHandles,
    store: Option<&MemoryStoreHandle>,
    control_key: &str,
) {
    match stimulus {
        Stimulus::Motion(on) => handles.presence.set(on),
        Stimulus::Shake(on) => handles.vibration.set(on),
        Stimulus::Door(position) => handles.door.set_position(position),
        Stimulus::Card(uid) => {
            if let Err(e) = handles.reader.present_uid(&uid).await {
                warn!(error = %e, "Card presentation failed");
            }
        }
        Stimulus::Remote(value) => match (store, value) {
            (Some(store), Some(value)) => store.set_value(control_key, &value),
            (Some(store), None) => store.clear_value(control_key),
            (None, _) => warn!("No remote store configured"),
        },
    }
    info!(lock = ?handles.lock.lock_state(), angle = handles.lock.angle(), "Emulator input applied");
}
