//! Mock device implementations for testing and development.
//!
//! Each mock comes paired with a cloneable handle that drives its inputs or
//! inspects its outputs, so tests and the emulator binary can play the part
//! of the physical world without hardware attached.

pub mod feedback;
pub mod lock;
pub mod reader;
pub mod sensors;

// Re-export commonly used types
pub use feedback::{MockFeedback, MockFeedbackHandle};
pub use lock::{MockLock, MockLockHandle};
pub use reader::{MockReader, MockReaderHandle};
pub use sensors::{MockBinarySensor, MockBinarySensorHandle, MockDoorSensor, MockDoorSensorHandle};

use std::sync::{Mutex, MutexGuard};

/// Lock a mock's shared state, recovering it if a test thread panicked.
pub(crate) fn lock_state<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
