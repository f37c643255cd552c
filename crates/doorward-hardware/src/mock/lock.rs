//! Mock lock relay and latch servo.

use std::sync::{Arc, Mutex};

use doorward_core::LockCommand;

use super::lock_state;
use crate::{HardwareError, Result, traits::LockActuator, types::ActuatorOp};

#[derive(Debug)]
struct LockLog {
    lock: LockCommand,
    angle: u8,
    ops: Vec<ActuatorOp>,
    fault: Option<String>,
}

/// Mock lock actuator that records every output write.
///
/// The mock starts in the locked, home position.
#[derive(Debug)]
pub struct MockLock {
    log: Arc<Mutex<LockLog>>,
}

impl MockLock {
    pub fn new() -> (Self, MockLockHandle) {
        let log = Arc::new(Mutex::new(LockLog {
            lock: LockCommand::Locked,
            angle: 0,
            ops: Vec::new(),
            fault: None,
        }));
        (
            Self {
                log: Arc::clone(&log),
            },
            MockLockHandle { log },
        )
    }

    fn apply(&self, op: ActuatorOp) -> Result<()> {
        let mut log = lock_state(&self.log);
        if let Some(message) = &log.fault {
            return Err(HardwareError::pin("lock", message.clone()));
        }
        match op {
            ActuatorOp::Lock(command) => log.lock = command,
            ActuatorOp::Angle(degrees) => log.angle = degrees,
        }
        log.ops.push(op);
        Ok(())
    }
}

impl Default for MockLock {
    fn default() -> Self {
        Self::new().0
    }
}

impl LockActuator for MockLock {
    async fn set_lock(&mut self, command: LockCommand) -> Result<()> {
        self.apply(ActuatorOp::Lock(command))
    }

    async fn set_angle(&mut self, degrees: u8) -> Result<()> {
        if degrees > 180 {
            return Err(HardwareError::invalid_data(format!(
                "servo angle {degrees} out of range"
            )));
        }
        self.apply(ActuatorOp::Angle(degrees))
    }
}

/// Handle for inspecting a [`MockLock`].
#[derive(Debug, Clone)]
pub struct MockLockHandle {
    log: Arc<Mutex<LockLog>>,
}

impl MockLockHandle {
    /// Last relay state written.
    pub fn lock_state(&self) -> LockCommand {
        lock_state(&self.log).lock
    }

    /// Last servo angle written.
    pub fn angle(&self) -> u8 {
        lock_state(&self.log).angle
    }

    /// Every successful write, oldest first.
    pub fn ops(&self) -> Vec<ActuatorOp> {
        lock_state(&self.log).ops.clone()
    }

    /// Servo angles written, oldest first.
    pub fn angles(&self) -> Vec<u8> {
        lock_state(&self.log)
            .ops
            .iter()
            .filter_map(|op| match op {
                ActuatorOp::Angle(degrees) => Some(*degrees),
                ActuatorOp::Lock(_) => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        lock_state(&self.log).ops.clear();
    }

    /// Make subsequent writes fail, or clear the fault.
    pub fn set_fault(&self, fault: Option<&str>) {
        lock_state(&self.log).fault = fault.map(str::to_string);
    }
}
