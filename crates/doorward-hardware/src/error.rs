//! Peripheral errors.

pub type Result<T> = std::result::Result<T, HardwareError>;

#[derive(Debug, thiserror::Error)]
pub enum HardwareError {
    /// The device stopped answering, or was never attached.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// A reading that could not be decoded, such as a malformed card UID.
    #[error("Invalid data: {message}")]
    InvalidData { message: String },

    #[error("Initialization failed: {message}")]
    InitializationFailed { message: String },

    /// Digital pin or PWM channel fault.
    #[error("Pin error on {pin}: {message}")]
    Pin { pin: String, message: String },
}

impl HardwareError {
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    pub fn initialization_failed(message: impl Into<String>) -> Self {
        Self::InitializationFailed {
            message: message.into(),
        }
    }

    pub fn pin(pin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Pin {
            pin: pin.into(),
            message: message.into(),
        }
    }
}

impl From<doorward_core::Error> for HardwareError {
    fn from(error: doorward_core::Error) -> Self {
        Self::invalid_data(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disconnected_error() {
        let error = HardwareError::disconnected("MFRC522");
        assert!(matches!(error, HardwareError::Disconnected { .. }));
        assert_eq!(error.to_string(), "Device disconnected: MFRC522");
    }

    #[test]
    fn test_pin_error() {
        let error = HardwareError::pin("GPIO17", "read failed");
        assert_eq!(error.to_string(), "Pin error on GPIO17: read failed");
    }

    #[test]
    fn test_core_error_converts_to_invalid_data() {
        let core = doorward_core::CredentialId::normalize("E3").unwrap_err();
        let error: HardwareError = core.into();
        assert!(matches!(error, HardwareError::InvalidData { .. }));
    }
}
