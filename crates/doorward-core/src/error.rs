use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Credential errors
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    // State machine errors
    #[error("Invalid state transition from {from} to {to}")]
    InvalidStateTransition { from: String, to: String },

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_transition_display() {
        let error = Error::InvalidStateTransition {
            from: "Idle".to_string(),
            to: "AccessGranted".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid state transition from Idle to AccessGranted"
        );
    }

    #[test]
    fn test_config_parse_error_converts() {
        let parse_error = toml::from_str::<toml::Value>("not = [valid").unwrap_err();
        let error: Error = parse_error.into();
        assert!(matches!(error, Error::ConfigParse(_)));
    }
}
