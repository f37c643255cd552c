//! Error types for the remote store link.

/// Result type alias for remote store operations.
pub type Result<T> = std::result::Result<T, RemoteError>;

/// Errors that can occur while talking to the realtime store.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    /// The store rejected the node's credentials.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// An operation was attempted before a successful sign-in.
    #[error("Not signed in")]
    NotSignedIn,

    /// The request did not reach the store or its reply was lost.
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// A record could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RemoteError {
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::AuthenticationFailed {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            RemoteError::authentication("bad token").to_string(),
            "Authentication failed: bad token"
        );
        assert_eq!(RemoteError::NotSignedIn.to_string(), "Not signed in");
        assert_eq!(
            RemoteError::transport("connection reset").to_string(),
            "Transport error: connection reset"
        );
    }

    #[test]
    fn test_serde_json_error_converts() {
        let parse_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: RemoteError = parse_error.into();
        assert!(matches!(error, RemoteError::Serialization(_)));
    }
}
