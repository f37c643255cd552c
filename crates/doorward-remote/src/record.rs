//! Event record wire format.

use serde::{Deserialize, Serialize};

use crate::Result;

/// One audit entry pushed under an event channel.
///
/// Serialized as `{"message": "...", "time": "YYYY-MM-DD HH:MM:SS"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub message: String,
    pub time: String,
}

impl EventRecord {
    pub fn new(message: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            time: time.into(),
        }
    }

    /// Encode as a JSON value ready to push.
    ///
    /// # Errors
    /// Returns `RemoteError::Serialization` if encoding fails.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_shape() {
        let record = EventRecord::new("Door Opened", "2024-05-17 08:03:09");
        assert_eq!(
            record.to_value().unwrap(),
            json!({"message": "Door Opened", "time": "2024-05-17 08:03:09"})
        );
    }

    #[test]
    fn test_record_parses_from_store() {
        let record: EventRecord =
            serde_json::from_str(r#"{"message":"Failed Attempts: 3","time":"2024-05-17 08:03:09"}"#)
                .unwrap();
        assert_eq!(record.message, "Failed Attempts: 3");
    }
}
