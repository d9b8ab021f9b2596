//! Core types for the subscription engine.

use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a subscribed session.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Delivery policy for a session, fixed at attach time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionMode {
    /// Every update carries the whole model document.
    Full,
    /// Updates carry only the diff since the last delivered document.
    Patch,
}

/// Commands a subscribed client may send between updates.
///
/// Only [`ClientCommand::Acknowledge`] is legal while a session is
/// awaiting acknowledgment; everything else deserializes to
/// [`ClientCommand::Unsupported`] and terminates the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum ClientCommand {
    /// Client confirms receipt of the previous document.
    Acknowledge,

    /// Any command the subscription mode does not recognize.
    #[serde(other)]
    Unsupported,
}

/// Structured error sent to a still-connected client before closing.
///
/// Distinct from model documents by the `success` field; uses the
/// daemon's camelCase wire convention.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub success: bool,
    pub error_type: String,
    pub error_message: String,
}

impl ErrorEnvelope {
    pub fn from_error(err: &SyncError) -> Self {
        Self {
            success: false,
            error_type: err.kind().to_string(),
            error_message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_acknowledge_round_trip() {
        let cmd: ClientCommand = serde_json::from_value(json!({"command": "Acknowledge"})).unwrap();
        assert_eq!(cmd, ClientCommand::Acknowledge);
    }

    #[test]
    fn test_unknown_command_maps_to_unsupported() {
        let cmd: ClientCommand = serde_json::from_value(json!({"command": "Code"})).unwrap();
        assert_eq!(cmd, ClientCommand::Unsupported);
    }

    #[test]
    fn test_error_envelope_wire_shape() {
        let envelope = ErrorEnvelope::from_error(&SyncError::Disconnected);
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["errorType"], json!("disconnected"));
        assert!(value["errorMessage"].is_string());
    }
}
