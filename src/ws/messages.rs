//! WebSocket envelope and client commands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope wrapping every message on the feed, in both directions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WsMessage {
    /// Client-chosen for commands and echoed in the reply; server-generated for events.
    #[serde(default)]
    pub id: String,
    /// Message kind.
    #[serde(rename = "type")]
    pub msg_type: WsMessageType,
    /// When the message was produced.
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Kind-specific body.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl WsMessage {
    /// Builds a server-originated message stamped with the current time.
    #[must_use]
    pub fn reply(id: impl Into<String>, msg_type: WsMessageType, payload: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            msg_type,
            timestamp: Utc::now(),
            payload,
        }
    }

    /// Builds an error reply.
    #[must_use]
    pub fn error(id: impl Into<String>, code: u16, message: &str) -> Self {
        Self::reply(
            id,
            WsMessageType::Error,
            serde_json::json!({ "code": code, "message": message }),
        )
    }
}

/// Envelope kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WsMessageType {
    /// Client to server.
    Command,
    /// Reply to a command.
    Response,
    /// Catalog change pushed by the server.
    Event,
    /// Rejected command.
    Error,
}

/// Commands carried in the payload of a `command` envelope.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum WsCommand {
    /// Start receiving changes for the listed events; `"*"` means all.
    Subscribe {
        /// Event ids to follow.
        event_ids: Vec<String>,
    },
    /// Stop receiving changes for the listed events.
    Unsubscribe {
        /// Event ids to drop.
        event_ids: Vec<String>,
    },
}
