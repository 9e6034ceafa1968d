//! WebSocket message types.
//!
//! Defines the client-to-server and server-to-client message formats
//! exchanged with the Foundry client module.

use serde::{Deserialize, Serialize};

use crate::foundry::{ChatMessage, EvaluatedRoll, Speaker, WorldSnapshot};

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Authenticate the connection with user information
    Auth {
        user_id: String,
        user_name: String,
        role: u8,
        session_id: Option<String>,
    },
    /// Keepalive ping
    Ping,
    /// A chat message was rendered in the client's chat log
    ChatMessageRendered {
        message: ChatMessage,
        #[serde(default)]
        world: WorldSnapshot,
        /// Whether the rendered card already carries the reroll control
        #[serde(default)]
        has_reroll_control: bool,
    },
    /// The user clicked the reroll control
    RerollRequested {
        message: ChatMessage,
        roll_index: usize,
        /// Same slice of the world as the render event; the click is
        /// re-checked against it before anything is rolled
        #[serde(default)]
        world: WorldSnapshot,
    },
    /// Reply to `evaluate_roll`
    RollEvaluated {
        request_id: String,
        roll: serde_json::Value,
    },
    /// Reply to `publish_message`
    MessagePublished {
        request_id: String,
        message_id: String,
    },
    /// Failure reply to any server request
    RequestFailed { request_id: String, error: String },
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Response to authentication attempt
    AuthResponse {
        success: bool,
        session_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// Keepalive pong response
    Pong { timestamp: u64 },
    /// Error message
    Error {
        code: String,
        message: String,
        recoverable: bool,
    },
    /// Append the reroll control to a rendered card
    AttachRerollControl {
        message_id: String,
        roll_index: usize,
        label: String,
    },
    /// Enable or disable a previously attached control
    SetControlState { message_id: String, disabled: bool },
    /// Evaluate a roll formula with the given data
    EvaluateRoll {
        request_id: String,
        formula: String,
        data: serde_json::Value,
    },
    /// Create a chat message for an evaluated roll
    PublishMessage {
        request_id: String,
        roll: EvaluatedRoll,
        speaker: Speaker,
        flavor: String,
        flags: serde_json::Value,
    },
    /// Show a UI notification to the user
    Notify { level: String, message: String },
}
