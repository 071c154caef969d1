//! Chat message wire format.
//!
//! The same JSON object is pushed over the WebSocket stream and posted to
//! the SendMessage endpoint.

use serde::{Deserialize, Serialize};

use crate::domain::{self, LogicalTime};

/// Message type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    Chat,
    Join,
    Leave,
}

/// Chat message sent and received between clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: String,
    pub text: String,
    pub logical_time: i64,
    pub kind: MessageKind,
}

impl ChatMessage {
    /// Build an outbound chat message from a client
    pub fn chat(
        sender: impl Into<String>,
        text: impl Into<String>,
        logical_time: LogicalTime,
    ) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
            logical_time: logical_time.value(),
            kind: MessageKind::Chat,
        }
    }
}

impl From<domain::MessageKind> for MessageKind {
    fn from(kind: domain::MessageKind) -> Self {
        match kind {
            domain::MessageKind::Chat => Self::Chat,
            domain::MessageKind::Join => Self::Join,
            domain::MessageKind::Leave => Self::Leave,
        }
    }
}

impl From<&domain::ChatMessage> for ChatMessage {
    fn from(message: &domain::ChatMessage) -> Self {
        Self {
            sender: message.sender.clone(),
            text: message.text.clone(),
            logical_time: message.logical_time.value(),
            kind: message.kind.into(),
        }
    }
}
