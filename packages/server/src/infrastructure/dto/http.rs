//! HTTP API response DTOs for the chat relay.

use serde::{Deserialize, Serialize};

use crate::usecase::SendMessageError;

/// Result of one SendMessage call.
///
/// Rejections are reported here, in-band, never as an HTTP error status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn accepted() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

impl<T> From<Result<T, SendMessageError>> for ChatResponse {
    fn from(result: Result<T, SendMessageError>) -> Self {
        match result {
            Ok(_) => Self::accepted(),
            Err(e) => Self::rejected(e.to_string()),
        }
    }
}

/// Participant detail for the participants endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantDetailDto {
    pub client_id: String,
    pub connected_at: String, // ISO 8601
}

/// Body of the participants endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantsDto {
    /// Current value of the server clock
    pub logical_time: i64,
    pub participants: Vec<ParticipantDetailDto>,
}
