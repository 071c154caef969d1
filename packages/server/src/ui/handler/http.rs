//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};
use chitchat_shared::time::timestamp_to_jst_rfc3339;

use crate::{
    domain::LogicalTime,
    infrastructure::dto::{
        http::{ChatResponse, ParticipantDetailDto, ParticipantsDto},
        websocket::ChatMessage,
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// SendMessage: validate, stamp and broadcast one chat message.
///
/// Always answers `200`; a rejection is carried in the body.
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(message): Json<ChatMessage>,
) -> Json<ChatResponse> {
    let result = state
        .chat_service
        .send_message(
            message.sender,
            message.text,
            LogicalTime::new(message.logical_time),
        )
        .await;
    Json(ChatResponse::from(result))
}

/// Connected participants and the current server clock
pub async fn get_participants(State(state): State<Arc<AppState>>) -> Json<ParticipantsDto> {
    let participants = state.chat_service.registry().participants().await;

    Json(ParticipantsDto {
        logical_time: state.chat_service.clock().value().value(),
        participants: participants
            .iter()
            .map(|p| ParticipantDetailDto {
                client_id: p.id.as_str().to_string(),
                connected_at: timestamp_to_jst_rfc3339(p.connected_at.value()),
            })
            .collect(),
    })
}
