//! WebSocket connection handlers (StreamMessages).

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::{
    sync::mpsc,
    time::{Instant, Interval, interval_at},
};

use crate::{
    domain::{ChatMessage, ClientId},
    infrastructure::dto::websocket as dto,
    ui::state::{AppState, ConnectQuery},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<ConnectQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    let client_id_str = query.client_id;

    // Convert String -> ClientId (Domain Model)
    let client_id = match ClientId::try_from(client_id_str.clone()) {
        Ok(id) => id,
        Err(e) => {
            tracing::warn!("Invalid client_id '{}': {}", client_id_str, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, client_id)))
}

async fn next_heartbeat(ticker: &mut Option<Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, client_id: ClientId) {
    let (mut sender, mut receiver) = socket.split();

    // Channel the broadcaster delivers into for this client
    let (tx, mut rx) = mpsc::unbounded_channel::<ChatMessage>();
    let heartbeat = state.heartbeat;
    let idle_timeout = state.idle_timeout;

    // Forward stamped messages to this client and ping it periodically.
    // Ends when the registry drops our channel or the socket stops accepting frames.
    let writer_id = client_id.clone();
    let mut send_task = tokio::spawn(async move {
        let mut ticker = heartbeat.map(|period| interval_at(Instant::now() + period, period));
        loop {
            let frame = tokio::select! {
                message = rx.recv() => match message {
                    Some(message) => match serde_json::to_string(&dto::ChatMessage::from(&message)) {
                        Ok(json) => Message::Text(json.into()),
                        Err(e) => {
                            tracing::error!("Failed to encode message for '{}': {}", writer_id, e);
                            continue;
                        }
                    },
                    None => {
                        tracing::debug!("Outbound channel for '{}' closed", writer_id);
                        break;
                    }
                },
                _ = next_heartbeat(&mut ticker) => Message::Ping(Bytes::new()),
            };

            if sender.send(frame).await.is_err() {
                break;
            }
        }
        let _ = sender.close().await;
    });

    // Watch the inbound half; any frame (pongs included) counts as a sign of life
    let reader_id = client_id.clone();
    let mut recv_task = tokio::spawn(async move {
        loop {
            let next = match idle_timeout {
                Some(limit) => match tokio::time::timeout(limit, receiver.next()).await {
                    Ok(next) => next,
                    Err(_) => {
                        tracing::warn!(
                            "No frames from '{}' for {:?}; treating as disconnected",
                            reader_id,
                            limit
                        );
                        break;
                    }
                },
                None => receiver.next().await,
            };

            match next {
                Some(Ok(Message::Close(_))) | None => {
                    tracing::info!("Client '{}' closed the stream", reader_id);
                    break;
                }
                Some(Ok(Message::Text(text))) => {
                    tracing::debug!(
                        "Ignoring text frame from '{}' ({} bytes); messages go through SendMessage",
                        reader_id,
                        text.len()
                    );
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    tracing::warn!("WebSocket error for '{}': {}", reader_id, e);
                    break;
                }
            }
        }
    });

    // If any one of the tasks completes, abort the other
    let closed = async {
        tokio::select! {
            _ = &mut recv_task => send_task.abort(),
            _ = &mut send_task => recv_task.abort(),
        }
    };

    let summary = state
        .chat_service
        .stream_messages(client_id.clone(), tx, closed)
        .await;
    tracing::debug!(
        "Stream for '{}' terminated (connection {}, joined at {}, left at {:?})",
        client_id,
        summary.connection.connection_id,
        summary.connection.joined_at,
        summary.left_at.map(|t| t.value())
    );
}
