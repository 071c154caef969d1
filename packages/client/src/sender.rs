//! Send path: one input line at a time.

use std::sync::Arc;

use chitchat_server::{
    domain::{ClientId, LogicalClock, LogicalTime, MessageText, ValueObjectError},
    infrastructure::dto::{http::ChatResponse, websocket::ChatMessage},
};

use crate::{error::ClientError, transport::ChatTransport};

/// What happened to one line of input
#[derive(Debug)]
pub enum SendOutcome {
    /// Blank line; nothing sent, clock untouched
    Ignored,
    /// Rejected locally; nothing sent, clock untouched
    Invalid(ValueObjectError),
    /// The server answered (accepted or rejected in-band)
    Sent {
        logical_time: LogicalTime,
        response: ChatResponse,
    },
    /// The request failed; the tick stays consumed
    Failed {
        logical_time: LogicalTime,
        error: ClientError,
    },
}

impl SendOutcome {
    /// Console feedback for the user, if any
    pub fn feedback(&self) -> Option<String> {
        match self {
            Self::Ignored => None,
            Self::Invalid(e) => Some(format!("Error: {e}")),
            Self::Sent { response, .. } if !response.success => Some(format!(
                "Server rejected: {}",
                response.error.as_deref().unwrap_or("unknown error")
            )),
            Self::Sent { .. } => None,
            Self::Failed { error, .. } => Some(format!("Send error: {error}")),
        }
    }
}

pub struct MessageSender<T> {
    client_id: ClientId,
    clock: Arc<LogicalClock>,
    transport: T,
}

impl<T: ChatTransport> MessageSender<T> {
    pub fn new(client_id: ClientId, clock: Arc<LogicalClock>, transport: T) -> Self {
        Self {
            client_id,
            clock,
            transport,
        }
    }

    /// Validate `line`, tick the clock and post it.
    pub async fn submit(&self, line: &str) -> SendOutcome {
        let text = line.trim();
        if text.is_empty() {
            return SendOutcome::Ignored;
        }

        let text = match MessageText::new(text.to_string()) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    component = "Client",
                    event = "ValidationError",
                    client_id = %self.client_id,
                    lamport = self.clock.value().value(),
                    "{}",
                    e
                );
                return SendOutcome::Invalid(e);
            }
        };

        let logical_time = self.clock.tick();
        let message = ChatMessage::chat(self.client_id.as_str(), text.as_str(), logical_time);

        match self.transport.send_message(message).await {
            Ok(response) => {
                if response.success {
                    tracing::info!(
                        component = "Client",
                        event = "Send",
                        client_id = %self.client_id,
                        lamport = logical_time.value(),
                        "text={:?}",
                        text.as_str()
                    );
                } else {
                    tracing::warn!(
                        component = "Client",
                        event = "Send",
                        client_id = %self.client_id,
                        lamport = logical_time.value(),
                        "server rejected: {}",
                        response.error.as_deref().unwrap_or_default()
                    );
                }
                SendOutcome::Sent {
                    logical_time,
                    response,
                }
            }
            Err(error) => {
                tracing::error!(
                    component = "Client",
                    event = "Send",
                    client_id = %self.client_id,
                    lamport = logical_time.value(),
                    "send failed: {}",
                    error
                );
                SendOutcome::Failed {
                    logical_time,
                    error,
                }
            }
        }
    }
}
