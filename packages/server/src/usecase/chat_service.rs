//! The relay's protocol state machine.
//!
//! Each connection moves `Unregistered → Active → Terminated` exactly once:
//! [`ChatService::stream_messages`] registers and announces the participant,
//! waits for the transport's close signal, then unregisters and announces the
//! departure. [`ChatService::send_message`] validates, stamps and fans out
//! participant messages.

use std::{future::Future, sync::Arc};

use crate::domain::{
    ChatMessage, ClientId, ClientRegistry, LogicalClock, LogicalTime, OutboundSender,
};

use super::{
    broadcast::Broadcaster,
    connect_participant::{Connection, ConnectParticipantUseCase},
    disconnect_participant::DisconnectParticipantUseCase,
    error::SendMessageError,
    send_message::SendMessageUseCase,
};

/// How one stream ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    pub connection: Connection,
    /// Logical time of the LEAVE broadcast; `None` if a newer connection
    /// under the same identity had already taken over.
    pub left_at: Option<LogicalTime>,
}

/// Owns the server clock and registry and exposes the two RPC operations.
pub struct ChatService {
    clock: Arc<LogicalClock>,
    registry: Arc<dyn ClientRegistry>,
    broadcaster: Broadcaster,
}

impl ChatService {
    pub fn new(registry: Arc<dyn ClientRegistry>) -> Self {
        Self {
            clock: Arc::new(LogicalClock::new()),
            broadcaster: Broadcaster::new(registry.clone()),
            registry,
        }
    }

    pub fn clock(&self) -> &LogicalClock {
        &self.clock
    }

    pub fn registry(&self) -> &Arc<dyn ClientRegistry> {
        &self.registry
    }

    /// SendMessage: validate, stamp with `observe`, broadcast.
    ///
    /// A rejected message leaves the clock and the registry untouched.
    pub async fn send_message(
        &self,
        sender: String,
        text: String,
        logical_time: LogicalTime,
    ) -> Result<ChatMessage, SendMessageError> {
        SendMessageUseCase::new(self.clock.clone(), self.broadcaster.clone())
            .execute(sender, text, logical_time)
            .await
    }

    /// StreamMessages: register `client_id` with `sender` as its outbound
    /// channel, broadcast JOIN, and hold the connection until `closed`
    /// resolves. Then unregister and broadcast LEAVE.
    pub async fn stream_messages<F>(
        &self,
        client_id: ClientId,
        sender: OutboundSender,
        closed: F,
    ) -> StreamSummary
    where
        F: Future<Output = ()>,
    {
        let connection = self.connect(client_id.clone(), sender).await;
        closed.await;
        let left_at = self.disconnect(&client_id, connection).await;
        StreamSummary {
            connection,
            left_at,
        }
    }

    /// `Unregistered → Active`
    pub async fn connect(&self, client_id: ClientId, sender: OutboundSender) -> Connection {
        ConnectParticipantUseCase::new(
            self.registry.clone(),
            self.clock.clone(),
            self.broadcaster.clone(),
        )
        .execute(client_id, sender)
        .await
    }

    /// `Active → Terminated`
    pub async fn disconnect(
        &self,
        client_id: &ClientId,
        connection: Connection,
    ) -> Option<LogicalTime> {
        DisconnectParticipantUseCase::new(
            self.registry.clone(),
            self.clock.clone(),
            self.broadcaster.clone(),
        )
        .execute(client_id, connection.connection_id)
        .await
    }
}
