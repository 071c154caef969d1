//! Core domain models for the chat relay.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use super::value_object::{ClientId, ConnectionId, LogicalTime, MessageText, Timestamp};

/// Outbound delivery channel of one connected participant
pub type OutboundSender = UnboundedSender<ChatMessage>;

/// Kind of a relayed message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    /// Authored by a participant
    Chat,
    /// Synthesized when a participant's stream is registered
    Join,
    /// Synthesized when a participant's stream terminates
    Leave,
}

/// A message that has been stamped by the server clock.
///
/// Only exists for the duration of one fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Display name of the participant the message is about
    pub sender: String,
    /// Message body
    pub text: String,
    /// Lamport time assigned by the server
    pub logical_time: LogicalTime,
    pub kind: MessageKind,
}

impl ChatMessage {
    /// Create a chat message authored by `sender`
    pub fn chat(sender: String, text: MessageText, logical_time: LogicalTime) -> Self {
        Self {
            sender,
            text: text.into_string(),
            logical_time,
            kind: MessageKind::Chat,
        }
    }

    /// Create the notification broadcast when `client_id` joins
    pub fn join(client_id: &ClientId, logical_time: LogicalTime) -> Self {
        Self {
            sender: client_id.as_str().to_string(),
            text: format!("Participant {client_id} joined Chit Chat at logical time {logical_time}"),
            logical_time,
            kind: MessageKind::Join,
        }
    }

    /// Create the notification broadcast when `client_id` leaves
    pub fn leave(client_id: &ClientId, logical_time: LogicalTime) -> Self {
        Self {
            sender: client_id.as_str().to_string(),
            text: format!("Participant {client_id} left Chit Chat at logical time {logical_time}"),
            logical_time,
            kind: MessageKind::Leave,
        }
    }
}

/// Represents a participant with a live stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Participant {
    /// Participant identifier (client_id)
    pub id: ClientId,
    /// Timestamp when the participant connected
    pub connected_at: Timestamp,
}

impl Participant {
    /// Create a new participant
    pub fn new(id: ClientId, connected_at: Timestamp) -> Self {
        Self { id, connected_at }
    }
}

/// One registry row: who is connected, over which connection, and where
/// to deliver their messages.
#[derive(Debug, Clone)]
pub struct ParticipantEntry {
    pub participant: Participant,
    pub connection_id: ConnectionId,
    pub sender: OutboundSender,
}

impl ParticipantEntry {
    pub fn new(participant: Participant, connection_id: ConnectionId, sender: OutboundSender) -> Self {
        Self {
            participant,
            connection_id,
            sender,
        }
    }

    /// Registry key of this entry
    pub fn client_id(&self) -> &ClientId {
        &self.participant.id
    }

    /// Push a message onto this participant's stream.
    ///
    /// Fails only when the receiving side of the stream is gone.
    pub fn deliver(&self, message: ChatMessage) -> Result<(), ChatMessage> {
        self.sender.send(message).map_err(|err| err.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::factory::ConnectionIdFactory;
    use tokio::sync::mpsc;

    #[test]
    fn test_join_message_text() {
        // テスト項目: 参加通知のテキストと種別が正しい
        // given (前提条件):
        let bob = ClientId::new("Bob".to_string()).unwrap();

        // when (操作):
        let message = ChatMessage::join(&bob, LogicalTime::new(1));

        // then (期待する結果):
        assert_eq!(message.kind, MessageKind::Join);
        assert_eq!(message.sender, "Bob");
        assert_eq!(message.logical_time, LogicalTime::new(1));
        assert_eq!(
            message.text,
            "Participant Bob joined Chit Chat at logical time 1"
        );
    }

    #[test]
    fn test_leave_message_text() {
        // テスト項目: 退出通知のテキストと種別が正しい
        let alice = ClientId::new("Alice".to_string()).unwrap();

        let message = ChatMessage::leave(&alice, LogicalTime::new(7));

        assert_eq!(message.kind, MessageKind::Leave);
        assert_eq!(
            message.text,
            "Participant Alice left Chit Chat at logical time 7"
        );
    }

    #[test]
    fn test_entry_deliver_fails_after_receiver_dropped() {
        // テスト項目: 受信側が破棄されると配送に失敗し、メッセージが返される
        // given (前提条件):
        let (tx, rx) = mpsc::unbounded_channel();
        let entry = ParticipantEntry::new(
            Participant::new(ClientId::new("bob".to_string()).unwrap(), Timestamp::new(0)),
            ConnectionIdFactory::generate(),
            tx,
        );
        let message = ChatMessage::join(entry.client_id(), LogicalTime::new(1));
        assert!(entry.deliver(message.clone()).is_ok());

        // when (操作):
        drop(rx);
        let result = entry.deliver(message.clone());

        // then (期待する結果):
        assert_eq!(result, Err(message));
    }
}
