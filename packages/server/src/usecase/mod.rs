//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層（論理時計・レジストリ）を操作します。

pub mod broadcast;
pub mod chat_service;
pub mod connect_participant;
pub mod disconnect_participant;
pub mod error;
pub mod send_message;

pub use broadcast::{BroadcastReport, Broadcaster};
pub use chat_service::{ChatService, StreamSummary};
pub use connect_participant::{ConnectParticipantUseCase, Connection};
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::SendMessageError;
pub use send_message::SendMessageUseCase;
