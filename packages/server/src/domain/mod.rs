//! Domain layer for the chat relay.
//!
//! This module contains the logical clock, the message and participant
//! models, and the registry abstraction. It is independent of data transfer
//! objects (DTOs) and infrastructure concerns.

pub mod clock;
pub mod entity;
pub mod error;
pub mod factory;
pub mod registry;
pub mod value_object;

pub use clock::LogicalClock;
pub use entity::{ChatMessage, MessageKind, OutboundSender, Participant, ParticipantEntry};
pub use error::ValueObjectError;
pub use factory::ConnectionIdFactory;
pub use registry::{ClientRegistry, Unregistration};
pub use value_object::{
    ClientId, ConnectionId, LogicalTime, MAX_MESSAGE_CHARS, MessageText, Timestamp,
};
