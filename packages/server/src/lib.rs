//! Chit Chat relay server.
//!
//! Every participant holds one WebSocket stream (StreamMessages) and posts
//! messages over HTTP (SendMessage). The server owns a Lamport clock, stamps
//! every chat, join and leave event with it and fans the event out to all
//! connected participants.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::{run, serve};
