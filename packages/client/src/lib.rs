//! Chit Chat command-line client.
//!
//! Holds one StreamMessages WebSocket open for inbound messages and posts
//! each typed line to SendMessage, keeping a local Lamport clock in step with
//! the server.

pub mod error;
pub mod input;
pub mod receiver;
pub mod runner;
pub mod sender;
pub mod transport;

// Re-export entry points
pub use error::ClientError;
pub use runner::{ClientConfig, DEFAULT_SERVER_ADDR, ExitReason, Session, run_client};
