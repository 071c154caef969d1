//! WebSocket chat server implementation.

mod handler;
mod runner;
pub mod state;

pub use runner::{build_app, run, serve};
