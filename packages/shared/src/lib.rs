//! Shared utilities for the Chit Chat server and client.

pub mod logger;
pub mod signal;
pub mod time;

pub use logger::{LogSink, LoggerError, init_logger};
