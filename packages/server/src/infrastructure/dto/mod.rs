//! Data transfer objects exchanged over HTTP and WebSocket.

pub mod http;
pub mod websocket;
