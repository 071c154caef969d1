//! Server configuration.

use std::time::Duration;

/// Default port, shared with the client's default endpoint
pub const DEFAULT_PORT: u16 = 50051;

/// Default WebSocket heartbeat period
pub const DEFAULT_HEARTBEAT: Duration = Duration::from_secs(15);

/// A peer that sends nothing for this many heartbeat periods is considered gone
pub const MISSED_HEARTBEATS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Ping period for WebSocket streams; `None` disables liveness checks
    pub heartbeat: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            heartbeat: Some(DEFAULT_HEARTBEAT),
        }
    }
}

impl ServerConfig {
    /// `host:port` to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// How long a stream may stay silent before it is treated as closed
    pub fn idle_timeout(&self) -> Option<Duration> {
        self.heartbeat.map(|period| period * MISSED_HEARTBEATS)
    }
}
