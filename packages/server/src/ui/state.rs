//! Server state shared by every handler.

use serde::Deserialize;
use std::{sync::Arc, time::Duration};

use crate::{
    config::ServerConfig, domain::ClientRegistry, infrastructure::InMemoryClientRegistry,
    usecase::ChatService,
};

/// Query parameters for WebSocket connection
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub client_id: String,
}

/// Shared application state
pub struct AppState {
    /// Protocol state machine (owns the clock and the registry)
    pub chat_service: ChatService,
    /// WebSocket ping period
    pub heartbeat: Option<Duration>,
    /// Silence after which a stream is treated as closed
    pub idle_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(registry: Arc<dyn ClientRegistry>, config: &ServerConfig) -> Self {
        Self {
            chat_service: ChatService::new(registry),
            heartbeat: config.heartbeat,
            idle_timeout: config.idle_timeout(),
        }
    }

    /// State backed by a fresh in-memory registry
    pub fn in_memory(config: &ServerConfig) -> Arc<Self> {
        Arc::new(Self::new(Arc::new(InMemoryClientRegistry::new()), config))
    }
}
