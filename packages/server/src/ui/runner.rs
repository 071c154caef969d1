//! Router construction and the accept loop.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    error::ServerError,
    ui::{
        handler::{get_participants, health_check, send_message, websocket_handler},
        state::AppState,
    },
};

/// Build the application router over the given state
pub fn build_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(websocket_handler))
        .route("/api/messages", post(send_message))
        .route("/api/health", get(health_check))
        .route("/api/participants", get(get_participants))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)
}

/// Bind the configured endpoint and serve until SIGINT/SIGTERM
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    tracing::info!(
        component = "Server",
        event = "Start",
        "Chit Chat server listening on {} (heartbeat: {:?})",
        addr,
        config.heartbeat
    );

    let state = AppState::in_memory(&config);
    serve(listener, state, chitchat_shared::signal::shutdown_signal()).await?;

    tracing::info!(component = "Server", event = "Shutdown", "Server stopped");
    Ok(())
}
