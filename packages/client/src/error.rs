//! Client error types.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server address cannot form a valid URL
    #[error("invalid server address '{addr}': {reason}")]
    InvalidAddress { addr: String, reason: String },

    /// The initial StreamMessages connection failed
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tungstenite::Error,
    },

    /// SendMessage could not be delivered or answered
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The inbound stream failed
    #[error("stream error: {0}")]
    Stream(#[from] tungstenite::Error),
}
