//! Fatal server errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening endpoint could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The accept loop stopped with an I/O error
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
