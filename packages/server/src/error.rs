//! Server startup errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening endpoint could not be established
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}
