//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::TransportError;

/// Failure to read a usable join message from a new connection.
#[derive(Debug, Error)]
pub enum JoinError {
    /// The peer went away before sending anything
    #[error("connection closed before the join message")]
    Closed,

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("malformed join message: {0}")]
    Malformed(#[from] serde_json::Error),
}
