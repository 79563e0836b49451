//! Error types for the tfchain-connect crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Connection to {endpoint} failed: {reason}")]
    ConnectionFailed { endpoint: String, reason: String },

    #[error("Node answered with HTTP status {0}")]
    HttpStatus(u16),

    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid JSON-RPC response: {0}")]
    InvalidResponse(String),
}

impl ConnectError {
    /// Whether the failure means the node could not be reached
    ///
    /// Loss of the link invalidates the session; everything else is the node
    /// answering, badly or with an error, and leaves the session usable.
    /// Of the HTTP statuses only the gateway ones (502, 503, 504) mean the
    /// node is out of reach; a 500 is the node failing this query.
    pub fn is_connection_loss(&self) -> bool {
        match self {
            ConnectError::Transport(e) => !e.is_decode() && !e.is_builder(),
            ConnectError::ConnectionFailed { .. } => true,
            ConnectError::HttpStatus(status) => matches!(status, 502..=504),
            ConnectError::InvalidEndpoint(_)
            | ConnectError::Rpc { .. }
            | ConnectError::InvalidResponse(_) => false,
        }
    }
}
