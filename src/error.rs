/*!
 * Error types for the tfchain client
 */

use std::io;
use thiserror::Error;

pub use tfchain_interface::QueryError;

pub type Result<T> = std::result::Result<T, TfchainError>;

#[derive(Error, Debug)]
pub enum TfchainError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport could not be set up (bad endpoint, HTTP client build failure)
    #[error("Connection setup failed: {0}")]
    Connect(#[from] tfchain_connect::ConnectError),

    /// A query failed
    #[error(transparent)]
    Query(#[from] QueryError),
}

impl TfchainError {
    /// Check if this error is transient (the same call may succeed later)
    ///
    /// Only a lost or unreachable node qualifies; rejected queries and shape
    /// mismatches repeat on every attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            TfchainError::Query(err) => err.is_connection(),
            TfchainError::Io(err) => matches!(
                err.kind(),
                io::ErrorKind::ConnectionRefused
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::TimedOut
                    | io::ErrorKind::Interrupted
            ),
            TfchainError::Config(_) | TfchainError::Connect(_) => false,
        }
    }
}
