//! Error types for the message board

use thiserror::Error;

pub type Result<T> = std::result::Result<T, BoardError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// Rejected before anything was written.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl BoardError {
    /// Whether the caller can fix the request and try again.
    pub fn is_client_error(&self) -> bool {
        matches!(self, BoardError::InvalidInput(_))
    }
}

impl From<serde_json::Error> for BoardError {
    fn from(e: serde_json::Error) -> Self {
        BoardError::Serialization(e.to_string())
    }
}
