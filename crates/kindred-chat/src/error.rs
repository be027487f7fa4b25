//! Error types for the conversational core.

use kindred_core::error::KindredError;

/// Errors from the chat store and history persistence.
///
/// The reply engine itself never fails; these only surface from input
/// validation and the storage boundary.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message cannot be empty")]
    EmptyMessage,
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<KindredError> for ChatError {
    fn from(err: KindredError) -> Self {
        match err {
            KindredError::Serialization(msg) => ChatError::Serialization(msg),
            other => ChatError::Storage(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ChatError {
    fn from(err: std::io::Error) -> Self {
        ChatError::Storage(err.to_string())
    }
}
