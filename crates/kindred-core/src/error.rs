use thiserror::Error;

/// Top-level error type for the Kindred system.
///
/// Subsystem crates define their own error types and implement
/// `From<KindredError>` so that the `?` operator works across crate boundaries.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KindredError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for KindredError {
    fn from(err: toml::de::Error) -> Self {
        KindredError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for KindredError {
    fn from(err: toml::ser::Error) -> Self {
        KindredError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for KindredError {
    fn from(err: serde_json::Error) -> Self {
        KindredError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Kindred operations.
pub type Result<T> = std::result::Result<T, KindredError>;
