use std::io;

use thiserror::Error;

/// Library-wide error type for dmcfg operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration document does not match the expected shape.
    #[error("Malformed configuration document: {0}")]
    MalformedDocument(String),

    /// Attribute type name outside the Actual/Target/MinSet/MaxSet set.
    #[error("Unknown variable attribute type '{0}'")]
    UnknownAttributeType(String),

    /// Device model storage has not been initialized with the expected schema.
    #[error("Device model storage is missing required tables: {0}")]
    MissingSchema(String),

    /// Database failure.
    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        AppError::MalformedDocument(value.to_string())
    }
}
