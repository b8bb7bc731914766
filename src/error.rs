//! Error types for the diagnosis pipeline.

use thiserror::Error;

/// Main error type for the diagnosis pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image bytes could not be decoded
    #[error("Image decode error: {0}")]
    Decode(String),

    /// Model failed to load
    #[error("Model error: {0}")]
    Model(String),

    /// Inference run failed
    #[error("Inference error: {0}")]
    Inference(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid argument error
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Decode(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Specialized Result type for diagnosis operations.
pub type Result<T> = std::result::Result<T, Error>;
