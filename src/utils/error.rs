use std::result;

use thiserror::Error;

/// A type alias for handling errors related to trellis.
pub type Result<T> = result::Result<T, TrellisError>;

/// An error that can occur while building or loading a widget layout.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrellisError {
    /// An error when there is an IO exception.
    #[error("IO exception, {0}")]
    InvalidIo(String),
    /// An error when a layout description cannot be parsed.
    #[error("Invalid layout description, {0}")]
    InvalidLayout(String),
    /// An error when a widget is constructed with a nonsensical value.
    #[error("Invalid value, {0}")]
    InvalidValue(String),
    /// An error to represent generic errors.
    #[error("Error, {0}")]
    GenericError(String),
}

impl From<std::io::Error> for TrellisError {
    fn from(err: std::io::Error) -> Self {
        TrellisError::InvalidIo(err.to_string())
    }
}

impl From<toml_edit::de::Error> for TrellisError {
    fn from(err: toml_edit::de::Error) -> Self {
        TrellisError::InvalidLayout(err.to_string())
    }
}
