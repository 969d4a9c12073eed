//! Error types for message decoding

use thiserror::Error;

/// Errors that abort a decode.
///
/// Only failures of the underlying compound file surface here. Malformed
/// property streams, short payloads and rejected candidates are absorbed
/// while decoding and never reach the caller.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The container could not be opened or read
    #[error("Failed to read container: {0}")]
    Io(#[from] std::io::Error),

    /// The container is not a usable compound file
    #[error("Invalid compound file: {0}")]
    Container(String),
}

/// Result type for decoding operations
pub type Result<T> = std::result::Result<T, DecodeError>;
