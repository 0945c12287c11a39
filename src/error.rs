//! Error types for worklog.

use std::io;
use thiserror::Error;

/// Result type alias for worklog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in worklog operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Storage I/O error.
    #[error("Storage error: {0}")]
    Storage(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// `start` was called while a session is already running.
    #[error("A work session is already in progress")]
    AlreadyWorking,

    /// `stop` was called with no session running.
    #[error("No work session is in progress")]
    NotWorking,

    /// HTTP client error talking to the storage endpoint.
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}
