//! Error types for reelgen

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by reelgen
#[derive(Debug, Error)]
pub enum Error {
    /// The generation request was rejected or could not be sent.
    ///
    /// Displays exactly the service-provided detail (or the generic fallback).
    #[error("{0}")]
    Submission(String),

    /// The generation attempt was abandoned while polling.
    ///
    /// Displays exactly the service-provided detail (or the generic fallback).
    #[error("{0}")]
    Poll(String),

    /// Request failed local validation before submission
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// More reference images were selected than the service accepts
    #[error("You can only select up to {max} reference images ({selected} selected)")]
    TooManyReferenceImages {
        /// Number of files in the rejected selection
        selected: usize,
        /// Maximum accepted
        max: usize,
    },

    /// Another generation attempt is still submitting or polling
    #[error("a generation attempt is already in progress")]
    AttemptInProgress,

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// Interactive prompt failed
    #[error("interactive input failed: {0}")]
    Interactive(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
