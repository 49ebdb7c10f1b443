//! Progress callback trait for interface-agnostic updates
//!
//! This trait allows different interfaces (CLI, web server, etc.) to receive
//! progress updates while a generation attempt runs.

use crate::error::Error;
use crate::types::{GenerationResult, OperationHandle};
use async_trait::async_trait;
use std::fmt;

/// Attempt phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Sending the request
    Submitting,
    /// Waiting for the operation to finish
    Polling,
    /// Attempt reached a terminal state
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Submitting => write!(f, "Submitting"),
            Self::Polling => write!(f, "Waiting for video"),
            Self::Complete => write!(f, "Complete"),
        }
    }
}

/// Progress callback trait
///
/// Implement this trait to receive progress updates during generation.
/// - CLI implementations can print to terminal
/// - Web servers can send SSE or WebSocket messages
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called once the service accepted the request
    async fn on_submitted(&self, operation: &OperationHandle);

    /// Called with every status observed while polling
    async fn on_status(&self, result: &GenerationResult);

    /// Called when the attempt fails
    async fn on_error(&self, error: &Error);

    /// Called with a user-facing status message
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_submitted(&self, _operation: &OperationHandle) {}
    async fn on_status(&self, _result: &GenerationResult) {}
    async fn on_error(&self, _error: &Error) {}
    async fn on_message(&self, _message: &str) {}
}
