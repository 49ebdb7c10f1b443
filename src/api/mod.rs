//! Generation service clients
//!
//! Provides a single interface over the remote generation API so the
//! submission and polling logic can run against any implementation.

mod factory;
mod http;

pub use factory::create_generation_service;
pub use http::HttpGenerationService;

use crate::config::Config;
use crate::error::Result;
use crate::types::{GenerationRequest, LastVideo, OperationHandle, StatusReport};
use async_trait::async_trait;

/// Generation service trait
///
/// This trait abstracts the remote API, allowing the controller to be
/// exercised against the HTTP client or an in-memory fake.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Submit a request and return the handle of the started operation
    ///
    /// Failures are reported as [`crate::error::Error::Submission`].
    async fn submit(&self, request: &GenerationRequest) -> Result<OperationHandle>;

    /// Fetch the current status of an operation
    async fn status(&self, operation: &OperationHandle) -> Result<StatusReport>;

    /// Fetch metadata about the most recently completed video
    async fn last_video(&self) -> Result<LastVideo>;

    /// Download a video from a resolved URL
    async fn download(&self, video_url: &str) -> Result<Vec<u8>>;

    /// Get the client configuration
    fn config(&self) -> &Config;
}
