//! Generation attempt controller
//!
//! Tracks one attempt through `idle → submitting → polling → {done, error}`
//! and refuses to start a second attempt while one is still active.

use crate::api::GenerationService;
use crate::error::{Error, Result};
use crate::generate::execute::{poll_generation, submit_generation};
use crate::generate::ProgressCallback;
use crate::types::{GenerationRequest, GenerationResult, GenerationStatus, OperationHandle};
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// State of the current (or last) generation attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AttemptState {
    /// No attempt started yet
    #[default]
    Idle,
    /// Request is being sent
    Submitting,
    /// Waiting for the operation to finish
    Polling(OperationHandle),
    /// Video ready at the given URL
    Done(String),
    /// Attempt abandoned with the given user-facing message
    Error(String),
}

impl AttemptState {
    /// Whether an attempt is currently running
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Submitting | Self::Polling(_))
    }
}

/// Runs generation attempts against a service, one at a time
pub struct Generator<'a> {
    service: &'a dyn GenerationService,
    state: Mutex<AttemptState>,
}

impl<'a> Generator<'a> {
    /// Create a controller for the given service
    pub fn new(service: &'a dyn GenerationService) -> Self {
        Self {
            service,
            state: Mutex::new(AttemptState::Idle),
        }
    }

    /// Snapshot of the attempt state
    pub fn state(&self) -> AttemptState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_state(&self, next: AttemptState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Move into `next` unless an attempt is already active
    fn begin(&self, next: AttemptState) -> Result<()> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.is_active() {
            return Err(Error::AttemptInProgress);
        }
        *state = next;
        Ok(())
    }

    fn finish(&self, result: &GenerationResult) {
        let next = match (&result.status, &result.video_url) {
            (GenerationStatus::Done, Some(url)) => AttemptState::Done(url.clone()),
            _ => AttemptState::Error(result.error.clone().unwrap_or_default()),
        };
        self.set_state(next);
    }

    /// Submit a request and poll it to completion
    ///
    /// Returns the terminal result. Submission failures are returned as
    /// errors; polling failures are carried in the result.
    pub async fn run(
        &self,
        request: &GenerationRequest,
        progress: &dyn ProgressCallback,
    ) -> Result<GenerationResult> {
        self.begin(AttemptState::Submitting)?;

        let operation = match submit_generation(request, self.service, progress).await {
            Ok(operation) => operation,
            Err(e) => {
                self.set_state(AttemptState::Error(e.to_string()));
                return Err(e);
            }
        };

        info!("Submitted generation as {operation}");
        self.poll(operation, progress).await
    }

    /// Submit a request without waiting for it to finish
    pub async fn submit(
        &self,
        request: &GenerationRequest,
        progress: &dyn ProgressCallback,
    ) -> Result<OperationHandle> {
        self.begin(AttemptState::Submitting)?;

        let outcome = submit_generation(request, self.service, progress).await;
        self.set_state(match &outcome {
            Ok(_) => AttemptState::Idle,
            Err(e) => AttemptState::Error(e.to_string()),
        });
        outcome
    }

    /// Poll an operation started elsewhere until it finishes
    pub async fn watch(
        &self,
        operation: OperationHandle,
        progress: &dyn ProgressCallback,
    ) -> Result<GenerationResult> {
        self.begin(AttemptState::Polling(operation.clone()))?;
        self.poll(operation, progress).await
    }

    async fn poll(
        &self,
        operation: OperationHandle,
        progress: &dyn ProgressCallback,
    ) -> Result<GenerationResult> {
        self.set_state(AttemptState::Polling(operation.clone()));

        let period = self.service.config().poll_interval;
        let result = poll_generation(self.service, &operation, period, progress).await;

        self.finish(&result);
        Ok(result)
    }
}
