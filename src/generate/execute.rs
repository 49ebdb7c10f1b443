//! Submission and status polling
//!
//! Sends a validated request, then checks the operation on a fixed interval
//! until it reaches a terminal state.

use crate::api::GenerationService;
use crate::config::Config;
use crate::constraints::validate;
use crate::error::{Error, Result};
use crate::generate::{Phase, ProgressCallback};
use crate::types::{
    GenerationRequest, GenerationResult, GenerationStatus, OperationHandle, StatusReport,
};
use std::time::Duration;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, warn};

/// Shown while the request is being sent
pub const STARTING_MESSAGE: &str = "Starting generation...";
/// Shown once the service accepted the request
pub const PROCESSING_MESSAGE: &str = "Processing...";
/// Shown after each pending status
pub const GENERATING_MESSAGE: &str = "Generating... this may take a minute.";
/// Shown when the video is ready
pub const DONE_MESSAGE: &str = "Done!";
/// Submission failed without a usable detail
pub const SUBMIT_FAILED_MESSAGE: &str = "Failed to start generation";
/// Service reported done but gave no video reference
pub const NO_VIDEO_URL_MESSAGE: &str = "Generation done but no video URL returned.";
/// Service reported an error without detail
pub const UNKNOWN_ERROR_MESSAGE: &str = "Unknown error during processing";
/// Status request itself failed
pub const POLL_FAILED_MESSAGE: &str = "Error polling status";

/// Validate and submit a request
///
/// Submission is attempted once; a rejected request is reported through
/// `progress` and returned as an error.
pub async fn submit_generation(
    request: &GenerationRequest,
    service: &dyn GenerationService,
    progress: &dyn ProgressCallback,
) -> Result<OperationHandle> {
    validate(request)?;

    progress.on_phase(Phase::Submitting).await;
    progress.on_message(STARTING_MESSAGE).await;

    match service.submit(request).await {
        Ok(operation) => {
            progress.on_submitted(&operation).await;
            progress.on_message(PROCESSING_MESSAGE).await;
            Ok(operation)
        }
        Err(e) => {
            progress.on_error(&e).await;
            Err(e)
        }
    }
}

/// Turn a raw status report into the user-facing result
pub fn interpret_status(
    operation: &OperationHandle,
    report: StatusReport,
    config: &Config,
) -> GenerationResult {
    match report.status {
        GenerationStatus::Pending => GenerationResult::pending(operation.clone()),
        GenerationStatus::Done => match report.video_url.filter(|u| !u.trim().is_empty()) {
            Some(path) => {
                GenerationResult::done(operation.clone(), config.resolve_video_url(&path))
            }
            None => GenerationResult::failed(operation.clone(), NO_VIDEO_URL_MESSAGE),
        },
        GenerationStatus::Error => GenerationResult::failed(
            operation.clone(),
            report
                .detail
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string()),
        ),
    }
}

/// Query an operation once
///
/// A failed status request is terminal: the result carries the generic
/// polling error.
pub async fn check_status(
    service: &dyn GenerationService,
    operation: &OperationHandle,
) -> GenerationResult {
    match service.status(operation).await {
        Ok(report) => interpret_status(operation, report, service.config()),
        Err(e) => {
            warn!("Status check for {operation} failed: {e}");
            GenerationResult::failed(operation.clone(), POLL_FAILED_MESSAGE)
        }
    }
}

/// Poll an operation until it is done or failed
///
/// The first check happens one `period` after the call. Checks never
/// overlap: a slow response pushes the next tick back instead of queueing
/// another request.
pub async fn poll_generation(
    service: &dyn GenerationService,
    operation: &OperationHandle,
    period: Duration,
    progress: &dyn ProgressCallback,
) -> GenerationResult {
    progress.on_phase(Phase::Polling).await;

    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let result = check_status(service, operation).await;
        progress.on_status(&result).await;

        match result.status {
            GenerationStatus::Pending => {
                debug!("Operation {operation} still pending");
                progress.on_message(GENERATING_MESSAGE).await;
            }
            GenerationStatus::Done => {
                progress.on_message(DONE_MESSAGE).await;
                progress.on_phase(Phase::Complete).await;
                return result;
            }
            GenerationStatus::Error => {
                let message = result
                    .error
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string());
                progress.on_error(&Error::Poll(message)).await;
                progress.on_phase(Phase::Complete).await;
                return result;
            }
        }
    }
}
