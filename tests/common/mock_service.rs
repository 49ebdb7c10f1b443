//! Mock generation service for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use reelgen::api::GenerationService;
use reelgen::config::Config;
use reelgen::error::{Error, Result};
use reelgen::types::{GenerationRequest, LastVideo, OperationHandle, StatusReport};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// Call record for `submit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitCall {
    pub prompt: String,
    pub reference_count: usize,
}

/// Simple mock generation service for testing
///
/// Features:
/// - Scripted status responses, consumed in order
/// - Call tracking with timestamps for interval checks
/// - Optional response delay to simulate a slow service
/// - Error injection for failure path testing
pub struct MockGenerationService {
    config: Config,
    operation: Mutex<String>,
    status_responses: Mutex<VecDeque<Result<StatusReport>>>,
    last_video: Mutex<LastVideo>,
    video_bytes: Mutex<Vec<u8>>,
    status_delay: Mutex<Option<Duration>>,
    // Call tracking
    submit_calls: Mutex<Vec<SubmitCall>>,
    status_calls: Mutex<Vec<(OperationHandle, Instant)>>,
    download_calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    // Error injection
    error_on_submit: Mutex<Option<String>>,
}

impl MockGenerationService {
    /// Mock pointing at the given base URL
    pub fn new(base_url: &str) -> Self {
        Self::with_config(Config::for_url(base_url).unwrap())
    }

    /// Mock with a custom config
    pub fn with_config(config: Config) -> Self {
        Self {
            config,
            operation: Mutex::new("op1".to_string()),
            status_responses: Mutex::new(VecDeque::new()),
            last_video: Mutex::new(LastVideo::default()),
            video_bytes: Mutex::new(Vec::new()),
            status_delay: Mutex::new(None),
            submit_calls: Mutex::new(Vec::new()),
            status_calls: Mutex::new(Vec::new()),
            download_calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            error_on_submit: Mutex::new(None),
        }
    }

    // === Response setup ===

    /// Operation name returned by `submit`
    pub fn set_operation(&self, name: &str) {
        *self.operation.lock().unwrap() = name.to_string();
    }

    /// Queue a status response
    pub fn push_status(&self, report: StatusReport) {
        self.status_responses.lock().unwrap().push_back(Ok(report));
    }

    /// Queue a transport failure for the next status call
    pub fn push_status_error(&self, msg: &str) {
        self.status_responses
            .lock()
            .unwrap()
            .push_back(Err(Error::Poll(msg.to_string())));
    }

    /// Make every status call take `delay`
    pub fn delay_status(&self, delay: Duration) {
        *self.status_delay.lock().unwrap() = Some(delay);
    }

    /// Response for `last_video`
    pub fn set_last_video(&self, last: LastVideo) {
        *self.last_video.lock().unwrap() = last;
    }

    /// Bytes returned by `download`
    pub fn set_video_bytes(&self, bytes: &[u8]) {
        *self.video_bytes.lock().unwrap() = bytes.to_vec();
    }

    // === Error injection ===

    /// Make `submit` fail with the given message
    pub fn fail_submit(&self, msg: &str) {
        *self.error_on_submit.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification ===

    /// All `submit` calls
    pub fn get_submit_calls(&self) -> Vec<SubmitCall> {
        self.submit_calls.lock().unwrap().clone()
    }

    /// All `status` calls with the (tokio) time they started
    pub fn get_status_calls(&self) -> Vec<(OperationHandle, Instant)> {
        self.status_calls.lock().unwrap().clone()
    }

    /// Number of `status` calls
    pub fn status_call_count(&self) -> usize {
        self.status_calls.lock().unwrap().len()
    }

    /// URLs passed to `download`
    pub fn get_download_calls(&self) -> Vec<String> {
        self.download_calls.lock().unwrap().clone()
    }

    /// Most status calls that were running at the same time
    pub fn max_concurrent_status_calls(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Status responses not yet consumed
    pub fn remaining_status_responses(&self) -> usize {
        self.status_responses.lock().unwrap().len()
    }
}

#[async_trait]
impl GenerationService for MockGenerationService {
    async fn submit(&self, request: &GenerationRequest) -> Result<OperationHandle> {
        self.submit_calls.lock().unwrap().push(SubmitCall {
            prompt: request.prompt.clone(),
            reference_count: request.reference_images.len(),
        });

        // Let a concurrent caller observe the in-progress attempt
        tokio::task::yield_now().await;

        if let Some(msg) = self.error_on_submit.lock().unwrap().as_ref() {
            return Err(Error::Submission(msg.clone()));
        }

        Ok(OperationHandle::new(self.operation.lock().unwrap().clone()))
    }

    async fn status(&self, operation: &OperationHandle) -> Result<StatusReport> {
        self.status_calls
            .lock()
            .unwrap()
            .push((operation.clone(), Instant::now()));

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        let delay = *self.status_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let next = self.status_responses.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(Error::Poll("no scripted status response".to_string())))
    }

    async fn last_video(&self) -> Result<LastVideo> {
        Ok(self.last_video.lock().unwrap().clone())
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>> {
        self.download_calls.lock().unwrap().push(url.to_string());
        Ok(self.video_bytes.lock().unwrap().clone())
    }

    fn config(&self) -> &Config {
        &self.config
    }
}
