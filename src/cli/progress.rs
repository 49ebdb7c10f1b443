//! CLI progress callback with a spinner while the video renders

use crate::cli::style::{Stream, Stylize, check, hyperlink_url, spinner_style};
use anstream::println;
use async_trait::async_trait;
use indicatif::ProgressBar;
use reelgen::error::Error;
use reelgen::generate::{Phase, ProgressCallback};
use reelgen::types::{GenerationResult, GenerationStatus, OperationHandle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::debug;

/// Prints submission and polling progress to the terminal
///
/// The spinner draws to stderr and hides itself when stderr is not a
/// terminal, so piped output only carries the final lines.
pub struct CliProgress {
    spinner: ProgressBar,
    checks: AtomicUsize,
    verbose: bool,
}

impl CliProgress {
    /// Create a progress reporter
    pub fn new(verbose: bool) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        Self {
            spinner,
            checks: AtomicUsize::new(0),
            verbose,
        }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        match phase {
            Phase::Submitting | Phase::Polling => {
                self.spinner.enable_steady_tick(Duration::from_millis(100));
                if self.verbose {
                    self.spinner
                        .suspend(|| println!("{}...", phase.to_string().emphasis()));
                }
            }
            Phase::Complete => self.spinner.finish_and_clear(),
        }
    }

    async fn on_submitted(&self, operation: &OperationHandle) {
        let name = operation.as_str();
        self.spinner
            .suspend(|| println!("{} Submitted as {}", check(), name.accent()));
    }

    async fn on_status(&self, result: &GenerationResult) {
        let count = self.checks.fetch_add(1, Ordering::SeqCst) + 1;
        if self.verbose {
            let status = result.status.to_string();
            self.spinner.suspend(|| {
                println!("  {} check #{count}: {}", "status".muted(), status.accent());
            });
        }
        if let (GenerationStatus::Done, Some(url)) = (result.status, &result.video_url) {
            let link = hyperlink_url(Stream::Stdout, url);
            self.spinner
                .suspend(|| println!("{} Video ready: {}", check(), link.success()));
        }
    }

    // The command's returned error is what gets printed
    async fn on_error(&self, err: &Error) {
        self.spinner.finish_and_clear();
        debug!("Generation attempt failed: {err}");
    }

    async fn on_message(&self, message: &str) {
        self.spinner.set_message(message.to_string());
    }
}
