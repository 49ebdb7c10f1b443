//! Status, wait and last-video commands

use crate::cli::download::save_video;
use crate::cli::progress::CliProgress;
use crate::cli::style::{Stream, Stylize, check, cross, hyperlink_url};
use anstream::{eprintln, println};
use reelgen::api::create_generation_service;
use reelgen::config::Config;
use reelgen::error::{Error, Result};
use reelgen::generate::{Generator, UNKNOWN_ERROR_MESSAGE, check_status};
use reelgen::types::{GenerationStatus, OperationHandle};
use std::path::Path;

/// Run the status command: check an operation once
pub async fn run_status(config: &Config, operation: &str) -> Result<()> {
    let service = create_generation_service(config)?;
    let operation = OperationHandle::new(operation);
    let result = check_status(service.as_ref(), &operation).await;

    match (result.status, &result.video_url, &result.error) {
        (GenerationStatus::Done, Some(url), _) => {
            println!(
                "{} {} is done: {}",
                check(),
                operation.accent(),
                hyperlink_url(Stream::Stdout, url).success()
            );
        }
        (GenerationStatus::Pending, _, _) => {
            println!("{} is {}", operation.accent(), "still generating".muted());
        }
        (_, _, error) => {
            let message = error
                .clone()
                .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string());
            eprintln!("{} {} failed", cross(), operation.accent().for_stderr());
            return Err(Error::Poll(message));
        }
    }
    Ok(())
}

/// Run the wait command: poll an existing operation until it finishes
pub async fn run_wait(
    config: &Config,
    operation: &str,
    output: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let service = create_generation_service(config)?;
    let generator = Generator::new(service.as_ref());
    let progress = CliProgress::new(verbose);

    let result = generator
        .watch(OperationHandle::new(operation), &progress)
        .await?;
    let url = result.into_video_url()?;

    if let Some(output) = output {
        let path = save_video(service.as_ref(), &url, Some(output)).await?;
        println!("{} Saved to {}", check(), path.display().accent());
    }
    Ok(())
}

/// Run the last-video command: show what `--extend-last` would extend
pub async fn run_last_video(config: &Config) -> Result<()> {
    let service = create_generation_service(config)?;
    let last = service.last_video().await?;

    let Some(path) = last.video_path() else {
        println!("{}", "No previous video available to extend".muted());
        return Ok(());
    };

    println!("{}", "Last generated video".emphasis());
    if let Some(name) = &last.filename {
        println!("  File:         {name}");
    }
    if let Some(duration) = last.duration {
        println!("  Duration:     {duration}s");
    }
    if let Some(ratio) = &last.aspect_ratio {
        println!("  Aspect ratio: {}", ratio.accent());
    }
    let url = config.resolve_video_url(&path);
    println!("  URL:          {}", hyperlink_url(Stream::Stdout, &url));
    Ok(())
}
