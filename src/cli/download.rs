//! Download command - save a generated video to disk

use crate::cli::style::{Stylize, check};
use anstream::println;
use reelgen::api::{GenerationService, create_generation_service};
use reelgen::config::Config;
use reelgen::error::Result;
use std::path::{Path, PathBuf};
use tracing::debug;
use url::Url;

const FALLBACK_FILE_NAME: &str = "reelgen-video.mp4";

/// File name for a video URL: its last path segment
fn file_name_for(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|mut segments| segments.next_back().map(ToString::to_string))
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

/// Where a download should land
///
/// An existing directory gets the URL's file name appended; any other path is
/// used as is. Without a path the configured output directory is used.
fn target_path(url: &str, output: Option<&Path>, output_dir: &Path) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => path.join(file_name_for(url)),
        Some(path) => path.to_path_buf(),
        None => output_dir.join(file_name_for(url)),
    }
}

/// Download `url` and write it to disk, returning the written path
pub async fn save_video(
    service: &dyn GenerationService,
    url: &str,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let path = target_path(url, output, &service.config().output_dir);
    let bytes = service.download(url).await?;
    debug!("Downloaded {} bytes from {url}", bytes.len());

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Run the download command
pub async fn run_download(config: &Config, target: &str, output: Option<&Path>) -> Result<()> {
    let service = create_generation_service(config)?;
    let url = config.resolve_video_url(target);
    let path = save_video(service.as_ref(), &url, output).await?;
    println!("{} Saved to {}", check(), path.display().accent());
    Ok(())
}
