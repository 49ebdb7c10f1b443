//! Test data factories for reelgen types
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use reelgen::types::{GenerationRequest, GenerationStatus, LastVideo, MediaFile, StatusReport};

/// A valid request with default settings
pub fn make_request(prompt: &str) -> GenerationRequest {
    GenerationRequest::new(prompt)
}

/// A small PNG-named upload
pub fn make_image(name: &str) -> MediaFile {
    MediaFile::new(name, vec![0x89, b'P', b'N', b'G'])
}

/// A small MP4-named upload
pub fn make_video(name: &str) -> MediaFile {
    MediaFile::new(name, vec![0, 0, 0, 0x18, b'f', b't', b'y', b'p'])
}

/// `count` distinct reference images
pub fn make_references(count: usize) -> Vec<MediaFile> {
    (1..=count)
        .map(|i| make_image(&format!("ref{i}.png")))
        .collect()
}

/// Status report: still generating
pub fn pending() -> StatusReport {
    StatusReport {
        status: GenerationStatus::Pending,
        video_url: None,
        detail: None,
    }
}

/// Status report: finished with a video path
pub fn done(video_url: &str) -> StatusReport {
    StatusReport {
        status: GenerationStatus::Done,
        video_url: Some(video_url.to_string()),
        detail: None,
    }
}

/// Status report: finished without a video path
pub fn done_without_video() -> StatusReport {
    StatusReport {
        status: GenerationStatus::Done,
        video_url: None,
        detail: None,
    }
}

/// Status report: failed with a detail
pub fn failed(detail: &str) -> StatusReport {
    StatusReport {
        status: GenerationStatus::Error,
        video_url: None,
        detail: Some(detail.to_string()),
    }
}

/// Last-video response for an available file
pub fn make_last_video(filename: &str) -> LastVideo {
    LastVideo {
        available: true,
        filename: Some(filename.to_string()),
        duration: Some(8),
        aspect_ratio: Some("16:9".to_string()),
        video_url: None,
    }
}
