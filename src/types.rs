//! Core types for reelgen

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Maximum number of reference images accepted per request
pub const MAX_REFERENCE_IMAGES: usize = 3;

/// Output aspect ratio
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    /// Landscape
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    /// Portrait
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    /// All selectable values, in display order
    pub const ALL: [Self; 2] = [Self::Landscape, Self::Portrait];

    /// Wire value sent to the service
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
        }
    }

    /// Human label used by the interactive form
    pub const fn label(self) -> &'static str {
        match self {
            Self::Landscape => "16:9 (Landscape)",
            Self::Portrait => "9:16 (Portrait)",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "16:9" | "landscape" => Ok(Self::Landscape),
            "9:16" | "portrait" => Ok(Self::Portrait),
            other => Err(format!("unknown aspect ratio '{other}' (expected 16:9 or 9:16)")),
        }
    }
}

/// Output resolution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    /// 1280x720
    #[default]
    #[serde(rename = "720p")]
    Hd,
    /// 1920x1080
    #[serde(rename = "1080p")]
    FullHd,
}

impl Resolution {
    /// All selectable values, in display order
    pub const ALL: [Self; 2] = [Self::Hd, Self::FullHd];

    /// Wire value sent to the service
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hd => "720p",
            Self::FullHd => "1080p",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "720p" | "720" => Ok(Self::Hd),
            "1080p" | "1080" => Ok(Self::FullHd),
            other => Err(format!("unknown resolution '{other}' (expected 720p or 1080p)")),
        }
    }
}

/// Clip length
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DurationSeconds {
    /// 4 seconds
    #[serde(rename = "4")]
    Four,
    /// 6 seconds
    #[serde(rename = "6")]
    Six,
    /// 8 seconds
    #[default]
    #[serde(rename = "8")]
    Eight,
}

impl DurationSeconds {
    /// All selectable values, in display order
    pub const ALL: [Self; 3] = [Self::Four, Self::Six, Self::Eight];

    /// Length in seconds
    pub const fn as_secs(self) -> u8 {
        match self {
            Self::Four => 4,
            Self::Six => 6,
            Self::Eight => 8,
        }
    }
}

impl fmt::Display for DurationSeconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_secs())
    }
}

impl FromStr for DurationSeconds {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.strip_suffix('s').unwrap_or(trimmed) {
            "4" => Ok(Self::Four),
            "6" => Ok(Self::Six),
            "8" => Ok(Self::Eight),
            _ => Err(format!("unsupported duration '{trimmed}' (expected 4, 6 or 8)")),
        }
    }
}

/// A binary upload (image or video) attached to a request
#[derive(Clone, PartialEq, Eq)]
pub struct MediaFile {
    /// File name reported to the service
    pub file_name: String,
    /// MIME type, if known
    pub mime: Option<String>,
    /// File contents
    pub bytes: Vec<u8>,
}

impl MediaFile {
    /// Create a media file from raw bytes, guessing the MIME type from the name
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime = mime_for_path(Path::new(&file_name)).map(ToString::to_string);
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    /// Read a media file from disk
    pub async fn load(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            Error::InvalidRequest(format!("cannot read {}: {e}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload.bin")
            .to_string();
        Ok(Self::new(file_name, bytes))
    }
}

impl fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaFile")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "mp4" => Some("video/mp4"),
        "mov" => Some("video/quicktime"),
        "webm" => Some("video/webm"),
        _ => None,
    }
}

/// A video generation request, as edited by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// What to generate (required)
    pub prompt: String,
    /// What to avoid
    pub negative_prompt: Option<String>,
    /// Output aspect ratio
    pub aspect_ratio: AspectRatio,
    /// Output resolution
    pub resolution: Resolution,
    /// Clip length
    pub duration: DurationSeconds,
    /// Starting frame for image-to-video
    pub initial_image: Option<MediaFile>,
    /// Style/character references (at most [`MAX_REFERENCE_IMAGES`])
    pub reference_images: Vec<MediaFile>,
    /// Video to extend
    pub input_video: Option<MediaFile>,
    /// End frame for interpolation
    pub last_frame: Option<MediaFile>,
    /// Extend the last video generated by the service
    pub extend_last: bool,
    /// Model override (service default when absent)
    pub model: Option<String>,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            negative_prompt: None,
            aspect_ratio: AspectRatio::Landscape,
            resolution: Resolution::Hd,
            duration: DurationSeconds::Eight,
            initial_image: None,
            reference_images: Vec::new(),
            input_video: None,
            last_frame: None,
            extend_last: false,
            model: None,
        }
    }
}

impl GenerationRequest {
    /// Create a request with the given prompt and default settings
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    /// Whether this request extends an existing video
    pub const fn is_extension(&self) -> bool {
        self.input_video.is_some() || self.extend_last
    }
}

/// Opaque identifier of a long-running generation operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationHandle(String);

impl OperationHandle {
    /// Wrap an operation name returned by the service
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The raw operation name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of a generation operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    /// Still running
    Pending,
    /// Finished
    Done,
    /// Failed
    Error,
}

impl GenerationStatus {
    /// Interpret a status string from the service.
    ///
    /// Anything other than `done` or `error` means the operation is still running.
    pub fn from_wire(status: &str) -> Self {
        match status {
            "done" => Self::Done,
            "error" => Self::Error,
            _ => Self::Pending,
        }
    }

    /// Whether polling stops at this status
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

impl fmt::Display for GenerationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Done => write!(f, "done"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One status response, as reported by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// Operation status
    pub status: GenerationStatus,
    /// Video path or URL (unresolved)
    pub video_url: Option<String>,
    /// Error or informational detail
    pub detail: Option<String>,
}

/// Observed state of a generation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    /// Operation being tracked
    pub operation: OperationHandle,
    /// Latest status
    pub status: GenerationStatus,
    /// Resolved retrieval URL once done
    pub video_url: Option<String>,
    /// User-facing error text once failed
    pub error: Option<String>,
}

impl GenerationResult {
    /// A still-running attempt
    pub const fn pending(operation: OperationHandle) -> Self {
        Self {
            operation,
            status: GenerationStatus::Pending,
            video_url: None,
            error: None,
        }
    }

    /// A finished attempt with a retrievable video
    pub const fn done(operation: OperationHandle, video_url: String) -> Self {
        Self {
            operation,
            status: GenerationStatus::Done,
            video_url: Some(video_url),
            error: None,
        }
    }

    /// An abandoned attempt
    pub fn failed(operation: OperationHandle, error: impl Into<String>) -> Self {
        Self {
            operation,
            status: GenerationStatus::Error,
            video_url: None,
            error: Some(error.into()),
        }
    }

    /// Whether polling has stopped
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Convert a terminal result into the video URL or a poll error
    pub fn into_video_url(self) -> Result<String> {
        match (self.status, self.video_url) {
            (GenerationStatus::Done, Some(url)) => Ok(url),
            (GenerationStatus::Pending, _) => Err(Error::Poll(format!(
                "operation {} is still pending",
                self.operation
            ))),
            _ => Err(Error::Poll(
                self.error
                    .unwrap_or_else(|| "Unknown error during processing".to_string()),
            )),
        }
    }
}

/// The most recently completed video known to the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastVideo {
    /// Whether a video is available
    #[serde(default)]
    pub available: bool,
    /// Stored file name
    #[serde(default)]
    pub filename: Option<String>,
    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<u32>,
    /// Aspect ratio of the stored video
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    /// Retrieval path, when the service reports one directly
    #[serde(default)]
    pub video_url: Option<String>,
}

impl LastVideo {
    /// Retrieval path for the video (unresolved)
    pub fn video_path(&self) -> Option<String> {
        if !self.available && self.video_url.is_none() {
            return None;
        }
        self.video_url
            .clone()
            .or_else(|| self.filename.as_ref().map(|f| format!("/videos/{f}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_form_defaults() {
        let request = GenerationRequest::default();
        assert_eq!(request.aspect_ratio, AspectRatio::Landscape);
        assert_eq!(request.resolution, Resolution::Hd);
        assert_eq!(request.duration, DurationSeconds::Eight);
        assert!(request.reference_images.is_empty());
        assert!(!request.is_extension());
    }

    #[test]
    fn test_parse_settings() {
        assert_eq!("9:16".parse::<AspectRatio>(), Ok(AspectRatio::Portrait));
        assert_eq!("1080p".parse::<Resolution>(), Ok(Resolution::FullHd));
        assert_eq!("6s".parse::<DurationSeconds>(), Ok(DurationSeconds::Six));
        assert!("5".parse::<DurationSeconds>().is_err());
        assert!("4:3".parse::<AspectRatio>().is_err());
    }

    #[test]
    fn test_status_from_wire() {
        assert_eq!(GenerationStatus::from_wire("done"), GenerationStatus::Done);
        assert_eq!(GenerationStatus::from_wire("error"), GenerationStatus::Error);
        assert_eq!(
            GenerationStatus::from_wire("processing"),
            GenerationStatus::Pending
        );
        assert_eq!(
            GenerationStatus::from_wire("pending"),
            GenerationStatus::Pending
        );
    }

    #[test]
    fn test_media_file_mime_guess() {
        let file = MediaFile::new("cat.PNG", vec![1, 2, 3]);
        assert_eq!(file.mime.as_deref(), Some("image/png"));
        let unknown = MediaFile::new("blob", vec![]);
        assert!(unknown.mime.is_none());
    }

    #[test]
    fn test_into_video_url() {
        let op = OperationHandle::new("op1");
        let done = GenerationResult::done(op.clone(), "http://x/videos/a.mp4".into());
        assert_eq!(done.into_video_url().unwrap(), "http://x/videos/a.mp4");

        let failed = GenerationResult::failed(op, "quota exceeded");
        let err = failed.into_video_url().unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn test_last_video_path() {
        let last = LastVideo {
            available: true,
            filename: Some("op_1.mp4".into()),
            ..LastVideo::default()
        };
        assert_eq!(last.video_path().as_deref(), Some("/videos/op_1.mp4"));
        assert!(LastVideo::default().video_path().is_none());
    }
}
