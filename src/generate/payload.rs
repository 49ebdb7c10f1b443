//! Multipart payload planning
//!
//! Determines which form fields a request produces before anything is sent,
//! so the same list drives the HTTP body and dry-run output.

use crate::types::{GenerationRequest, MediaFile};
use std::fmt;

/// Value of one multipart field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadValue<'a> {
    /// Plain text field
    Text(String),
    /// File upload
    File(&'a MediaFile),
}

/// One multipart field, in send order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadField<'a> {
    /// Form field name
    pub name: &'static str,
    /// Field value
    pub value: PayloadValue<'a>,
}

impl<'a> PayloadField<'a> {
    fn text(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: PayloadValue::Text(value.into()),
        }
    }

    /// Text value, if this is a text field
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            PayloadValue::Text(text) => Some(text),
            PayloadValue::File(_) => None,
        }
    }

    const fn file(name: &'static str, file: &'a MediaFile) -> Self {
        Self {
            name,
            value: PayloadValue::File(file),
        }
    }
}

impl fmt::Display for PayloadField<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            PayloadValue::Text(text) => write!(f, "{}={text}", self.name),
            PayloadValue::File(file) => write!(
                f,
                "{}=@{} ({} bytes)",
                self.name,
                file.file_name,
                file.bytes.len()
            ),
        }
    }
}

/// Build the multipart fields for a request
///
/// Settings are always sent; optional text and files only when set.
/// Each reference image repeats the `reference_images` field.
pub fn build_payload(request: &GenerationRequest) -> Vec<PayloadField<'_>> {
    let mut fields = vec![
        PayloadField::text("prompt", request.prompt.clone()),
        PayloadField::text("aspect_ratio", request.aspect_ratio.as_str()),
        PayloadField::text("resolution", request.resolution.as_str()),
        PayloadField::text("duration_seconds", request.duration.to_string()),
    ];

    if let Some(negative) = &request.negative_prompt {
        fields.push(PayloadField::text("negative_prompt", negative.clone()));
    }
    if let Some(model) = &request.model {
        fields.push(PayloadField::text("model", model.clone()));
    }
    if request.extend_last {
        fields.push(PayloadField::text("extend_mode", "true"));
    }
    if let Some(image) = &request.initial_image {
        fields.push(PayloadField::file("image", image));
    }
    for reference in &request.reference_images {
        fields.push(PayloadField::file("reference_images", reference));
    }
    if let Some(video) = &request.input_video {
        fields.push(PayloadField::file("video", video));
    }
    if let Some(last_frame) = &request.last_frame {
        fields.push(PayloadField::file("last_frame", last_frame));
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(fields: &[PayloadField<'_>]) -> Vec<&'static str> {
        fields.iter().map(|f| f.name).collect()
    }

    #[test]
    fn test_defaults_only_send_settings() {
        let request = GenerationRequest::new("a cat");
        let fields = build_payload(&request);

        assert_eq!(
            names(&fields),
            vec!["prompt", "aspect_ratio", "resolution", "duration_seconds"]
        );
        assert_eq!(fields[0].as_text(), Some("a cat"));
        assert_eq!(fields[1].as_text(), Some("16:9"));
        assert_eq!(fields[2].as_text(), Some("720p"));
        assert_eq!(fields[3].as_text(), Some("8"));
    }

    #[test]
    fn test_files_and_repeated_references() {
        let mut request = GenerationRequest::new("a cat");
        request.negative_prompt = Some("blur".into());
        request.initial_image = Some(MediaFile::new("start.png", vec![1]));
        request.reference_images = vec![
            MediaFile::new("a.png", vec![2]),
            MediaFile::new("b.png", vec![3]),
        ];
        request.input_video = Some(MediaFile::new("in.mp4", vec![4]));

        let fields = build_payload(&request);
        assert_eq!(
            names(&fields),
            vec![
                "prompt",
                "aspect_ratio",
                "resolution",
                "duration_seconds",
                "negative_prompt",
                "image",
                "reference_images",
                "reference_images",
                "video",
            ]
        );
        assert_eq!(fields[7].to_string(), "reference_images=@b.png (1 bytes)");
    }

    #[test]
    fn test_extension_flags() {
        let mut request = GenerationRequest::new("continue");
        request.extend_last = true;
        request.model = Some("veo-3.1-fast-generate-preview".into());

        let fields = build_payload(&request);
        assert!(fields.iter().any(|f| f.to_string() == "extend_mode=true"));
        assert!(
            fields
                .iter()
                .any(|f| f.to_string() == "model=veo-3.1-fast-generate-preview")
        );
    }

    #[test]
    fn test_last_frame_sent_after_other_files() {
        let mut request = GenerationRequest::new("a cat");
        request.initial_image = Some(MediaFile::new("start.png", vec![1]));
        request.last_frame = Some(MediaFile::new("end.png", vec![5, 6]));

        let fields = build_payload(&request);
        assert_eq!(names(&fields).last(), Some(&"last_frame"));
        assert_eq!(
            fields.last().map(ToString::to_string).as_deref(),
            Some("last_frame=@end.png (2 bytes)")
        );
    }
}
