//! Form state container
//!
//! Every edit goes through [`FormState::apply`], which writes the new value,
//! re-runs the constraint engine and records what the user should be told.

use crate::constraints::engine::{
    Correction, Field, FieldLocks, enforce, locks, select_reference_images,
};
use crate::types::{
    AspectRatio, DurationSeconds, GenerationRequest, MAX_REFERENCE_IMAGES, MediaFile, Resolution,
};
use std::fmt;

/// A single user edit
#[derive(Debug, Clone)]
pub enum FieldUpdate {
    /// Set the prompt
    Prompt(String),
    /// Set or clear the negative prompt
    NegativePrompt(Option<String>),
    /// Choose an aspect ratio
    AspectRatio(AspectRatio),
    /// Choose a resolution
    Resolution(Resolution),
    /// Choose a duration
    Duration(DurationSeconds),
    /// Set or clear the initial image
    InitialImage(Option<MediaFile>),
    /// Replace the reference image selection
    ReferenceImages(Vec<MediaFile>),
    /// Set or clear the video to extend
    InputVideo(Option<MediaFile>),
    /// Set or clear the interpolation end frame
    LastFrame(Option<MediaFile>),
    /// Toggle extending the service's last video
    ExtendLast(bool),
    /// Set or clear the model override
    Model(Option<String>),
}

/// Something the user should see after an edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The engine rewrote a field
    Corrected(Correction),
    /// The edit targeted a read-only field and was ignored
    Locked {
        /// Field the user tried to change
        field: Field,
        /// Why it is read-only
        reason: &'static str,
    },
    /// A reference selection over the limit was discarded
    ReferenceImagesRejected {
        /// Size of the discarded selection
        selected: usize,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrected(correction) => write!(f, "{correction}"),
            Self::Locked { field, reason } => {
                write!(f, "{field} is locked: {reason}")
            }
            Self::ReferenceImagesRejected { selected } => write!(
                f,
                "You can only select up to {MAX_REFERENCE_IMAGES} reference images ({selected} selected); selection cleared."
            ),
        }
    }
}

/// Current form values plus the notices produced by the last edit
#[derive(Debug, Clone, Default)]
pub struct FormState {
    request: GenerationRequest,
    notices: Vec<Notice>,
}

impl FormState {
    /// Fresh form with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Current (constraint-satisfying) values
    pub const fn request(&self) -> &GenerationRequest {
        &self.request
    }

    /// Notices from the most recent edit
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Settings that are read-only for the current values
    pub fn locks(&self) -> FieldLocks {
        locks(&self.request)
    }

    /// Consume the form and return its request
    pub fn into_request(self) -> GenerationRequest {
        self.request
    }

    /// Apply one edit and return the next state
    #[must_use]
    pub fn apply(self, update: FieldUpdate) -> Self {
        let current_locks = locks(&self.request);
        let mut request = self.request;
        let mut notices = Vec::new();

        match update {
            FieldUpdate::Prompt(prompt) => request.prompt = prompt,
            FieldUpdate::NegativePrompt(text) => request.negative_prompt = non_empty(text),
            FieldUpdate::AspectRatio(value) if value != request.aspect_ratio => {
                match current_locks.aspect_ratio {
                    Some(lock) => notices.push(Notice::Locked {
                        field: Field::AspectRatio,
                        reason: lock.reason,
                    }),
                    None => request.aspect_ratio = value,
                }
            }
            FieldUpdate::Resolution(value) if value != request.resolution => {
                match current_locks.resolution {
                    Some(lock) => notices.push(Notice::Locked {
                        field: Field::Resolution,
                        reason: lock.reason,
                    }),
                    None => request.resolution = value,
                }
            }
            FieldUpdate::Duration(value) if value != request.duration => {
                match current_locks.duration {
                    Some(lock) => notices.push(Notice::Locked {
                        field: Field::Duration,
                        reason: lock.reason,
                    }),
                    None => request.duration = value,
                }
            }
            FieldUpdate::InitialImage(file) => request.initial_image = file,
            FieldUpdate::ReferenceImages(files) => {
                let selected = files.len();
                match select_reference_images(files) {
                    Ok(files) => request.reference_images = files,
                    Err(_) => {
                        request.reference_images.clear();
                        notices.push(Notice::ReferenceImagesRejected { selected });
                    }
                }
            }
            FieldUpdate::InputVideo(file) => request.input_video = file,
            FieldUpdate::LastFrame(file) => request.last_frame = file,
            FieldUpdate::ExtendLast(extend) => request.extend_last = extend,
            FieldUpdate::Model(model) => request.model = non_empty(model),
            FieldUpdate::AspectRatio(_)
            | FieldUpdate::Resolution(_)
            | FieldUpdate::Duration(_) => {}
        }

        let enforced = enforce(&request);
        notices.extend(enforced.corrections.into_iter().map(Notice::Corrected));

        Self {
            request: enforced.request,
            notices,
        }
    }

    /// Apply a sequence of edits, collecting every notice along the way
    pub fn apply_all(self, updates: impl IntoIterator<Item = FieldUpdate>) -> (Self, Vec<Notice>) {
        let mut all_notices = Vec::new();
        let mut state = self;
        for update in updates {
            state = state.apply(update);
            all_notices.extend_from_slice(state.notices());
        }
        (state, all_notices)
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str) -> MediaFile {
        MediaFile::new(name, vec![1, 2, 3])
    }

    #[test]
    fn test_adding_references_corrects_settings() {
        let state = FormState::new()
            .apply(FieldUpdate::AspectRatio(AspectRatio::Portrait))
            .apply(FieldUpdate::Duration(DurationSeconds::Four))
            .apply(FieldUpdate::ReferenceImages(vec![image("a.png")]));

        assert_eq!(state.request().aspect_ratio, AspectRatio::Landscape);
        assert_eq!(state.request().duration, DurationSeconds::Eight);
        assert_eq!(state.notices().len(), 2);
        assert!(
            state
                .notices()
                .iter()
                .all(|n| matches!(n, Notice::Corrected(_)))
        );
    }

    #[test]
    fn test_locked_field_edit_ignored() {
        let state = FormState::new()
            .apply(FieldUpdate::InputVideo(Some(image("clip.mp4"))))
            .apply(FieldUpdate::Resolution(Resolution::FullHd));

        assert_eq!(state.request().resolution, Resolution::Hd);
        assert_eq!(
            state.notices(),
            &[Notice::Locked {
                field: Field::Resolution,
                reason: "Extensions must be 720p",
            }]
        );
    }

    #[test]
    fn test_selecting_same_value_on_locked_field_is_silent() {
        let state = FormState::new()
            .apply(FieldUpdate::ReferenceImages(vec![image("a.png")]))
            .apply(FieldUpdate::AspectRatio(AspectRatio::Landscape));
        assert!(state.notices().is_empty());
    }

    #[test]
    fn test_four_references_rejected_in_full() {
        let files = vec![image("1.png"), image("2.png"), image("3.png"), image("4.png")];
        let state = FormState::new()
            .apply(FieldUpdate::ReferenceImages(vec![image("keep.png")]))
            .apply(FieldUpdate::ReferenceImages(files));

        assert!(state.request().reference_images.is_empty());
        assert_eq!(
            state.notices(),
            &[Notice::ReferenceImagesRejected { selected: 4 }]
        );
    }

    #[test]
    fn test_removing_pinning_field_unlocks() {
        let state = FormState::new()
            .apply(FieldUpdate::Resolution(Resolution::FullHd))
            .apply(FieldUpdate::Duration(DurationSeconds::Four));
        assert_eq!(state.request().duration, DurationSeconds::Eight);

        let state = state
            .apply(FieldUpdate::Resolution(Resolution::Hd))
            .apply(FieldUpdate::Duration(DurationSeconds::Four));
        assert_eq!(state.request().duration, DurationSeconds::Four);
        assert!(state.locks().duration.is_none());
    }

    #[test]
    fn test_apply_all_collects_notices() {
        let (state, notices) = FormState::new().apply_all([
            FieldUpdate::Prompt("a cat".into()),
            FieldUpdate::NegativePrompt(Some(String::new())),
            FieldUpdate::Duration(DurationSeconds::Six),
            FieldUpdate::ExtendLast(true),
        ]);

        assert_eq!(state.request().prompt, "a cat");
        assert!(state.request().negative_prompt.is_none());
        assert_eq!(state.request().duration, DurationSeconds::Eight);
        assert_eq!(notices.len(), 1);
        assert!(notices[0].to_string().contains("Extensions require 8s"));
    }
}
