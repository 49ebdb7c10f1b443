//! Constraint rules and their pure application

use crate::error::{Error, Result};
use crate::types::{
    AspectRatio, DurationSeconds, GenerationRequest, MAX_REFERENCE_IMAGES, MediaFile, Resolution,
};
use std::fmt;
use tracing::debug;

const REFERENCE_ASPECT: &str = "Reference images require 16:9";
const EXTENSION_RESOLUTION: &str = "Extensions must be 720p";
const EXTENSION_DURATION: &str = "Extensions require 8s";
const REFERENCE_DURATION: &str = "Reference images require 8s";
const INTERPOLATION_DURATION: &str = "Interpolation requires 8s";
const HIGH_RESOLUTION_DURATION: &str = "1080p requires 8s";

/// A setting that can be pinned by another field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Aspect ratio
    AspectRatio,
    /// Resolution
    Resolution,
    /// Duration
    Duration,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AspectRatio => write!(f, "aspect ratio"),
            Self::Resolution => write!(f, "resolution"),
            Self::Duration => write!(f, "duration"),
        }
    }
}

/// A setting currently forced to a fixed value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lock {
    /// Forced value, as shown to the user
    pub value: &'static str,
    /// Why the value is forced
    pub reason: &'static str,
}

/// Which settings are read-only for the current selections
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldLocks {
    /// Aspect ratio lock
    pub aspect_ratio: Option<Lock>,
    /// Resolution lock
    pub resolution: Option<Lock>,
    /// Duration lock
    pub duration: Option<Lock>,
}

impl FieldLocks {
    /// Lock for a given field, if any
    pub const fn get(&self, field: Field) -> Option<&Lock> {
        match field {
            Field::AspectRatio => self.aspect_ratio.as_ref(),
            Field::Resolution => self.resolution.as_ref(),
            Field::Duration => self.duration.as_ref(),
        }
    }

    /// Whether the field is read-only
    pub const fn is_locked(&self, field: Field) -> bool {
        self.get(field).is_some()
    }
}

/// A corrective write made by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    /// Field that was rewritten
    pub field: Field,
    /// Previous value
    pub from: String,
    /// Forced value
    pub to: String,
    /// Why the value was forced
    pub reason: &'static str,
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} changed from {} to {} ({})",
            self.field, self.from, self.to, self.reason
        )
    }
}

/// Output of [`enforce`]
#[derive(Debug, Clone)]
pub struct Enforced {
    /// Request with all constraints satisfied
    pub request: GenerationRequest,
    /// Writes made to get there, in application order
    pub corrections: Vec<Correction>,
}

/// Compute which settings are pinned by the other selections.
///
/// Every rule pins its field to the same target (16:9, 720p, 8s), so when
/// several rules apply the first reason wins and the value is the same.
pub fn locks(request: &GenerationRequest) -> FieldLocks {
    let has_references = !request.reference_images.is_empty();
    let is_extension = request.is_extension();

    let aspect_ratio = has_references.then_some(Lock {
        value: AspectRatio::Landscape.as_str(),
        reason: REFERENCE_ASPECT,
    });

    let resolution = is_extension.then_some(Lock {
        value: Resolution::Hd.as_str(),
        reason: EXTENSION_RESOLUTION,
    });

    let duration_reason = if is_extension {
        Some(EXTENSION_DURATION)
    } else if has_references {
        Some(REFERENCE_DURATION)
    } else if request.last_frame.is_some() {
        Some(INTERPOLATION_DURATION)
    } else if request.resolution == Resolution::FullHd {
        Some(HIGH_RESOLUTION_DURATION)
    } else {
        None
    };

    FieldLocks {
        aspect_ratio,
        resolution,
        duration: duration_reason.map(|reason| Lock {
            value: "8",
            reason,
        }),
    }
}

/// Rewrite any setting that violates a constraint.
///
/// Fields not pinned by a rule are left untouched. Applying this to its
/// own output yields no further corrections.
pub fn enforce(request: &GenerationRequest) -> Enforced {
    let field_locks = locks(request);
    let mut next = request.clone();
    let mut corrections = Vec::new();

    if let Some(lock) = field_locks
        .aspect_ratio
        .filter(|_| next.aspect_ratio != AspectRatio::Landscape)
    {
        corrections.push(Correction {
            field: Field::AspectRatio,
            from: next.aspect_ratio.to_string(),
            to: lock.value.to_string(),
            reason: lock.reason,
        });
        next.aspect_ratio = AspectRatio::Landscape;
    }

    if let Some(lock) = field_locks
        .resolution
        .filter(|_| next.resolution != Resolution::Hd)
    {
        corrections.push(Correction {
            field: Field::Resolution,
            from: next.resolution.to_string(),
            to: lock.value.to_string(),
            reason: lock.reason,
        });
        next.resolution = Resolution::Hd;
    }

    if let Some(lock) = field_locks
        .duration
        .filter(|_| next.duration != DurationSeconds::Eight)
    {
        corrections.push(Correction {
            field: Field::Duration,
            from: next.duration.to_string(),
            to: lock.value.to_string(),
            reason: lock.reason,
        });
        next.duration = DurationSeconds::Eight;
    }

    if !corrections.is_empty() {
        debug!("Constraint corrections: {corrections:?}");
    }

    Enforced {
        request: next,
        corrections,
    }
}

/// Accept a reference image selection, or reject it as a whole.
///
/// Selections over the limit are never truncated.
pub fn select_reference_images(files: Vec<MediaFile>) -> Result<Vec<MediaFile>> {
    if files.len() > MAX_REFERENCE_IMAGES {
        return Err(Error::TooManyReferenceImages {
            selected: files.len(),
            max: MAX_REFERENCE_IMAGES,
        });
    }
    Ok(files)
}

/// Check that a request can be submitted as-is
pub fn validate(request: &GenerationRequest) -> Result<()> {
    if request.prompt.trim().is_empty() {
        return Err(Error::InvalidRequest("prompt must not be empty".to_string()));
    }

    if request.reference_images.len() > MAX_REFERENCE_IMAGES {
        return Err(Error::TooManyReferenceImages {
            selected: request.reference_images.len(),
            max: MAX_REFERENCE_IMAGES,
        });
    }

    let enforced = enforce(request);
    if let Some(correction) = enforced.corrections.first() {
        return Err(Error::InvalidRequest(format!(
            "{} must be {} ({})",
            correction.field, correction.to, correction.reason
        )));
    }

    Ok(())
}
