//! Constraint engine for interdependent generation settings
//!
//! Certain inputs pin other settings to fixed values: high resolution and
//! video extension need 8 second clips, reference images need 16:9, and
//! so on. [`enforce`] applies those rules as a pure function; [`FormState`]
//! wraps it in an immutable-update reducer that runs after every edit.

mod engine;
mod form;

pub use engine::{
    Correction, Enforced, Field, FieldLocks, Lock, enforce, locks, select_reference_images,
    validate,
};
pub use form::{FieldUpdate, FormState, Notice};
