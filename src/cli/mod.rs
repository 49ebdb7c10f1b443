//! CLI commands
//!
//! Command implementations for the `reelgen` binary.

mod download;
mod form;
mod generate;
mod progress;
mod status;
mod style;

pub use download::run_download;
pub use form::FormInput;
pub use generate::{GenerateOptions, run_generate};
pub use status::{run_last_video, run_status, run_wait};
