//! Submission and polling controller
//!
//! Handles one generation attempt end to end:
//! 1. Payload - turn a validated request into multipart fields
//! 2. Submit - send it and receive an operation handle
//! 3. Poll - query status on a fixed interval until done or error

mod controller;
mod execute;
mod payload;
mod progress;

pub use controller::{AttemptState, Generator};
pub use execute::{
    DONE_MESSAGE, GENERATING_MESSAGE, NO_VIDEO_URL_MESSAGE, POLL_FAILED_MESSAGE,
    PROCESSING_MESSAGE, STARTING_MESSAGE, SUBMIT_FAILED_MESSAGE, UNKNOWN_ERROR_MESSAGE,
    check_status, interpret_status, poll_generation, submit_generation,
};
pub use payload::{PayloadField, PayloadValue, build_payload};
pub use progress::{NoopProgress, Phase, ProgressCallback};
