//! reelgen - video generation client
//!
//! Collects generation parameters, keeps them consistent with the
//! constraint engine, submits them to a remote generation service and
//! polls the resulting operation until it finishes.

pub mod api;
pub mod config;
pub mod constraints;
pub mod error;
pub mod generate;
pub mod types;
