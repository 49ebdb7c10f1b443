//! Generation service factory
//!
//! Creates generation services based on configuration.

use crate::api::{GenerationService, HttpGenerationService};
use crate::config::Config;
use crate::error::Result;

/// Create a generation service from configuration
pub fn create_generation_service(config: &Config) -> Result<Box<dyn GenerationService>> {
    Ok(Box::new(HttpGenerationService::new(config.clone())?))
}
