//! Image generator trait.

use crate::error::Result;
use crate::image::types::GenerationResponse;
use async_trait::async_trait;

/// Something that turns a finished prompt into a generation response.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Sends `prompt` and returns every part of the answer in order.
    async fn generate(&self, prompt: &str) -> Result<GenerationResponse>;

    /// Returns the name of this generator for display.
    fn name(&self) -> &str;
}
