//! Image generation and post-processing.

pub mod postprocess;
mod provider;
pub mod providers;
mod types;

pub use postprocess::{process, ProcessedImage, OUTPUT_HEIGHT, OUTPUT_WIDTH};
pub use provider::ImageGenerator;
pub use types::{
    GenerationMetadata, GenerationResponse, ImageFormat, InlineImage, ResponsePart,
};
