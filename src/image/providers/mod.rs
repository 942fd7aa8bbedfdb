//! Image generation backends.

mod gemini;

pub use gemini::{GeminiClient, GeminiClientBuilder, GeminiModel, DEFAULT_BASE_URL};
