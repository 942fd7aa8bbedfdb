//! Error types for image generation sessions.

use std::time::Duration;

/// Errors that can occur while gating, generating or delivering an image.
#[derive(Debug, thiserror::Error)]
pub enum ChitrakarError {
    /// Wrong passcode, or the API rejected the key.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Required configuration (e.g. the API key) is missing.
    #[error("configuration error: {0}")]
    Config(String),

    /// The user submitted an empty prompt.
    #[error("prompt is empty")]
    EmptyPrompt,

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Sanitized response body.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited {
        /// Delay from the `Retry-After` header, if sent.
        retry_after: Option<Duration>,
    },

    /// Content was blocked by safety filters.
    #[error("content blocked: {0}")]
    ContentBlocked(String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The API answered, but not in a shape we understand.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The API answered without any image part.
    #[error("no image produced")]
    NoImage {
        /// Any text the model returned instead.
        text: Option<String>,
    },

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// Failed to decode, resize or encode the image itself.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error (e.g., saving file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChitrakarError {
    /// Returns true if the user can simply try again in the same session.
    ///
    /// Only configuration errors end the session.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, ChitrakarError>;

const MAX_ERROR_MESSAGE_LEN: usize = 500;

/// Cleans an API error body before it is shown to the user.
///
/// Redacts anything that looks like a Google API key and truncates long
/// bodies on a character boundary.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let redacted: Vec<String> = text
        .split(' ')
        .map(|word| {
            if let Some(pos) = word.find("AIza") {
                format!("{}[REDACTED]", &word[..pos])
            } else {
                word.to_string()
            }
        })
        .collect();
    let mut cleaned = redacted.join(" ").trim().to_string();

    if cleaned.chars().count() > MAX_ERROR_MESSAGE_LEN {
        cleaned = cleaned.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
        cleaned.push_str("...");
    }
    cleaned
}

/// Reads a `Retry-After` header given in whole seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
