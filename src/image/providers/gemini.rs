//! Gemini (Google) image generation client.

use crate::error::{parse_retry_after, sanitize_error_message, ChitrakarError, Result};
use crate::image::provider::ImageGenerator;
use crate::image::types::{GenerationMetadata, GenerationResponse, InlineImage, ResponsePart};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini image model variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GeminiModel {
    /// Gemini 2.0 Flash preview with image output.
    #[default]
    FlashPreviewImageGeneration,
    /// Gemini 2.5 Flash Image.
    FlashImage,
    /// Any other model identifier.
    Custom(String),
}

impl GeminiModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &str {
        match self {
            Self::FlashPreviewImageGeneration => "gemini-2.0-flash-preview-image-generation",
            Self::FlashImage => "gemini-2.5-flash-image",
            Self::Custom(name) => name,
        }
    }
}

impl std::str::FromStr for GeminiModel {
    type Err = ChitrakarError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ChitrakarError::Config("model name is empty".into()));
        }
        Ok(match s {
            "gemini-2.0-flash-preview-image-generation" => Self::FlashPreviewImageGeneration,
            "gemini-2.5-flash-image" => Self::FlashImage,
            other => Self::Custom(other.to_string()),
        })
    }
}

impl std::fmt::Display for GeminiModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builder for [`GeminiClient`].
#[derive(Debug, Clone, Default)]
pub struct GeminiClientBuilder {
    api_key: Option<String>,
    model: GeminiModel,
    base_url: Option<String>,
}

impl GeminiClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `GEMINI_API_KEY`, then `GOOGLE_API_KEY`.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the Gemini model variant.
    pub fn model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    /// Overrides the API host, e.g. to point at a local mock.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builds the client, resolving the API key.
    pub fn build(self) -> Result<GeminiClient> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ChitrakarError::Config("GEMINI_API_KEY not set and no API key provided".into())
            })?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(GeminiClient {
            client: reqwest::Client::new(),
            api_key,
            model: self.model,
            base_url,
        })
    }
}

/// Gemini `generateContent` client requesting text and image output.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: GeminiModel,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a new `GeminiClientBuilder`.
    pub fn builder() -> GeminiClientBuilder {
        GeminiClientBuilder::new()
    }

    /// The model this client talks to.
    pub fn model(&self) -> &GeminiModel {
        &self.model
    }

    async fn generate_impl(&self, prompt: &str) -> Result<GenerationResponse> {
        let start = Instant::now();

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url,
            self.model.as_str(),
        );

        let body = GeminiRequest::from_prompt(prompt);
        tracing::debug!(model = %self.model, prompt_chars = prompt.chars().count(), "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            return Err(parse_error(status.as_u16(), &text, &headers));
        }

        let raw_body = response.text().await?;
        let gemini_response: GeminiResponse = serde_json::from_str(&raw_body)?;
        let parts = gemini_response.into_parts()?;

        let duration_ms = start.elapsed().as_millis() as u64;
        tracing::debug!(parts = parts.len(), duration_ms, "generateContent complete");

        Ok(GenerationResponse::new(
            parts,
            GenerationMetadata {
                model: Some(self.model.as_str().to_string()),
                duration_ms: Some(duration_ms),
            },
        ))
    }
}

fn parse_error(status: u16, text: &str, headers: &reqwest::header::HeaderMap) -> ChitrakarError {
    let text = sanitize_error_message(text);
    if status == 404 {
        return ChitrakarError::InvalidRequest(
            "Model not found. Verify the model name is correct.".into(),
        );
    }
    if status == 429 {
        let retry_after = parse_retry_after(headers).map(std::time::Duration::from_secs);
        return ChitrakarError::RateLimited { retry_after };
    }
    if status == 401 || status == 403 {
        return ChitrakarError::Auth(text);
    }
    let lower = text.to_lowercase();
    if lower.contains("safety")
        || lower.contains("blocked")
        || lower.contains("content_policy")
        || lower.contains("prohibited")
    {
        return ChitrakarError::ContentBlocked(text);
    }
    ChitrakarError::Api {
        status,
        message: text,
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<GenerationResponse> {
        self.generate_impl(prompt).await
    }

    fn name(&self) -> &str {
        "Gemini (Google)"
    }
}

// Request/Response types
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

#[derive(Debug, Serialize)]
struct GeminiRequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    response_modalities: Vec<String>,
}

impl GeminiRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                parts: vec![GeminiRequestPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
    #[serde(default)]
    block_reason_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

impl GeminiResponse {
    /// Flattens the first candidate into ordered parts.
    ///
    /// Blocks reported with HTTP 200 become `ContentBlocked`.
    fn into_parts(self) -> Result<Vec<ResponsePart>> {
        if let Some(ref feedback) = self.prompt_feedback {
            if let Some(ref reason) = feedback.block_reason {
                let msg = feedback
                    .block_reason_message
                    .clone()
                    .unwrap_or_else(|| format!("Prompt blocked: {}", reason));
                return Err(ChitrakarError::ContentBlocked(msg));
            }
        }

        let candidate = self.candidates.into_iter().next().ok_or_else(|| {
            ChitrakarError::UnexpectedResponse("No candidates in Gemini response".into())
        })?;

        if let Some(ref finish_reason) = candidate.finish_reason {
            match finish_reason.as_str() {
                "SAFETY"
                | "IMAGE_SAFETY"
                | "IMAGE_PROHIBITED_CONTENT"
                | "IMAGE_RECITATION"
                | "RECITATION"
                | "PROHIBITED_CONTENT"
                | "BLOCKLIST" => {
                    return Err(ChitrakarError::ContentBlocked(format!(
                        "Content blocked by Gemini safety filter: {}",
                        finish_reason
                    )));
                }
                // NO_IMAGE and friends still carry text worth showing.
                _ => {}
            }
        }

        let content = candidate.content.ok_or_else(|| {
            ChitrakarError::UnexpectedResponse("No content in Gemini candidate".into())
        })?;

        let mut parts = Vec::with_capacity(content.parts.len());
        for part in content.parts {
            if let Some(text) = part.text {
                parts.push(ResponsePart::Text(text));
            } else if let Some(inline) = part.inline_data {
                let data = base64::engine::general_purpose::STANDARD
                    .decode(inline.data.trim())
                    .map_err(|e| ChitrakarError::Decode(e.to_string()))?;
                parts.push(ResponsePart::Image(InlineImage::new(data, inline.mime_type)));
            }
        }
        Ok(parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;

    #[test]
    fn test_gemini_model_as_str() {
        assert_eq!(
            GeminiModel::FlashPreviewImageGeneration.as_str(),
            "gemini-2.0-flash-preview-image-generation"
        );
        assert_eq!(GeminiModel::FlashImage.as_str(), "gemini-2.5-flash-image");
        assert_eq!(GeminiModel::Custom("my-model".into()).as_str(), "my-model");
    }

    #[test]
    fn test_gemini_model_default() {
        assert_eq!(GeminiModel::default(), GeminiModel::FlashPreviewImageGeneration);
    }

    #[test]
    fn test_gemini_model_from_str() {
        assert_eq!(
            "gemini-2.5-flash-image".parse::<GeminiModel>().unwrap(),
            GeminiModel::FlashImage
        );
        assert_eq!(
            " other ".parse::<GeminiModel>().unwrap(),
            GeminiModel::Custom("other".into())
        );
        assert!("  ".parse::<GeminiModel>().is_err());
    }

    #[test]
    fn test_builder_with_explicit_key() {
        let client = GeminiClientBuilder::new()
            .api_key("test-key")
            .model(GeminiModel::FlashImage)
            .base_url("http://localhost:1234/")
            .build()
            .unwrap();
        assert_eq!(client.base_url, "http://localhost:1234");
        assert_eq!(client.model(), &GeminiModel::FlashImage);
    }

    #[test]
    fn test_builder_rejects_blank_key() {
        let err = GeminiClientBuilder::new().api_key("  ").build().unwrap_err();
        assert!(matches!(err, ChitrakarError::Config(_)));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let client = GeminiClient::builder().api_key("AIza-secret").build().unwrap();
        assert!(!format!("{client:?}").contains("AIza-secret"));
    }

    #[test]
    fn test_request_serialization() {
        let req = GeminiRequest::from_prompt("सूरज");
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "contents": [{"parts": [{"text": "सूरज"}]}],
                "generationConfig": {"responseModalities": ["TEXT", "IMAGE"]}
            })
        );
    }

    #[test]
    fn test_response_parts_keep_order() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Here is your image"},
                        {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}},
                        {"text": "trailing"}
                    ]
                },
                "finishReason": "STOP"
            }]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        let parts = resp.into_parts().unwrap();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], ResponsePart::Text("Here is your image".into()));
        match &parts[1] {
            ResponsePart::Image(img) => {
                assert_eq!(img.mime_type, "image/png");
                assert_eq!(img.data, vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
            }
            other => panic!("expected image part, got {other:?}"),
        }
        assert_eq!(parts[2], ResponsePart::Text("trailing".into()));
    }

    #[test]
    fn test_response_text_only() {
        let json = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "I can only describe it."}]},
                "finishReason": "NO_IMAGE"
            }]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        let parts = resp.into_parts().unwrap();
        assert_eq!(parts, vec![ResponsePart::Text("I can only describe it.".into())]);
    }

    #[test]
    fn test_response_bad_base64() {
        let json = r#"{
            "candidates": [{
                "content": {"parts": [{"inlineData": {"mimeType": "image/png", "data": "!!!"}}]}
            }]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(resp.into_parts(), Err(ChitrakarError::Decode(_))));
    }

    #[test]
    fn test_response_with_prompt_feedback_block() {
        let json = r#"{
            "candidates": [],
            "promptFeedback": {
                "blockReason": "SAFETY",
                "blockReasonMessage": "Prompt was blocked due to safety"
            }
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        match resp.into_parts() {
            Err(ChitrakarError::ContentBlocked(msg)) => {
                assert_eq!(msg, "Prompt was blocked due to safety")
            }
            other => panic!("expected ContentBlocked, got {other:?}"),
        }
    }

    #[test]
    fn test_response_safety_finish_reason() {
        let json = r#"{"candidates": [{"finishReason": "IMAGE_SAFETY"}]}"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(resp.into_parts(), Err(ChitrakarError::ContentBlocked(_))));
    }

    #[test]
    fn test_response_without_candidates() {
        let resp: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            resp.into_parts(),
            Err(ChitrakarError::UnexpectedResponse(_))
        ));
    }

    #[test]
    fn test_parse_error_by_status() {
        let headers = HeaderMap::new();
        assert!(matches!(parse_error(401, "nope", &headers), ChitrakarError::Auth(_)));
        assert!(matches!(
            parse_error(404, "", &headers),
            ChitrakarError::InvalidRequest(_)
        ));
        assert!(matches!(
            parse_error(429, "", &headers),
            ChitrakarError::RateLimited { retry_after: None }
        ));
        assert!(matches!(
            parse_error(400, "request blocked by safety", &headers),
            ChitrakarError::ContentBlocked(_)
        ));
        match parse_error(500, "boom", &headers) {
            ChitrakarError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
