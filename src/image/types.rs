//! Core types for image generation responses.

use serde::Serialize;
use std::path::Path;

/// Image encodings the generator is known to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format.
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Maps a MIME type reported by the API to a format.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// Metadata about one generation call.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationMetadata {
    /// Model used for generation.
    pub model: Option<String>,
    /// Round-trip duration in milliseconds.
    pub duration_ms: Option<u64>,
}

/// Raw image bytes returned inline by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// Decoded (not base64) image bytes.
    pub data: Vec<u8>,
    /// MIME type as reported by the API.
    pub mime_type: String,
}

impl InlineImage {
    /// Creates an inline image.
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Best guess at the encoding: the reported MIME type, then magic bytes.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_mime_type(&self.mime_type)
            .or_else(|| ImageFormat::from_magic_bytes(&self.data))
    }

    /// Returns the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Saves the raw bytes to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }
}

/// One fragment of a generation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePart {
    /// Text commentary from the model.
    Text(String),
    /// An image.
    Image(InlineImage),
}

/// Everything the generator returned for one prompt, parts in API order.
#[derive(Debug, Clone, Default)]
#[must_use = "a generation response should be delivered or inspected"]
pub struct GenerationResponse {
    /// Ordered response parts.
    pub parts: Vec<ResponsePart>,
    /// Generation metadata.
    pub metadata: GenerationMetadata,
}

impl GenerationResponse {
    /// Creates a response from its parts.
    pub fn new(parts: Vec<ResponsePart>, metadata: GenerationMetadata) -> Self {
        Self { parts, metadata }
    }

    /// All text parts concatenated, or `None` when there are none.
    pub fn text(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .parts
            .iter()
            .filter_map(|p| match p {
                ResponsePart::Text(t) => Some(t.as_str()),
                ResponsePart::Image(_) => None,
            })
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: [u8; 12] = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
    const WEBP_MAGIC: [u8; 12] = *b"RIFF\x00\x00\x00\x00WEBP";

    #[test]
    fn test_format_from_magic_bytes() {
        assert_eq!(ImageFormat::from_magic_bytes(&PNG_MAGIC), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_magic_bytes(&JPEG_MAGIC), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_magic_bytes(&WEBP_MAGIC), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::from_magic_bytes(&[0x89, 0x50]), None);
    }

    #[test]
    fn test_format_from_mime_type() {
        assert_eq!(ImageFormat::from_mime_type("image/png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_mime_type("IMAGE/JPEG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_mime_type("image/webp"), Some(ImageFormat::WebP));
        assert_eq!(ImageFormat::from_mime_type("image/gif"), None);
    }

    #[test]
    fn test_inline_image_format_falls_back_to_magic() {
        let img = InlineImage::new(JPEG_MAGIC.to_vec(), "application/octet-stream");
        assert_eq!(img.format(), Some(ImageFormat::Jpeg));
        assert_eq!(img.size(), 12);
    }

    #[test]
    fn test_metadata_serializes_for_reports() {
        let metadata = GenerationMetadata {
            model: Some("gemini-2.5-flash-image".into()),
            duration_ms: Some(1200),
        };
        assert_eq!(
            serde_json::to_value(&metadata).unwrap(),
            serde_json::json!({"model": "gemini-2.5-flash-image", "duration_ms": 1200})
        );
    }

    #[test]
    fn test_response_text_concatenates_text_parts() {
        let response = GenerationResponse::new(
            vec![
                ResponsePart::Text("पहला ".into()),
                ResponsePart::Image(InlineImage::new(PNG_MAGIC.to_vec(), "image/png")),
                ResponsePart::Text("दूसरा".into()),
            ],
            GenerationMetadata::default(),
        );
        assert_eq!(response.text().as_deref(), Some("पहला दूसरा"));
    }

    #[test]
    fn test_empty_response() {
        let response = GenerationResponse::default();
        assert!(response.text().is_none());
    }
}
