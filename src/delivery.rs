//! Showing results to the user and handing over the download.

use crate::error::Result;
use crate::image::{GenerationResponse, InlineImage, ResponsePart};
use image::DynamicImage;
use std::io::Write;
use std::path::PathBuf;

/// File name of the downloadable artifact.
pub const DOWNLOAD_FILE_NAME: &str = "animation.png";

/// The resized PNG offered to the user.
#[derive(Debug, Clone)]
pub struct DownloadArtifact {
    /// Suggested file name.
    pub file_name: String,
    /// MIME type reported by the API for the original image.
    pub mime_type: String,
    /// PNG bytes.
    pub data: Vec<u8>,
}

impl DownloadArtifact {
    /// Wraps `data` under the fixed download name.
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            file_name: DOWNLOAD_FILE_NAME.to_string(),
            mime_type: mime_type.into(),
            data,
        }
    }
}

/// Where messages, images and downloads end up.
pub trait DeliverySurface {
    /// Progress or informational message.
    fn info(&mut self, message: &str);
    /// Something went right.
    fn success(&mut self, message: &str);
    /// Something the user should look at, but not fatal.
    fn warning(&mut self, message: &str);
    /// A failure report.
    fn error(&mut self, message: &str);
    /// Text returned by the model, shown verbatim under `heading`.
    fn model_text(&mut self, heading: &str, text: &str);
    /// Shows the original, not yet resized image.
    fn show_image(&mut self, image: &InlineImage, decoded: &DynamicImage) -> Result<()>;
    /// Offers the resized image for download.
    ///
    /// Returns where it went, if it was written somewhere.
    fn offer_download(&mut self, artifact: &DownloadArtifact) -> Result<Option<PathBuf>>;
}

/// Emits text parts in order and returns the first image part.
///
/// Parts after the first image are ignored.
pub fn unpack<'a, S>(response: &'a GenerationResponse, surface: &mut S) -> Option<&'a InlineImage>
where
    S: DeliverySurface + ?Sized,
{
    for part in &response.parts {
        match part {
            ResponsePart::Text(text) => {
                surface.model_text("Gemini's Text Response (if any):", text);
            }
            ResponsePart::Image(image) => return Some(image),
        }
    }
    None
}

/// Writes messages to a terminal and files to a directory.
pub struct TerminalSurface<W: Write> {
    out: W,
    output_dir: PathBuf,
    keep_original: bool,
}

impl<W: Write> TerminalSurface<W> {
    /// Creates a surface writing messages to `out` and files under `output_dir`.
    pub fn new(out: W, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            out,
            output_dir: output_dir.into(),
            keep_original: true,
        }
    }

    /// Whether the original image is also saved next to the download.
    pub fn keep_original(mut self, keep: bool) -> Self {
        self.keep_original = keep;
        self
    }

    fn line(&mut self, prefix: &str, message: &str) {
        if let Err(e) = writeln!(self.out, "{prefix}{message}") {
            tracing::warn!("failed to write to terminal: {e}");
        }
    }
}

impl<W: Write> DeliverySurface for TerminalSurface<W> {
    fn info(&mut self, message: &str) {
        self.line("", message);
    }

    fn success(&mut self, message: &str) {
        self.line("✅ ", message);
    }

    fn warning(&mut self, message: &str) {
        self.line("⚠️ ", message);
    }

    fn error(&mut self, message: &str) {
        self.line("🛑 ", message);
    }

    fn model_text(&mut self, heading: &str, text: &str) {
        self.line("", heading);
        self.line("", text);
    }

    fn show_image(&mut self, image: &InlineImage, decoded: &DynamicImage) -> Result<()> {
        let summary = format!(
            "Generated Image: {}x{} ({}, {} bytes)",
            decoded.width(),
            decoded.height(),
            image.mime_type,
            image.size()
        );
        self.line("", &summary);

        if self.keep_original {
            let ext = image.format().unwrap_or_default().extension();
            std::fs::create_dir_all(&self.output_dir)?;
            let path = self.output_dir.join(format!("original.{ext}"));
            image.save(&path)?;
            self.line("   original: ", &path.display().to_string());
        }
        Ok(())
    }

    fn offer_download(&mut self, artifact: &DownloadArtifact) -> Result<Option<PathBuf>> {
        std::fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.data)?;
        tracing::debug!(path = %path.display(), bytes = artifact.data.len(), "wrote download");
        self.line("⬇️ Download Image: ", &path.display().to_string());
        Ok(Some(path))
    }
}
