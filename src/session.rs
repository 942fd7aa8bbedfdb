//! One user's session: unlock, then generate images one prompt at a time.

use crate::auth::AuthState;
use crate::delivery::{unpack, DeliverySurface, DownloadArtifact};
use crate::error::{ChitrakarError, Result};
use crate::image::{process, GenerationMetadata, ImageGenerator};
use crate::prompt;
use std::path::PathBuf;

/// What came of a successful generation.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// MIME type reported for the original image.
    pub mime_type: String,
    /// Width of the original image.
    pub original_width: u32,
    /// Height of the original image.
    pub original_height: u32,
    /// Size of the resized PNG in bytes.
    pub download_bytes: usize,
    /// Where the download was written, if anywhere.
    pub download_path: Option<PathBuf>,
    /// Metadata from the generator.
    pub metadata: GenerationMetadata,
}

/// Result of one generate action, as reported to the user.
#[derive(Debug)]
pub enum Outcome {
    /// An image was produced and offered for download.
    Delivered(Delivery),
    /// The call succeeded but produced no image.
    NoImage {
        /// Top-level response text, if any.
        text: Option<String>,
    },
    /// The call or response handling failed.
    Failed(ChitrakarError),
    /// The prompt was empty; nothing was sent.
    EmptyPrompt,
}

impl Outcome {
    /// Converts everything but a delivery into an error.
    pub fn into_result(self) -> Result<Delivery> {
        match self {
            Self::Delivered(d) => Ok(d),
            Self::NoImage { text } => Err(ChitrakarError::NoImage { text }),
            Self::Failed(e) => Err(e),
            Self::EmptyPrompt => Err(ChitrakarError::EmptyPrompt),
        }
    }

    /// Short machine-readable status.
    pub fn status(&self) -> &'static str {
        match self {
            Self::Delivered(_) => "delivered",
            Self::NoImage { .. } => "no_image",
            Self::Failed(_) => "failed",
            Self::EmptyPrompt => "empty_prompt",
        }
    }
}

/// Ties the gate, the generator and the delivery surface together.
pub struct Session<G, S> {
    auth: AuthState,
    generator: G,
    surface: S,
}

impl<G, S> Session<G, S>
where
    G: ImageGenerator,
    S: DeliverySurface,
{
    /// Creates a locked session.
    pub fn new(auth: AuthState, generator: G, surface: S) -> Self {
        Self {
            auth,
            generator,
            surface,
        }
    }

    /// Whether the passcode has been accepted.
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Submits a passcode, telling the user how it went.
    pub fn unlock(&mut self, passcode: &str) -> Result<()> {
        match self.auth.unlock(passcode) {
            Ok(()) => {
                self.surface.success("Access granted!");
                Ok(())
            }
            Err(e) => {
                self.surface.error("Incorrect passcode. Try again.");
                Err(e)
            }
        }
    }

    /// The delivery surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Display name of the image generator.
    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    /// Generates and delivers one image for `raw`.
    ///
    /// A prompt that is empty or only whitespace is rejected with
    /// [`Outcome::EmptyPrompt`] before anything is sent. Fails only when the
    /// session is still locked; every other problem is reported on the
    /// surface and returned as an [`Outcome`].
    pub async fn generate(&mut self, raw: &str, include_text: bool) -> Result<Outcome> {
        if !self.auth.is_authenticated() {
            return Err(ChitrakarError::Auth("session is locked".into()));
        }

        if raw.trim().is_empty() {
            self.surface
                .warning("Please enter some Hindi text for your image.");
            return Ok(Outcome::EmptyPrompt);
        }
        self.surface.info("Creating a beautiful image for you...");

        let full_prompt = prompt::build(raw, include_text);
        tracing::debug!(
            include_text,
            short = prompt::is_short(raw),
            "built prompt"
        );

        self.surface
            .info("Attempting to generate image... This may take a moment.");

        match self.generate_and_deliver(&full_prompt).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                tracing::debug!(error = %e, "generation failed");
                self.surface.error(&format!("Error generating image: {e}"));
                Ok(Outcome::Failed(e))
            }
        }
    }

    async fn generate_and_deliver(&mut self, full_prompt: &str) -> Result<Outcome> {
        let response = self.generator.generate(full_prompt).await?;

        let Some(image) = unpack(&response, &mut self.surface) else {
            let text = response.text();
            tracing::warn!(has_text = text.is_some(), "response contained no image");
            self.surface.warning(
                "Gemini API did not return an image directly for this prompt. \
                 It might have returned only text or encountered an internal issue.",
            );
            if let Some(ref t) = text {
                self.surface
                    .model_text("Full response text for debugging:", t);
            }
            self.surface.error(
                "Please try a different prompt or check the Gemini API documentation \
                 for supported image generation formats and limitations.",
            );
            return Ok(Outcome::NoImage { text });
        };

        self.surface.success("Image successfully generated!");
        let processed = process(&image.data)?;
        self.surface.show_image(image, &processed.original)?;

        let download_bytes = processed.png.len();
        let artifact = DownloadArtifact::new(processed.png, image.mime_type.clone());
        let download_path = self.surface.offer_download(&artifact)?;

        Ok(Outcome::Delivered(Delivery {
            mime_type: image.mime_type.clone(),
            original_width: processed.original.width(),
            original_height: processed.original.height(),
            download_bytes,
            download_path,
            metadata: response.metadata.clone(),
        }))
    }
}
