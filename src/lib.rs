#![warn(missing_docs)]
//! Chitrakar - animated illustrations from Hindi prompts.
//!
//! A Hindi prompt is wrapped into an instruction for Gemini's image model,
//! the first returned image is shown to the user and a 1920x1080 PNG copy
//! is written out as `animation.png`.
//!
//! # Quick Start
//!
//! ```no_run
//! use chitrakar::{AuthGate, AuthState, Config, Session, TerminalSurface};
//!
//! #[tokio::main]
//! async fn main() -> chitrakar::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = config.gemini_client()?;
//!     let surface = TerminalSurface::new(std::io::stdout(), &config.output_dir);
//!     let mut session = Session::new(AuthState::new(config.auth_gate()), client, surface);
//!
//!     session.unlock("my-passcode")?;
//!     let outcome = session.generate("एक जंगल में नाचती हुई परी", false).await?;
//!     println!("{}", outcome.status());
//!     Ok(())
//! }
//! ```
//!
//! Only the prompt is needed to see what would be sent:
//!
//! ```
//! let prompt = chitrakar::prompt::build("सूरज", false);
//! assert!(prompt.starts_with("STRICTLY GENERATE A VISUAL IMAGE."));
//! ```

pub mod auth;
pub mod config;
pub mod delivery;
mod error;
pub mod image;
pub mod prompt;
pub mod session;

// Re-export error types at crate root
pub use error::{ChitrakarError, Result};

pub use auth::{AuthGate, AuthState};
pub use config::Config;
pub use delivery::{DeliverySurface, DownloadArtifact, TerminalSurface, DOWNLOAD_FILE_NAME};
pub use self::image::providers::{GeminiClient, GeminiClientBuilder, GeminiModel};
pub use self::image::{GenerationResponse, ImageGenerator, InlineImage, ResponsePart};
pub use prompt::TextMode;
pub use session::{Delivery, Outcome, Session};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{ChitrakarError, Result};
    pub use crate::image::ImageGenerator;
    pub use crate::{AuthState, Config, DeliverySurface, GeminiClient, Session, TerminalSurface};
}
