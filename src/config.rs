//! Runtime configuration from the environment.

use crate::auth::AuthGate;
use crate::error::{ChitrakarError, Result};
use crate::image::providers::{GeminiClient, GeminiModel};
use std::path::PathBuf;

/// Passcode guarding the session.
pub const PASSCODE_VAR: &str = "APP_PASSCODE";
/// Gemini API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Accepted when [`API_KEY_VAR`] is unset.
pub const FALLBACK_API_KEY_VAR: &str = "GOOGLE_API_KEY";
/// Optional model override.
pub const MODEL_VAR: &str = "CHITRAKAR_MODEL";
/// Optional output directory.
pub const OUTPUT_DIR_VAR: &str = "CHITRAKAR_OUTPUT_DIR";
/// Optional API host override.
pub const BASE_URL_VAR: &str = "CHITRAKAR_BASE_URL";

/// Everything needed to start a session.
#[derive(Clone, Default)]
pub struct Config {
    /// Configured passcode, if any.
    pub passcode: Option<String>,
    /// Gemini API key, if any.
    pub api_key: Option<String>,
    /// Model to request images from.
    pub model: GeminiModel,
    /// Where delivered files are written.
    pub output_dir: PathBuf,
    /// API host override.
    pub base_url: Option<String>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("passcode", &self.passcode.as_ref().map(|_| "<set>"))
            .field("api_key", &self.api_key.as_ref().map(|_| "<set>"))
            .field("model", &self.model)
            .field("output_dir", &self.output_dir)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let model = match get(MODEL_VAR) {
            Some(name) => name.parse()?,
            None => GeminiModel::default(),
        };

        Ok(Self {
            passcode: get(PASSCODE_VAR),
            api_key: get(API_KEY_VAR).or_else(|| get(FALLBACK_API_KEY_VAR)),
            model,
            output_dir: get(OUTPUT_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            base_url: get(BASE_URL_VAR),
        })
    }

    /// Builds the passcode gate.
    pub fn auth_gate(&self) -> AuthGate {
        AuthGate::new(self.passcode.clone())
    }

    /// Builds the Gemini client. A missing API key is fatal.
    pub fn gemini_client(&self) -> Result<GeminiClient> {
        let api_key = self.api_key.clone().ok_or_else(|| {
            ChitrakarError::Config(format!("{API_KEY_VAR} is not set"))
        })?;

        let mut builder = GeminiClient::builder()
            .api_key(api_key)
            .model(self.model.clone());
        if let Some(ref url) = self.base_url {
            builder = builder.base_url(url);
        }
        builder.build()
    }
}
