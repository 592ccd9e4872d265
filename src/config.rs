use std::env;

use crate::error::{EvalError, Result};

pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/api/validate-story";
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Static configuration for one evaluation process, read once at startup.
///
/// The API key is injected from the environment and carried opaquely; it
/// must never appear in logs or in `Debug` output.
#[derive(Clone)]
pub struct EvalConfig {
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub threshold: f64,
}

impl std::fmt::Debug for EvalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvalConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("threshold", &self.threshold)
            .finish()
    }
}

impl EvalConfig {
    /// Read configuration from the environment.
    ///
    /// `GROQ_API_KEY` is required and must be non-empty; the rest fall back
    /// to defaults matching the server under test's local setup.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("GROQ_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| EvalError::Config("GROQ_API_KEY is not set".into()))?;

        let model = env::var("STORYEVAL_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());
        let endpoint = env::var("STORYEVAL_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.into());

        let threshold = match env::var("STORYEVAL_THRESHOLD") {
            Ok(raw) => raw.parse::<f64>().ok().filter(|t| (0.0..=1.0).contains(t)).ok_or_else(
                || EvalError::Config(format!("STORYEVAL_THRESHOLD must be in [0,1], got {raw:?}")),
            )?,
            Err(_) => DEFAULT_THRESHOLD,
        };

        Ok(Self {
            api_key,
            model,
            endpoint,
            threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_api_key() {
        let config = EvalConfig {
            api_key: "gsk_secret".into(),
            model: DEFAULT_MODEL.into(),
            endpoint: DEFAULT_ENDPOINT.into(),
            threshold: DEFAULT_THRESHOLD,
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("gsk_secret"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains(DEFAULT_MODEL));
    }

    #[test]
    fn default_threshold_in_range() {
        assert!((0.0..=1.0).contains(&DEFAULT_THRESHOLD));
    }
}
