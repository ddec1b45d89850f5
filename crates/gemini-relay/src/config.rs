//! Configuration for the Gemini relay.

use std::env;

/// Placeholder shipped in sample `.env` files; treated the same as no key.
pub const PLACEHOLDER_API_KEY: &str = "your_actual_gemini_api_key_here";

/// Default output budget for a single reply.
pub const DEFAULT_MAX_TOKENS: u32 = 500;

/// Configuration for the Gemini relay.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Generative Language API base URL.
    pub api_url: String,

    /// API key, if one was provided.
    pub api_key: Option<String>,

    /// Model name to use.
    pub model: String,

    /// Temperature for generation.
    pub temperature: f32,

    /// Nucleus sampling probability mass.
    pub top_p: f32,

    /// Number of highest-probability tokens considered at each step.
    pub top_k: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: None,
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.7,
            top_p: 0.8,
            top_k: 40,
        }
    }
}

impl GeminiConfig {
    /// Create configuration from environment variables.
    ///
    /// Never fails: a missing key leaves the relay unconfigured, which it reports
    /// through its degraded reply rather than an error.
    ///
    /// Environment variables:
    /// - `GEMINI_API_KEY` - API key (unset or placeholder leaves the relay unconfigured)
    /// - `GEMINI_API_URL` - API URL (default: https://generativelanguage.googleapis.com)
    /// - `GEMINI_MODEL` - Model name (default: gemini-1.5-flash)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let api_key = env::var("GEMINI_API_KEY").ok();

        let api_url = env::var("GEMINI_API_URL").unwrap_or(defaults.api_url);

        let model = env::var("GEMINI_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(defaults.model);

        Self {
            api_url,
            api_key,
            model,
            ..defaults
        }
    }

    /// Create a new config builder.
    pub fn builder() -> GeminiConfigBuilder {
        GeminiConfigBuilder::default()
    }

    /// Whether a usable API key is present.
    pub fn is_configured(&self) -> bool {
        self.usable_api_key().is_some()
    }

    /// The API key, unless it is missing, blank or the placeholder.
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_API_KEY)
    }
}

/// Builder for GeminiConfig.
#[derive(Debug, Default)]
pub struct GeminiConfigBuilder {
    config: GeminiConfig,
}

impl GeminiConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GeminiConfig {
        self.config
    }
}
