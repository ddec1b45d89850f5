//! Fail-soft relay in front of a text generator.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::client::GeminiClient;
use crate::config::{GeminiConfig, DEFAULT_MAX_TOKENS};
use crate::generator::TextGenerator;

/// Reply when no provider is configured.
pub const NOT_CONFIGURED_MESSAGE: &str = "Hello! I'm your browser assistant. To enable AI chat features, please configure the Gemini API key in the backend settings. You can get a free API key from https://ai.google.dev/";

/// Reply when the provider call fails for any reason.
pub const APOLOGY_MESSAGE: &str = "I apologize, but I'm having trouble processing your request right now. Please try again in a moment.";

/// Context returned by [`AiRelay::get_chat_context`] until history-derived context exists.
pub const DEFAULT_CHAT_CONTEXT: &str = "User is using a browser extension with AI chat capabilities.";

/// Relays prompts to a text generator and always answers with text.
///
/// Constructed once at startup and shared. An unavailable relay answers every
/// prompt with [`NOT_CONFIGURED_MESSAGE`] without touching the network; an
/// available one answers with the generator's text or, on any failure,
/// [`APOLOGY_MESSAGE`].
#[derive(Clone)]
pub struct AiRelay {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl AiRelay {
    /// Build a relay from configuration.
    ///
    /// A missing or placeholder key, or a client that cannot be built, yields an
    /// unavailable relay rather than an error.
    pub fn from_config(config: GeminiConfig) -> Self {
        if !config.is_configured() {
            error!("Gemini API key is not configured; AI chat replies are disabled");
            return Self::unavailable();
        }

        let model = config.model.clone();
        match GeminiClient::new(config) {
            Ok(client) => {
                info!(model = %model, "Gemini AI client initialized");
                Self::with_generator(Arc::new(client))
            }
            Err(err) => {
                error!(error = %err, "Gemini AI initialization failed");
                Self::unavailable()
            }
        }
    }

    /// Build a relay from environment variables.
    ///
    /// See [`GeminiConfig::from_env`].
    pub fn from_env() -> Self {
        Self::from_config(GeminiConfig::from_env())
    }

    /// A relay backed by the given generator.
    pub fn with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// A relay with no generator.
    pub fn unavailable() -> Self {
        Self { generator: None }
    }

    /// Whether a generator is configured.
    pub fn is_available(&self) -> bool {
        self.generator.is_some()
    }

    /// Generate a reply to `prompt`, optionally grounded in browsing `context`.
    ///
    /// `max_tokens` defaults to [`DEFAULT_MAX_TOKENS`]. Never fails.
    pub async fn generate_response(
        &self,
        prompt: &str,
        context: Option<&str>,
        max_tokens: Option<u32>,
    ) -> String {
        let Some(generator) = &self.generator else {
            return NOT_CONFIGURED_MESSAGE.to_string();
        };

        let enhanced_prompt = build_prompt(prompt, context);
        let max_tokens = max_tokens.unwrap_or(DEFAULT_MAX_TOKENS);

        match generator.generate(&enhanced_prompt, max_tokens).await {
            Ok(text) => text,
            Err(err) => {
                warn!(generator = generator.name(), error = %err, "Text generation failed");
                APOLOGY_MESSAGE.to_string()
            }
        }
    }

    /// Browsing context for a user's chat.
    ///
    /// Currently a fixed description; history-derived context plugs in here.
    pub fn get_chat_context(&self, _user_id: &str, _session_id: &str) -> String {
        DEFAULT_CHAT_CONTEXT.to_string()
    }
}

impl std::fmt::Debug for AiRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiRelay")
            .field("generator", &self.generator.as_ref().map(|g| g.name()))
            .finish()
    }
}

/// Wrap the user's question, prefixing browsing context when there is any.
pub fn build_prompt(prompt: &str, context: Option<&str>) -> String {
    match context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(context) => format!(
            "Context from user's browsing activity: {}\n\n\
             User question: {}\n\n\
             Please provide a helpful response considering the user's browsing context.",
            context, prompt
        ),
        None => format!(
            "User question: {}\n\n\
             Please provide a helpful and friendly response.",
            prompt
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RelayError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Records every call and answers with a canned reply.
    #[derive(Default)]
    struct RecordingGenerator {
        calls: Mutex<Vec<(String, u32)>>,
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, RelayError> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), max_tokens));
            Ok("canned reply".to_string())
        }

        fn name(&self) -> &str {
            "Recording"
        }
    }

    /// Fails every call.
    #[derive(Default)]
    struct FailingGenerator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &str, _max_tokens: u32) -> Result<String, RelayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(RelayError::Api {
                status: 503,
                message: "overloaded".to_string(),
            })
        }

        fn name(&self) -> &str {
            "Failing"
        }
    }

    #[test]
    fn test_build_prompt_with_context() {
        let prompt = build_prompt("What was I reading?", Some("Visited docs.rs"));
        assert!(prompt.starts_with("Context from user's browsing activity: Visited docs.rs"));
        assert!(prompt.contains("User question: What was I reading?"));
        assert!(prompt.contains("considering the user's browsing context"));
    }

    #[test]
    fn test_build_prompt_without_context() {
        for context in [None, Some(""), Some("   ")] {
            let prompt = build_prompt("Hi", context);
            assert!(prompt.starts_with("User question: Hi"));
            assert!(!prompt.contains("browsing activity"));
        }
    }

    #[tokio::test]
    async fn test_unavailable_relay_returns_instructions() {
        let relay = AiRelay::unavailable();
        assert!(!relay.is_available());

        for prompt in ["hello", "", "tell me a joke"] {
            let reply = relay.generate_response(prompt, Some("ctx"), Some(10)).await;
            assert_eq!(reply, NOT_CONFIGURED_MESSAGE);
        }
    }

    #[tokio::test]
    async fn test_unconfigured_config_builds_unavailable_relay() {
        let relay = AiRelay::from_config(GeminiConfig::default());
        assert!(!relay.is_available());

        let config = GeminiConfig::builder()
            .api_key(crate::config::PLACEHOLDER_API_KEY)
            // Would refuse connections if anything were sent.
            .api_url("http://127.0.0.1:1")
            .build();
        let relay = AiRelay::from_config(config);
        assert_eq!(relay.generate_response("hi", None, None).await, NOT_CONFIGURED_MESSAGE);
    }

    #[tokio::test]
    async fn test_generator_reply_passed_through() {
        let generator = Arc::new(RecordingGenerator::default());
        let relay = AiRelay::with_generator(generator.clone());
        assert!(relay.is_available());

        let reply = relay.generate_response("Hi", Some("ctx"), None).await;
        assert_eq!(reply, "canned reply");

        relay.generate_response("Again", None, Some(42)).await;

        let calls = generator.calls.lock().unwrap();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].0, build_prompt("Hi", Some("ctx")));
        assert_eq!(calls[0].1, DEFAULT_MAX_TOKENS);
        assert_eq!(calls[1].0, build_prompt("Again", None));
        assert_eq!(calls[1].1, 42);
    }

    #[tokio::test]
    async fn test_generator_failure_returns_apology() {
        let generator = Arc::new(FailingGenerator::default());
        let relay = AiRelay::with_generator(generator.clone());

        let reply = relay.generate_response("Hi", None, None).await;
        assert_eq!(reply, APOLOGY_MESSAGE);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unreachable_provider_returns_apology() {
        let config = GeminiConfig::builder()
            .api_key("test-key")
            .api_url("http://127.0.0.1:1")
            .build();
        let relay = AiRelay::from_config(config);
        assert!(relay.is_available());

        let reply = relay.generate_response("Hi", None, None).await;
        assert_eq!(reply, APOLOGY_MESSAGE);
    }

    #[test]
    fn test_chat_context_placeholder() {
        let relay = AiRelay::unavailable();
        assert_eq!(relay.get_chat_context("u1", "s1"), DEFAULT_CHAT_CONTEXT);
    }
}
