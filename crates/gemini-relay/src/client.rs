//! HTTP client for the Gemini `generateContent` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::api_types::{
    ApiError, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    SafetySetting,
};
use crate::config::GeminiConfig;
use crate::error::RelayError;
use crate::generator::TextGenerator;

/// A [`TextGenerator`] backed by Google's Generative Language API.
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

impl GeminiClient {
    /// Create a client. Fails if the configuration has no usable API key.
    pub fn new(config: GeminiConfig) -> Result<Self, RelayError> {
        let api_key = config
            .usable_api_key()
            .ok_or_else(|| RelayError::Configuration("GEMINI_API_KEY not set".to_string()))?
            .to_string();

        let client = Client::builder().build().map_err(|e| {
            RelayError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn build_request(&self, prompt: &str, max_tokens: u32) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content::user(prompt)],
            generation_config: GenerationConfig {
                max_output_tokens: max_tokens,
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                top_k: self.config.top_k,
            },
            safety_settings: SafetySetting::default_policy(),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, RelayError> {
        let request = self.build_request(prompt, max_tokens);

        debug!(model = %self.config.model, max_tokens, "Sending request to Gemini API");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RelayError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            let message = match serde_json::from_str::<ApiError>(&error_text) {
                Ok(api_error) => api_error.error.message,
                Err(_) => error_text,
            };

            return Err(RelayError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| RelayError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        if let Some(reason) = completion
            .prompt_feedback
            .as_ref()
            .and_then(|feedback| feedback.block_reason.clone())
        {
            return Err(RelayError::Blocked(reason));
        }

        if let Some(usage) = &completion.usage_metadata {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_token_count, usage.candidates_token_count, usage.total_token_count
            );
        }

        match completion.text() {
            Some(text) => Ok(text),
            None => {
                let finish_reason = completion
                    .candidates
                    .first()
                    .and_then(|candidate| candidate.finish_reason.as_deref());
                match finish_reason {
                    Some("SAFETY") => Err(RelayError::Blocked("SAFETY".to_string())),
                    _ => Err(RelayError::EmptyResponse),
                }
            }
        }
    }

    fn name(&self) -> &str {
        "Gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GeminiClient {
        let config = GeminiConfig::builder()
            .api_key("test-key")
            .api_url("https://example.invalid/")
            .model("gemini-test")
            .build();
        GeminiClient::new(config).unwrap()
    }

    #[test]
    fn test_new_requires_key() {
        let result = GeminiClient::new(GeminiConfig::default());
        assert!(matches!(result, Err(RelayError::Configuration(_))));
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(
            test_client().endpoint(),
            "https://example.invalid/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn test_build_request_uses_fixed_sampling() {
        let request = test_client().build_request("hi", 123);

        assert_eq!(request.generation_config.max_output_tokens, 123);
        assert_eq!(request.generation_config.temperature, 0.7);
        assert_eq!(request.generation_config.top_p, 0.8);
        assert_eq!(request.generation_config.top_k, 40);
        assert_eq!(request.safety_settings.len(), 4);
        assert_eq!(request.contents[0].parts[0].text.as_deref(), Some("hi"));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let config = GeminiConfig::builder()
            .api_key("test-key")
            .api_url("http://127.0.0.1:1")
            .build();
        let client = GeminiClient::new(config).unwrap();

        let result = client.generate("hello", 10).await;
        assert!(matches!(result, Err(RelayError::Network(_))));
    }
}
