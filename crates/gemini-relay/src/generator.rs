//! The text-generation seam between the relay and a provider.

use async_trait::async_trait;

use crate::error::RelayError;

/// A remote (or in-process) text completion backend.
///
/// Implementations may fail freely; [`AiRelay`](crate::AiRelay) turns every
/// error into its fixed fallback reply.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete `prompt`, producing at most `max_tokens` output tokens.
    async fn generate(&self, prompt: &str, max_tokens: u32) -> Result<String, RelayError>;

    /// Backend name used in logs.
    fn name(&self) -> &str;
}
