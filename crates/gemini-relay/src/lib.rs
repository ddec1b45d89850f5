//! Google Gemini relay for the browser activity tracker.
//!
//! This crate forwards chat prompts, optionally prefixed with a browsing
//! context, to the Gemini `generateContent` API and always answers with text.
//!
//! # Features
//!
//! - One [`AiRelay`] capability object built at startup and shared
//! - Degraded reply when no API key is configured, without any network call
//! - Fixed sampling (temperature 0.7, top-p 0.8, top-k 40) and safety thresholds
//! - Any provider failure becomes a fixed apology instead of an error
//! - [`TextGenerator`] seam for plugging in other backends
//!
//! # Usage
//!
//! ```rust,no_run
//! use gemini_relay::AiRelay;
//!
//! #[tokio::main]
//! async fn main() {
//!     let relay = AiRelay::from_env();
//!     let context = relay.get_chat_context("user-1", "session-1");
//!     let reply = relay
//!         .generate_response("What did I read today?", Some(&context), None)
//!         .await;
//!     println!("{}", reply);
//! }
//! ```

mod api_types;
mod client;
mod config;
mod error;
mod generator;
mod relay;

pub use client::GeminiClient;
pub use config::{GeminiConfig, GeminiConfigBuilder, DEFAULT_MAX_TOKENS, PLACEHOLDER_API_KEY};
pub use error::RelayError;
pub use generator::TextGenerator;
pub use relay::{
    build_prompt, AiRelay, APOLOGY_MESSAGE, DEFAULT_CHAT_CONTEXT, NOT_CONFIGURED_MESSAGE,
};

// Re-export async_trait for generator implementations
pub use async_trait::async_trait;
