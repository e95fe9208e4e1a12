//! Provider trait: the abstraction over the language-model call.
//!
//! A Provider takes a system prompt, the conversation so far, and model
//! parameters, and returns the generated text with token usage.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::Turn;

/// Model selection and sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParams {
    /// Model name (e.g., "claude-sonnet-4-20250514")
    #[serde(default = "default_model")]
    pub name: String,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

pub fn default_model() -> String {
    "claude-sonnet-4-20250514".into()
}

pub fn default_max_tokens() -> u32 {
    4096
}

pub fn default_temperature() -> f32 {
    0.7
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            name: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// A single completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// System prompt, sent out of band from the turns
    pub system: String,

    /// Prior turns plus the new user turn, in order
    pub messages: Vec<Turn>,

    pub params: ModelParams,
}

/// A complete response from a provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// Concatenated text blocks of the answer
    pub text: String,

    /// Token usage statistics
    pub usage: Usage,

    /// Which model actually responded (may differ from requested)
    pub model: String,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// The core Provider trait.
///
/// The orchestrator calls `complete()` without knowing which backend
/// answers. Implementations must not retry internally; failures are
/// surfaced with their original classification.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Send a request and get a complete response.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError>;
}
