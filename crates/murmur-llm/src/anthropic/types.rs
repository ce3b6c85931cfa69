//! Request/response wire types for the Messages API.

use serde::{Deserialize, Serialize};

use crate::types::ChatMessage;

/// API version header value required by the Messages API.
pub(crate) const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Configuration for [`super::AnthropicGenerator`].
#[derive(Clone, Debug)]
pub struct AnthropicConfig {
    /// API base URL (no trailing slash).
    pub base_url: String,
    /// API key sent in the `x-api-key` header.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Maximum tokens to generate per reply.
    pub max_tokens: u32,
    /// System prompt prefixed to every call.
    pub system_prompt: String,
    /// Per-request timeout.
    pub request_timeout: std::time::Duration,
}

/// POST /v1/messages request body.
#[derive(Debug, Serialize)]
pub(crate) struct MessagesRequest<'a> {
    pub model: &'a str,
    pub max_tokens: u32,
    pub system: &'a str,
    pub messages: Vec<ChatMessage>,
}

/// POST /v1/messages response body (the fields this crate consumes).
#[derive(Debug, Deserialize)]
pub(crate) struct MessagesResponse {
    pub content: Vec<ContentBlock>,
}

/// One content block of a response.
#[derive(Debug, Deserialize)]
pub(crate) struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default)]
    pub text: String,
}
