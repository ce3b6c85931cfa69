//! Anthropic Messages API provider.

pub mod provider;
pub mod types;

pub use provider::AnthropicGenerator;
pub use types::AnthropicConfig;
