//! # murmur-llm
//!
//! Response Generator collaborator: the trait the server talks to, plus the
//! Anthropic Messages API implementation.
//!
//! The generator receives the caller-assembled context window and applies
//! its own independent trim ([`MAX_HISTORY_MESSAGES`]) before sending
//! upstream — the effective history bound is the minimum of the two. The
//! windowing side owns what is fetched from the store; this side owns what
//! is sent upstream.
//!
//! ## Crate Position
//!
//! Standalone (no murmur crate dependencies). Depended on by: murmur-server.

#![deny(unsafe_code)]

pub mod anthropic;
pub mod prompts;
pub mod types;

pub use anthropic::{AnthropicConfig, AnthropicGenerator};
pub use types::{ChatMessage, GeneratorError, ResponseGenerator, Role};

/// Maximum history entries the generator sends upstream, counted from the
/// tail (most recent). Independent of the store-side window constant.
pub const MAX_HISTORY_MESSAGES: usize = 10;
