//! # murmur-transcription
//!
//! Transcription collaborator: converts raw audio bytes to text.
//!
//! The server talks to the [`Transcriber`] trait; the shipped implementation
//! is [`SidecarTranscriber`], a thin HTTP client for an external
//! speech-to-text sidecar service.
//!
//! ## Crate Position
//!
//! Standalone (no murmur crate dependencies). Depended on by: murmur-server.

#![deny(unsafe_code)]

pub mod sidecar;
pub mod types;

pub use sidecar::{SidecarConfig, SidecarTranscriber};
pub use types::{Transcriber, TranscriptionError, TranscriptionResult};
