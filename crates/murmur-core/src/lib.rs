//! # murmur-core
//!
//! Foundation types for the murmur conversational backend.
//!
//! This crate provides the shared vocabulary that all other murmur crates
//! depend on:
//!
//! - **Branded IDs**: [`ids::SessionId`] as a newtype over an opaque string
//! - **Message kinds**: [`messages::MessageKind`] tagging each stored turn
//! - **Row types**: [`messages::SessionRecord`] and [`messages::MessageRecord`]
//! - **Constants**: [`constants::DEFAULT_SESSION_TITLE`] and friends
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other murmur crates.

#![deny(unsafe_code)]

pub mod constants;
pub mod ids;
pub mod messages;
pub mod time;
