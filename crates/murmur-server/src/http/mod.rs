//! REST route handlers.

pub mod conversation;
pub mod health;
