//! Stateless repositories — every method takes `&Connection`.

pub mod message;
pub mod session;

pub use message::MessageRepo;
pub use session::SessionRepo;
