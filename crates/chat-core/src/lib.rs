//! Conversation session management for the assistant chat client.
//!
//! Platform-free: all I/O goes through the traits in [`ports`].

pub mod ports;
pub mod event_bus;
pub mod transcript;
pub mod session;
pub mod assistants;
