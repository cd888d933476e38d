//! egui front end for the chat client.
//!
//! Panels render from a [`chat_core::session::SessionSnapshot`] plus the
//! local [`state::UiState`], and report user intent as [`state::UiAction`]s
//! for the application to dispatch.

pub mod panels;
pub mod state;
pub mod theme;
