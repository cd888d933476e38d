//! Browser platform adapters for the chat client.
//!
//! [`http::HttpBackend`] implements the chat-core ports against the REST API
//! using `fetch()` through gloo-net.

pub mod http;

pub use http::HttpBackend;
