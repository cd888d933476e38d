//! REST adapter.
//!
//! `transport` owns the request/response cycle (timeouts, status mapping);
//! `backend` maps port operations onto endpoints.

pub mod backend;
pub mod paths;
pub mod transport;

pub use backend::HttpBackend;
pub use transport::{Method, Transport};
