//! Transport layer for the tools server.
//!
//! The server is reached over HTTP. `routes` holds the handlers, `api` the
//! error responses and session guards they share, and `http` the listener
//! with its middleware stack.

pub mod api;
mod config;
mod error;
pub mod http;
pub mod routes;

pub use config::HttpConfig;
pub use error::{TransportError, TransportResult};
pub use http::HttpTransport;
