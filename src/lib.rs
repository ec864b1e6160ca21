//! IT Tools Server Library
//!
//! A catalogue of small IT tools (converters, hashers, encoders,
//! generators) served over HTTP. Tools arrive through plugin manifests that
//! can be uploaded and removed while the server runs.
//!
//! # Architecture
//!
//! The server is organized into the following modules:
//!
//! - **core**: Configuration, error handling, path security, the server and the HTTP transport
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: The `Tool` trait and the built-in tools
//!   - **plugins**: Plugin manifests, the loader and the directory watcher
//!   - **catalog**: Tool records, users and favourites (SQLite)
//!   - **access**: Premium gating
//!
//! # Example
//!
//! ```rust,no_run
//! use ittools_server::core::{Config, HttpTransport, ToolServer};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = ToolServer::new(config.clone()).await?;
//!     server.start().await?;
//!     HttpTransport::new(config.http).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, Result, ToolServer};
