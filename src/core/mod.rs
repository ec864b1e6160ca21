//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the tools
//! server, including error handling, configuration, path security, server
//! lifecycle management and the HTTP transport.

pub mod config;
pub mod error;
pub mod security;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use security::{resolve_plugin_path, PathSecurityError};
pub use server::{Resolution, ResolvedTool, ToolServer};
pub use transport::{HttpConfig, HttpTransport};
