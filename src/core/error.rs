//! Crate-level error type.
//!
//! Every domain keeps its own error enum. `Error` folds them together for
//! the server lifecycle and `main`. Tool execution failures are not part of
//! it: they travel inside the response envelope instead.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Plugin error: {0}")]
    Plugin(#[from] crate::domains::plugins::PluginError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] crate::domains::catalog::CatalogError),

    /// A client-supplied plugin file name was rejected.
    #[error("Path security error: {0}")]
    PathSecurity(#[from] super::security::PathSecurityError),

    #[error("Transport error: {0}")]
    Transport(#[from] super::transport::TransportError),
}
