//! Listener failures.

use thiserror::Error;

pub type TransportResult<T> = Result<T, TransportError>;

/// Errors raised while starting or running the HTTP listener.
///
/// Failures inside a request never surface here; handlers turn them into
/// responses.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Cannot listen on {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP server stopped unexpectedly: {0}")]
    Serve(#[source] std::io::Error),
}

impl TransportError {
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }
}
