//! Plugin-specific error types.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors that can occur while loading or unloading plugins.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The plugin file does not exist.
    #[error("Plugin file not found: {0}")]
    NotFound(PathBuf),

    /// The file is neither a manifest nor a WebAssembly module.
    #[error("Unsupported plugin file '{0}': expected a .toml manifest or a .wasm module")]
    UnsupportedExtension(PathBuf),

    /// The path is already tracked by the loader.
    #[error("Plugin already loaded: {0}")]
    AlreadyLoaded(PathBuf),

    /// The manifest could not be parsed.
    #[error("Invalid plugin manifest '{path}': {message}")]
    InvalidManifest { path: PathBuf, message: String },

    /// The WebAssembly module failed to compile, lacks a required export or
    /// returned unusable metadata.
    #[error("Invalid WebAssembly plugin '{path}': {message}")]
    InvalidModule { path: PathBuf, message: String },

    /// The WebAssembly engine could not be created.
    #[error("WebAssembly runtime error: {0}")]
    Runtime(String),

    /// The manifest names no tool kind known to the server.
    #[error("No tool found in plugin: {0}")]
    NoTools(PathBuf),

    /// Another plugin already provides a tool with the same slug.
    #[error("Tool '{slug}' is already provided by {owner}")]
    DuplicateTool { slug: String, owner: PathBuf },

    /// The plugin file already exists on disk.
    #[error("Plugin file already exists: {0}")]
    FileExists(PathBuf),

    /// A plugin file name failed validation.
    #[error(transparent)]
    Path(#[from] crate::core::security::PathSecurityError),

    /// An I/O error occurred while reading or writing a plugin file.
    #[error("I/O error for plugin '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The directory watcher could not be started.
    #[error("Watcher error: {0}")]
    Watch(#[from] notify::Error),
}

impl PluginError {
    /// Create an I/O error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an "invalid manifest" error.
    pub fn invalid_manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an "invalid module" error.
    pub fn invalid_module(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidModule {
            path: path.into(),
            message: message.into(),
        }
    }
}
