//! Plugin files on disk.
//!
//! Every path handed out here has passed `resolve_plugin_path`, so client
//! supplied names never escape the plugin directory.

use std::path::{Path, PathBuf};

use tracing::info;

use super::error::{PluginError, PluginResult};
use super::format::is_plugin_path;
use crate::core::security::resolve_plugin_path;

/// The plugin directory.
#[derive(Debug, Clone)]
pub struct PluginStore {
    dir: PathBuf,
    allow_symlinks: bool,
}

impl PluginStore {
    pub fn new(dir: impl Into<PathBuf>, allow_symlinks: bool) -> Self {
        Self {
            dir: dir.into(),
            allow_symlinks,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the plugin directory if needed.
    pub fn ensure_dir(&self) -> PluginResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| PluginError::io(&self.dir, e))
    }

    /// Resolve a plugin file name to its path in the directory.
    pub fn resolve(&self, file_name: &str) -> PluginResult<PathBuf> {
        let path = resolve_plugin_path(&self.dir, file_name, self.allow_symlinks)?;
        if !is_plugin_path(&path) {
            return Err(PluginError::UnsupportedExtension(path));
        }
        Ok(path)
    }

    /// Write a new plugin file. Existing files are never overwritten.
    pub async fn write(&self, file_name: &str, bytes: &[u8]) -> PluginResult<PathBuf> {
        let path = self.resolve(file_name)?;
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(PluginError::FileExists(path));
        }

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| PluginError::io(&path, e))?;
        info!("Saved plugin file {}", path.display());
        Ok(path)
    }

    /// Delete a plugin file. Returns false when it did not exist.
    pub async fn remove(&self, file_name: &str) -> PluginResult<bool> {
        let path = self.resolve(file_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!("Deleted plugin file {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(PluginError::io(&path, e)),
        }
    }
}
