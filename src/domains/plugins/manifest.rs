//! Plugin manifest format.
//!
//! A plugin is a TOML file naming the tool kinds it provides:
//!
//! ```toml
//! [plugin]
//! name = "networking"
//! version = "1.0.0"
//!
//! [[tools]]
//! kind = "ipv4-address-converter"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{PluginError, PluginResult};

/// Parsed plugin manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginManifest {
    pub plugin: PluginMeta,

    #[serde(default)]
    pub tools: Vec<ToolEntry>,
}

/// The `[plugin]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginMeta {
    pub name: String,

    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// One `[[tools]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolEntry {
    pub kind: String,
}

fn default_version() -> String {
    "0.0.0".to_string()
}

impl PluginManifest {
    /// Parse manifest bytes read from `path`.
    pub fn parse(bytes: &[u8], path: &Path) -> PluginResult<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| PluginError::invalid_manifest(path, e.to_string()))?;
        let manifest: Self =
            toml::from_str(text).map_err(|e| PluginError::invalid_manifest(path, e.message()))?;

        if manifest.plugin.name.trim().is_empty() {
            return Err(PluginError::invalid_manifest(path, "plugin name is empty"));
        }

        Ok(manifest)
    }

    /// Tool kinds in declaration order, without duplicates.
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = Vec::with_capacity(self.tools.len());
        for entry in &self.tools {
            let kind = entry.kind.trim();
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }
}
