//! Plugin file formats, told apart by extension.

use std::path::Path;

/// File extension of plugin manifests.
pub const MANIFEST_EXTENSION: &str = "toml";

/// File extension of WebAssembly plugins.
pub const WASM_EXTENSION: &str = "wasm";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluginFormat {
    /// TOML manifest naming built-in tool kinds.
    Manifest,
    /// Sandboxed WebAssembly module providing one tool.
    Wasm,
}

impl PluginFormat {
    /// Format of the file at `path`, `None` for anything else.
    pub fn of(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case(MANIFEST_EXTENSION) {
            Some(Self::Manifest)
        } else if ext.eq_ignore_ascii_case(WASM_EXTENSION) {
            Some(Self::Wasm)
        } else {
            None
        }
    }
}

/// Whether `path` names a plugin file of any format.
pub fn is_plugin_path(path: &Path) -> bool {
    PluginFormat::of(path).is_some()
}
