//! Plugins domain module.
//!
//! A plugin is a file in the plugin directory: either a manifest naming the
//! built-in tool kinds it provides, or a WebAssembly module implementing a
//! tool of its own. Loading a plugin instantiates its tools; unloading stops
//! them and removes them from routing.
//!
//! ## Architecture
//!
//! - `format.rs` - Telling plugin files apart
//! - `manifest.rs` - Manifest format
//! - `wasm.rs` - Sandboxed WebAssembly tools
//! - `loader.rs` - Per-file state machine and the slug index
//! - `store.rs` - Plugin files on disk
//! - `watcher.rs` - Unloads plugins whose files are deleted

mod error;
mod format;
pub mod loader;
pub mod manifest;
mod store;
pub(crate) mod wasm;
mod watcher;

pub use error::{PluginError, PluginResult};
pub use loader::{LoadedPlugin, PluginLoader, PluginState};
pub use manifest::PluginManifest;
pub use store::PluginStore;
pub use wasm::WasmLimits;
pub use watcher::{PluginEvent, PluginWatcher};
