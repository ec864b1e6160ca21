//! Tools domain module.
//!
//! Tools are small, stateless request/response transforms. Each one is a
//! [`Tool`] trait object that plugins bring into the server.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `registry.rs` - Catalogue of built-in tool kinds
//! - `tool.rs` - The `Tool` trait and the result envelope
//! - `slug.rs` - Route slugs derived from display names
//! - `ui.rs` - Generic tool page
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in the category directory under `definitions/`
//! 2. Define the params struct and implement `Tool`
//! 3. Export it in `definitions/mod.rs`
//! 4. Add its kind to `registry.rs`
//! 5. Name the kind in a plugin manifest

pub mod definitions;
mod error;
pub mod registry;
pub mod slug;
mod tool;
pub mod ui;

pub use error::{ToolError, ToolResult};
pub use slug::slugify;
pub use tool::{Tool, ToolInfo, ToolOutput};
