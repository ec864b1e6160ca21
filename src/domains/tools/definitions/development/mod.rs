//! Development tools.

pub mod git_cheatsheet;
pub mod json_format;
pub mod xml_formatter;

pub use git_cheatsheet::GitCheatsheetTool;
pub use json_format::{JsonMinifyTool, JsonPrettifyTool};
pub use xml_formatter::XmlFormatterTool;
