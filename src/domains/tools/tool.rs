//! The tool capability and its uniform result envelope.
//!
//! Every tool, built in or loaded from a plugin, is a `Tool` trait object.
//! Tools return `ToolResult<Value>`; the HTTP layer wraps that once into a
//! `ToolOutput` so clients always see the same `{success, result | error}`
//! shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{ToolError, ToolResult};
use super::slug::slugify;
use super::ui::render_tool_page;

/// A self-contained request/response transform with metadata and a UI.
///
/// `execute` must be synchronous and free of I/O: it runs inline on the
/// request task.
pub trait Tool: Send + Sync {
    /// Display name; its slug is the tool's route.
    fn name(&self) -> &str;

    /// Category used to group tools in listings.
    fn category(&self) -> &str;

    /// One-line description shown to clients.
    fn description(&self) -> &str;

    /// JSON Schema of the accepted input.
    fn input_schema(&self) -> Value {
        serde_json::json!({ "type": "object" })
    }

    /// Run the tool against the JSON request body.
    fn execute(&self, input: &Value) -> ToolResult<Value>;

    /// HTML page served at the tool's route.
    fn ui(&self) -> String {
        render_tool_page(self.name(), self.description(), &self.slug())
    }

    /// Lifecycle hook called before the tool is unloaded.
    fn stop(&self) {}

    /// URL slug derived from the name.
    fn slug(&self) -> String {
        slugify(self.name())
    }
}

/// Serializable tool metadata for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInfo {
    pub name: String,
    pub slug: String,
    pub category: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolInfo {
    /// Capture the metadata of a tool.
    pub fn of(tool: &dyn Tool) -> Self {
        Self {
            name: tool.name().to_string(),
            slug: tool.slug(),
            category: tool.category().to_string(),
            description: tool.description().to_string(),
            input_schema: tool.input_schema(),
        }
    }
}

/// `{ "success": true, "result": ... }` or `{ "success": false, "error": "..." }`.
///
/// Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolOutput {
    pub fn success(result: Value) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.into()),
        }
    }

    pub fn from_result(result: ToolResult<Value>) -> Self {
        match result {
            Ok(value) => Self::success(value),
            Err(e) => Self::failure(e.message()),
        }
    }
}

impl From<ToolError> for ToolOutput {
    fn from(err: ToolError) -> Self {
        Self::failure(err.message())
    }
}
