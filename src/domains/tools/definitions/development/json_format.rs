//! JSON minify and prettify tool definitions.

use serde_json::{Value, json};
use tracing::instrument;

use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

/// The JSON document carried by a request.
///
/// A string body is parsed as JSON text; any other body is the document.
fn document(input: &Value) -> ToolResult<Value> {
    match input {
        Value::Null => Err(ToolError::invalid_arguments("Invalid or empty JSON input.")),
        Value::String(text) if text.trim().is_empty() => {
            Err(ToolError::invalid_arguments("Invalid or empty JSON input."))
        }
        Value::String(text) => serde_json::from_str(text)
            .map_err(|_| ToolError::invalid_arguments("Invalid JSON format.")),
        other => Ok(other.clone()),
    }
}

fn json_schema() -> Value {
    json!({
        "description": "A JSON document, or a string holding JSON text"
    })
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Strips insignificant whitespace from JSON.
pub struct JsonMinifyTool;

impl JsonMinifyTool {
    pub const NAME: &'static str = "JSON Minify";
    pub const CATEGORY: &'static str = "Development";
    pub const DESCRIPTION: &'static str =
        "Minify your JSON string into a compact format without unnecessary whitespaces.";
}

impl Tool for JsonMinifyTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn category(&self) -> &str {
        Self::CATEGORY
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn input_schema(&self) -> Value {
        json_schema()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let document = document(input)?;
        Ok(json!(serde_json::to_string(&document)?))
    }
}

/// Indents JSON for reading.
pub struct JsonPrettifyTool;

impl JsonPrettifyTool {
    pub const NAME: &'static str = "JSON Prettify";
    pub const CATEGORY: &'static str = "Development";
    pub const DESCRIPTION: &'static str =
        "Prettify your JSON string into a friendly, human-readable format.";
}

impl Tool for JsonPrettifyTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn category(&self) -> &str {
        Self::CATEGORY
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    fn input_schema(&self) -> Value {
        json_schema()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let document = document(input)?;
        Ok(json!(serde_json::to_string_pretty(&document)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_text() {
        let result = JsonMinifyTool
            .execute(&json!("{ \"a\" : [1, 2,\n 3] }"))
            .unwrap();
        assert_eq!(result, json!(r#"{"a":[1,2,3]}"#));
    }

    #[test]
    fn test_prettify_document() {
        let result = JsonPrettifyTool.execute(&json!({ "a": { "b": 1 } })).unwrap();
        assert_eq!(result, json!("{\n  \"a\": {\n    \"b\": 1\n  }\n}"));
    }

    #[test]
    fn test_invalid_json() {
        assert_eq!(
            JsonMinifyTool.execute(&json!("{ nope")).unwrap_err().message(),
            "Invalid JSON format."
        );
        assert_eq!(
            JsonPrettifyTool.execute(&Value::Null).unwrap_err().message(),
            "Invalid or empty JSON input."
        );
    }
}
