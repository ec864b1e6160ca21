//! JSON to CSV tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::instrument;

use crate::domains::tools::definitions::common::{parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the JSON converter.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct JsonToCsvParams {
    /// An array of objects, or JSON text holding one.
    #[serde(default)]
    pub json: Value,
}

/// Quote a field when it holds a separator, quote or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => escape_field(s),
        Some(other) => escape_field(&other.to_string()),
    }
}

/// Render objects as CSV. The header is the union of keys in first-seen order.
pub fn to_csv(records: &[Map<String, Value>]) -> String {
    let mut headers: Vec<&str> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !headers.contains(&key.as_str()) {
                headers.push(key);
            }
        }
    }

    let mut lines = vec![
        headers
            .iter()
            .map(|h| escape_field(h))
            .collect::<Vec<_>>()
            .join(","),
    ];
    for record in records {
        lines.push(
            headers
                .iter()
                .map(|h| cell(record.get(*h)))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Flattens an array of JSON objects into CSV.
pub struct JsonToCsvFormatterTool;

impl JsonToCsvFormatterTool {
    pub const NAME: &'static str = "JSON To CSV Formatter";
    pub const CATEGORY: &'static str = "Data";
    pub const DESCRIPTION: &'static str =
        "Convert your JSON data into a flat CSV format instantly.";
}

impl Tool for JsonToCsvFormatterTool {
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
        schema_of::<JsonToCsvParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: JsonToCsvParams = parse_params(input)?;
        let document = match params.json {
            Value::String(text) => serde_json::from_str(&text)
                .map_err(|_| ToolError::invalid_arguments("Invalid JSON format."))?,
            other => other,
        };

        let Value::Array(items) = document else {
            return Err(ToolError::invalid_arguments(
                "JSON must be an array of objects",
            ));
        };
        let records = items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                _ => Err(ToolError::invalid_arguments(
                    "JSON must be an array of objects",
                )),
            })
            .collect::<ToolResult<Vec<_>>>()?;
        if records.is_empty() {
            return Err(ToolError::invalid_arguments("JSON array is empty"));
        }

        Ok(json!(to_csv(&records)))
    }
}
