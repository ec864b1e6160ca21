//! Helpers shared by the tool definitions.

use schemars::JsonSchema;
use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::domains::tools::error::{ToolError, ToolResult};

/// Decode the request body into a tool's parameter struct.
///
/// Bodies arrive either as a JSON object or as a string holding the JSON
/// text of one; both are accepted. `null` is treated as an empty object so
/// parameter structs with defaults work without a body.
pub fn parse_params<T: DeserializeOwned>(input: &Value) -> ToolResult<T> {
    match input {
        Value::Null => serde_json::from_value(Value::Object(Default::default()))
            .map_err(|e| ToolError::invalid_arguments(format!("Invalid request format: {e}"))),
        Value::String(text) => {
            if text.trim().is_empty() {
                return Err(ToolError::invalid_arguments(
                    "Invalid request. Input is empty.",
                ));
            }
            serde_json::from_str(text)
                .map_err(|e| ToolError::invalid_arguments(format!("Invalid request format: {e}")))
        }
        other => serde_json::from_value(other.clone())
            .map_err(|e| ToolError::invalid_arguments(format!("Invalid request format: {e}"))),
    }
}

/// JSON Schema of a parameter struct.
pub fn schema_of<T: JsonSchema>() -> Value {
    schemars::schema_for!(T).to_value()
}

/// Accept a number, a numeric string or nothing.
///
/// Browser forms post numeric fields as strings, so numeric parameters are
/// read through this. `NaN` and infinities count as absent.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

/// Parse a `#RGB` or `#RRGGBB` color into its components.
pub fn parse_hex_color(color: &str) -> ToolResult<[u8; 3]> {
    let hex = color.trim().trim_start_matches('#');
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => {
            return Err(ToolError::invalid_arguments(format!(
                "Invalid color format: {color}"
            )));
        }
    };

    let bytes = hex::decode(&expanded)
        .map_err(|_| ToolError::invalid_arguments(format!("Invalid color format: {color}")))?;
    Ok([bytes[0], bytes[1], bytes[2]])
}
