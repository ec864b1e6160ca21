//! URL encoder/decoder tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::domains::tools::definitions::common::{parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

fn default_action() -> String {
    "encode".to_string()
}

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the URL encoder/decoder.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UrlCodecParams {
    /// Text to transform.
    #[serde(default)]
    pub text: String,

    /// `encode` or `decode`.
    #[serde(default = "default_action")]
    pub action: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Form-style URL encoding and decoding (spaces as `+`).
pub struct UrlEncoderDecoderTool;

impl UrlEncoderDecoderTool {
    pub const NAME: &'static str = "URL Encoder Decoder";
    pub const CATEGORY: &'static str = "Web";
    pub const DESCRIPTION: &'static str = "Encode or decode URLs and URL components";

    pub fn encode(text: &str) -> String {
        urlencoding::encode(text).replace("%20", "+")
    }

    pub fn decode(text: &str) -> ToolResult<String> {
        urlencoding::decode(&text.replace('+', " "))
            .map(|decoded| decoded.into_owned())
            .map_err(|e| ToolError::execution_failed(format!("Failed to decode: {e}")))
    }
}

impl Tool for UrlEncoderDecoderTool {
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
        schema_of::<UrlCodecParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: UrlCodecParams = parse_params(input)?;
        if params.text.is_empty() {
            return Ok(json!(""));
        }

        match params.action.to_lowercase().as_str() {
            "encode" => Ok(json!(Self::encode(&params.text))),
            "decode" => Ok(json!(Self::decode(&params.text)?)),
            _ => Err(ToolError::invalid_arguments(
                "Invalid action. Use 'encode' or 'decode'.",
            )),
        }
    }
}
