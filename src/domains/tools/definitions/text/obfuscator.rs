//! String obfuscator tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::domains::tools::definitions::common::{parse_params, schema_of};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::tool::Tool;

fn default_keep() -> usize {
    4
}

fn default_true() -> bool {
    true
}

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the obfuscator.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObfuscatorParams {
    #[serde(default)]
    pub text: String,

    /// Characters left visible at the start.
    #[serde(default = "default_keep")]
    pub keep_first: usize,

    /// Characters left visible at the end.
    #[serde(default = "default_keep")]
    pub keep_last: usize,

    /// Leave spaces in the hidden part untouched.
    #[serde(default = "default_true")]
    pub keep_space: bool,
}

/// Mask the middle of `text` with `*`.
pub fn obfuscate(text: &str, keep_first: usize, keep_last: usize, keep_space: bool) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= keep_first.saturating_add(keep_last) {
        return text.to_string();
    }

    let hidden_end = chars.len() - keep_last;
    chars
        .iter()
        .enumerate()
        .map(|(i, c)| {
            if i < keep_first || i >= hidden_end || (keep_space && *c == ' ') {
                *c
            } else {
                '*'
            }
        })
        .collect()
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Hides the middle of a string.
pub struct StringObfuscatorTool;

impl StringObfuscatorTool {
    pub const NAME: &'static str = "String Obfuscator";
    pub const CATEGORY: &'static str = "Text";
    pub const DESCRIPTION: &'static str =
        "Hide parts of your string by replacing the middle section with asterisks.";
}

impl Tool for StringObfuscatorTool {
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
        schema_of::<ObfuscatorParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let p: ObfuscatorParams = parse_params(input)?;
        Ok(json!(obfuscate(&p.text, p.keep_first, p.keep_last, p.keep_space)))
    }
}
