//! Numeronym generator tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::domains::tools::definitions::common::{parse_params, schema_of};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::tool::Tool;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the numeronym generator.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct NumeronymParams {
    /// Comma-separated words.
    #[serde(default)]
    pub text: String,
}

/// `international` becomes `i18n`; words of three characters or fewer are kept.
pub fn numeronym(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    match chars.as_slice() {
        [first, middle @ .., last] if chars.len() > 3 => {
            format!("{first}{}{last}", middle.len())
        }
        _ => word.to_string(),
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Abbreviates words as numeronyms.
pub struct NumeronymGeneratorTool;

impl NumeronymGeneratorTool {
    pub const NAME: &'static str = "Numeronym Generator";
    pub const CATEGORY: &'static str = "Text";
    pub const DESCRIPTION: &'static str =
        "Convert words into numeronyms (e.g., international → i18n).";
}

impl Tool for NumeronymGeneratorTool {
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
        schema_of::<NumeronymParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: NumeronymParams = parse_params(input)?;
        let result = params
            .text
            .split(',')
            .map(str::trim)
            .filter(|word| !word.is_empty())
            .map(numeronym)
            .collect::<Vec<_>>()
            .join(", ");
        Ok(json!(result))
    }
}
