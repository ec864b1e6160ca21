//! Text statistics tool definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::domains::tools::definitions::common::{parse_params, schema_of};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::tool::Tool;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for text statistics.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TextStatisticsParams {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct TextStatistics {
    pub characters: usize,
    pub words: usize,
    pub lines: usize,
    pub bytes: usize,
}

impl TextStatistics {
    pub fn of(text: &str) -> Self {
        Self {
            characters: text.chars().count(),
            words: text.split_whitespace().count(),
            lines: text.split('\n').count(),
            bytes: text.len(),
        }
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Counts characters, words, lines and UTF-8 bytes.
pub struct TextStatisticsTool;

impl TextStatisticsTool {
    pub const NAME: &'static str = "Text Statistics";
    pub const CATEGORY: &'static str = "Text";
    pub const DESCRIPTION: &'static str =
        "Calculate character count, word count, byte size, and line count of input text.";
}

impl Tool for TextStatisticsTool {
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
        schema_of::<TextStatisticsParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: TextStatisticsParams = parse_params(input)?;
        Ok(serde_json::to_value(TextStatistics::of(&params.text))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_counts() {
        assert_eq!(
            TextStatistics::of("héllo world\r\nsecond line\n"),
            TextStatistics {
                characters: 25,
                words: 4,
                lines: 3,
                bytes: 26,
            }
        );
    }

    #[test]
    fn test_empty_text() {
        let result = TextStatisticsTool.execute(&json!({ "text": "" })).unwrap();
        assert_eq!(
            result,
            json!({ "characters": 0, "words": 0, "lines": 1, "bytes": 0 })
        );
    }
}
