//! Percentage calculator tool definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::domains::tools::definitions::common::{lenient_f64, parse_params, schema_of};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::tool::Tool;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the percentage calculator. Every field is optional;
/// each result is computed when its inputs are present.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct PercentageParams {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub x: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub y: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub from: Option<f64>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub to: Option<f64>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct PercentageResults {
    /// `x` percent of `y`.
    percent_of: Option<f64>,
    /// `x` as a percentage of `y`.
    what_percent: Option<f64>,
    /// Percentage change from `from` to `to`.
    change: Option<f64>,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Percentages of values and between values.
pub struct PercentageCalculatorTool;

impl PercentageCalculatorTool {
    pub const NAME: &'static str = "Percentage Calculator";
    pub const CATEGORY: &'static str = "Math";
    pub const DESCRIPTION: &'static str = "Calculate percentages from one value to another or from a percentage to a value.";
}

impl Tool for PercentageCalculatorTool {
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
        schema_of::<PercentageParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let p: PercentageParams = parse_params(input)?;
        let results = PercentageResults {
            percent_of: p.x.zip(p.y).map(|(x, y)| x * y / 100.0),
            what_percent: p
                .x
                .zip(p.y.filter(|y| *y != 0.0))
                .map(|(x, y)| x * 100.0 / y),
            change: p
                .from
                .filter(|f| *f != 0.0)
                .zip(p.to)
                .map(|(from, to)| (to - from) * 100.0 / from),
        };
        Ok(serde_json::to_value(results)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_results() {
        let result = PercentageCalculatorTool
            .execute(&json!({ "x": 20, "y": 50, "from": "40", "to": "50" }))
            .unwrap();
        assert_eq!(result["percentOf"], json!(10.0));
        assert_eq!(result["whatPercent"], json!(40.0));
        assert_eq!(result["change"], json!(25.0));
    }

    #[test]
    fn test_missing_inputs_and_zero_divisors() {
        let result = PercentageCalculatorTool
            .execute(&json!({ "x": 5, "y": 0, "from": 0, "to": 3 }))
            .unwrap();
        assert_eq!(result["percentOf"], json!(0.0));
        assert_eq!(result["whatPercent"], Value::Null);
        assert_eq!(result["change"], Value::Null);

        let result = PercentageCalculatorTool.execute(&json!({})).unwrap();
        assert_eq!(result["percentOf"], Value::Null);
    }
}
