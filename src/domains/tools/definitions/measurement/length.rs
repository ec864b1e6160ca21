//! Length unit converter tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::domains::tools::definitions::common::{lenient_f64, parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

/// Supported units and their length in meters.
const UNITS: [(&str, f64); 8] = [
    ("mm", 0.001),
    ("cm", 0.01),
    ("m", 1.0),
    ("km", 1000.0),
    ("in", 0.0254),
    ("ft", 0.3048),
    ("yd", 0.9144),
    ("mi", 1609.344),
];

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the length converter.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct LengthParams {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value: Option<f64>,

    /// One of `mm`, `cm`, `m`, `km`, `in`, `ft`, `yd`, `mi`.
    #[serde(default)]
    pub unit: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Converts a length into every supported unit.
pub struct LengthUnitConverterTool;

impl LengthUnitConverterTool {
    pub const NAME: &'static str = "Length Unit Converter";
    pub const CATEGORY: &'static str = "Measurement";
    pub const DESCRIPTION: &'static str = "Convert length units: mm, cm, m, km, in, ft, yd, mi.";
}

impl Tool for LengthUnitConverterTool {
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
        schema_of::<LengthParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: LengthParams = parse_params(input)?;
        let value = params
            .value
            .ok_or_else(|| ToolError::invalid_arguments("A numeric value is required"))?;
        let unit = params.unit.trim().to_lowercase();
        let (_, meters_per_unit) = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .ok_or_else(|| ToolError::invalid_arguments(format!("Unknown unit: {}", params.unit)))?;

        let meters = value * meters_per_unit;
        let converted: Map<String, Value> = UNITS
            .iter()
            .map(|(name, factor)| (name.to_string(), Value::from(meters / factor)))
            .collect();
        Ok(Value::Object(converted))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn close(value: &Value, expected: f64) -> bool {
        (value.as_f64().unwrap() - expected).abs() < 1e-9
    }

    #[test]
    fn test_converts_to_every_unit() {
        let result = LengthUnitConverterTool
            .execute(&json!({ "value": 1, "unit": "mi" }))
            .unwrap();
        assert!(close(&result["m"], 1609.344));
        assert!(close(&result["km"], 1.609344));
        assert!(close(&result["ft"], 5280.0));
        assert!(close(&result["yd"], 1760.0));
        assert!(close(&result["in"], 63360.0));
        assert_eq!(result.as_object().unwrap().len(), 8);
    }

    #[test]
    fn test_unknown_unit() {
        assert!(
            LengthUnitConverterTool
                .execute(&json!({ "value": 1, "unit": "league" }))
                .is_err()
        );
    }
}
