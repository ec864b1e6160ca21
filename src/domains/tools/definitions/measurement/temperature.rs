//! Temperature converter tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::domains::tools::definitions::common::{lenient_f64, parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

/// A temperature scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Kelvin,
    Celsius,
    Fahrenheit,
    Rankine,
    Delisle,
    Newton,
    Reaumur,
    Romer,
}

impl Scale {
    pub const ALL: [Scale; 8] = [
        Scale::Kelvin,
        Scale::Celsius,
        Scale::Fahrenheit,
        Scale::Rankine,
        Scale::Delisle,
        Scale::Newton,
        Scale::Reaumur,
        Scale::Romer,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Scale::Kelvin => "K",
            Scale::Celsius => "C",
            Scale::Fahrenheit => "F",
            Scale::Rankine => "R",
            Scale::Delisle => "De",
            Scale::Newton => "N",
            Scale::Reaumur => "Re",
            Scale::Romer => "Ro",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|scale| scale.symbol().eq_ignore_ascii_case(symbol.trim()))
    }

    pub fn to_kelvin(self, value: f64) -> f64 {
        match self {
            Scale::Kelvin => value,
            Scale::Celsius => value + 273.15,
            Scale::Fahrenheit => (value + 459.67) * 5.0 / 9.0,
            Scale::Rankine => value * 5.0 / 9.0,
            Scale::Delisle => 373.15 - value * 2.0 / 3.0,
            Scale::Newton => value * 100.0 / 33.0 + 273.15,
            Scale::Reaumur => value * 5.0 / 4.0 + 273.15,
            Scale::Romer => (value - 7.5) * 40.0 / 21.0 + 273.15,
        }
    }

    pub fn from_kelvin(self, kelvin: f64) -> f64 {
        let celsius = kelvin - 273.15;
        match self {
            Scale::Kelvin => kelvin,
            Scale::Celsius => celsius,
            Scale::Fahrenheit => kelvin * 9.0 / 5.0 - 459.67,
            Scale::Rankine => kelvin * 9.0 / 5.0,
            Scale::Delisle => (373.15 - kelvin) * 3.0 / 2.0,
            Scale::Newton => celsius * 33.0 / 100.0,
            Scale::Reaumur => celsius * 4.0 / 5.0,
            Scale::Romer => celsius * 21.0 / 40.0 + 7.5,
        }
    }
}

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the temperature converter.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct TemperatureParams {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub value: Option<f64>,

    /// One of `K`, `C`, `F`, `R`, `De`, `N`, `Re`, `Ro`.
    #[serde(default)]
    pub unit: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Converts a temperature into every supported scale.
pub struct TemperatureConverterTool;

impl TemperatureConverterTool {
    pub const NAME: &'static str = "Temperature Converter";
    pub const CATEGORY: &'static str = "Measurement";
    pub const DESCRIPTION: &'static str = "Convert between Kelvin, Celsius, Fahrenheit, Rankine, Delisle, Newton, Réaumur, and Rømer.";
}

impl Tool for TemperatureConverterTool {
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
        schema_of::<TemperatureParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: TemperatureParams = parse_params(input)?;
        let value = params
            .value
            .ok_or_else(|| ToolError::invalid_arguments("A numeric value is required"))?;
        let scale = Scale::from_symbol(&params.unit)
            .ok_or_else(|| ToolError::invalid_arguments(format!("Unknown unit: {}", params.unit)))?;

        let kelvin = scale.to_kelvin(value);
        let converted: Map<String, Value> = Scale::ALL
            .into_iter()
            .map(|s| (s.symbol().to_string(), Value::from(s.from_kelvin(kelvin))))
            .collect();
        Ok(Value::Object(converted))
    }
}
