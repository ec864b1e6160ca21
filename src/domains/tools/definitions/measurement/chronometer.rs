//! Chronometer tool definition.
//!
//! Timing happens in the browser; the server formats elapsed durations.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::domains::tools::definitions::common::{lenient_f64, parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the chronometer.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChronometerParams {
    /// Elapsed time in milliseconds.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub elapsed_ms: Option<f64>,
}

/// `HH:MM:SS.mmm`; hours grow past two digits when needed.
pub fn format_elapsed(elapsed_ms: u64) -> String {
    let millis = elapsed_ms % 1000;
    let total_seconds = elapsed_ms / 1000;
    format!(
        "{:02}:{:02}:{:02}.{millis:03}",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Formats the duration measured by the chronometer page.
pub struct ChronometerTool;

impl ChronometerTool {
    pub const NAME: &'static str = "Chronometer";
    pub const CATEGORY: &'static str = "Measurement";
    pub const DESCRIPTION: &'static str = "Monitor the duration of a thing. Basically a chronometer with simple chronometer features.";
}

impl Tool for ChronometerTool {
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
        schema_of::<ChronometerParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: ChronometerParams = parse_params(input)?;
        let elapsed = params
            .elapsed_ms
            .filter(|ms| ms.is_finite() && *ms >= 0.0)
            .ok_or_else(|| ToolError::invalid_arguments("elapsedMs must be a non-negative number"))?;
        Ok(json!(format_elapsed(elapsed as u64)))
    }
}
