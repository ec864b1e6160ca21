//! ETA calculator tool definition.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::domains::tools::definitions::common::{lenient_f64, parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

const START_TIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

fn default_unit() -> String {
    "seconds".to_string()
}

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the ETA calculator.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct EtaParams {
    /// Units to process in total.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_amount: Option<f64>,

    /// When processing started; defaults to now (UTC).
    #[serde(default)]
    pub start_time: Option<String>,

    /// Units processed per time span.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub units_consumed: Option<f64>,

    /// Length of the time span.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub time_span_value: Option<f64>,

    /// `milliseconds`, `seconds`, `minutes` or `hours`.
    #[serde(default = "default_unit")]
    pub time_span_unit: String,
}

fn unit_millis(unit: &str) -> f64 {
    match unit {
        "milliseconds" => 1.0,
        "minutes" => 60_000.0,
        "hours" => 3_600_000.0,
        _ => 1_000.0,
    }
}

fn parse_start_time(text: &str) -> ToolResult<NaiveDateTime> {
    let text = text.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(text) {
        return Ok(with_offset.naive_local());
    }
    START_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .ok_or_else(|| ToolError::invalid_arguments(format!("Invalid start time: {text}")))
}

/// `"{hours}h {minutes}m {seconds}s"`, hours not wrapped at a day.
fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.num_seconds();
    format!(
        "{}h {}m {}s",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Estimates how long a job takes from its consumption rate.
pub struct EtaCalculatorTool;

impl EtaCalculatorTool {
    pub const NAME: &'static str = "ETA Calculator";
    pub const CATEGORY: &'static str = "Math";
    pub const DESCRIPTION: &'static str =
        "Estimate total time and end time based on consumption rate.";
}

impl Tool for EtaCalculatorTool {
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
        schema_of::<EtaParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: EtaParams = parse_params(input)?;
        let total = params.total_amount.unwrap_or(0.0);
        let span = params.time_span_value.unwrap_or(0.0);
        let consumed = params
            .units_consumed
            .filter(|u| *u > 0.0)
            .ok_or_else(|| ToolError::invalid_arguments("Units consumed must be greater than 0"))?;
        if total < 0.0 || span < 0.0 {
            return Err(ToolError::invalid_arguments(
                "Amounts and time span must not be negative",
            ));
        }

        let total_ms = unit_millis(&params.time_span_unit) * span / consumed * total;
        if !total_ms.is_finite() || total_ms > i64::MAX as f64 {
            return Err(ToolError::invalid_arguments("Estimated duration is too large"));
        }
        let duration = Duration::try_milliseconds(total_ms as i64)
            .ok_or_else(|| ToolError::invalid_arguments("Estimated duration is too large"))?;

        let start = match params.start_time.as_deref() {
            Some(text) if !text.trim().is_empty() => parse_start_time(text)?,
            _ => Utc::now().naive_utc(),
        };
        let end = start
            .checked_add_signed(duration)
            .ok_or_else(|| ToolError::invalid_arguments("Estimated end time is out of range"))?;

        Ok(json!({
            "totalDuration": format_duration(duration),
            "itWillEnd": end.format("%d/%m/%Y %H:%M:%S").to_string(),
        }))
    }
}
