//! Integer base converter tool definition.
//!
//! Bases run from 2 to 64 over the alphabet `0-9A-Za-z+/`. Up to base 36
//! letters are case-insensitive, matching the usual hexadecimal notation.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::domains::tools::definitions::common::{parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

const DIGITS: &[u8; 64] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz+/";

fn default_from_base() -> u32 {
    10
}

fn default_to_base() -> u32 {
    2
}

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the base converter.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntegerBaseParams {
    /// Digits of the number in `fromBase`, optionally signed.
    #[serde(default)]
    pub input_value: String,

    #[serde(default = "default_from_base")]
    pub from_base: u32,

    #[serde(default = "default_to_base")]
    pub to_base: u32,

    /// Return the common bases plus `toBase` instead of a single value.
    #[serde(default)]
    pub convert_to_all_bases: bool,
}

fn digit_value(c: char, base: u32) -> Option<u32> {
    let c = if base <= 36 { c.to_ascii_uppercase() } else { c };
    let value = DIGITS.iter().position(|d| *d as char == c)? as u32;
    (value < base).then_some(value)
}

/// Parse `text` as a signed integer in `base`.
pub fn parse_in_base(text: &str, base: u32) -> ToolResult<i128> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').filter(|_| base < 63).unwrap_or(text)),
    };
    if digits.is_empty() {
        return Err(ToolError::invalid_arguments(
            "Input value contains invalid characters for the selected base",
        ));
    }

    let mut value: i128 = 0;
    for c in digits.chars() {
        let digit = digit_value(c, base).ok_or_else(|| {
            ToolError::invalid_arguments(
                "Input value contains invalid characters for the selected base",
            )
        })?;
        value = value
            .checked_mul(i128::from(base))
            .and_then(|v| v.checked_add(i128::from(digit)))
            .ok_or_else(|| ToolError::invalid_arguments("Input value is too large to convert"))?;
    }
    Ok(if negative { -value } else { value })
}

/// Render `value` in `base`.
pub fn format_in_base(value: i128, base: u32) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut magnitude = value.unsigned_abs();
    let base = u128::from(base);
    let mut digits = Vec::new();
    while magnitude > 0 {
        digits.push(DIGITS[(magnitude % base) as usize]);
        magnitude /= base;
    }
    if value < 0 {
        digits.push(b'-');
    }
    digits.iter().rev().map(|d| *d as char).collect()
}

fn check_base(base: u32, which: &str) -> ToolResult<()> {
    if (2..=64).contains(&base) {
        Ok(())
    } else {
        Err(ToolError::invalid_arguments(format!(
            "{which} base must be between 2 and 64"
        )))
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Converts integers between positional bases.
pub struct IntegerBaseConverterTool;

impl IntegerBaseConverterTool {
    pub const NAME: &'static str = "Integer Base Converter";
    pub const CATEGORY: &'static str = "Converter";
    pub const DESCRIPTION: &'static str =
        "Convert integers between different bases (binary, decimal, hexadecimal)";
}

impl Tool for IntegerBaseConverterTool {
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
        schema_of::<IntegerBaseParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: IntegerBaseParams = parse_params(input)?;
        if params.input_value.trim().is_empty() {
            return Err(ToolError::invalid_arguments("Input value cannot be empty"));
        }
        check_base(params.from_base, "Source")?;
        let value = parse_in_base(&params.input_value, params.from_base)?;

        if !params.convert_to_all_bases {
            check_base(params.to_base, "Target")?;
            return Ok(json!({ "convertedValue": format_in_base(value, params.to_base) }));
        }

        let decimal = value.to_string();
        let mut all = BTreeMap::from([
            ("binary", format_in_base(value, 2)),
            ("octal", format_in_base(value, 8)),
            ("hex", format_in_base(value, 16)),
            ("base64", STANDARD.encode(decimal.as_bytes())),
        ]);
        all.insert("decimal", decimal);
        if (2..=64).contains(&params.to_base) {
            all.insert("custom", format_in_base(value, params.to_base));
        }
        Ok(json!({ "allConversions": all }))
    }
}
