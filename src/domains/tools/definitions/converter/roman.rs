//! Roman numeral converter tool definition.

use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::domains::tools::definitions::common::{parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

static ROMAN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^M*(C[MD]|D?C{0,3})(X[CL]|L?X{0,3})(I[XV]|V?I{0,3})$")
        .expect("invalid roman numeral regex")
});

const NUMERALS: [(&str, u32); 13] = [
    ("M", 1000),
    ("CM", 900),
    ("D", 500),
    ("CD", 400),
    ("C", 100),
    ("XC", 90),
    ("L", 50),
    ("XL", 40),
    ("X", 10),
    ("IX", 9),
    ("V", 5),
    ("IV", 4),
    ("I", 1),
];

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the Roman converter.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RomanParams {
    /// A number (1 to 3999) or a Roman numeral.
    #[serde(default)]
    pub input_text: String,
}

/// Convert a number in `1..=3999` to a Roman numeral.
pub fn to_roman(mut number: i64) -> ToolResult<String> {
    if !(1..=3999).contains(&number) {
        return Err(ToolError::invalid_arguments("Number out of range (1-3999)"));
    }
    let mut roman = String::new();
    for (symbol, value) in NUMERALS {
        while number >= i64::from(value) {
            roman.push_str(symbol);
            number -= i64::from(value);
        }
    }
    Ok(roman)
}

/// Convert a well-formed Roman numeral to its value.
pub fn from_roman(numeral: &str) -> ToolResult<u32> {
    let numeral = numeral.trim().to_uppercase();
    if numeral.is_empty() || !ROMAN_RE.is_match(&numeral) {
        return Err(ToolError::invalid_arguments("Invalid Roman numeral"));
    }

    let mut rest = numeral.as_str();
    let mut total = 0;
    while !rest.is_empty() {
        let (symbol, value) = NUMERALS
            .iter()
            .filter(|(symbol, _)| rest.starts_with(symbol))
            .max_by_key(|(symbol, _)| symbol.len())
            .ok_or_else(|| ToolError::invalid_arguments("Invalid Roman numeral"))?;
        total += value;
        rest = &rest[symbol.len()..];
    }
    Ok(total)
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Converts numbers to Roman numerals and back.
pub struct RomanConverterTool;

impl RomanConverterTool {
    pub const NAME: &'static str = "Roman Converter";
    pub const CATEGORY: &'static str = "Converter";
    pub const DESCRIPTION: &'static str = "Convert numbers to and from Roman numerals.";
}

impl Tool for RomanConverterTool {
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
        schema_of::<RomanParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: RomanParams = parse_params(input)?;
        let text = params.input_text.trim();
        if text.is_empty() {
            return Err(ToolError::invalid_arguments("Input text is required."));
        }

        match text.parse::<i64>() {
            Ok(number) => Ok(json!(to_roman(number)?)),
            Err(_) => Ok(json!(from_roman(text)?.to_string())),
        }
    }
}
