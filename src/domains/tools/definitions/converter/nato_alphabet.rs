//! NATO phonetic alphabet tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::domains::tools::definitions::common::{parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

fn default_true() -> bool {
    true
}

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the NATO converter.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NatoParams {
    #[serde(default)]
    pub text: String,

    /// Keep characters without a code word; otherwise they read `Unknown`.
    #[serde(default = "default_true")]
    pub include_original_characters: bool,
}

/// Code word for a character, if it has one.
pub fn code_word(c: char) -> Option<&'static str> {
    let word = match c.to_ascii_uppercase() {
        'A' => "Alpha",
        'B' => "Bravo",
        'C' => "Charlie",
        'D' => "Delta",
        'E' => "Echo",
        'F' => "Foxtrot",
        'G' => "Golf",
        'H' => "Hotel",
        'I' => "India",
        'J' => "Juliet",
        'K' => "Kilo",
        'L' => "Lima",
        'M' => "Mike",
        'N' => "November",
        'O' => "Oscar",
        'P' => "Papa",
        'Q' => "Quebec",
        'R' => "Romeo",
        'S' => "Sierra",
        'T' => "Tango",
        'U' => "Uniform",
        'V' => "Victor",
        'W' => "Whiskey",
        'X' => "X-ray",
        'Y' => "Yankee",
        'Z' => "Zulu",
        '0' => "Zero",
        '1' => "One",
        '2' => "Two",
        '3' => "Three",
        '4' => "Four",
        '5' => "Five",
        '6' => "Six",
        '7' => "Seven",
        '8' => "Eight",
        '9' => "Nine",
        '.' => "Dot",
        ',' => "Comma",
        '?' => "Question Mark",
        '!' => "Exclamation Mark",
        '-' => "Dash",
        '_' => "Underscore",
        '@' => "At Sign",
        '#' => "Hash",
        '$' => "Dollar Sign",
        '%' => "Percent",
        '&' => "Ampersand",
        '*' => "Asterisk",
        '(' => "Open Parenthesis",
        ')' => "Close Parenthesis",
        '+' => "Plus",
        '=' => "Equals",
        '/' => "Slash",
        '\\' => "Backslash",
        '|' => "Vertical Bar",
        ';' => "Semicolon",
        ':' => "Colon",
        '\'' => "Single Quote",
        '"' => "Double Quote",
        '<' => "Less Than",
        '>' => "Greater Than",
        ' ' => "Space",
        _ => return None,
    };
    Some(word)
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Spells text out in the NATO phonetic alphabet.
pub struct NatoPhoneticAlphabetTool;

impl NatoPhoneticAlphabetTool {
    pub const NAME: &'static str = "NATO Phonetic Alphabet";
    pub const CATEGORY: &'static str = "Converter";
    pub const DESCRIPTION: &'static str = "Convert text to NATO phonetic alphabet";

    pub fn spell(text: &str, include_original: bool) -> String {
        text.chars()
            .map(|c| match code_word(c) {
                Some(word) => word.to_string(),
                None if include_original => c.to_string(),
                None => "Unknown".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Tool for NatoPhoneticAlphabetTool {
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
        schema_of::<NatoParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: NatoParams = parse_params(input)?;
        if params.text.is_empty() {
            return Err(ToolError::invalid_arguments(
                "Invalid request. Text is required.",
            ));
        }
        Ok(json!(Self::spell(
            &params.text,
            params.include_original_characters
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spell() {
        let result = NatoPhoneticAlphabetTool
            .execute(&json!({ "text": "Hi 5!" }))
            .unwrap();
        assert_eq!(result, json!("Hotel India Space Five Exclamation Mark"));
    }

    #[test]
    fn test_unmapped_characters() {
        assert_eq!(NatoPhoneticAlphabetTool::spell("aé", true), "Alpha é");
        assert_eq!(NatoPhoneticAlphabetTool::spell("aé", false), "Alpha Unknown");
    }

    #[test]
    fn test_text_required() {
        assert!(NatoPhoneticAlphabetTool.execute(&json!({ "text": "" })).is_err());
    }
}
