//! Slugify string tool definition.

use once_cell::sync::Lazy;
use regex::Regex;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;
use tracing::instrument;

use crate::domains::tools::definitions::common::{parse_params, schema_of};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::tool::Tool;

static NON_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s-]").expect("invalid non-word regex"));
static SEPARATOR_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s_-]+").expect("invalid separator regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s").expect("invalid space regex"));

fn default_true() -> bool {
    true
}

fn default_separator() -> String {
    "-".to_string()
}

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the slugify tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlugifyParams {
    /// Text to slugify.
    #[serde(default)]
    pub text: String,

    /// Lowercase the result.
    #[serde(default = "default_true")]
    pub lower_case: bool,

    /// Separator placed between words.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Strip accents before slugifying.
    #[serde(default = "default_true")]
    pub remove_diacritics: bool,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Turns arbitrary text into a URL-friendly slug.
pub struct SlugifyStringTool;

impl SlugifyStringTool {
    pub const NAME: &'static str = "Slugify String";
    pub const CATEGORY: &'static str = "Web";
    pub const DESCRIPTION: &'static str = "Convert strings to URL-friendly slugs";

    pub fn slugify(params: &SlugifyParams) -> String {
        if params.text.is_empty() {
            return String::new();
        }

        let mut text = if params.remove_diacritics {
            remove_diacritics(&params.text)
        } else {
            params.text.clone()
        };
        if params.lower_case {
            text = text.to_lowercase();
        }

        let text = NON_WORD_RE.replace_all(&text, "");
        let text = SEPARATOR_RUN_RE.replace_all(&text, " ");
        let text = WHITESPACE_RE.replace_all(text.trim(), params.separator.as_str());

        if params.separator.is_empty() {
            return text.into_owned();
        }
        match Regex::new(&format!("(?:{})+", regex::escape(&params.separator))) {
            Ok(runs) => runs
                .replace_all(&text, params.separator.as_str())
                .into_owned(),
            Err(_) => text.into_owned(),
        }
    }
}

fn remove_diacritics(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .nfc()
        .collect()
}

impl Tool for SlugifyStringTool {
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
        schema_of::<SlugifyParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: SlugifyParams = parse_params(input)?;
        Ok(json!(Self::slugify(&params)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: Value) -> Value {
        SlugifyStringTool.execute(&input).unwrap()
    }

    #[test]
    fn test_defaults() {
        assert_eq!(
            run(json!({ "text": "Héllo, Wörld!  Ça va?" })),
            json!("hello-world-ca-va")
        );
    }

    #[test]
    fn test_collapses_separators() {
        assert_eq!(
            run(json!({ "text": "a -- b __ c", "separator": "_" })),
            json!("a_b_c")
        );
    }

    #[test]
    fn test_options_disabled() {
        assert_eq!(
            run(json!({
                "text": "Café Latte",
                "lowerCase": false,
                "removeDiacritics": false
            })),
            json!("Café-Latte")
        );
    }

    #[test]
    fn test_empty_separator_and_text() {
        assert_eq!(run(json!({ "text": "a b", "separator": "" })), json!("ab"));
        assert_eq!(run(json!({ "text": "" })), json!(""));
    }
}
