//! CSV to JSON tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::instrument;

use crate::domains::tools::definitions::common::{parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the CSV converter.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct CsvToJsonParams {
    /// CSV text whose first row is the header.
    #[serde(default)]
    pub csv: String,
}

/// Split CSV text into rows of fields.
///
/// Fields may be quoted; quoted fields can hold commas, newlines and `""`
/// escapes. Unquoted fields are trimmed and blank lines are skipped.
pub fn parse_csv(text: &str) -> ToolResult<Vec<Vec<String>>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    let finish_field = |row: &mut Vec<String>, field: &mut String, quoted: &mut bool| {
        let value = if *quoted {
            std::mem::take(field)
        } else {
            std::mem::take(field).trim().to_string()
        };
        row.push(value);
        *quoted = false;
    };

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.trim().is_empty() => {
                field.clear();
                quoted = true;
                in_quotes = true;
            }
            ',' => finish_field(&mut row, &mut field, &mut quoted),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                finish_field(&mut row, &mut field, &mut quoted);
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(std::mem::take(&mut row));
                }
                row.clear();
            }
            c if quoted && c.is_whitespace() => {}
            c if quoted => {
                return Err(ToolError::invalid_arguments(
                    "Unexpected character after closing quote",
                ));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(ToolError::invalid_arguments("Unterminated quoted field"));
    }
    finish_field(&mut row, &mut field, &mut quoted);
    if !(row.len() == 1 && row[0].is_empty()) {
        rows.push(row);
    }
    Ok(rows)
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Converts CSV rows into an array of objects keyed by the header.
pub struct CsvToJsonFormatterTool;

impl CsvToJsonFormatterTool {
    pub const NAME: &'static str = "CSV To JSON Formatter";
    pub const CATEGORY: &'static str = "Data";
    pub const DESCRIPTION: &'static str =
        "Convert your CSV data into a structured JSON format instantly.";
}

impl Tool for CsvToJsonFormatterTool {
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
        schema_of::<CsvToJsonParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: CsvToJsonParams = parse_params(input)?;
        let mut rows = parse_csv(&params.csv)?.into_iter();
        let headers = rows
            .next()
            .ok_or_else(|| ToolError::invalid_arguments("CSV must have a header row"))?;

        let records = rows
            .map(|row| {
                let record: Map<String, Value> = headers
                    .iter()
                    .enumerate()
                    .map(|(i, header)| {
                        let value = row.get(i).cloned().unwrap_or_default();
                        (header.clone(), Value::String(value))
                    })
                    .collect();
                Value::Object(record)
            })
            .collect();
        Ok(Value::Array(records))
    }
}
