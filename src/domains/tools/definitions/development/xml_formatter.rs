//! XML formatter tool definition.

use quick_xml::events::Event;
use quick_xml::{Reader, Writer};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::domains::tools::definitions::common::{parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the XML formatter.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct XmlFormatterParams {
    /// XML document with exactly one root element.
    #[serde(default)]
    pub input: String,

    /// Emit everything on a single line.
    #[serde(default)]
    pub collapse_content: bool,
}

fn invalid(detail: impl std::fmt::Display) -> ToolError {
    ToolError::invalid_arguments(format!("Invalid XML format: {detail}"))
}

/// Re-serialize `xml`, indented by two spaces unless `collapse` is set.
pub fn format_xml(xml: &str, collapse: bool) -> ToolResult<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut writer = if collapse {
        Writer::new(Vec::new())
    } else {
        Writer::new_with_indent(Vec::new(), b' ', 2)
    };

    let mut depth = 0usize;
    let mut roots = 0usize;
    loop {
        let event = reader.read_event().map_err(invalid)?;
        match &event {
            Event::Eof => break,
            Event::Start(_) | Event::Empty(_) if depth == 0 => {
                roots += 1;
                if roots > 1 {
                    return Err(invalid("multiple root elements"));
                }
            }
            Event::Text(_) | Event::CData(_) if depth == 0 => {
                return Err(invalid("text outside the root element"));
            }
            _ => {}
        }
        match &event {
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            _ => {}
        }
        writer.write_event(event).map_err(invalid)?;
    }

    if roots == 0 {
        return Err(invalid("missing root element"));
    }
    if depth != 0 {
        return Err(invalid("unclosed element"));
    }
    String::from_utf8(writer.into_inner()).map_err(invalid)
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Pretty-prints or collapses XML.
pub struct XmlFormatterTool;

impl XmlFormatterTool {
    pub const NAME: &'static str = "XML Formatter";
    pub const CATEGORY: &'static str = "Development";
    pub const DESCRIPTION: &'static str =
        "Format your XML into a human-readable format with an option to collapse content.";
}

impl Tool for XmlFormatterTool {
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
        schema_of::<XmlFormatterParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: XmlFormatterParams = parse_params(input)?;
        if params.input.trim().is_empty() {
            return Err(ToolError::invalid_arguments("Invalid XML input."));
        }
        Ok(json!(format_xml(&params.input, params.collapse_content)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "<root>\n   <item id=\"1\">x</item>\n<empty/>   </root>";

    #[test]
    fn test_indent() {
        assert_eq!(
            format_xml(SAMPLE, false).unwrap(),
            "<root>\n  <item id=\"1\">x</item>\n  <empty/>\n</root>"
        );
    }

    #[test]
    fn test_collapse() {
        let result = XmlFormatterTool
            .execute(&json!({ "input": SAMPLE, "collapseContent": true }))
            .unwrap();
        assert_eq!(result, json!("<root><item id=\"1\">x</item><empty/></root>"));
    }

    #[test]
    fn test_rejects_malformed_documents() {
        for xml in ["<a></b>", "<a/><b/>", "text", "<a><b></b>", "<!-- only -->"] {
            assert!(format_xml(xml, false).is_err(), "{xml} should be rejected");
        }
    }
}
