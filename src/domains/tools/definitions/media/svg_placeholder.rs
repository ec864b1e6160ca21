//! SVG placeholder generator tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use crate::domains::tools::definitions::common::{parse_hex_color, parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;
use crate::domains::tools::ui::escape_html;

fn default_bg() -> String {
    "#cccccc".to_string()
}

fn default_fg() -> String {
    "#666666".to_string()
}

fn default_font_size() -> u32 {
    20
}

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the placeholder generator.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SvgPlaceholderParams {
    #[serde(default)]
    pub width: u32,

    #[serde(default)]
    pub height: u32,

    #[serde(default = "default_bg")]
    pub bg_color: String,

    #[serde(default = "default_fg")]
    pub text_color: String,

    /// Label; defaults to `{width}x{height}`.
    #[serde(default)]
    pub text: String,

    #[serde(default = "default_font_size")]
    pub font_size: u32,
}

/// Build the SVG document.
pub fn placeholder_svg(p: &SvgPlaceholderParams) -> ToolResult<String> {
    if p.width == 0 || p.height == 0 {
        return Err(ToolError::invalid_arguments(
            "Width and height must be greater than 0",
        ));
    }
    // Colors are interpolated into attributes, so only hex colors pass.
    parse_hex_color(&p.bg_color)?;
    parse_hex_color(&p.text_color)?;

    let text = if p.text.trim().is_empty() {
        format!("{}x{}", p.width, p.height)
    } else {
        escape_html(&p.text)
    };

    Ok(format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='{w}' height='{h}'>\n\
         \x20 <rect width='100%' height='100%' fill='{bg}' />\n\
         \x20 <text x='50%' y='50%' dominant-baseline='middle' text-anchor='middle' fill='{fg}' font-size='{size}px' font-family='Arial, sans-serif'>{text}</text>\n\
         </svg>\n",
        w = p.width,
        h = p.height,
        bg = p.bg_color.trim(),
        fg = p.text_color.trim(),
        size = p.font_size,
    ))
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Generates placeholder images as SVG markup.
pub struct SvgPlaceholderGeneratorTool;

impl SvgPlaceholderGeneratorTool {
    pub const NAME: &'static str = "SVG Placeholder Generator";
    pub const CATEGORY: &'static str = "Images and videos";
    pub const DESCRIPTION: &'static str =
        "Generate an SVG placeholder image with customizable dimensions and styles.";
}

impl Tool for SvgPlaceholderGeneratorTool {
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
        schema_of::<SvgPlaceholderParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: SvgPlaceholderParams = parse_params(input)?;
        Ok(json!({ "svg": placeholder_svg(&params)? }))
    }
}
