//! QR code generator tool definition.

use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use super::{PNG_CONTENT_TYPE, ec_level, render_qr_png};
use crate::domains::tools::definitions::common::{parse_hex_color, parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

fn default_foreground() -> String {
    "#000000".to_string()
}

fn default_background() -> String {
    "#FFFFFF".to_string()
}

fn default_level() -> String {
    "Medium".to_string()
}

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the QR code generator.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct QrCodeParams {
    /// Content to encode.
    #[serde(default)]
    pub text: String,

    /// Module color, `#RGB` or `#RRGGBB`.
    #[serde(default = "default_foreground")]
    pub foreground_color: String,

    /// Background color, `#RGB` or `#RRGGBB`.
    #[serde(default = "default_background")]
    pub background_color: String,

    /// `Low`, `Medium`, `Quartile` or `High`.
    #[serde(default = "default_level")]
    pub error_correction_level: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Renders text as a colored QR code PNG.
pub struct QrCodeGeneratorTool;

impl QrCodeGeneratorTool {
    pub const NAME: &'static str = "QR Code Generator";
    pub const CATEGORY: &'static str = "Images and videos";
    pub const DESCRIPTION: &'static str =
        "Generate QR codes with custom colors and error correction";
}

impl Tool for QrCodeGeneratorTool {
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
        schema_of::<QrCodeParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: QrCodeParams = parse_params(input)?;
        if params.text.trim().is_empty() {
            return Err(ToolError::invalid_arguments(
                "QR code text content is required.",
            ));
        }
        let dark = parse_hex_color(&params.foreground_color).map_err(|_| {
            ToolError::invalid_arguments("Invalid foreground color format. Use hex format: #RRGGBB")
        })?;
        let light = parse_hex_color(&params.background_color).map_err(|_| {
            ToolError::invalid_arguments("Invalid background color format. Use hex format: #RRGGBB")
        })?;

        let image = render_qr_png(
            &params.text,
            ec_level(&params.error_correction_level),
            dark,
            light,
        )?;
        debug!("Rendered QR code, {} base64 bytes", image.len());
        Ok(json!({ "image": image, "contentType": PNG_CONTENT_TYPE }))
    }
}
