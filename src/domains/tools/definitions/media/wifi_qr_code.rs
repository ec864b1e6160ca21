//! WiFi QR code generator tool definition.

use qrcode::EcLevel;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use super::{PNG_CONTENT_TYPE, render_qr_png};
use crate::domains::tools::definitions::common::{parse_hex_color, parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

fn default_encryption() -> String {
    "WPA".to_string()
}

fn default_foreground() -> String {
    "#000000".to_string()
}

fn default_background() -> String {
    "#FFFFFF".to_string()
}

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the WiFi QR code generator.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WifiQrParams {
    #[serde(default)]
    pub ssid: String,

    #[serde(default)]
    pub password: String,

    /// `WPA`, `WEP`, `WPA2-EAP` or `nopass`, with common aliases.
    #[serde(default = "default_encryption")]
    pub encryption_method: String,

    #[serde(default = "default_foreground")]
    pub foreground_color: String,

    #[serde(default = "default_background")]
    pub background_color: String,

    #[serde(default)]
    pub is_hidden: bool,
}

/// Canonical encryption name; unknown methods are treated as WPA.
fn encryption(method: &str) -> &'static str {
    match method.to_lowercase().as_str() {
        "wep" => "WEP",
        "wpa2-eap" | "wpa2/eap" | "eap" => "WPA2-EAP",
        "nopass" | "none" | "no password" => "nopass",
        _ => "WPA",
    }
}

/// Escape the characters that are special in a `WIFI:` payload.
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '"' | ';' | ',' | ':') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// The `WIFI:` string phones understand.
pub fn wifi_string(params: &WifiQrParams) -> ToolResult<String> {
    if params.ssid.trim().is_empty() {
        return Err(ToolError::invalid_arguments("Network SSID is required."));
    }
    let method = encryption(&params.encryption_method);
    if matches!(method, "WPA" | "WEP") && params.password.is_empty() {
        return Err(ToolError::invalid_arguments(format!(
            "Password is required for {method} encryption."
        )));
    }

    let mut payload = format!("WIFI:T:{method};S:{};", escape(&params.ssid));
    if !params.password.is_empty() && method != "nopass" {
        payload.push_str(&format!("P:{};", escape(&params.password)));
    }
    if params.is_hidden {
        payload.push_str("H:true;");
    }
    payload.push(';');
    Ok(payload)
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Renders network credentials as a scannable QR code.
pub struct WifiQrCodeGeneratorTool;

impl WifiQrCodeGeneratorTool {
    pub const NAME: &'static str = "WiFi QR Code Generator";
    pub const CATEGORY: &'static str = "Images and videos";
    pub const DESCRIPTION: &'static str = "Generate QR codes for WiFi network connection";
}

impl Tool for WifiQrCodeGeneratorTool {
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
        schema_of::<WifiQrParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: WifiQrParams = parse_params(input)?;
        let payload = wifi_string(&params)?;
        let dark = parse_hex_color(&params.foreground_color).map_err(|_| {
            ToolError::invalid_arguments("Invalid foreground color format. Use hex format: #RRGGBB")
        })?;
        let light = parse_hex_color(&params.background_color).map_err(|_| {
            ToolError::invalid_arguments("Invalid background color format. Use hex format: #RRGGBB")
        })?;

        let image = render_qr_png(&payload, EcLevel::Q, dark, light)?;
        Ok(json!({
            "image": image,
            "contentType": PNG_CONTENT_TYPE,
            "wifiString": payload,
        }))
    }
}
