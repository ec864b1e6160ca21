//! IPv4 address converter tool definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use super::parse_ipv4;
use crate::domains::tools::definitions::common::{parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the IPv4 address converter.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct Ipv4AddressParams {
    /// Dotted-quad address such as `192.168.1.1`.
    #[serde(default)]
    pub ipv4: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Ipv4Representations {
    decimal: u32,
    hexadecimal: String,
    binary: String,
    ipv6: String,
    ipv6_short: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Shows an IPv4 address in decimal, hex, binary and IPv4-mapped IPv6.
pub struct Ipv4AddressConverterTool;

impl Ipv4AddressConverterTool {
    pub const NAME: &'static str = "IPv4 Address Converter";
    pub const CATEGORY: &'static str = "Networking";
    pub const DESCRIPTION: &'static str = "Convert an IP address into decimal, binary, hexadecimal, or even an IPv6 representation of it.";
}

impl Tool for Ipv4AddressConverterTool {
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
        schema_of::<Ipv4AddressParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: Ipv4AddressParams = parse_params(input)?;
        if params.ipv4.trim().is_empty() {
            return Err(ToolError::invalid_arguments("Invalid input"));
        }
        let [a, b, c, d] = parse_ipv4(&params.ipv4)?.octets();
        let tail = format!("{a:02x}{b:02x}:{c:02x}{d:02x}");

        let output = Ipv4Representations {
            decimal: u32::from_be_bytes([a, b, c, d]),
            hexadecimal: format!("{a:02X}{b:02X}{c:02X}{d:02X}"),
            binary: format!("{a:08b}{b:08b}{c:08b}{d:08b}"),
            ipv6: format!("0000:0000:0000:0000:0000:ffff:{tail}"),
            ipv6_short: format!("::ffff:{tail}"),
        };
        Ok(serde_json::to_value(output)?)
    }
}
