//! IPv4 subnet calculator tool definition.

use std::net::Ipv4Addr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use super::{parse_ipv4, prefix_mask};
use crate::domains::tools::definitions::common::{parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the subnet calculator.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ipv4SubnetParams {
    /// Address in CIDR notation, e.g. `192.168.0.1/24`.
    #[serde(default)]
    pub address_with_mask: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SubnetInfo {
    netmask: String,
    network_address: String,
    network_mask: String,
    network_mask_binary: String,
    cidr_notation: String,
    wildcard_mask: String,
    network_size: u64,
    first_address: String,
    last_address: String,
    broadcast_address: String,
    ip_class: &'static str,
}

fn address_class(first_octet: u8) -> &'static str {
    match first_octet {
        0..=127 => "A",
        128..=191 => "B",
        192..=223 => "C",
        224..=239 => "D",
        _ => "E",
    }
}

/// Dotted binary form of a mask, e.g. `11111111.11111111.11111111.00000000`.
fn dotted_binary(mask: u32) -> String {
    mask.to_be_bytes()
        .iter()
        .map(|b| format!("{b:08b}"))
        .collect::<Vec<_>>()
        .join(".")
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Describes the subnet of a CIDR block.
pub struct Ipv4SubnetCalculatorTool;

impl Ipv4SubnetCalculatorTool {
    pub const NAME: &'static str = "IPv4 Subnet Calculator";
    pub const CATEGORY: &'static str = "Networking";
    pub const DESCRIPTION: &'static str =
        "Parse your IPv4 CIDR blocks and get all the info you need about your subnet.";
}

impl Tool for Ipv4SubnetCalculatorTool {
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
        schema_of::<Ipv4SubnetParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: Ipv4SubnetParams = parse_params(input)?;
        let (address, prefix) = params
            .address_with_mask
            .split_once('/')
            .ok_or_else(|| ToolError::invalid_arguments("Invalid CIDR format"))?;
        let ip = parse_ipv4(address)?;
        let prefix: u32 = prefix
            .trim()
            .parse()
            .ok()
            .filter(|p| *p <= 32)
            .ok_or_else(|| ToolError::invalid_arguments("Invalid CIDR format"))?;

        let mask = prefix_mask(prefix);
        let network = u32::from(ip) & mask;
        let broadcast = network | !mask;
        // /31 and /32 have no network or broadcast address to exclude.
        let (first, last) = if prefix >= 31 {
            (network, broadcast)
        } else {
            (network + 1, broadcast - 1)
        };

        let output = SubnetInfo {
            netmask: params.address_with_mask.clone(),
            network_address: Ipv4Addr::from(network).to_string(),
            network_mask: Ipv4Addr::from(mask).to_string(),
            network_mask_binary: dotted_binary(mask),
            cidr_notation: format!("/{prefix}"),
            wildcard_mask: Ipv4Addr::from(!mask).to_string(),
            network_size: u64::from(broadcast - network) + 1,
            first_address: Ipv4Addr::from(first).to_string(),
            last_address: Ipv4Addr::from(last).to_string(),
            broadcast_address: Ipv4Addr::from(broadcast).to_string(),
            ip_class: address_class(ip.octets()[0]),
        };
        Ok(serde_json::to_value(output)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_class_c_subnet() {
        let result = Ipv4SubnetCalculatorTool
            .execute(&json!({ "addressWithMask": "192.168.0.1/24" }))
            .unwrap();
        assert_eq!(result["networkAddress"], json!("192.168.0.0"));
        assert_eq!(result["networkMask"], json!("255.255.255.0"));
        assert_eq!(
            result["networkMaskBinary"],
            json!("11111111.11111111.11111111.00000000")
        );
        assert_eq!(result["wildcardMask"], json!("0.0.0.255"));
        assert_eq!(result["networkSize"], json!(256));
        assert_eq!(result["firstAddress"], json!("192.168.0.1"));
        assert_eq!(result["lastAddress"], json!("192.168.0.254"));
        assert_eq!(result["broadcastAddress"], json!("192.168.0.255"));
        assert_eq!(result["ipClass"], json!("C"));
    }

    #[test]
    fn test_host_and_zero_prefix() {
        let result = Ipv4SubnetCalculatorTool
            .execute(&json!({ "addressWithMask": "10.1.2.3/32" }))
            .unwrap();
        assert_eq!(result["firstAddress"], json!("10.1.2.3"));
        assert_eq!(result["lastAddress"], json!("10.1.2.3"));
        assert_eq!(result["networkSize"], json!(1));

        let result = Ipv4SubnetCalculatorTool
            .execute(&json!({ "addressWithMask": "10.1.2.3/0" }))
            .unwrap();
        assert_eq!(result["networkSize"], json!(4_294_967_296u64));
        assert_eq!(result["ipClass"], json!("A"));
    }

    #[test]
    fn test_invalid_cidr() {
        for input in ["10.0.0.1", "10.0.0.1/33", "10.0.0.1/x", "nope/8"] {
            assert!(
                Ipv4SubnetCalculatorTool
                    .execute(&json!({ "addressWithMask": input }))
                    .is_err(),
                "{input} should be rejected"
            );
        }
    }
}
