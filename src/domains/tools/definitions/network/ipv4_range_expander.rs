//! IPv4 range expander tool definition.

use std::net::Ipv4Addr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use super::{parse_ipv4, prefix_mask};
use crate::domains::tools::definitions::common::{parse_params, schema_of};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::tool::Tool;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the range expander.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ipv4RangeParams {
    #[serde(default)]
    pub start_address: String,

    #[serde(default)]
    pub end_address: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RangeExpansion {
    old_start: String,
    old_end: String,
    new_start: String,
    new_end: String,
    addresses_in_range: u64,
    cidr: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Finds the smallest subnet covering an address range.
pub struct Ipv4RangeExpanderTool;

impl Ipv4RangeExpanderTool {
    pub const NAME: &'static str = "IPv4 Range Expander";
    pub const CATEGORY: &'static str = "Networking";
    pub const DESCRIPTION: &'static str =
        "Calculate the smallest subnet that contains the given IP range.";
}

impl Tool for Ipv4RangeExpanderTool {
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
        schema_of::<Ipv4RangeParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: Ipv4RangeParams = parse_params(input)?;
        let mut start = u32::from(parse_ipv4(&params.start_address)?);
        let mut end = u32::from(parse_ipv4(&params.end_address)?);
        if start > end {
            std::mem::swap(&mut start, &mut end);
        }

        // The covering prefix is the run of bits both ends share.
        let prefix = (start ^ end).leading_zeros();
        let mask = prefix_mask(prefix);
        let network = start & mask;
        let broadcast = network | !mask;
        debug!("Range widened to /{}", prefix);

        let output = RangeExpansion {
            old_start: Ipv4Addr::from(start).to_string(),
            old_end: Ipv4Addr::from(end).to_string(),
            new_start: Ipv4Addr::from(network).to_string(),
            new_end: Ipv4Addr::from(broadcast).to_string(),
            addresses_in_range: u64::from(end - start) + 1,
            cidr: format!("{}/{prefix}", Ipv4Addr::from(network)),
        };
        Ok(serde_json::to_value(output)?)
    }
}
