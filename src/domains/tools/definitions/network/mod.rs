//! Networking tools.

pub mod ipv4_address_converter;
pub mod ipv4_range_expander;
pub mod ipv4_subnet_calculator;
pub mod random_port;

use std::net::Ipv4Addr;

use crate::domains::tools::error::{ToolError, ToolResult};

pub use ipv4_address_converter::Ipv4AddressConverterTool;
pub use ipv4_range_expander::Ipv4RangeExpanderTool;
pub use ipv4_subnet_calculator::Ipv4SubnetCalculatorTool;
pub use random_port::RandomPortGeneratorTool;

/// Parse a dotted-quad IPv4 address.
fn parse_ipv4(text: &str) -> ToolResult<Ipv4Addr> {
    text.trim()
        .parse::<Ipv4Addr>()
        .map_err(|_| ToolError::invalid_arguments(format!("Invalid IPv4 address: {text}")))
}

/// Network mask for a prefix length in `0..=32`.
fn prefix_mask(prefix: u32) -> u32 {
    u32::MAX.checked_shl(32 - prefix).unwrap_or(0)
}
