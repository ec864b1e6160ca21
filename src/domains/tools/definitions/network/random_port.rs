//! Random port generator tool definition.

use rand::Rng;
use serde_json::{Value, json};
use tracing::instrument;

use crate::domains::tools::error::ToolResult;
use crate::domains::tools::tool::Tool;

/// First port outside the well-known range.
pub const MIN_PORT: u16 = 1024;

// ============================================================================
// Tool Definition
// ============================================================================

/// Picks a random port outside the well-known range.
pub struct RandomPortGeneratorTool;

impl RandomPortGeneratorTool {
    pub const NAME: &'static str = "Random Port Generator";
    pub const CATEGORY: &'static str = "Networking";
    pub const DESCRIPTION: &'static str =
        "Generate random port numbers outside of the range of 'known' ports (0-1023).";
}

impl Tool for RandomPortGeneratorTool {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn category(&self) -> &str {
        Self::CATEGORY
    }

    fn description(&self) -> &str {
        Self::DESCRIPTION
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, _input: &Value) -> ToolResult<Value> {
        let port: u16 = rand::thread_rng().gen_range(MIN_PORT..=u16::MAX);
        Ok(json!({ "port": port }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_in_range() {
        for _ in 0..100 {
            let result = RandomPortGeneratorTool.execute(&Value::Null).unwrap();
            let port = result["port"].as_u64().unwrap();
            assert!((1024..=65535).contains(&port));
        }
    }
}
