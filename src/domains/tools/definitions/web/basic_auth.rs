//! Basic auth generator tool definition.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
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

/// Parameters for the basic auth generator.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BasicAuthParams {
    /// User name; must not be empty.
    #[serde(default)]
    pub username: String,

    /// Password; may be empty.
    #[serde(default)]
    pub password: String,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Builds the value of an HTTP `Authorization: Basic` header.
pub struct BasicAuthGeneratorTool;

impl BasicAuthGeneratorTool {
    pub const NAME: &'static str = "Basic Auth Generator";
    pub const CATEGORY: &'static str = "Web";
    pub const DESCRIPTION: &'static str =
        "Generate HTTP Basic Authentication header value from username and password";

    /// Encode `username:password` as a basic auth header value.
    pub fn header_value(username: &str, password: &str) -> String {
        format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
    }
}

impl Tool for BasicAuthGeneratorTool {
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
        schema_of::<BasicAuthParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: BasicAuthParams = parse_params(input)?;
        if params.username.is_empty() {
            return Err(ToolError::invalid_arguments("Username is required."));
        }
        Ok(json!(Self::header_value(&params.username, &params.password)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_value() {
        let result = BasicAuthGeneratorTool
            .execute(&json!({ "username": "a", "password": "b" }))
            .unwrap();
        assert_eq!(result, json!("Basic YTpi"));
    }

    #[test]
    fn test_empty_password_allowed() {
        let result = BasicAuthGeneratorTool
            .execute(&json!({ "username": "admin" }))
            .unwrap();
        assert_eq!(result, json!("Basic YWRtaW46"));
    }

    #[test]
    fn test_username_required() {
        let err = BasicAuthGeneratorTool
            .execute(&json!({ "password": "x" }))
            .unwrap_err();
        assert_eq!(err.message(), "Username is required.");
    }
}
