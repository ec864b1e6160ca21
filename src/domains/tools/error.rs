//! Tool execution errors.

use thiserror::Error;

pub type ToolResult<T> = Result<T, ToolError>;

/// Why a tool refused or failed a request.
///
/// The display form carries a prefix for logs. Clients only see
/// [`ToolError::message`] in the `error` field of the envelope.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The request body is missing fields, has the wrong shape or holds
    /// values outside the accepted range.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The input was valid but the transform could not produce a result.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl ToolError {
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidArguments(msg) | Self::ExecutionFailed(msg) => msg,
        }
    }
}

/// Body deserialization failures are argument errors.
impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidArguments(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_strips_prefix() {
        let err = ToolError::invalid_arguments("Username is required.");
        assert_eq!(err.to_string(), "Invalid arguments: Username is required.");
        assert_eq!(err.message(), "Username is required.");
    }

    #[test]
    fn test_json_errors_are_argument_errors() {
        let err: ToolError = serde_json::from_str::<u8>("300").unwrap_err().into();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }
}
