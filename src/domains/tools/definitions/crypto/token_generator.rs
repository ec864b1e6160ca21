//! Token generator tool definition.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use rand::Rng;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::domains::tools::definitions::common::{parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const NUMBERS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()-_=+[]{}|;:'\",.<>?/";

/// Upper bound on the token length.
pub const MAX_TOKEN_LENGTH: usize = 512;

fn default_length() -> usize {
    16
}

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the token generator.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenGeneratorParams {
    /// Number of characters, 1 to 512.
    #[serde(default = "default_length")]
    pub length: usize,

    #[serde(default)]
    pub include_uppercase: bool,

    #[serde(default)]
    pub include_lowercase: bool,

    #[serde(default)]
    pub include_numbers: bool,

    #[serde(default)]
    pub include_symbols: bool,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Random tokens drawn from the selected character classes.
///
/// Once stopped the tool refuses further work.
#[derive(Default)]
pub struct TokenGeneratorTool {
    stopped: AtomicBool,
    issued: AtomicU64,
}

impl TokenGeneratorTool {
    pub const NAME: &'static str = "Token Generator";
    pub const CATEGORY: &'static str = "Crypto";
    pub const DESCRIPTION: &'static str = "Generate random tokens with customizable characters.";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn generate(params: &TokenGeneratorParams) -> ToolResult<String> {
        let mut pool = String::new();
        if params.include_uppercase {
            pool.push_str(UPPERCASE);
        }
        if params.include_lowercase {
            pool.push_str(LOWERCASE);
        }
        if params.include_numbers {
            pool.push_str(NUMBERS);
        }
        if params.include_symbols {
            pool.push_str(SYMBOLS);
        }
        if pool.is_empty() {
            return Err(ToolError::invalid_arguments(
                "Please select at least one character type.",
            ));
        }
        if params.length == 0 || params.length > MAX_TOKEN_LENGTH {
            return Err(ToolError::invalid_arguments(format!(
                "Length must be between 1 and {MAX_TOKEN_LENGTH}."
            )));
        }

        let pool = pool.as_bytes();
        let mut rng = rand::thread_rng();
        Ok((0..params.length)
            .map(|_| pool[rng.gen_range(0..pool.len())] as char)
            .collect())
    }
}

impl Tool for TokenGeneratorTool {
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
        schema_of::<TokenGeneratorParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        if self.stopped.load(Ordering::Acquire) {
            return Err(ToolError::execution_failed("Token generator is stopped."));
        }
        let params: TokenGeneratorParams = parse_params(input)?;
        let token = Self::generate(&params)?;
        self.issued.fetch_add(1, Ordering::Relaxed);
        Ok(json!(token))
    }

    fn stop(&self) {
        if !self.stopped.swap(true, Ordering::AcqRel) {
            info!(
                "Token generator stopped after issuing {} tokens",
                self.issued.load(Ordering::Relaxed)
            );
        }
    }
}
