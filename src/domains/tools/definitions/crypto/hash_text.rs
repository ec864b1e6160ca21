//! Hash text tool definition.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::{Value, json};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384, Sha512};
use sha3::Sha3_512;
use tracing::instrument;

use crate::domains::tools::definitions::common::{parse_params, schema_of};
use crate::domains::tools::error::{ToolError, ToolResult};
use crate::domains::tools::tool::Tool;

fn default_format() -> String {
    "Hex".to_string()
}

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the hash tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct HashTextParams {
    /// Text to hash, as UTF-8.
    #[serde(default)]
    pub input_text: String,

    /// `Hex`, `Binary` or `Base64`.
    #[serde(default = "default_format")]
    pub output_format: String,
}

/// Digest encodings offered by the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestFormat {
    Hex,
    Binary,
    Base64,
}

impl DigestFormat {
    pub fn parse(format: &str) -> ToolResult<Self> {
        match format {
            "Hex" => Ok(Self::Hex),
            "Binary" => Ok(Self::Binary),
            "Base64" => Ok(Self::Base64),
            other => Err(ToolError::invalid_arguments(format!(
                "Unsupported format: {other}"
            ))),
        }
    }

    pub fn encode(self, digest: &[u8]) -> String {
        match self {
            Self::Hex => hex::encode(digest),
            Self::Binary => digest.iter().map(|b| format!("{b:08b}")).collect(),
            Self::Base64 => STANDARD.encode(digest),
        }
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Computes the common digests of a text at once.
pub struct HashTextTool;

impl HashTextTool {
    pub const NAME: &'static str = "Hash Text";
    pub const CATEGORY: &'static str = "Crypto";
    pub const DESCRIPTION: &'static str = "Generate hash values using various algorithms.";

    /// Every digest of `text`, keyed by algorithm name.
    pub fn digests(text: &str, format: DigestFormat) -> BTreeMap<&'static str, String> {
        let bytes = text.as_bytes();
        BTreeMap::from([
            ("MD5", format.encode(&md5::compute(bytes).0)),
            ("SHA1", format.encode(&Sha1::digest(bytes))),
            ("SHA256", format.encode(&Sha256::digest(bytes))),
            ("SHA384", format.encode(&Sha384::digest(bytes))),
            ("SHA512", format.encode(&Sha512::digest(bytes))),
            ("SHA3", format.encode(&Sha3_512::digest(bytes))),
        ])
    }
}

impl Tool for HashTextTool {
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
        schema_of::<HashTextParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: HashTextParams = parse_params(input)?;
        if params.input_text.is_empty() {
            return Err(ToolError::invalid_arguments("Input text is required."));
        }
        let format = DigestFormat::parse(&params.output_format)?;
        Ok(json!(Self::digests(&params.input_text, format)))
    }
}
