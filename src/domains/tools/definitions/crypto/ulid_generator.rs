//! ULID generator tool definition.

use chrono::Utc;
use rand::RngCore;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::domains::tools::definitions::common::{lenient_f64, parse_params, schema_of};
use crate::domains::tools::error::ToolResult;
use crate::domains::tools::tool::Tool;

/// Crockford base32 alphabet.
const CROCKFORD: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Most ULIDs produced by one call.
pub const MAX_ULIDS: usize = 100;

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the ULID generator.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UlidParams {
    /// Number of ULIDs; clamped to 1..=100. Numeric strings are accepted.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub count: Option<f64>,

    /// `raw` joins ULIDs with newlines, `json` returns an array.
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum UlidList {
    Raw(String),
    Json(Vec<String>),
}

#[derive(Debug, Serialize)]
struct UlidOutput {
    count: usize,
    timestamp: String,
    ulids: UlidList,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Generates lexicographically sortable identifiers.
pub struct UlidGeneratorTool;

impl UlidGeneratorTool {
    pub const NAME: &'static str = "ULID Generator";
    pub const CATEGORY: &'static str = "Crypto";
    pub const DESCRIPTION: &'static str =
        "Generate ULIDs (Universally Unique Lexicographically Sortable Identifiers)";

    /// A ULID for the given millisecond timestamp with fresh randomness.
    pub fn generate_at(timestamp_ms: u64) -> String {
        let mut random = [0u8; 10];
        rand::thread_rng().fill_bytes(&mut random);
        encode_ulid(timestamp_ms, &random)
    }
}

/// Encode 48 bits of timestamp and 80 bits of randomness as 26 characters.
fn encode_ulid(timestamp_ms: u64, random: &[u8; 10]) -> String {
    let mut value = u128::from(timestamp_ms & 0xFFFF_FFFF_FFFF) << 80;
    for (i, byte) in random.iter().enumerate() {
        value |= u128::from(*byte) << (8 * (9 - i));
    }

    (0..26)
        .rev()
        .map(|i| CROCKFORD[((value >> (5 * i)) & 0x1F) as usize] as char)
        .collect()
}

impl Tool for UlidGeneratorTool {
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
        schema_of::<UlidParams>()
    }

    #[instrument(skip_all, fields(tool = Self::NAME))]
    fn execute(&self, input: &Value) -> ToolResult<Value> {
        let params: UlidParams = parse_params(input)?;
        let count = params
            .count
            .map(|c| c.clamp(1.0, MAX_ULIDS as f64) as usize)
            .unwrap_or(1);

        let now = Utc::now();
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
        let ulids: Vec<String> = (0..count).map(|_| Self::generate_at(millis)).collect();

        let json_format = params
            .format
            .is_some_and(|f| f.eq_ignore_ascii_case("json"));
        let output = UlidOutput {
            count: ulids.len(),
            timestamp: now.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            ulids: if json_format {
                UlidList::Json(ulids)
            } else {
                UlidList::Raw(ulids.join("\n"))
            },
        };
        Ok(serde_json::to_value(output)?)
    }
}
