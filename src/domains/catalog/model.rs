//! Tool records and users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Persisted metadata of a tool, kept apart from the loaded code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ToolRecord {
    pub id: i64,
    pub name: String,

    /// Route slug, derived from the name when the record is created.
    pub slug: String,

    pub description: String,
    pub enabled: bool,
    pub premium_required: bool,
    pub category: String,

    /// Plugin file providing the tool, relative to the plugin directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// A user seen through the auth layer's session headers.
///
/// Premium granted here is added to whatever the session headers claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub premium: bool,

    /// Waiting for an administrator to grant or deny premium.
    pub request_premium: bool,

    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
}
