//! Tool listings and search.

use std::collections::BTreeMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::core::transport::api::{ApiError, ApiResult};
use crate::core::ToolServer;
use crate::domains::access::SessionState;
use crate::domains::catalog::ToolRecord;
use crate::domains::tools::ToolInfo;

/// A tool record as listed to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolEntry {
    #[serde(flatten)]
    pub record: ToolRecord,

    /// Whether the plugin providing the tool is loaded.
    pub available: bool,

    /// Premium tool the session cannot open.
    pub locked: bool,
}

impl ToolEntry {
    pub fn new(server: &ToolServer, record: ToolRecord, session: &SessionState) -> Self {
        let locked = record.premium_required && !session.admin && !session.is_premium_user();
        Self {
            available: server.is_loaded(&record.slug),
            locked,
            record,
        }
    }
}

fn entries(server: &ToolServer, records: Vec<ToolRecord>, session: &SessionState) -> Vec<ToolEntry> {
    records
        .into_iter()
        .map(|record| ToolEntry::new(server, record, session))
        .collect()
}

#[derive(Debug, Serialize)]
pub struct CategorizedTools {
    pub categories: BTreeMap<String, Vec<ToolEntry>>,
}

/// `GET /api/tools`: tools grouped by category. Admins also see disabled ones.
pub async fn list_tools(
    State(server): State<ToolServer>,
    session: SessionState,
) -> ApiResult<Json<CategorizedTools>> {
    let categories = server
        .catalog()
        .categorized(session.admin)
        .await?
        .into_iter()
        .map(|(category, records)| (category, entries(&server, records, &session)))
        .collect();

    Ok(Json(CategorizedTools { categories }))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub results: Vec<ToolEntry>,
}

/// `GET /api/tools/search?q=`
pub async fn search_tools(
    State(server): State<ToolServer>,
    session: SessionState,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<SearchResults>> {
    let records = server.catalog().search(&query.q, session.admin).await?;
    Ok(Json(SearchResults {
        results: entries(&server, records, &session),
        query: query.q,
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDetails {
    #[serde(flatten)]
    pub info: ToolInfo,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<ToolRecord>,
}

/// `GET /api/tools/{slug}`: metadata and input schema of a loaded tool.
///
/// Premium tools are described to everyone; only opening them is gated.
pub async fn tool_details(
    State(server): State<ToolServer>,
    session: SessionState,
    Path(slug): Path<String>,
) -> ApiResult<Json<ToolDetails>> {
    let resolved = server
        .find_tool(&slug, &session)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Tool not found: {slug}")))?;

    Ok(Json(ToolDetails {
        info: ToolInfo::of(resolved.tool.as_ref()),
        record: resolved.record,
    }))
}
