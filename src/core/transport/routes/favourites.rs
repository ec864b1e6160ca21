//! Per-user favourite tools.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use super::listing::ToolEntry;
use crate::core::transport::api::{ApiError, ApiResult, UserSession};
use crate::core::ToolServer;
use crate::domains::catalog::ToolRecord;

/// `GET /favourites`
pub async fn list_favourites(
    State(server): State<ToolServer>,
    user: UserSession,
) -> ApiResult<Json<Vec<ToolEntry>>> {
    let records = server.catalog().favourites_for_user(&user.user_id).await?;
    Ok(Json(
        records
            .into_iter()
            .map(|record| ToolEntry::new(&server, record, &user.session))
            .collect(),
    ))
}

async fn record_for(server: &ToolServer, slug: &str) -> ApiResult<ToolRecord> {
    server
        .catalog()
        .get_by_slug(&slug.to_lowercase())
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Tool not found: {slug}")))
}

#[derive(Debug, Serialize)]
pub struct FavouriteStatus {
    pub slug: String,
    pub favourite: bool,
}

/// `POST /favourites/{slug}`
pub async fn add_favourite(
    State(server): State<ToolServer>,
    user: UserSession,
    Path(slug): Path<String>,
) -> ApiResult<Json<FavouriteStatus>> {
    let record = record_for(&server, &slug).await?;

    server.catalog().add_favourite(&user.user_id, record.id).await?;
    Ok(Json(FavouriteStatus {
        slug,
        favourite: true,
    }))
}

/// `DELETE /favourites/{slug}`
pub async fn remove_favourite(
    State(server): State<ToolServer>,
    user: UserSession,
    Path(slug): Path<String>,
) -> ApiResult<Json<FavouriteStatus>> {
    let record = record_for(&server, &slug).await?;

    server
        .catalog()
        .remove_favourite(&user.user_id, record.id)
        .await?;
    Ok(Json(FavouriteStatus {
        slug,
        favourite: false,
    }))
}
