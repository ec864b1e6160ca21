//! Administration: tool records, plugin uploads and users.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::{info, instrument};

use super::listing::ToolEntry;
use crate::core::transport::api::{AdminSession, ApiError, ApiResult};
use crate::core::ToolServer;
use crate::domains::catalog::{ToolRecord, UserRecord};
use crate::domains::plugins::LoadedPlugin;

/// Multipart field carrying the uploaded plugin.
const FILE_FIELD: &str = "file";

/// `GET /admin/tools`: every record, disabled ones included.
pub async fn list_tools(
    State(server): State<ToolServer>,
    AdminSession(session): AdminSession,
) -> ApiResult<Json<Vec<ToolEntry>>> {
    let records = server.catalog().all_tools().await?;
    Ok(Json(
        records
            .into_iter()
            .map(|record| ToolEntry::new(&server, record, &session))
            .collect(),
    ))
}

/// `POST /admin/tools/{id}/toggle-enabled`
#[instrument(skip_all, fields(id = id))]
pub async fn toggle_enabled(
    State(server): State<ToolServer>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> ApiResult<Json<ToolRecord>> {
    let record = server.catalog().toggle_enabled(id).await?;
    info!("Tool '{}' enabled: {}", record.name, record.enabled);
    Ok(Json(record))
}

/// `POST /admin/tools/{id}/toggle-premium`
#[instrument(skip_all, fields(id = id))]
pub async fn toggle_premium(
    State(server): State<ToolServer>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> ApiResult<Json<ToolRecord>> {
    let record = server.catalog().toggle_premium(id).await?;
    info!("Tool '{}' premium: {}", record.name, record.premium_required);
    Ok(Json(record))
}

#[derive(Debug, Serialize)]
pub struct Deleted {
    pub deleted: ToolRecord,
}

/// `DELETE /admin/tools/{id}`: remove the plugin file, unload it and delete
/// the record with its favourites.
#[instrument(skip_all, fields(id = id))]
pub async fn delete_tool(
    State(server): State<ToolServer>,
    _admin: AdminSession,
    Path(id): Path<i64>,
) -> ApiResult<Json<Deleted>> {
    let deleted = server.delete_tool(id).await?;
    Ok(Json(Deleted { deleted }))
}

#[derive(Debug, Serialize)]
pub struct Installed {
    pub plugin: LoadedPlugin,
    pub created: Vec<ToolRecord>,
}

/// `POST /admin/plugins`: upload a plugin in the `file` field, either a
/// `.toml` manifest or a `.wasm` module.
#[instrument(skip_all)]
pub async fn upload_plugin(
    State(server): State<ToolServer>,
    _admin: AdminSession,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<Installed>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid upload: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::bad_request("Uploaded file has no name"))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid upload: {e}")))?;
        if bytes.is_empty() {
            return Err(ApiError::bad_request("Uploaded file is empty"));
        }

        let (plugin, created) = server.install_plugin(&file_name, &bytes).await?;
        info!(
            "Installed plugin '{}' from upload {} ({} new records)",
            plugin.name,
            file_name,
            created.len()
        );
        return Ok((StatusCode::CREATED, Json(Installed { plugin, created })));
    }

    Err(ApiError::bad_request(format!(
        "Missing multipart field '{FILE_FIELD}'"
    )))
}

// ============================================================================
// Users
// ============================================================================

/// `GET /admin/users`
pub async fn list_users(
    State(server): State<ToolServer>,
    _admin: AdminSession,
) -> ApiResult<Json<Vec<UserRecord>>> {
    Ok(Json(server.catalog().users().await?))
}

/// `POST /admin/users/{id}/toggle-premium`: grant or revoke premium.
#[instrument(skip_all, fields(id = %id))]
pub async fn toggle_user_premium(
    State(server): State<ToolServer>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> ApiResult<Json<UserRecord>> {
    Ok(Json(server.catalog().toggle_user_premium(&id).await?))
}

/// `DELETE /admin/users/{id}`: forget a user and their favourites.
#[instrument(skip_all, fields(id = %id))]
pub async fn delete_user(
    State(server): State<ToolServer>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> ApiResult<Json<UserRecord>> {
    Ok(Json(server.catalog().delete_user(&id).await?))
}

/// `GET /admin/premium-requests`: users waiting for premium.
pub async fn premium_requests(
    State(server): State<ToolServer>,
    _admin: AdminSession,
) -> ApiResult<Json<Vec<UserRecord>>> {
    Ok(Json(server.catalog().premium_requests().await?))
}

/// `POST /admin/premium-requests/{id}/deny`
#[instrument(skip_all, fields(id = %id))]
pub async fn deny_premium_request(
    State(server): State<ToolServer>,
    _admin: AdminSession,
    Path(id): Path<String>,
) -> ApiResult<Json<UserRecord>> {
    let user = server.catalog().deny_premium_request(&id).await?;
    info!("Premium request from {} denied", user.id);
    Ok(Json(user))
}
