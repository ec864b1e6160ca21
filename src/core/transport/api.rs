//! HTTP error responses and session guards.
//!
//! Handler failures are reported as `{ "error": "...", "status": 404 }` with
//! the matching status code. Tool execution errors never go through here:
//! they are part of the `success: false` envelope.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::core::error::Error;
use crate::domains::access::SessionState;
use crate::domains::catalog::CatalogError;
use crate::domains::plugins::PluginError;

/// An error returned by an HTTP handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    status: u16,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("Request failed: {}", self.message);
        }

        let body = Json(ErrorBody {
            error: &self.message,
            status: self.status.as_u16(),
        });
        (self.status, body).into_response()
    }
}

/// Result type for HTTP handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

fn plugin_status(err: &PluginError) -> StatusCode {
    match err {
        PluginError::NotFound(_) => StatusCode::NOT_FOUND,
        PluginError::UnsupportedExtension(_)
        | PluginError::InvalidManifest { .. }
        | PluginError::InvalidModule { .. }
        | PluginError::NoTools(_)
        | PluginError::Path(_) => StatusCode::BAD_REQUEST,
        PluginError::AlreadyLoaded(_)
        | PluginError::DuplicateTool { .. }
        | PluginError::FileExists(_) => StatusCode::CONFLICT,
        PluginError::Io { .. } | PluginError::Watch(_) | PluginError::Runtime(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn catalog_status(err: &CatalogError) -> StatusCode {
    match err {
        CatalogError::NotFound(_) | CatalogError::UserNotFound(_) => StatusCode::NOT_FOUND,
        CatalogError::AlreadyPremium(_) => StatusCode::CONFLICT,
        CatalogError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<PluginError> for ApiError {
    fn from(err: PluginError) -> Self {
        Self::new(plugin_status(&err), err.to_string())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self::new(catalog_status(&err), err.to_string())
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Plugin(e) => e.into(),
            Error::Catalog(e) => e.into(),
            Error::PathSecurity(e) => Self::bad_request(e.to_string()),
            Error::Transport(e) => Self::internal(e.to_string()),
        }
    }
}

/// A session with the admin flag. Rejects with 403 otherwise.
#[derive(Debug, Clone)]
pub struct AdminSession(pub SessionState);

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionState::from_parts(parts);
        if session.admin {
            Ok(Self(session))
        } else {
            Err(ApiError::forbidden("Admin access required"))
        }
    }
}

/// A logged-in session. Rejects with 401 otherwise.
#[derive(Debug, Clone)]
pub struct UserSession {
    pub user_id: String,
    pub session: SessionState,
}

impl<S> FromRequestParts<S> for UserSession
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionState::from_parts(parts);
        match session.user_id.clone() {
            Some(user_id) => Ok(Self { user_id, session }),
            None => Err(ApiError::unauthorized("Login required")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_status_mapping() {
        let err: ApiError = PluginError::FileExists(PathBuf::from("a.toml")).into();
        assert_eq!(err.status, StatusCode::CONFLICT);

        let err: ApiError = PluginError::NoTools(PathBuf::from("a.toml")).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err: ApiError = Error::from(CatalogError::NotFound(3)).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Tool record not found: 3");

        let err: ApiError = CatalogError::AlreadyPremium("7".into()).into();
        assert_eq!(err.status, StatusCode::CONFLICT);

        let err: ApiError = CatalogError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);

        let err: ApiError = PluginError::invalid_module("a.wasm", "no metadata export").into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let io = std::io::Error::other("disk full");
        let err: ApiError = Error::from(PluginError::io("a.toml", io)).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_error_body() {
        let response = ApiError::forbidden("nope").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "nope", "status": 403 }));
    }
}
