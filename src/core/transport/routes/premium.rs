//! Premium requests from users.

use axum::extract::State;
use axum::Json;
use tracing::instrument;

use crate::core::transport::api::{ApiError, ApiResult, UserSession};
use crate::core::ToolServer;
use crate::domains::catalog::UserRecord;

/// `POST /premium/request`: ask an administrator for premium.
///
/// Answers 409 when the session already has premium, from the header or
/// from an earlier grant.
#[instrument(skip_all, fields(user = %user.user_id))]
pub async fn request_premium(
    State(server): State<ToolServer>,
    user: UserSession,
) -> ApiResult<Json<UserRecord>> {
    if user.session.is_premium_user() {
        return Err(ApiError::conflict("Already a premium member"));
    }
    Ok(Json(server.catalog().request_premium(&user.user_id).await?))
}
