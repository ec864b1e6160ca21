//! Premium gating as an axum middleware.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::{info, warn};

use super::policy::{check_access, AccessDecision};
use super::session::SessionState;
use crate::domains::catalog::ToolCatalog;

/// Redirect requests for premium tools the session may not open.
///
/// Logged-in users are recorded in the catalog on the way through, and a
/// premium grant stored there counts as much as the premium header. The
/// merged session is left in the request extensions for handlers.
pub async fn premium_gate(
    State(catalog): State<Arc<ToolCatalog>>,
    mut request: Request,
    next: Next,
) -> Response {
    let mut session = SessionState::from_headers(request.headers());
    if let Some(id) = session.user_id.clone() {
        match catalog.touch_user(&id).await {
            Ok(user) => session.premium |= user.premium,
            Err(e) => warn!("Could not record user {}: {}", id, e),
        }
    }
    request.extensions_mut().insert(session.clone());

    let tools = match catalog.all_tools().await {
        Ok(tools) => tools,
        Err(e) => {
            warn!("Could not read tool records, not gating: {}", e);
            Vec::new()
        }
    };

    match check_access(request.uri().path(), &session, &tools) {
        AccessDecision::Allow => next.run(request).await,
        AccessDecision::Redirect(location) => {
            info!(
                "Premium tool {} refused for user {:?}",
                request.uri().path(),
                session.user_id
            );
            Redirect::to(location).into_response()
        }
    }
}
