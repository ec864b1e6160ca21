//! Tool pages and execution.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use serde_json::Value;
use tracing::{info, instrument};

use crate::core::transport::api::ApiError;
use crate::core::{Resolution, ResolvedTool, ToolServer};
use crate::domains::access::{SessionState, PREMIUM_REQUIRED_PATH};
use crate::domains::tools::ToolOutput;

/// Resolve `slug` or produce the response that ends the request: 404 for
/// unknown tools, a redirect for premium ones the session may not open.
async fn resolve(
    server: &ToolServer,
    slug: &str,
    session: &SessionState,
) -> Result<ResolvedTool, Response> {
    match server.resolve_tool(slug, session).await {
        Ok(Resolution::Found(resolved)) => Ok(resolved),
        Ok(Resolution::NotFound) => {
            Err(ApiError::not_found(format!("Tool not found: {slug}")).into_response())
        }
        Ok(Resolution::PremiumRequired) => Err(Redirect::to(PREMIUM_REQUIRED_PATH).into_response()),
        Err(e) => Err(ApiError::from(e).into_response()),
    }
}

/// `GET /{slug}`: the tool's page.
#[instrument(skip_all, fields(slug = %slug))]
pub async fn tool_page(
    State(server): State<ToolServer>,
    session: SessionState,
    Path(slug): Path<String>,
) -> Response {
    match resolve(&server, &slug, &session).await {
        Ok(resolved) => Html(resolved.tool.ui()).into_response(),
        Err(response) => response,
    }
}

/// `POST /{slug}/execute`: run the tool against the JSON body.
///
/// An empty body is passed to the tool as `null`. Anything that reaches
/// the tool answers 200 with the result envelope. Premium tools are checked
/// again here against the decoded slug, whatever the path looked like.
#[instrument(skip_all, fields(slug = %slug, size = body.len()))]
pub async fn execute_tool(
    State(server): State<ToolServer>,
    session: SessionState,
    Path(slug): Path<String>,
    body: Bytes,
) -> Response {
    let resolved = match resolve(&server, &slug, &session).await {
        Ok(resolved) => resolved,
        Err(response) => return response,
    };

    let input = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        match serde_json::from_slice::<Value>(&body) {
            Ok(value) => value,
            Err(e) => {
                return Json(ToolOutput::failure(format!("Invalid request format: {e}")))
                    .into_response();
            }
        }
    };

    info!("Executing tool '{}'", resolved.tool.name());
    Json(server.execute(resolved.tool.as_ref(), &input)).into_response()
}
