//! Service info, health and the premium landing page.

use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde_json::json;

use crate::core::ToolServer;
use crate::domains::tools::ui::escape_html;

/// Root handler - provides API info.
pub async fn root(State(server): State<ToolServer>) -> impl IntoResponse {
    Json(json!({
        "name": server.name(),
        "version": server.version(),
        "tools": server.loader().tools().len(),
        "endpoints": {
            "tools": "/api/tools",
            "search": "/api/tools/search?q=",
            "tool": "/{slug}",
            "execute": "/{slug}/execute",
            "favourites": "/favourites",
            "premium": "/premium/request",
            "admin": "/admin/tools",
            "users": "/admin/users",
            "health": "/health"
        }
    }))
}

/// Health check endpoint.
pub async fn health(State(server): State<ToolServer>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "plugins": server.loader().plugins().len(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Where premium-gated requests are redirected.
pub async fn premium_required(State(server): State<ToolServer>) -> impl IntoResponse {
    let name = escape_html(server.name());
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{name}</title></head>\n\
         <body><main><h1>Premium required</h1>\
         <p>This tool is only available to premium members.</p>\
         <p><a href=\"/\">Back to all tools</a></p></main></body>\n</html>\n"
    ))
}
