//! HTTP routes.
//!
//! Handlers are thin adapters over `ToolServer`. Static routes take
//! precedence over the `/{slug}` tool routes.

use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::core::ToolServer;
use crate::domains::access::premium_gate;

pub mod admin;
pub mod favourites;
pub mod listing;
pub mod premium;
pub mod service;
pub mod tools;

/// Build the application router with premium gating applied.
pub fn router(server: ToolServer) -> Router {
    let catalog = server.catalog().clone();

    Router::new()
        .route("/", get(service::root))
        .route("/health", get(service::health))
        .route("/premium-required", get(service::premium_required))
        .route("/api/tools", get(listing::list_tools))
        .route("/api/tools/search", get(listing::search_tools))
        .route("/api/tools/{slug}", get(listing::tool_details))
        .route("/admin/tools", get(admin::list_tools))
        .route(
            "/admin/tools/{id}/toggle-enabled",
            post(admin::toggle_enabled),
        )
        .route(
            "/admin/tools/{id}/toggle-premium",
            post(admin::toggle_premium),
        )
        .route("/admin/tools/{id}", delete(admin::delete_tool))
        .route("/admin/plugins", post(admin::upload_plugin))
        .route("/admin/users", get(admin::list_users))
        .route(
            "/admin/users/{id}/toggle-premium",
            post(admin::toggle_user_premium),
        )
        .route("/admin/users/{id}", delete(admin::delete_user))
        .route("/admin/premium-requests", get(admin::premium_requests))
        .route(
            "/admin/premium-requests/{id}/deny",
            post(admin::deny_premium_request),
        )
        .route("/premium/request", post(premium::request_premium))
        .route("/favourites", get(favourites::list_favourites))
        .route(
            "/favourites/{slug}",
            post(favourites::add_favourite).delete(favourites::remove_favourite),
        )
        .route("/{slug}", get(tools::tool_page))
        .route("/{slug}/execute", post(tools::execute_tool))
        .layer(middleware::from_fn_with_state(catalog, premium_gate))
        .with_state(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::domains::access::{ADMIN_HEADER, PREMIUM_HEADER, USER_ID_HEADER};
    use crate::domains::catalog::ToolCatalog;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const PLUGIN: &str = "[plugin]\nname = \"starter\"\n\n\
        [[tools]]\nkind = \"basic-auth-generator\"\n\n\
        [[tools]]\nkind = \"ipv4-address-converter\"\n\n\
        [[tools]]\nkind = \"token-generator\"\n";

    struct Harness {
        _dir: TempDir,
        server: ToolServer,
    }

    async fn harness() -> Harness {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.plugins.dir = dir.path().join("plugins");
        config.plugins.watch = false;

        let server = ToolServer::with_catalog(config, ToolCatalog::in_memory().await.unwrap()).unwrap();
        let (_, records) = server
            .install_plugin("starter.toml", PLUGIN.as_bytes())
            .await
            .unwrap();
        let token = records.iter().find(|r| r.slug == "token-generator").unwrap();
        server.catalog().toggle_premium(token.id).await.unwrap();

        Harness { _dir: dir, server }
    }

    async fn send(server: &ToolServer, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = router(server.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, bytes.to_vec())
    }

    async fn send_json(server: &ToolServer, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = send(server, request).await;
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_execute_success_envelope() {
        let h = harness().await;
        let (status, body) = send_json(
            &h.server,
            post_json("/basic-auth-generator/execute", json!({ "username": "a", "password": "b" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "result": "Basic YTpi" }));
    }

    #[tokio::test]
    async fn test_execute_failure_envelope() {
        let h = harness().await;
        let (status, body) = send_json(
            &h.server,
            post_json("/ipv4-address-converter/execute", json!({ "ipv4": "999.1.1.1" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(false));
        assert!(body["error"].is_string());

        let request = Request::post("/basic-auth-generator/execute")
            .body(Body::from("{ not json"))
            .unwrap();
        let (status, body) = send_json(&h.server, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn test_execute_decimal_conversion() {
        let h = harness().await;
        let (_, body) = send_json(
            &h.server,
            post_json("/ipv4-address-converter/execute", json!({ "ipv4": "192.168.1.1" })),
        )
        .await;
        assert_eq!(body["result"]["decimal"], json!(3232235777u32));
    }

    #[tokio::test]
    async fn test_tool_page_and_unknown_tool() {
        let h = harness().await;
        let (status, bytes) = send(&h.server, get("/basic-auth-generator")).await;
        assert_eq!(status, StatusCode::OK);
        let page = String::from_utf8(bytes).unwrap();
        assert!(page.contains("Basic Auth Generator"));
        assert!(page.contains("/basic-auth-generator/execute"));

        let (status, body) = send_json(&h.server, get("/no-such-tool")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], json!(404));
    }

    #[tokio::test]
    async fn test_premium_tool_redirects() {
        let h = harness().await;

        let response = router(h.server.clone())
            .oneshot(post_json("/token-generator/execute", json!({ "includeNumbers": true })))
            .await
            .unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/premium-required"
        );

        let request = Request::post("/token-generator/execute")
            .header(USER_ID_HEADER, "7")
            .header(PREMIUM_HEADER, "true")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"length":8,"includeNumbers":true}"#))
            .unwrap();
        let (status, body) = send_json(&h.server, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));
    }

    fn post_as(uri: &str, user: &str) -> Request<Body> {
        Request::post(uri)
            .header(USER_ID_HEADER, user)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"length":8}"#))
            .unwrap()
    }

    fn as_admin(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(ADMIN_HEADER, "true")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_premium_gate_ignores_slug_spelling() {
        let h = harness().await;

        for uri in [
            "/token%2Dgenerator/execute",
            "/token%2dgenerator/execute",
            "/Token-Generator/execute",
            "/%54OKEN-GENERATOR/execute",
        ] {
            let response = router(h.server.clone())
                .oneshot(post_as(uri, "7"))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(
                response.headers().get(header::LOCATION).unwrap(),
                "/premium-required",
                "{uri}"
            );
        }

        let (status, bytes) = send(&h.server, get("/Basic-Auth-Generator")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(bytes).unwrap().contains("Basic Auth Generator"));
    }

    #[tokio::test]
    async fn test_granted_premium_opens_premium_tools() {
        let h = harness().await;

        let response = router(h.server.clone())
            .oneshot(post_as("/token-generator/execute", "7"))
            .await
            .unwrap();
        assert!(response.status().is_redirection());

        let (status, body) =
            send_json(&h.server, as_admin(Method::POST, "/admin/users/7/toggle-premium")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["premium"], json!(true));

        let (status, body) = send_json(&h.server, post_as("/token-generator/execute", "7")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], json!(true));

        let (status, _) =
            send(&h.server, as_admin(Method::POST, "/admin/users/nobody/toggle-premium")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_premium_request_and_deny() {
        let h = harness().await;

        let (status, _) = send(&h.server, Request::post("/premium/request").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send_json(&h.server, post_as("/premium/request", "8")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["requestPremium"], json!(true));

        let (_, body) = send_json(&h.server, as_admin(Method::GET, "/admin/premium-requests")).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], json!("8"));

        let (status, body) =
            send_json(&h.server, as_admin(Method::POST, "/admin/premium-requests/8/deny")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["requestPremium"], json!(false));
        assert_eq!(body["premium"], json!(false));

        let (_, body) = send_json(&h.server, as_admin(Method::GET, "/admin/premium-requests")).await;
        assert_eq!(body, json!([]));

        let request = Request::post("/premium/request")
            .header(USER_ID_HEADER, "9")
            .header(PREMIUM_HEADER, "true")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&h.server, request).await;
        assert_eq!(status, StatusCode::CONFLICT);

        send(&h.server, as_admin(Method::POST, "/admin/users/8/toggle-premium")).await;
        let (status, _) = send(&h.server, post_as("/premium/request", "8")).await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_admin_users() {
        let h = harness().await;
        send(&h.server, post_as("/favourites/basic-auth-generator", "5")).await;

        let (status, _) = send(&h.server, get("/admin/users")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (_, body) = send_json(&h.server, as_admin(Method::GET, "/admin/users")).await;
        assert_eq!(body[0]["id"], json!("5"));

        let (status, _) = send(&h.server, as_admin(Method::DELETE, "/admin/users/5")).await;
        assert_eq!(status, StatusCode::OK);
        let record = h
            .server
            .catalog()
            .get_by_slug("basic-auth-generator")
            .await
            .unwrap()
            .unwrap();
        assert!(!h.server.catalog().is_favourite("5", record.id).await.unwrap());

        let (status, _) = send(&h.server, as_admin(Method::DELETE, "/admin/users/5")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_disabled_tool_hidden_from_users() {
        let h = harness().await;
        let record = h
            .server
            .catalog()
            .get_by_slug("basic-auth-generator")
            .await
            .unwrap()
            .unwrap();
        h.server.catalog().toggle_enabled(record.id).await.unwrap();

        let (status, _) = send(&h.server, get("/basic-auth-generator")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let request = Request::get("/basic-auth-generator")
            .header(ADMIN_HEADER, "1")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&h.server, request).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send_json(&h.server, get("/api/tools")).await;
        let web = body["categories"]["Web"].as_array().cloned().unwrap_or_default();
        assert!(web.iter().all(|t| t["slug"] != json!("basic-auth-generator")));
    }

    #[tokio::test]
    async fn test_listing_and_search() {
        let h = harness().await;

        let (status, body) = send_json(&h.server, get("/api/tools")).await;
        assert_eq!(status, StatusCode::OK);
        let crypto = body["categories"]["Crypto"].as_array().unwrap();
        assert_eq!(crypto[0]["slug"], json!("token-generator"));
        assert_eq!(crypto[0]["premiumRequired"], json!(true));
        assert_eq!(crypto[0]["locked"], json!(true));
        assert_eq!(crypto[0]["available"], json!(true));

        let (_, body) = send_json(&h.server, get("/api/tools/search?q=ipv4")).await;
        assert_eq!(body["results"].as_array().unwrap().len(), 1);

        let (status, body) = send_json(&h.server, get("/api/tools/ipv4-address-converter")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], json!("Networking"));
        assert_eq!(body["inputSchema"]["type"], json!("object"));
    }

    #[tokio::test]
    async fn test_admin_requires_admin_session() {
        let h = harness().await;
        let (status, body) = send_json(&h.server, get("/admin/tools")).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["status"], json!(403));

        let request = Request::get("/admin/tools")
            .header(ADMIN_HEADER, "true")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send_json(&h.server, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_admin_toggle_and_delete() {
        let h = harness().await;
        let record = h
            .server
            .catalog()
            .get_by_slug("basic-auth-generator")
            .await
            .unwrap()
            .unwrap();

        let request = Request::post(format!("/admin/tools/{}/toggle-premium", record.id))
            .header(ADMIN_HEADER, "true")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send_json(&h.server, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["premiumRequired"], json!(true));

        let request = Request::delete(format!("/admin/tools/{}", record.id))
            .header(ADMIN_HEADER, "true")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send_json(&h.server, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"]["id"], json!(record.id));
        assert!(!h.server.is_loaded("basic-auth-generator"));

        let request = Request::delete(format!("/admin/tools/{}", record.id))
            .header(ADMIN_HEADER, "true")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&h.server, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    fn multipart(file_name: &str, content: &str) -> Request<Body> {
        let boundary = "ittools-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/toml\r\n\r\n\
             {content}\r\n\
             --{boundary}--\r\n"
        );
        Request::post("/admin/plugins")
            .header(ADMIN_HEADER, "true")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_plugin() {
        let h = harness().await;
        let manifest = "[plugin]\nname = \"numbers\"\n\n[[tools]]\nkind = \"roman-converter\"\n";

        let (status, body) = send_json(&h.server, multipart("numbers.toml", manifest)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["plugin"]["name"], json!("numbers"));
        assert_eq!(body["created"][0]["fileName"], json!("numbers.toml"));

        let (_, body) = send_json(
            &h.server,
            post_json("/roman-converter/execute", json!({ "inputText": "1984" })),
        )
        .await;
        assert_eq!(body["success"], json!(true));

        let (status, _) = send(&h.server, multipart("numbers.toml", manifest)).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(&h.server, multipart("../evil.toml", manifest)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&h.server, multipart("numbers.dll", manifest)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_wasm_plugin() {
        let h = harness().await;
        let module = crate::domains::plugins::wasm::fixtures::echo();

        let (status, body) = send_json(&h.server, multipart("echo.wasm", &module)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["created"][0]["slug"], json!("echo"));
        assert_eq!(body["created"][0]["category"], json!("Development"));

        let (status, body) = send_json(&h.server, post_json("/echo/execute", json!({ "a": 1 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "result": { "a": 1 } }));

        let (status, _) = send(&h.server, multipart("broken.wasm", "(module)")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_favourites() {
        let h = harness().await;

        let (status, _) = send(&h.server, Request::post("/favourites/basic-auth-generator").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let as_user = |method: Method, uri: &str| {
            Request::builder()
                .method(method)
                .uri(uri)
                .header(USER_ID_HEADER, "42")
                .body(Body::empty())
                .unwrap()
        };

        let (status, body) =
            send_json(&h.server, as_user(Method::POST, "/favourites/basic-auth-generator")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["favourite"], json!(true));

        let (_, body) = send_json(&h.server, as_user(Method::GET, "/favourites")).await;
        assert_eq!(body[0]["slug"], json!("basic-auth-generator"));

        let (status, _) = send(&h.server, as_user(Method::POST, "/favourites/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) =
            send_json(&h.server, as_user(Method::DELETE, "/favourites/basic-auth-generator")).await;
        assert_eq!(body["favourite"], json!(false));
        let (_, body) = send_json(&h.server, as_user(Method::GET, "/favourites")).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_service_routes() {
        let h = harness().await;

        let (status, body) = send_json(&h.server, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("healthy"));
        assert_eq!(body["plugins"], json!(1));

        let (_, body) = send_json(&h.server, get("/")).await;
        assert_eq!(body["tools"], json!(3));

        let (status, bytes) = send(&h.server, get("/premium-required")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(bytes).unwrap().contains("Premium required"));
    }
}
