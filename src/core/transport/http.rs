//! HTTP listener for the tools API.
//!
//! Serves the tool routes with request tracing and optional CORS, and shuts
//! down gracefully on Ctrl+C or SIGTERM.

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::config::HttpConfig;
use super::error::{TransportError, TransportResult};
use super::routes::router;
use crate::core::ToolServer;

/// Binds the configured address and serves [`router`] on it.
pub struct HttpTransport {
    config: HttpConfig,
}

impl HttpTransport {
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    pub fn address(&self) -> String {
        self.config.address()
    }

    /// The full application: routes plus body limit, tracing and CORS layers.
    pub fn app(&self, server: ToolServer) -> Router {
        let mut app = router(server)
            .layer(DefaultBodyLimit::max(self.config.max_body_bytes))
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app = app.layer(cors);
        }

        app
    }

    /// Run the HTTP transport until a shutdown signal arrives.
    pub async fn run(self, server: ToolServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.app(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (CORS {})", addr, cors_status);
        info!("  → Tools:   GET /api/tools");
        info!("  → Execute: POST /{{slug}}/execute");
        info!("  → Health:  GET /health");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(TransportError::Serve)?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use crate::domains::catalog::ToolCatalog;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn server(dir: &TempDir) -> ToolServer {
        let mut config = Config::default();
        config.plugins.dir = dir.path().join("plugins");
        config.plugins.watch = false;
        ToolServer::with_catalog(config, ToolCatalog::in_memory().await.unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let dir = TempDir::new().unwrap();
        let transport = HttpTransport::new(HttpConfig::default());

        let request = Request::get("/health")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .unwrap();
        let response = transport.app(server(&dir).await).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_cors_disabled() {
        let dir = TempDir::new().unwrap();
        let transport = HttpTransport::new(HttpConfig {
            enable_cors: false,
            ..HttpConfig::default()
        });

        let request = Request::get("/health")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .unwrap();
        let response = transport.app(server(&dir).await).oneshot(request).await.unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
