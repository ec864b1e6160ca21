//! HTTP listener settings.

use serde::{Deserialize, Serialize};

use crate::core::config::parse_flag;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Where and how the HTTP API listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,

    /// Send permissive CORS headers so browser front-ends on other origins
    /// can call the API.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,

    /// Largest accepted request body. Bounds plugin uploads and execute payloads.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_cors() -> bool {
    true
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            enable_cors: default_cors(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl HttpConfig {
    /// Read `ITTOOLS_HTTP_*` variables over the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("ITTOOLS_HTTP_HOST") {
            config.host = host;
        }
        if let Some(port) = env_parse("ITTOOLS_HTTP_PORT") {
            config.port = port;
        }
        if let Ok(cors) = std::env::var("ITTOOLS_HTTP_CORS") {
            config.enable_cors = parse_flag(&cors).unwrap_or(true);
        }
        if let Some(limit) = env_parse("ITTOOLS_HTTP_MAX_BODY_BYTES") {
            config.max_body_bytes = limit;
        }

        config
    }

    /// `host:port` for the listener.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
