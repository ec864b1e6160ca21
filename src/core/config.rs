//! Runtime settings.
//!
//! Defaults first, then a `.env` file if one exists, then `ITTOOLS_*`
//! variables from the process environment.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::transport::HttpConfig;
use crate::domains::plugins::WasmLimits;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub http: HttpConfig,
    pub plugins: PluginsConfig,
    pub catalog: CatalogConfig,
    pub security: SecurityConfig,
}

/// Name and version reported by `GET /` and `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level directive. `RUST_LOG` directives are added on top.
    pub level: String,
    pub with_timestamps: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginsConfig {
    /// Scanned at startup. Uploads are written here.
    pub dir: PathBuf,

    /// Unload plugins whose file disappears from `dir`.
    pub watch: bool,

    /// Fuel and memory bounds for each WebAssembly tool call.
    pub wasm: WasmLimits,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// SQLite database holding tool records, users and favourites. In
    /// memory when unset.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Accept plugin files that are symlinks. The link target must still
    /// resolve inside the plugin directory.
    pub allow_symlinks: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "ittools-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            http: HttpConfig::default(),
            plugins: PluginsConfig {
                dir: PathBuf::from("plugins"),
                watch: true,
                wasm: WasmLimits::default(),
            },
            catalog: CatalogConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();
        let var = |name: &str| std::env::var(name).ok();

        if let Some(name) = var("ITTOOLS_SERVER_NAME") {
            config.server.name = name;
        }
        if let Some(level) = var("ITTOOLS_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(flag) = var("ITTOOLS_LOG_TIMESTAMPS").as_deref().and_then(parse_flag) {
            config.logging.with_timestamps = flag;
        }

        config.http = HttpConfig::from_env();

        if let Some(dir) = var("ITTOOLS_PLUGIN_DIR") {
            config.plugins.dir = PathBuf::from(dir);
        }
        if let Some(flag) = var("ITTOOLS_PLUGIN_WATCH").as_deref().and_then(parse_flag) {
            config.plugins.watch = flag;
        }
        if let Some(fuel) = var("ITTOOLS_WASM_FUEL").and_then(|v| v.trim().parse().ok()) {
            config.plugins.wasm.fuel = fuel;
        }
        if let Some(bytes) = var("ITTOOLS_WASM_MAX_MEMORY_BYTES").and_then(|v| v.trim().parse().ok()) {
            config.plugins.wasm.max_memory_bytes = bytes;
        }
        info!(
            "Plugin directory: {} (watch: {})",
            config.plugins.dir.display(),
            config.plugins.watch
        );

        config.catalog.path = var("ITTOOLS_CATALOG_PATH").map(PathBuf::from);
        match &config.catalog.path {
            Some(path) => info!("Tool catalog persisted to {}", path.display()),
            None => warn!("ITTOOLS_CATALOG_PATH not set, tool records live in memory only"),
        }

        if let Some(flag) = var("ITTOOLS_ALLOW_SYMLINKS").as_deref().and_then(parse_flag) {
            config.security.allow_symlinks = flag;
        }

        config
    }
}

/// Parse a boolean-ish environment value. Unrecognised text yields `None`
/// so the caller keeps its default.
pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Tests touching process env must not interleave.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_plugin_settings_from_env() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("ITTOOLS_PLUGIN_DIR", "/tmp/ittools-plugins");
            std::env::set_var("ITTOOLS_PLUGIN_WATCH", "off");
        }

        unsafe {
            std::env::set_var("ITTOOLS_WASM_FUEL", "5000");
            std::env::set_var("ITTOOLS_WASM_MAX_MEMORY_BYTES", "lots");
        }

        let config = Config::from_env();
        assert_eq!(config.plugins.dir, PathBuf::from("/tmp/ittools-plugins"));
        assert!(!config.plugins.watch);
        assert_eq!(config.plugins.wasm.fuel, 5000);
        assert_eq!(
            config.plugins.wasm.max_memory_bytes,
            WasmLimits::default().max_memory_bytes
        );

        unsafe {
            std::env::remove_var("ITTOOLS_PLUGIN_DIR");
            std::env::remove_var("ITTOOLS_PLUGIN_WATCH");
            std::env::remove_var("ITTOOLS_WASM_FUEL");
            std::env::remove_var("ITTOOLS_WASM_MAX_MEMORY_BYTES");
        }
    }

    #[test]
    fn test_unset_catalog_path_means_memory() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("ITTOOLS_CATALOG_PATH");
        }
        assert!(Config::from_env().catalog.path.is_none());
    }

    #[test]
    fn test_unparseable_flag_keeps_default() {
        let _guard = ENV_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("ITTOOLS_LOG_TIMESTAMPS", "sometimes");
        }
        assert!(Config::from_env().logging.with_timestamps);
        unsafe {
            std::env::remove_var("ITTOOLS_LOG_TIMESTAMPS");
        }
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.plugins.dir, PathBuf::from("plugins"));
        assert!(config.plugins.watch);
        assert!(!config.security.allow_symlinks);
        assert!(config.catalog.path.is_none());
    }
}
