//! Tool server implementation and lifecycle management.
//!
//! `ToolServer` ties the plugin loader, the plugin directory and the tool
//! catalog together. HTTP handlers only talk to this type.
//!
//! ## Startup
//!
//! 1. Open the catalog (SQLite file or in-memory)
//! 2. Load every plugin file in the plugin directory
//! 3. Give every loaded tool a catalog record if it has none
//! 4. Watch the plugin directory for deletions

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, instrument, warn};

use super::config::Config;
use super::error::Result;
use crate::domains::access::SessionState;
use crate::domains::catalog::{CatalogError, ToolCatalog, ToolRecord};
use crate::domains::plugins::{
    LoadedPlugin, PluginError, PluginLoader, PluginStore, PluginWatcher,
};
use crate::domains::tools::{Tool, ToolOutput};

/// A tool resolved for a request.
#[derive(Clone)]
pub struct ResolvedTool {
    pub tool: Arc<dyn Tool>,
    pub record: Option<ToolRecord>,
}

/// Outcome of resolving a slug for a page or execute request.
pub enum Resolution {
    Found(ResolvedTool),
    NotFound,
    /// Premium tool the session may not open.
    PremiumRequired,
}

/// The main server state.
///
/// Cheap to clone; all parts are shared.
#[derive(Clone)]
pub struct ToolServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Loaded plugins and their tools.
    loader: Arc<PluginLoader>,

    /// Tool records and favourites.
    catalog: Arc<ToolCatalog>,

    /// Plugin files on disk.
    plugin_store: PluginStore,
}

impl ToolServer {
    /// Create a server with the given configuration.
    ///
    /// Opens the catalog and creates the plugin directory; plugins are not
    /// loaded until `start`.
    pub async fn new(config: Config) -> Result<Self> {
        let catalog = ToolCatalog::open(config.catalog.path.as_deref()).await?;
        Self::with_catalog(config, catalog)
    }

    /// Create a server around an existing catalog.
    pub fn with_catalog(config: Config, catalog: ToolCatalog) -> Result<Self> {
        let plugin_store =
            PluginStore::new(&config.plugins.dir, config.security.allow_symlinks);
        plugin_store.ensure_dir()?;

        let loader = PluginLoader::with_wasm_limits(config.plugins.wasm);

        Ok(Self {
            config: Arc::new(config),
            loader: Arc::new(loader),
            catalog: Arc::new(catalog),
            plugin_store,
        })
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn loader(&self) -> &Arc<PluginLoader> {
        &self.loader
    }

    pub fn catalog(&self) -> &Arc<ToolCatalog> {
        &self.catalog
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Load the plugin directory and create missing catalog records.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<Vec<LoadedPlugin>> {
        let plugins = self.loader.scan_dir(self.plugin_store.dir())?;
        for plugin in &plugins {
            self.catalog.sync_plugin(plugin).await?;
        }

        info!(
            "Started with {} plugins providing {} tools",
            plugins.len(),
            self.loader.tools().len()
        );
        Ok(plugins)
    }

    /// Start the plugin directory watcher, if enabled.
    ///
    /// The watcher stops when the returned value is dropped.
    pub fn watch(&self) -> Result<Option<PluginWatcher>> {
        if !self.config.plugins.watch {
            info!("Plugin directory watching disabled");
            return Ok(None);
        }
        let watcher = PluginWatcher::spawn(self.plugin_store.dir(), Arc::clone(&self.loader))?;
        Ok(Some(watcher))
    }

    /// Stop every loaded tool.
    pub fn shutdown(&self) {
        let unloaded = self.loader.unload_all();
        info!("Unloaded {} plugins", unloaded.len());
    }

    // ========================================================================
    // Tools
    // ========================================================================

    /// Find the tool behind a slug, ignoring case.
    ///
    /// Disabled tools are hidden from everyone but admins. Tools whose
    /// plugin is not loaded are unavailable.
    pub async fn find_tool(
        &self,
        slug: &str,
        session: &SessionState,
    ) -> Result<Option<ResolvedTool>> {
        let slug = slug.to_lowercase();
        let Some(tool) = self.loader.find_by_slug(&slug) else {
            return Ok(None);
        };
        let record = self.catalog.get_by_slug(&slug).await?;

        if record.as_ref().is_some_and(|r| !r.enabled) && !session.admin {
            return Ok(None);
        }

        Ok(Some(ResolvedTool { tool, record }))
    }

    /// Find the tool behind a slug for use: like `find_tool`, and premium
    /// tools also need an admin or premium session.
    pub async fn resolve_tool(&self, slug: &str, session: &SessionState) -> Result<Resolution> {
        let Some(resolved) = self.find_tool(slug, session).await? else {
            return Ok(Resolution::NotFound);
        };

        let premium_required = resolved.record.as_ref().is_some_and(|r| r.premium_required);
        if premium_required && !session.admin && !session.is_premium_user() {
            info!("Premium tool '{}' refused for {:?}", resolved.tool.name(), session.user_id);
            return Ok(Resolution::PremiumRequired);
        }

        Ok(Resolution::Found(resolved))
    }

    /// Run a tool and wrap the outcome into the response envelope.
    pub fn execute(&self, tool: &dyn Tool, input: &Value) -> ToolOutput {
        let result = tool.execute(input);
        if let Err(e) = &result {
            info!("Tool '{}' failed: {}", tool.name(), e);
        }
        ToolOutput::from_result(result)
    }

    // ========================================================================
    // Administration
    // ========================================================================

    /// Validate, load and save an uploaded plugin.
    ///
    /// The plugin is loaded from memory first; the file is only written
    /// once it loaded, and the load is rolled back if the write fails.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn install_plugin(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<(LoadedPlugin, Vec<ToolRecord>)> {
        let path = self.plugin_store.resolve(file_name)?;
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(PluginError::FileExists(path).into());
        }

        let plugin = self.loader.load_bytes(bytes, &path)?;

        if let Err(e) = self.plugin_store.write(file_name, bytes).await {
            warn!("Could not save plugin {}: {}", path.display(), e);
            self.loader.unload(&path);
            return Err(e.into());
        }

        let records = self.catalog.sync_plugin(&plugin).await?;
        Ok((plugin, records))
    }

    /// Delete a tool record with its favourites, its plugin file and the
    /// loaded plugin.
    #[instrument(skip(self))]
    pub async fn delete_tool(&self, id: i64) -> Result<ToolRecord> {
        let record = self
            .catalog
            .get_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(id))?;

        if let Some(owner) = self.loader.owner_of(&record.slug) {
            self.loader.unload(&owner);
        }

        if let Some(file_name) = record.file_name.as_deref().filter(|f| !f.is_empty()) {
            match self.plugin_store.resolve(file_name) {
                Ok(path) => {
                    self.loader.unload(&path);
                    self.plugin_store.remove(file_name).await?;
                }
                Err(e) => warn!("Not removing plugin file '{}': {}", file_name, e),
            }
        }

        Ok(self.catalog.delete_tool(id).await?)
    }

    /// Whether a tool slug maps to a loaded tool.
    pub fn is_loaded(&self, slug: &str) -> bool {
        self.loader.find_by_slug(slug).is_some()
    }
}
