//! Plugin loader.
//!
//! Tracks which plugin file provides which tool instances. Each file moves
//! through `absent -> loading -> loaded -> unloading -> absent`; a load of a
//! path in any tracked state is rejected.
//!
//! The path map and the slug index share one lock so an upload and an
//! unload of the same path cannot interleave.
//!
//! Manifests instantiate built-in tool kinds. WebAssembly modules are
//! compiled on first use of the shared runtime and provide one tool each.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::error::{PluginError, PluginResult};
use super::format::{is_plugin_path, PluginFormat};
use super::manifest::PluginManifest;
use super::wasm::{WasmLimits, WasmRuntime};
use crate::domains::tools::{registry, Tool, ToolInfo};

/// Lifecycle state of a tracked plugin file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginState {
    Loading,
    Loaded,
    Unloading,
}

/// Summary of a loaded plugin.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedPlugin {
    pub path: PathBuf,
    pub name: String,
    pub version: String,
    pub tools: Vec<ToolInfo>,
}

impl LoadedPlugin {
    /// File name of the plugin, as stored on tool records.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

struct PluginUnit {
    name: String,
    version: String,
    tools: Vec<Arc<dyn Tool>>,
}

impl PluginUnit {
    fn summary(&self, path: &Path) -> LoadedPlugin {
        LoadedPlugin {
            path: path.to_path_buf(),
            name: self.name.clone(),
            version: self.version.clone(),
            tools: self.tools.iter().map(|t| ToolInfo::of(t.as_ref())).collect(),
        }
    }
}

#[derive(Default)]
struct LoaderState {
    states: HashMap<PathBuf, PluginState>,
    units: HashMap<PathBuf, PluginUnit>,
    /// Slug -> (owning plugin path, instance).
    tools: BTreeMap<String, (PathBuf, Arc<dyn Tool>)>,
}

/// Loads, tracks and unloads plugin files.
#[derive(Default)]
pub struct PluginLoader {
    state: RwLock<LoaderState>,
    wasm_limits: WasmLimits,
    wasm: OnceCell<WasmRuntime>,
}

impl PluginLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// A loader running WebAssembly plugins under `limits`.
    pub fn with_wasm_limits(limits: WasmLimits) -> Self {
        Self {
            wasm_limits: limits,
            ..Self::default()
        }
    }

    fn wasm_runtime(&self) -> PluginResult<&WasmRuntime> {
        self.wasm
            .get_or_try_init(|| WasmRuntime::new(self.wasm_limits))
    }

    /// Read a plugin file fully into memory and load it.
    ///
    /// No handle to the file is kept, so it can be deleted while loaded.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn load_file(&self, path: &Path) -> PluginResult<LoadedPlugin> {
        if !path.exists() {
            return Err(PluginError::NotFound(path.to_path_buf()));
        }
        if !is_plugin_path(path) {
            return Err(PluginError::UnsupportedExtension(path.to_path_buf()));
        }

        let bytes = std::fs::read(path).map_err(|e| PluginError::io(path, e))?;
        self.load_bytes(&bytes, path)
    }

    /// Load a plugin from the bytes of a manifest or module, tracked under
    /// `path`. The extension of `path` selects the format.
    #[instrument(skip(self, bytes), fields(path = %path.display(), size = bytes.len()))]
    pub fn load_bytes(&self, bytes: &[u8], path: &Path) -> PluginResult<LoadedPlugin> {
        let Some(format) = PluginFormat::of(path) else {
            return Err(PluginError::UnsupportedExtension(path.to_path_buf()));
        };

        let key = normalize_path(path);
        {
            let mut state = self.state.write();
            if state.states.contains_key(&key) {
                warn!("Plugin {} is already tracked", key.display());
                return Err(PluginError::AlreadyLoaded(key));
            }
            state.states.insert(key.clone(), PluginState::Loading);
        }

        let result = self
            .instantiate(format, bytes, &key)
            .and_then(|unit| self.register(&key, unit));
        if result.is_err() {
            self.state.write().states.remove(&key);
        }

        let loaded = result?;
        info!(
            "Loaded plugin '{}' from {} ({} tools)",
            loaded.name,
            key.display(),
            loaded.tools.len()
        );
        Ok(loaded)
    }

    fn register(&self, key: &Path, unit: PluginUnit) -> PluginResult<LoadedPlugin> {
        let mut state = self.state.write();

        let slugs: Vec<String> = unit.tools.iter().map(|t| t.slug()).collect();
        for slug in &slugs {
            if let Some((owner, _)) = state.tools.get(slug) {
                return Err(PluginError::DuplicateTool {
                    slug: slug.clone(),
                    owner: owner.clone(),
                });
            }
        }

        for (slug, tool) in slugs.into_iter().zip(&unit.tools) {
            state.tools.insert(slug, (key.to_path_buf(), Arc::clone(tool)));
        }

        let loaded = unit.summary(key);
        state.units.insert(key.to_path_buf(), unit);
        state.states.insert(key.to_path_buf(), PluginState::Loaded);
        Ok(loaded)
    }

    /// Stop and remove every tool provided by `path`.
    ///
    /// Returns `None` when the path is not in the loaded state.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn unload(&self, path: &Path) -> Option<LoadedPlugin> {
        let key = normalize_path(path);

        let unit = {
            let mut state = self.state.write();
            match state.states.get(&key) {
                Some(PluginState::Loaded) => {}
                Some(other) => {
                    debug!("Plugin {} is {:?}, not unloading", key.display(), other);
                    return None;
                }
                None => {
                    info!("Plugin {} is not loaded", key.display());
                    return None;
                }
            }

            state.states.insert(key.clone(), PluginState::Unloading);
            state.tools.retain(|_, (owner, _)| *owner != key);
            state.units.remove(&key)
        };

        let summary = unit.map(|unit| {
            for tool in &unit.tools {
                tool.stop();
            }
            unit.summary(&key)
        });

        self.state.write().states.remove(&key);
        info!("Unloaded plugin {}", key.display());
        summary
    }

    /// Unload every loaded plugin.
    pub fn unload_all(&self) -> Vec<LoadedPlugin> {
        let paths: Vec<PathBuf> = self
            .state
            .read()
            .states
            .iter()
            .filter(|(_, s)| **s == PluginState::Loaded)
            .map(|(path, _)| path.clone())
            .collect();

        paths.iter().filter_map(|path| self.unload(path)).collect()
    }

    /// Load every plugin file in `dir`, skipping files that fail.
    #[instrument(skip(self), fields(dir = %dir.display()))]
    pub fn scan_dir(&self, dir: &Path) -> PluginResult<Vec<LoadedPlugin>> {
        let entries = std::fs::read_dir(dir).map_err(|e| PluginError::io(dir, e))?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && is_plugin_path(path))
            .collect();
        paths.sort();

        let mut loaded = Vec::with_capacity(paths.len());
        for path in paths {
            match self.load_file(&path) {
                Ok(plugin) => loaded.push(plugin),
                Err(e) => warn!("Skipping plugin {}: {}", path.display(), e),
            }
        }

        info!("Loaded {} plugins from {}", loaded.len(), dir.display());
        Ok(loaded)
    }

    /// All loaded tools, ordered by slug.
    pub fn tools(&self) -> Vec<Arc<dyn Tool>> {
        self.state
            .read()
            .tools
            .values()
            .map(|(_, tool)| Arc::clone(tool))
            .collect()
    }

    /// The loaded tool with the given slug.
    pub fn find_by_slug(&self, slug: &str) -> Option<Arc<dyn Tool>> {
        self.state
            .read()
            .tools
            .get(slug)
            .map(|(_, tool)| Arc::clone(tool))
    }

    /// Path of the plugin providing `slug`.
    pub fn owner_of(&self, slug: &str) -> Option<PathBuf> {
        self.state
            .read()
            .tools
            .get(slug)
            .map(|(owner, _)| owner.clone())
    }

    /// Current state of a plugin path, `None` when absent.
    pub fn state(&self, path: &Path) -> Option<PluginState> {
        self.state.read().states.get(&normalize_path(path)).copied()
    }

    /// Summaries of all loaded plugins, ordered by path.
    pub fn plugins(&self) -> Vec<LoadedPlugin> {
        let state = self.state.read();
        let mut plugins: Vec<LoadedPlugin> = state
            .units
            .iter()
            .map(|(path, unit)| unit.summary(path))
            .collect();
        plugins.sort_by(|a, b| a.path.cmp(&b.path));
        plugins
    }

    fn instantiate(
        &self,
        format: PluginFormat,
        bytes: &[u8],
        path: &Path,
    ) -> PluginResult<PluginUnit> {
        match format {
            PluginFormat::Manifest => instantiate_manifest(bytes, path),
            PluginFormat::Wasm => {
                let tool = self.wasm_runtime()?.compile(bytes, path)?;
                let name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| tool.name().to_string());
                Ok(PluginUnit {
                    name,
                    version: tool.version().to_string(),
                    tools: vec![Arc::new(tool)],
                })
            }
        }
    }
}

fn instantiate_manifest(bytes: &[u8], path: &Path) -> PluginResult<PluginUnit> {
    let manifest = PluginManifest::parse(bytes, path)?;

    let mut tools = Vec::new();
    for kind in manifest.kinds() {
        match registry::create(kind) {
            Some(tool) => tools.push(tool),
            None => warn!("Unknown tool kind '{}' in {}", kind, path.display()),
        }
    }

    if tools.is_empty() {
        return Err(PluginError::NoTools(path.to_path_buf()));
    }

    Ok(PluginUnit {
        name: manifest.plugin.name,
        version: manifest.plugin.version,
        tools,
    })
}

/// Key a plugin path so that the same file is tracked once whatever way it
/// was named. Works for files that no longer exist.
fn normalize_path(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            parent
                .canonicalize()
                .map(|p| p.join(name))
                .unwrap_or_else(|_| path.to_path_buf())
        }
        _ => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn manifest(name: &str, kinds: &[&str]) -> String {
        let mut text = format!("[plugin]\nname = \"{name}\"\nversion = \"1.0.0\"\n");
        for kind in kinds {
            text.push_str(&format!("\n[[tools]]\nkind = \"{kind}\"\n"));
        }
        text
    }

    fn write_plugin(dir: &TempDir, file: &str, name: &str, kinds: &[&str]) -> PathBuf {
        let path = dir.path().join(file);
        fs::write(&path, manifest(name, kinds)).unwrap();
        path
    }

    #[test]
    fn test_load_file_registers_tools() {
        let dir = TempDir::new().unwrap();
        let path = write_plugin(
            &dir,
            "web.toml",
            "web",
            &["basic-auth-generator", "url-encoder-decoder"],
        );

        let loader = PluginLoader::new();
        let loaded = loader.load_file(&path).unwrap();

        assert_eq!(loaded.name, "web");
        assert_eq!(loaded.file_name(), "web.toml");
        assert_eq!(loaded.tools.len(), 2);
        assert_eq!(loader.state(&path), Some(PluginState::Loaded));

        let tool = loader.find_by_slug("basic-auth-generator").unwrap();
        let result = tool
            .execute(&json!({ "username": "a", "password": "b" }))
            .unwrap();
        assert_eq!(result, json!("Basic YTpi"));
        assert_eq!(loader.owner_of("url-encoder-decoder"), Some(path.canonicalize().unwrap()));
    }

    #[test]
    fn test_duplicate_path_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_plugin(&dir, "web.toml", "web", &["slugify-string"]);

        let loader = PluginLoader::new();
        loader.load_file(&path).unwrap();

        let again = loader.load_file(&path);
        assert!(matches!(again, Err(PluginError::AlreadyLoaded(_))));
        assert_eq!(loader.tools().len(), 1);
    }

    #[test]
    fn test_duplicate_slug_rejected_atomically() {
        let dir = TempDir::new().unwrap();
        let first = write_plugin(&dir, "a.toml", "a", &["hash-text"]);
        let second = write_plugin(&dir, "b.toml", "b", &["roman-converter", "hash-text"]);

        let loader = PluginLoader::new();
        loader.load_file(&first).unwrap();

        let result = loader.load_file(&second);
        assert!(matches!(result, Err(PluginError::DuplicateTool { .. })));
        assert_eq!(loader.state(&second), None);
        assert!(loader.find_by_slug("roman-converter").is_none());
    }

    #[test]
    fn test_unknown_kinds_skipped() {
        let dir = TempDir::new().unwrap();
        let path = write_plugin(&dir, "mixed.toml", "mixed", &["nope", "chronometer"]);

        let loader = PluginLoader::new();
        let loaded = loader.load_file(&path).unwrap();
        assert_eq!(loaded.tools.len(), 1);
        assert_eq!(loaded.tools[0].slug, "chronometer");
    }

    #[test]
    fn test_no_tools_leaves_path_absent() {
        let dir = TempDir::new().unwrap();
        let path = write_plugin(&dir, "empty.toml", "empty", &["nope"]);

        let loader = PluginLoader::new();
        assert!(matches!(loader.load_file(&path), Err(PluginError::NoTools(_))));
        assert_eq!(loader.state(&path), None);

        // A failed load does not block a later one.
        fs::write(&path, manifest("empty", &["chronometer"])).unwrap();
        assert!(loader.load_file(&path).is_ok());
    }

    #[test]
    fn test_load_file_errors() {
        let dir = TempDir::new().unwrap();
        let loader = PluginLoader::new();

        let missing = dir.path().join("missing.toml");
        assert!(matches!(loader.load_file(&missing), Err(PluginError::NotFound(_))));

        let wrong = dir.path().join("plugin.dll");
        fs::write(&wrong, "MZ").unwrap();
        assert!(matches!(
            loader.load_file(&wrong),
            Err(PluginError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn test_unload_stops_tools() {
        let dir = TempDir::new().unwrap();
        let path = write_plugin(&dir, "crypto.toml", "crypto", &["token-generator"]);

        let loader = PluginLoader::new();
        loader.load_file(&path).unwrap();
        let held = loader.find_by_slug("token-generator").unwrap();
        let params = json!({ "length": 8, "includeNumbers": true });
        assert!(held.execute(&params).is_ok());

        let unloaded = loader.unload(&path).unwrap();
        assert_eq!(unloaded.name, "crypto");
        assert_eq!(loader.state(&path), None);
        assert!(loader.find_by_slug("token-generator").is_none());
        assert!(held.execute(&params).is_err());

        // Unloading again is a no-op.
        assert!(loader.unload(&path).is_none());
    }

    #[test]
    fn test_unload_after_file_deleted() {
        let dir = TempDir::new().unwrap();
        let path = write_plugin(&dir, "text.toml", "text", &["text-statistics"]);

        let loader = PluginLoader::new();
        loader.load_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(loader.unload(&path).is_some());
        assert!(loader.tools().is_empty());
    }

    #[test]
    fn test_load_bytes_and_unload_all() {
        let dir = TempDir::new().unwrap();
        let loader = PluginLoader::new();

        let a = dir.path().join("a.toml");
        let b = dir.path().join("b.toml");
        loader
            .load_bytes(manifest("a", &["json-minify"]).as_bytes(), &a)
            .unwrap();
        loader
            .load_bytes(manifest("b", &["json-prettify"]).as_bytes(), &b)
            .unwrap();
        assert_eq!(loader.plugins().len(), 2);

        let unloaded = loader.unload_all();
        assert_eq!(unloaded.len(), 2);
        assert!(loader.plugins().is_empty());
        assert!(loader.tools().is_empty());
    }

    #[test]
    fn test_scan_dir_skips_failures() {
        let dir = TempDir::new().unwrap();
        write_plugin(&dir, "good.toml", "good", &["git-cheatsheet"]);
        fs::write(dir.path().join("broken.toml"), "[plugin").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let loader = PluginLoader::new();
        let loaded = loader.scan_dir(dir.path()).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "good");
    }

    #[test]
    fn test_bundled_plugins_cover_every_kind() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("plugins");

        let loader = PluginLoader::new();
        loader.scan_dir(&dir).unwrap();

        let mut slugs: Vec<String> = loader.tools().iter().map(|t| t.slug()).collect();
        slugs.sort();
        let mut kinds = registry::kinds();
        kinds.sort();
        assert_eq!(slugs, kinds);
    }

    #[test]
    fn test_tools_ordered_by_slug() {
        let dir = TempDir::new().unwrap();
        let path = write_plugin(
            &dir,
            "mix.toml",
            "mix",
            &["xml-formatter", "chronometer", "hash-text"],
        );

        let loader = PluginLoader::new();
        loader.load_file(&path).unwrap();
        let slugs: Vec<String> = loader.tools().iter().map(|t| t.slug()).collect();
        assert_eq!(slugs, vec!["chronometer", "hash-text", "xml-formatter"]);
    }

    #[test]
    fn test_wasm_plugin_loads_and_unloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("echo.wasm");
        fs::write(&path, super::super::wasm::fixtures::echo()).unwrap();

        let loader = PluginLoader::new();
        let loaded = loader.load_file(&path).unwrap();
        assert_eq!(loaded.name, "echo");
        assert_eq!(loaded.version, "0.2.0");
        assert_eq!(loaded.tools[0].slug, "echo");

        let held = loader.find_by_slug("echo").unwrap();
        assert_eq!(held.execute(&json!({ "a": 1 })).unwrap(), json!({ "a": 1 }));

        loader.unload(&path).unwrap();
        assert!(loader.find_by_slug("echo").is_none());
        assert!(held.execute(&json!({ "a": 1 })).is_err());
    }

    #[test]
    fn test_wasm_limits_apply_to_loaded_modules() {
        let dir = TempDir::new().unwrap();
        let loader = PluginLoader::with_wasm_limits(WasmLimits {
            fuel: 50_000,
            ..WasmLimits::default()
        });

        loader
            .load_bytes(
                super::super::wasm::fixtures::spinning().as_bytes(),
                &dir.path().join("spin.wasm"),
            )
            .unwrap();
        let err = loader.find_by_slug("echo").unwrap().execute(&json!({})).unwrap_err();
        assert_eq!(err.message(), "Plugin exceeded its execution budget.");
    }

    /// The path map, the units and the slug index must agree.
    fn assert_consistent(loader: &PluginLoader) {
        let state = loader.state.read();
        for (path, plugin_state) in &state.states {
            assert_eq!(*plugin_state, PluginState::Loaded, "{} left mid-transition", path.display());
            assert!(state.units.contains_key(path));
        }
        for (path, unit) in &state.units {
            assert!(state.states.contains_key(path));
            for tool in &unit.tools {
                let owner = state.tools.get(&tool.slug()).map(|(owner, _)| owner);
                assert_eq!(owner, Some(path));
            }
        }
        for (slug, (owner, _)) in &state.tools {
            assert!(state.units.contains_key(owner), "{slug} points at a dropped unit");
        }
    }

    #[test]
    fn test_concurrent_load_and_unload_stay_consistent() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.toml");
        let b = dir.path().join("b.toml");
        let manifest_a = manifest("a", &["hash-text", "roman-converter"]);
        let manifest_b = manifest("b", &["hash-text"]);

        let loader = PluginLoader::new();
        let barrier = std::sync::Barrier::new(3);

        std::thread::scope(|scope| {
            scope.spawn(|| {
                barrier.wait();
                for _ in 0..200 {
                    let _ = loader.load_bytes(manifest_a.as_bytes(), &a);
                    loader.unload(&a);
                }
            });
            scope.spawn(|| {
                barrier.wait();
                for i in 0..200 {
                    let _ = loader.load_bytes(manifest_b.as_bytes(), &b);
                    if i % 3 == 0 {
                        loader.unload(&b);
                    }
                }
            });
            scope.spawn(|| {
                barrier.wait();
                for _ in 0..200 {
                    // Same path as the first thread: at most one load wins.
                    let _ = loader.load_bytes(manifest_a.as_bytes(), &a);
                    assert!(loader.tools().len() <= 2);
                }
            });
        });

        assert_consistent(&loader);
        for path in [&a, &b] {
            assert!(matches!(loader.state(path), None | Some(PluginState::Loaded)));
        }

        // Both plugins provide hash-text, so they are never loaded together.
        let loaded_a = loader.state(&a).is_some();
        let loaded_b = loader.state(&b).is_some();
        assert!(!(loaded_a && loaded_b));
        assert_eq!(loader.find_by_slug("hash-text").is_some(), loaded_a || loaded_b);
        assert_eq!(loader.find_by_slug("roman-converter").is_some(), loaded_a);
    }
}
