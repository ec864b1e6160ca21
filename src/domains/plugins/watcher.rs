//! Plugin directory watcher.
//!
//! notify delivers events on its own thread; they are classified there and
//! forwarded over a channel to a tokio task that unloads deleted plugins.
//! New files are reported but never loaded: plugins arrive through upload.
//!
//! Events can arrive late or twice. A removal is only acted on while the
//! file is still gone, so a plugin uploaded again under the same name is
//! not unloaded by the old deletion.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::error::{PluginError, PluginResult};
use super::format::is_plugin_path;
use super::loader::PluginLoader;

/// A change to a plugin file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginEvent {
    Added(PathBuf),
    Removed(PathBuf),
}

/// Map a raw notify event to plugin events.
fn classify(event: Event) -> Vec<PluginEvent> {
    let mut paths = event.paths.into_iter();
    let events = match event.kind {
        EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            paths.map(PluginEvent::Removed).collect()
        }
        EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(RenameMode::To)) => {
            paths.map(PluginEvent::Added).collect()
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            let mut events = Vec::with_capacity(2);
            if let Some(from) = paths.next() {
                events.push(PluginEvent::Removed(from));
            }
            if let Some(to) = paths.next() {
                events.push(PluginEvent::Added(to));
            }
            events
        }
        _ => Vec::new(),
    };

    events
        .into_iter()
        .filter(|event| match event {
            PluginEvent::Added(path) | PluginEvent::Removed(path) => is_plugin_path(path),
        })
        .collect()
}

/// Apply one event to the loader.
fn handle_event(loader: &PluginLoader, event: PluginEvent) {
    match event {
        PluginEvent::Removed(path) if path.exists() => {
            debug!("Ignoring stale removal of {}", path.display());
        }
        PluginEvent::Removed(path) => {
            info!("Plugin file removed: {}", path.display());
            loader.unload(&path);
        }
        PluginEvent::Added(path) => {
            debug!("Plugin file added, waiting for upload: {}", path.display());
        }
    }
}

/// Watches the plugin directory for the lifetime of the value.
pub struct PluginWatcher {
    _watcher: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl PluginWatcher {
    /// Start watching `dir`, unloading plugins from `loader` as their
    /// files disappear. Must be called inside a tokio runtime.
    pub fn spawn(dir: &Path, loader: Arc<PluginLoader>) -> PluginResult<Self> {
        let dir = dir.canonicalize().map_err(|e| PluginError::io(dir, e))?;
        let (tx, mut rx) = mpsc::unbounded_channel::<PluginEvent>();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    for plugin_event in classify(event) {
                        let _ = tx.send(plugin_event);
                    }
                }
                Err(e) => warn!("Plugin watcher error: {}", e),
            },
            Config::default(),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        let task = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_event(&loader, event);
            }
        });

        info!("Watching plugin directory {}", dir.display());
        Ok(Self {
            _watcher: watcher,
            task,
        })
    }
}

impl Drop for PluginWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}
