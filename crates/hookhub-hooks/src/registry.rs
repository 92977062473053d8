//! Plugin registry: stores loaded plugin instances and metadata.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::info;

use hookhub_core::{HooksError, HooksResult};

/// Metadata about a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Unique plugin identifier.
    pub id: String,
    /// Human-readable plugin name.
    pub name: String,
    /// Plugin version string.
    pub version: String,
    /// Plugin description.
    #[serde(default)]
    pub description: String,
    /// Author or maintainer.
    #[serde(default)]
    pub author: String,
}

/// A unit of extension attached to the hook registries during the load
/// phase.
///
/// `register` is where a plugin connects its receivers, callbacks, form
/// factories, view hook types and mixins. Everything it attaches there it
/// should detach again in `unregister`.
pub trait Plugin: Send + Sync + fmt::Debug {
    /// Returns plugin metadata.
    fn info(&self) -> PluginInfo;

    /// Attaches the plugin to the hook registries.
    fn register(&self) -> HooksResult<()>;

    /// Detaches the plugin from the hook registries.
    fn unregister(&self) {}
}

struct Entry {
    info: PluginInfo,
    plugin: Arc<dyn Plugin>,
}

/// Registry of loaded plugins, in load order.
#[derive(Default)]
pub struct PluginRegistry {
    entries: RwLock<Vec<Entry>>,
}

impl PluginRegistry {
    /// Creates a new empty plugin registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a plugin. Fails with `Conflict` if its id is taken.
    pub fn insert(&self, plugin: Arc<dyn Plugin>) -> HooksResult<PluginInfo> {
        let info = plugin.info();
        let mut entries = self.entries.write();

        if entries.iter().any(|e| e.info.id == info.id) {
            return Err(HooksError::conflict(format!(
                "Plugin '{}' is already registered",
                info.id
            )));
        }

        info!(
            plugin_id = %info.id,
            name = %info.name,
            version = %info.version,
            "Registering plugin"
        );

        entries.push(Entry {
            info: info.clone(),
            plugin,
        });
        Ok(info)
    }

    /// Removes a plugin by id. Fails with `NotFound` if unknown.
    pub fn remove(&self, plugin_id: &str) -> HooksResult<Arc<dyn Plugin>> {
        let mut entries = self.entries.write();
        let index = entries
            .iter()
            .position(|e| e.info.id == plugin_id)
            .ok_or_else(|| HooksError::not_found(format!("Plugin '{plugin_id}' not found")))?;

        Ok(entries.remove(index).plugin)
    }

    /// Gets a plugin by id.
    pub fn get(&self, plugin_id: &str) -> Option<Arc<dyn Plugin>> {
        self.entries
            .read()
            .iter()
            .find(|e| e.info.id == plugin_id)
            .map(|e| e.plugin.clone())
    }

    /// Lists plugin metadata in load order.
    pub fn list(&self) -> Vec<PluginInfo> {
        self.entries.read().iter().map(|e| e.info.clone()).collect()
    }

    /// Returns plugin count.
    pub fn count(&self) -> usize {
        self.entries.read().len()
    }

    /// Checks whether a plugin is registered.
    pub fn contains(&self, plugin_id: &str) -> bool {
        self.entries.read().iter().any(|e| e.info.id == plugin_id)
    }
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<String> = self.entries.read().iter().map(|e| e.info.id.clone()).collect();
        f.debug_struct("PluginRegistry").field("plugins", &ids).finish()
    }
}
