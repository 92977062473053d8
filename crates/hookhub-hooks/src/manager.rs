//! Plugin manager: load-phase lifecycle for all plugins.
//!
//! Registries assume they are populated before the host starts serving.
//! The manager tracks that boundary: call [`PluginManager::finish_loading`]
//! once startup is done, and any later load is still honored but logged.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, info, warn};

use hookhub_core::{HooksError, HooksResult};

use crate::registry::{Plugin, PluginInfo, PluginRegistry};

/// Manages plugin load and unload.
#[derive(Debug, Default)]
pub struct PluginManager {
    /// Plugin registry.
    plugin_registry: PluginRegistry,
    /// Set once the load phase is over.
    loading_finished: AtomicBool,
}

impl PluginManager {
    /// Creates a new plugin manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a plugin to the hook registries and records it.
    ///
    /// Fails with `Conflict` if a plugin with the same id is loaded; a
    /// failing `Plugin::register` is propagated and the plugin is not
    /// recorded. A plugin that registered but could not be recorded is
    /// unregistered again.
    pub fn load(&self, plugin: Arc<dyn Plugin>) -> HooksResult<PluginInfo> {
        let info = plugin.info();

        if self.plugin_registry.contains(&info.id) {
            return Err(HooksError::conflict(format!(
                "Plugin '{}' is already registered",
                info.id
            )));
        }

        if self.is_loading_finished() {
            warn!(
                plugin_id = %info.id,
                "Plugin loaded after the load phase; registries may already be serving"
            );
        }

        plugin.register().inspect_err(|e| {
            error!(plugin_id = %info.id, error = %e, "Plugin registration failed");
        })?;

        let info = match self.plugin_registry.insert(plugin.clone()) {
            Ok(info) => info,
            Err(e) => {
                error!(
                    plugin_id = %info.id,
                    error = %e,
                    "Plugin could not be recorded; detaching"
                );
                plugin.unregister();
                return Err(e);
            }
        };

        info!(
            plugin_id = %info.id,
            name = %info.name,
            version = %info.version,
            "Plugin loaded"
        );

        Ok(info)
    }

    /// Detaches and forgets a plugin. Fails with `NotFound` if unknown.
    pub fn unload(&self, plugin_id: &str) -> HooksResult<()> {
        let plugin = self.plugin_registry.remove(plugin_id)?;
        plugin.unregister();

        info!(plugin_id = %plugin_id, "Plugin unloaded");
        Ok(())
    }

    /// Unloads every plugin, most recently loaded first. Returns how many
    /// were unloaded.
    pub fn unload_all(&self) -> usize {
        let plugins = self.plugin_registry.list();
        let mut unloaded = 0;

        for info in plugins.iter().rev() {
            match self.unload(&info.id) {
                Ok(()) => unloaded += 1,
                Err(e) => error!(plugin_id = %info.id, error = %e, "Error unloading plugin"),
            }
        }

        info!(count = unloaded, "All plugins unloaded");
        unloaded
    }

    /// Marks the end of the load phase.
    pub fn finish_loading(&self) {
        self.loading_finished.store(true, Ordering::Release);
        info!(plugins = self.count(), "Plugin loading finished");
    }

    /// Returns whether [`finish_loading`](Self::finish_loading) was called.
    pub fn is_loading_finished(&self) -> bool {
        self.loading_finished.load(Ordering::Acquire)
    }

    /// Lists all loaded plugins in load order.
    pub fn list(&self) -> Vec<PluginInfo> {
        self.plugin_registry.list()
    }

    /// Gets a loaded plugin by id.
    pub fn get(&self, plugin_id: &str) -> Option<Arc<dyn Plugin>> {
        self.plugin_registry.get(plugin_id)
    }

    pub fn contains(&self, plugin_id: &str) -> bool {
        self.plugin_registry.contains(plugin_id)
    }

    pub fn count(&self) -> usize {
        self.plugin_registry.count()
    }

    /// Returns the plugin registry.
    pub fn plugin_registry(&self) -> &PluginRegistry {
        &self.plugin_registry
    }
}
