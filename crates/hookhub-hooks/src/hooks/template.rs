//! Template hooks: plugins contribute text fragments to named slots.
//!
//! [`TemplateHook`] is one slot; [`TemplateHooks`] maps names to slots and
//! creates them lazily. Calling a slot returns the fragments in
//! registration order and leaves joining/escaping to the renderer (see
//! [`crate::render`]).

use std::fmt;
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use hookhub_core::{HookArgs, HooksResult};

use super::members::MemberList;

/// A piece of text returned by a template callback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// The text itself.
    pub text: String,
    /// Whether the text is already safe markup and must not be escaped.
    pub safe: bool,
}

impl Fragment {
    /// Plain text; escaped when rendered with autoescape on.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            safe: false,
        }
    }

    /// Trusted markup; never escaped.
    pub fn safe(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            safe: true,
        }
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Fragment {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

/// A text-producing callback.
///
/// Implemented for every `Fn(&HookArgs) -> HooksResult<Fragment>`.
pub trait TemplateCallback: Send + Sync {
    /// Produces this callback's fragment.
    fn render(&self, args: &HookArgs) -> HooksResult<Fragment>;

    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> TemplateCallback for F
where
    F: Fn(&HookArgs) -> HooksResult<Fragment> + Send + Sync,
{
    fn render(&self, args: &HookArgs) -> HooksResult<Fragment> {
        self(args)
    }
}

/// One template slot: an ordered list of callbacks.
pub struct TemplateHook {
    providing_args: Vec<String>,
    callbacks: MemberList<Arc<dyn TemplateCallback>>,
}

impl TemplateHook {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self {
            providing_args: Vec::new(),
            callbacks: MemberList::new(),
        }
    }

    /// Documents the argument names this slot passes along.
    pub fn with_providing_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.providing_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the documented argument names.
    pub fn providing_args(&self) -> &[String] {
        &self.providing_args
    }

    /// Appends a callback; the same callback may be registered twice.
    pub fn register(&self, callback: Arc<dyn TemplateCallback>) {
        self.callbacks.push(callback);
    }

    /// Appends a closure and returns the handle needed to unregister it.
    pub fn register_fn<F>(&self, callback: F) -> Arc<dyn TemplateCallback>
    where
        F: Fn(&HookArgs) -> HooksResult<Fragment> + Send + Sync + 'static,
    {
        let callback: Arc<dyn TemplateCallback> = Arc::new(callback);
        self.register(callback.clone());
        callback
    }

    /// Removes the first matching callback; absent callbacks are ignored.
    pub fn unregister(&self, callback: &Arc<dyn TemplateCallback>) -> bool {
        self.callbacks.remove(callback)
    }

    /// Removes every callback.
    pub fn unregister_all(&self) -> usize {
        self.callbacks.clear()
    }

    /// Returns the registered callbacks in order.
    pub fn callbacks(&self) -> Vec<Arc<dyn TemplateCallback>> {
        self.callbacks.snapshot()
    }

    /// Returns the number of callbacks.
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    /// Returns whether the slot has no callbacks.
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Calls every callback with the same arguments and returns their
    /// fragments in registration order. The first failure aborts the call.
    pub fn call(&self, args: &HookArgs) -> HooksResult<Vec<Fragment>> {
        self.callbacks
            .snapshot()
            .iter()
            .map(|callback| callback.render(args))
            .collect()
    }
}

impl Default for TemplateHook {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TemplateHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateHook")
            .field("providing_args", &self.providing_args)
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

/// Name → template slot dispatcher.
#[derive(Debug, Default)]
pub struct TemplateHooks {
    slots: DashMap<String, Arc<TemplateHook>>,
}

impl TemplateHooks {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    fn get_or_create(&self, name: &str) -> Arc<TemplateHook> {
        if let Some(slot) = self.get(name) {
            return slot;
        }
        self.slots
            .entry(name.to_string())
            .or_insert_with(|| {
                debug!(hook = %name, "Template hook created");
                Arc::new(TemplateHook::new())
            })
            .clone()
    }

    /// Registers a callback under `name`, creating the slot if needed.
    pub fn register(&self, name: &str, callback: Arc<dyn TemplateCallback>) {
        let slot = self.get_or_create(name);
        info!(hook = %name, callback = %callback.name(), "Template callback registered");
        slot.register(callback);
    }

    /// Registers a closure under `name` and returns its handle.
    pub fn register_fn<F>(&self, name: &str, callback: F) -> Arc<dyn TemplateCallback>
    where
        F: Fn(&HookArgs) -> HooksResult<Fragment> + Send + Sync + 'static,
    {
        let callback: Arc<dyn TemplateCallback> = Arc::new(callback);
        self.register(name, callback.clone());
        callback
    }

    /// Unregisters a callback from `name`; unknown names are ignored.
    pub fn unregister(&self, name: &str, callback: &Arc<dyn TemplateCallback>) -> bool {
        self.get(name)
            .map(|slot| slot.unregister(callback))
            .unwrap_or(false)
    }

    /// Empties the slot `name` but keeps it known.
    pub fn unregister_all(&self, name: &str) {
        if let Some(slot) = self.get(name) {
            let count = slot.unregister_all();
            debug!(hook = %name, count, "Template hook emptied");
        }
    }

    /// Calls the slot `name`; unknown names yield no fragments.
    pub fn call(&self, name: &str, args: &HookArgs) -> HooksResult<Vec<Fragment>> {
        match self.get(name) {
            Some(slot) => slot.call(args),
            None => {
                debug!(hook = %name, "Unknown template hook called");
                Ok(Vec::new())
            }
        }
    }

    /// Returns the slot registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<TemplateHook>> {
        self.slots.get(name).map(|entry| entry.value().clone())
    }

    /// Returns whether `name` is known.
    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    /// Forgets every slot.
    pub fn clear(&self) {
        self.slots.clear();
    }
}

/// The process-wide template hook dispatcher.
pub fn templates() -> &'static TemplateHooks {
    static TEMPLATES: LazyLock<TemplateHooks> = LazyLock::new(TemplateHooks::new);
    &TEMPLATES
}
