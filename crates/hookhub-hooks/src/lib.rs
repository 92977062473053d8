//! # hookhub-hooks
//!
//! Hook registries for HookHub. Provides:
//!
//! - Form hooks: per-plugin form instances with collision-free prefixes
//! - Signal hooks: named events with sender filtering and `dispatch_uid`
//! - Template hooks: named text slots joined and escaped by [`render`]
//! - View hooks: per-request lifecycle participants behind one proxy
//! - Model and search-index hooks: field sets merged into host schemas
//! - Plugin lifecycle management over all of the above

#[macro_use]
mod macros;

pub mod hooks;
pub mod manager;
pub mod prelude;
pub mod registry;
pub mod render;

pub use hookhub_core::{HookArgs, HooksError, HooksResult};

pub use hooks::{
    FormGroup, FormHook, ModelHooks, SearchIndexHooks, Signal, SignalHooks, TemplateHook,
    TemplateHooks, ViewHookProxy, ViewHooks,
};
pub use manager::PluginManager;
pub use registry::{Plugin, PluginInfo, PluginRegistry};
