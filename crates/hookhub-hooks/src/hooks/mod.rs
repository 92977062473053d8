//! Hook registries: one module per kind of extension point.

pub mod form;
pub mod members;
pub mod model;
pub mod search;
pub mod signal;
pub mod template;
pub mod view;

pub use form::{FormGroup, FormHook};
pub use model::ModelHooks;
pub use search::SearchIndexHooks;
pub use signal::{Signal, SignalHooks};
pub use template::{TemplateHook, TemplateHooks};
pub use view::{ViewHookProxy, ViewHooks};
