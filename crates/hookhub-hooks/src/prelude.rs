//! Prelude for convenient imports.

pub use hookhub_core::{ErrorKind, HookArgs, HooksError, HooksResult, PrefixPattern, Sender};

pub use crate::hooks::form::{FormFactory, FormGroup, FormHook, HookForm};
pub use crate::hooks::model::{FieldDef, FieldKind, ModelBase, ModelHooks, ModelSchema};
pub use crate::hooks::search::{SearchField, SearchIndexHooks, SearchIndexSchema};
pub use crate::hooks::signal::{SignalEvent, SignalHandler, SignalHooks, signals};
pub use crate::hooks::template::{
    Fragment, TemplateCallback, TemplateHook, TemplateHooks, templates,
};
pub use crate::hooks::view::{ViewHook, ViewHookBase, ViewHookProxy, ViewHooks};
pub use crate::registry::{Plugin, PluginInfo};

pub use crate::{hook_args, plugin_info};
