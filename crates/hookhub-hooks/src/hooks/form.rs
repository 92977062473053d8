//! Form hooks: plugins contribute form factories, the core instantiates
//! all of them at once and validates/saves them as one group.
//!
//! Each instance gets a disambiguation prefix derived from its position
//! (`hook0`, `hook1`, ...) so several plugin forms can share one page.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use hookhub_core::config::hooks::FormHookConfig;
use hookhub_core::{HookArgs, HooksResult, PrefixPattern};

use super::members::MemberList;

/// A form-like object produced by a [`FormFactory`].
pub trait HookForm: Send {
    /// The disambiguation prefix this instance was built with.
    fn prefix(&self) -> &str;

    /// Validates the form, populating its own error state.
    fn is_valid(&mut self) -> bool;

    /// Persists the form and returns whatever the plugin wants to report.
    fn save(&mut self, args: &HookArgs) -> HooksResult<Value>;
}

/// Builds one [`HookForm`] per invocation.
///
/// Implemented for every `Fn(&str, &HookArgs) -> HooksResult<Box<dyn HookForm>>`.
pub trait FormFactory: Send + Sync {
    /// Instantiates the form with its prefix and the forwarded arguments.
    fn build(&self, prefix: &str, args: &HookArgs) -> HooksResult<Box<dyn HookForm>>;

    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> FormFactory for F
where
    F: Fn(&str, &HookArgs) -> HooksResult<Box<dyn HookForm>> + Send + Sync,
{
    fn build(&self, prefix: &str, args: &HookArgs) -> HooksResult<Box<dyn HookForm>> {
        self(prefix, args)
    }
}

/// A registry of form factories.
pub struct FormHook {
    providing_args: Vec<String>,
    prefix: PrefixPattern,
    factories: MemberList<Arc<dyn FormFactory>>,
}

impl FormHook {
    /// Creates an empty form hook using the `hook%d` prefix pattern.
    pub fn new() -> Self {
        Self {
            providing_args: Vec::new(),
            prefix: PrefixPattern::default(),
            factories: MemberList::new(),
        }
    }

    /// Creates an empty form hook with the configured default pattern.
    pub fn from_config(config: &FormHookConfig) -> HooksResult<Self> {
        Ok(Self::new().with_prefix(PrefixPattern::parse(&config.prefix_pattern)?))
    }

    /// Documents the argument names this hook passes along.
    pub fn with_providing_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.providing_args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the default prefix pattern.
    pub fn with_prefix(mut self, pattern: PrefixPattern) -> Self {
        self.prefix = pattern;
        self
    }

    /// Returns the documented argument names.
    pub fn providing_args(&self) -> &[String] {
        &self.providing_args
    }

    /// Returns the default prefix pattern.
    pub fn prefix_pattern(&self) -> &PrefixPattern {
        &self.prefix
    }

    /// Registers a factory. The same factory may be registered twice; it
    /// will then be instantiated twice.
    pub fn register(&self, factory: Arc<dyn FormFactory>) {
        info!(form = %factory.name(), "Form factory registered");
        self.factories.push(factory);
    }

    /// Registers a closure and returns the handle needed to unregister it.
    pub fn register_fn<F>(&self, factory: F) -> Arc<dyn FormFactory>
    where
        F: Fn(&str, &HookArgs) -> HooksResult<Box<dyn HookForm>> + Send + Sync + 'static,
    {
        let factory: Arc<dyn FormFactory> = Arc::new(factory);
        self.register(factory.clone());
        factory
    }

    /// Unregisters the first matching factory; returns whether one was found.
    pub fn unregister(&self, factory: &Arc<dyn FormFactory>) -> bool {
        let removed = self.factories.remove(factory);
        debug!(form = %factory.name(), removed, "Form factory unregistered");
        removed
    }

    /// Returns the registered factories in order.
    pub fn factories(&self) -> Vec<Arc<dyn FormFactory>> {
        self.factories.snapshot()
    }

    /// Returns the number of registered factories.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns whether no factory is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Drops every registered factory.
    pub fn clear(&self) {
        let count = self.factories.clear();
        debug!(count, "Form hook cleared");
    }

    /// Instantiates every factory with the default prefix pattern.
    pub fn invoke(&self, args: &HookArgs) -> HooksResult<FormGroup> {
        self.invoke_with_prefix(&self.prefix, args)
    }

    /// Instantiates every factory, in registration order, with the token
    /// `pattern.format(index)` and the forwarded arguments.
    ///
    /// The first factory that fails aborts the invocation and its error is
    /// returned unchanged.
    pub fn invoke_with_prefix(
        &self,
        pattern: &PrefixPattern,
        args: &HookArgs,
    ) -> HooksResult<FormGroup> {
        let factories = self.factories.snapshot();

        debug!(
            pattern = %pattern,
            form_count = factories.len(),
            "Instantiating hooked forms"
        );

        let forms = factories
            .iter()
            .enumerate()
            .map(|(index, factory)| factory.build(&pattern.format(index), args))
            .collect::<HooksResult<Vec<_>>>()?;

        Ok(FormGroup { forms })
    }
}

impl Default for FormHook {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FormHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormHook")
            .field("providing_args", &self.providing_args)
            .field("prefix", &self.prefix)
            .field("factories", &self.factories.len())
            .finish()
    }
}

/// The forms produced by one [`FormHook`] invocation.
pub struct FormGroup {
    forms: Vec<Box<dyn HookForm>>,
}

impl FormGroup {
    /// Validates every form and returns `true` only if all are valid.
    ///
    /// Never short-circuits: each form gets to populate its errors.
    pub fn is_valid(&mut self) -> bool {
        let mut valid = true;
        for form in &mut self.forms {
            valid &= form.is_valid();
        }
        valid
    }

    /// Saves every form with the forwarded arguments and returns their
    /// results in registration order.
    pub fn save(&mut self, args: &HookArgs) -> HooksResult<Vec<Value>> {
        self.forms.iter_mut().map(|form| form.save(args)).collect()
    }

    /// Iterates over the forms in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn HookForm> {
        self.forms.iter().map(|form| form.as_ref())
    }

    /// Iterates mutably over the forms in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Box<dyn HookForm>> {
        self.forms.iter_mut()
    }

    /// Returns the prefixes handed out, in order.
    pub fn prefixes(&self) -> Vec<&str> {
        self.forms.iter().map(|form| form.prefix()).collect()
    }

    /// Returns the number of forms.
    pub fn len(&self) -> usize {
        self.forms.len()
    }

    /// Returns whether the group is empty.
    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }
}

impl IntoIterator for FormGroup {
    type Item = Box<dyn HookForm>;
    type IntoIter = std::vec::IntoIter<Box<dyn HookForm>>;

    fn into_iter(self) -> Self::IntoIter {
        self.forms.into_iter()
    }
}

impl fmt::Debug for FormGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormGroup")
            .field("prefixes", &self.prefixes())
            .finish()
    }
}
