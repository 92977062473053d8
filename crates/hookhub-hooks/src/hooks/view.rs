//! View hooks: plugins register types that take part in a request's
//! lifecycle.
//!
//! Invoking [`ViewHooks`] builds one instance of every registered type
//! (a [`ViewHookProxy`]) from the same request and arguments. The host
//! then drives it through `dispatch → get | post → is_valid → save` and
//! merges [`ViewHookProxy::context`] into its own response context:
//!
//! ```rust,ignore
//! let mut hooks = MY_VIEW_HOOKS.invoke(request.clone(), HookArgs::new())?;
//! hooks.dispatch(&args)?;
//! if is_post {
//!     hooks.post(&args)?;
//!     if hooks.is_valid() && form_is_valid {
//!         hooks.save(&args)?;
//!     }
//! } else {
//!     hooks.get(&args)?;
//! }
//! context.extend(hooks.context());
//! ```

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info};

use hookhub_core::{HookArgs, HooksResult};

use super::members::{Identity, MemberList};

/// State every view hook instance starts from.
pub struct ViewHookBase<R> {
    request: Arc<R>,
    args: HookArgs,
    context: Map<String, Value>,
}

impl<R> ViewHookBase<R> {
    /// Creates the base for one instance.
    pub fn new(request: Arc<R>, args: HookArgs) -> Self {
        Self {
            request,
            args,
            context: Map::new(),
        }
    }

    /// The request (or other context object) the proxy was built for.
    pub fn request(&self) -> &R {
        &self.request
    }

    /// The arguments forwarded at construction.
    pub fn args(&self) -> &HookArgs {
        &self.args
    }

    /// Per-instance context contributed to the response.
    pub fn context(&self) -> &Map<String, Value> {
        &self.context
    }

    /// Mutable per-instance context.
    pub fn context_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.context
    }

    /// Inserts one context entry.
    pub fn insert_context(&mut self, key: &str, value: impl Into<Value>) {
        self.context.insert(key.to_string(), value.into());
    }
}

impl<R> fmt::Debug for ViewHookBase<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewHookBase")
            .field("args", &self.args)
            .field("context", &self.context)
            .finish()
    }
}

/// A view lifecycle participant. Override only the steps you need.
pub trait ViewHook<R>: Send {
    /// Builds the instance. Returning an error aborts the whole invocation.
    fn from_base(base: ViewHookBase<R>) -> HooksResult<Self>
    where
        Self: Sized;

    /// The instance's base state.
    fn base(&self) -> &ViewHookBase<R>;

    /// The instance's base state, mutably.
    fn base_mut(&mut self) -> &mut ViewHookBase<R>;

    /// Runs before the method-specific step.
    fn dispatch(&mut self, _args: &HookArgs) -> HooksResult<()> {
        Ok(())
    }

    /// Runs on GET requests.
    fn get(&mut self, _args: &HookArgs) -> HooksResult<()> {
        Ok(())
    }

    /// Runs on POST requests; bind forms here to validate them later.
    fn post(&mut self, _args: &HookArgs) -> HooksResult<()> {
        Ok(())
    }

    /// Validates whatever `post` bound.
    fn is_valid(&mut self) -> bool {
        true
    }

    /// Persists whatever `post` bound.
    fn save(&mut self, _args: &HookArgs) -> HooksResult<()> {
        Ok(())
    }

    /// Context this instance contributes.
    fn context<'a>(&'a self) -> &'a Map<String, Value>
    where
        R: 'a,
    {
        self.base().context()
    }
}

impl<R: Send + Sync> ViewHook<R> for ViewHookBase<R> {
    fn from_base(base: ViewHookBase<R>) -> HooksResult<Self> {
        Ok(base)
    }

    fn base(&self) -> &ViewHookBase<R> {
        self
    }

    fn base_mut(&mut self) -> &mut ViewHookBase<R> {
        self
    }
}

type Constructor<R> = fn(ViewHookBase<R>) -> HooksResult<Box<dyn ViewHook<R>>>;

fn construct<R, H>(base: ViewHookBase<R>) -> HooksResult<Box<dyn ViewHook<R>>>
where
    R: 'static,
    H: ViewHook<R> + 'static,
{
    Ok(Box::new(H::from_base(base)?))
}

/// A registered view hook type.
struct HookType<R> {
    type_id: TypeId,
    name: &'static str,
    construct: Constructor<R>,
}

impl<R> Clone for HookType<R> {
    fn clone(&self) -> Self {
        Self {
            type_id: self.type_id,
            name: self.name,
            construct: self.construct,
        }
    }
}

impl<R> Identity for HookType<R> {
    fn is_same(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

/// A registry of view hook types for requests of type `R`.
pub struct ViewHooks<R> {
    types: MemberList<HookType<R>>,
}

impl<R: Send + Sync + 'static> ViewHooks<R> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            types: MemberList::new(),
        }
    }

    fn hook_type<H: ViewHook<R> + 'static>() -> HookType<R> {
        HookType {
            type_id: TypeId::of::<H>(),
            name: std::any::type_name::<H>(),
            construct: construct::<R, H>,
        }
    }

    /// Registers the type `H`. Registering it twice instantiates it twice.
    pub fn register<H: ViewHook<R> + 'static>(&self) {
        let hook_type = Self::hook_type::<H>();
        info!(view_hook = %hook_type.name, "View hook registered");
        self.types.push(hook_type);
    }

    /// Unregisters the first registration of `H`; returns whether found.
    pub fn unregister<H: ViewHook<R> + 'static>(&self) -> bool {
        let removed = self.types.remove(&Self::hook_type::<H>());
        debug!(view_hook = %std::any::type_name::<H>(), removed, "View hook unregistered");
        removed
    }

    /// Returns whether `H` is registered.
    pub fn contains<H: ViewHook<R> + 'static>(&self) -> bool {
        self.types.contains(&Self::hook_type::<H>())
    }

    /// Returns the registered type names in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.types.snapshot().iter().map(|t| t.name).collect()
    }

    /// Returns the number of registrations.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Drops every registration.
    pub fn clear(&self) {
        let count = self.types.clear();
        debug!(count, "View hooks cleared");
    }

    /// Instantiates every registered type with the same request and
    /// arguments, in registration order.
    ///
    /// Construction is eager; the first type that fails to build aborts
    /// the invocation and its error is returned unchanged.
    pub fn invoke(&self, request: Arc<R>, args: HookArgs) -> HooksResult<ViewHookProxy<R>> {
        let hooks = self
            .types
            .snapshot()
            .iter()
            .map(|hook_type| {
                (hook_type.construct)(ViewHookBase::new(request.clone(), args.clone()))
            })
            .collect::<HooksResult<Vec<_>>>()?;

        debug!(hook_count = hooks.len(), "View hook proxy built");

        Ok(ViewHookProxy { hooks })
    }
}

impl<R: Send + Sync + 'static> Default for ViewHooks<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Send + Sync + 'static> fmt::Debug for ViewHooks<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewHooks")
            .field("types", &self.names())
            .finish()
    }
}

/// One instance of every registered view hook, for a single request.
pub struct ViewHookProxy<R> {
    hooks: Vec<Box<dyn ViewHook<R>>>,
}

impl<R> ViewHookProxy<R> {
    /// Calls `dispatch` on every instance.
    pub fn dispatch(&mut self, args: &HookArgs) -> HooksResult<()> {
        self.hooks.iter_mut().try_for_each(|hook| hook.dispatch(args))
    }

    /// Calls `get` on every instance.
    pub fn get(&mut self, args: &HookArgs) -> HooksResult<()> {
        self.hooks.iter_mut().try_for_each(|hook| hook.get(args))
    }

    /// Calls `post` on every instance.
    pub fn post(&mut self, args: &HookArgs) -> HooksResult<()> {
        self.hooks.iter_mut().try_for_each(|hook| hook.post(args))
    }

    /// Validates every instance (no short-circuit, so all of them attach
    /// their errors) and returns the logical AND; `true` when empty.
    pub fn is_valid(&mut self) -> bool {
        let mut valid = true;
        for hook in &mut self.hooks {
            valid &= hook.is_valid();
        }
        valid
    }

    /// Calls `save` on every instance.
    pub fn save(&mut self, args: &HookArgs) -> HooksResult<()> {
        self.hooks.iter_mut().try_for_each(|hook| hook.save(args))
    }

    /// Merges every instance's context; later registrations win on
    /// colliding keys.
    pub fn context(&self) -> Map<String, Value> {
        let mut context = Map::new();
        for hook in &self.hooks {
            context.extend(hook.context().iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        context
    }

    /// Returns the number of instances.
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    /// Returns whether the proxy holds no instances.
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl<R> fmt::Debug for ViewHookProxy<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewHookProxy")
            .field("hooks", &self.hooks.len())
            .finish()
    }
}
