//! Signal hooks: a dynamic, name-keyed set of broadcast signals.
//!
//! Signals are created on first use, either explicitly through
//! [`SignalHooks::register`] or implicitly by [`SignalHooks::connect`].
//! Sending on a name nobody registered returns no responses.
//!
//! Connect and disconnect are meant for the load phase (startup or a
//! plugin's `register`), sends for request handling.

use std::fmt;
use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use hookhub_core::{HooksResult, Sender};

use super::members::{Identity, MemberList};

/// What a receiver gets when a signal fires.
#[derive(Debug, Clone, Copy)]
pub struct SignalEvent<'a> {
    /// Name of the signal being sent.
    pub signal: &'a str,
    /// Who sent it, if anyone.
    pub sender: Option<&'a Sender>,
    /// Keyword arguments of the send.
    pub kwargs: &'a Map<String, Value>,
}

impl SignalEvent<'_> {
    /// Gets a keyword argument by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.kwargs.get(key)
    }

    /// Gets a string keyword argument.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.kwargs.get(key).and_then(|v| v.as_str())
    }
}

/// A function bound to a signal.
///
/// Implemented for every `Fn(&SignalEvent<'_>) -> HooksResult<Value>`.
pub trait SignalHandler: Send + Sync {
    /// Handles one send.
    fn handle(&self, event: &SignalEvent<'_>) -> HooksResult<Value>;

    /// Name used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<F> SignalHandler for F
where
    F: Fn(&SignalEvent<'_>) -> HooksResult<Value> + Send + Sync,
{
    fn handle(&self, event: &SignalEvent<'_>) -> HooksResult<Value> {
        self(event)
    }
}

impl fmt::Debug for dyn SignalHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SignalHandler").field(&self.name()).finish()
    }
}

/// A receiver's response to a send.
pub type SignalResponse = (Arc<dyn SignalHandler>, Value);

/// A receiver's outcome when sending robustly.
pub type RobustResponse = (Arc<dyn SignalHandler>, HooksResult<Value>);

/// One binding of a handler to a signal.
#[derive(Clone)]
struct Receiver {
    dispatch_uid: Option<String>,
    sender: Option<Sender>,
    handler: Arc<dyn SignalHandler>,
}

impl Receiver {
    /// Whether this binding answers to the lookup key `(uid or handler)`.
    fn has_key(&self, handler: &Arc<dyn SignalHandler>, dispatch_uid: Option<&str>) -> bool {
        match (dispatch_uid, self.dispatch_uid.as_deref()) {
            (Some(wanted), Some(own)) => wanted == own,
            (None, None) => Arc::ptr_eq(&self.handler, handler),
            _ => false,
        }
    }

    fn listens_to(&self, sender: Option<&Sender>) -> bool {
        self.sender.is_none() || self.sender.as_ref() == sender
    }
}

impl Identity for Receiver {
    fn is_same(&self, other: &Self) -> bool {
        other.has_key(&self.handler, self.dispatch_uid.as_deref()) && self.sender == other.sender
    }
}

/// A broadcast signal: an ordered set of receivers.
pub struct Signal {
    name: String,
    receivers: MemberList<Receiver>,
}

impl Signal {
    /// Creates a signal without receivers.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            receivers: MemberList::new(),
        }
    }

    /// Returns the signal name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Binds `handler`, optionally only for sends from `sender`.
    ///
    /// A binding is keyed by `dispatch_uid` when given, else by the handler
    /// itself, together with the sender. Connecting an existing key again
    /// is ignored; returns whether a new binding was made.
    pub fn connect(
        &self,
        handler: Arc<dyn SignalHandler>,
        sender: Option<Sender>,
        dispatch_uid: Option<&str>,
    ) -> bool {
        let receiver = Receiver {
            dispatch_uid: dispatch_uid.map(str::to_string),
            sender,
            handler,
        };
        let connected = self.receivers.push_unique(receiver);

        debug!(
            signal = %self.name,
            dispatch_uid = ?dispatch_uid,
            connected,
            "Signal receiver connected"
        );

        connected
    }

    /// Unbinds every binding keyed by `dispatch_uid` (or by `handler` when
    /// no uid is given), whatever sender it was bound for.
    ///
    /// Returns whether anything was unbound.
    pub fn disconnect(&self, handler: &Arc<dyn SignalHandler>, dispatch_uid: Option<&str>) -> bool {
        let removed = self
            .receivers
            .remove_where(|receiver| receiver.has_key(handler, dispatch_uid));

        debug!(signal = %self.name, removed, "Signal receiver disconnected");

        removed > 0
    }

    /// Returns the number of bindings.
    pub fn receiver_count(&self) -> usize {
        self.receivers.len()
    }

    /// Returns whether any binding would fire for `sender`.
    pub fn has_listeners(&self, sender: Option<&Sender>) -> bool {
        self.receivers
            .snapshot()
            .iter()
            .any(|receiver| receiver.listens_to(sender))
    }

    fn live_receivers(&self, sender: Option<&Sender>) -> Vec<Arc<dyn SignalHandler>> {
        self.receivers
            .snapshot()
            .into_iter()
            .filter(|receiver| receiver.listens_to(sender))
            .map(|receiver| receiver.handler)
            .collect()
    }

    /// Calls every matching handler in connection order.
    ///
    /// The first failing handler aborts the send and its error is returned
    /// unchanged; handlers after it do not run.
    pub fn send(
        &self,
        sender: Option<&Sender>,
        kwargs: &Map<String, Value>,
    ) -> HooksResult<Vec<SignalResponse>> {
        let event = SignalEvent {
            signal: &self.name,
            sender,
            kwargs,
        };

        self.live_receivers(sender)
            .into_iter()
            .map(|handler| {
                let response = handler.handle(&event)?;
                Ok((handler, response))
            })
            .collect()
    }

    /// Calls every matching handler, isolating failures.
    ///
    /// Every handler runs; failures are logged and reported next to the
    /// successes.
    pub fn send_robust(
        &self,
        sender: Option<&Sender>,
        kwargs: &Map<String, Value>,
    ) -> Vec<RobustResponse> {
        let event = SignalEvent {
            signal: &self.name,
            sender,
            kwargs,
        };

        self.live_receivers(sender)
            .into_iter()
            .map(|handler| {
                let outcome = handler.handle(&event);
                if let Err(e) = &outcome {
                    warn!(
                        signal = %self.name,
                        handler = %handler.name(),
                        error = %e,
                        "Signal receiver failed"
                    );
                }
                (handler, outcome)
            })
            .collect()
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("name", &self.name)
            .field("receivers", &self.receivers.len())
            .finish()
    }
}

/// Name → signal dispatcher.
#[derive(Debug, Default)]
pub struct SignalHooks {
    signals: DashMap<String, Arc<Signal>>,
}

impl SignalHooks {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self {
            signals: DashMap::new(),
        }
    }

    /// Creates the signal `name` and returns it.
    ///
    /// Registering a name that already exists replaces its signal, and the
    /// receivers bound to the old one are dropped. Use [`connect`], which
    /// creates the signal only when missing, unless that is intended.
    ///
    /// [`connect`]: SignalHooks::connect
    pub fn register(&self, name: &str) -> Arc<Signal> {
        let signal = Arc::new(Signal::new(name));

        match self.signals.insert(name.to_string(), signal.clone()) {
            Some(previous) if previous.receiver_count() > 0 => {
                warn!(
                    signal = %name,
                    discarded = previous.receiver_count(),
                    "Signal re-registered, existing receivers discarded"
                );
            }
            _ => info!(signal = %name, "Signal registered"),
        }

        signal
    }

    fn get_or_register(&self, name: &str) -> Arc<Signal> {
        if let Some(signal) = self.get(name) {
            return signal;
        }
        self.signals
            .entry(name.to_string())
            .or_insert_with(|| {
                info!(signal = %name, "Signal registered");
                Arc::new(Signal::new(name))
            })
            .clone()
    }

    /// Binds `handler` to the signal `name`, creating the signal if needed.
    ///
    /// Returns whether a new binding was made (see [`Signal::connect`]).
    pub fn connect(
        &self,
        name: &str,
        handler: Arc<dyn SignalHandler>,
        sender: Option<Sender>,
        dispatch_uid: Option<&str>,
    ) -> bool {
        self.get_or_register(name)
            .connect(handler, sender, dispatch_uid)
    }

    /// Binds a closure for every sender and returns its handle.
    pub fn connect_fn<F>(&self, name: &str, handler: F) -> Arc<dyn SignalHandler>
    where
        F: Fn(&SignalEvent<'_>) -> HooksResult<Value> + Send + Sync + 'static,
    {
        let handler: Arc<dyn SignalHandler> = Arc::new(handler);
        self.connect(name, handler.clone(), None, None);
        handler
    }

    /// Unbinds `handler` from `name`; unknown names are ignored.
    pub fn disconnect(
        &self,
        name: &str,
        handler: &Arc<dyn SignalHandler>,
        dispatch_uid: Option<&str>,
    ) -> bool {
        match self.get(name) {
            Some(signal) => signal.disconnect(handler, dispatch_uid),
            None => {
                debug!(signal = %name, "Disconnect from unknown signal ignored");
                false
            }
        }
    }

    /// Sends `name`, returning `(handler, response)` pairs in connection
    /// order. Unknown names yield no responses.
    pub fn send(
        &self,
        name: &str,
        sender: Option<&Sender>,
        kwargs: &Map<String, Value>,
    ) -> HooksResult<Vec<SignalResponse>> {
        match self.get(name) {
            Some(signal) => signal.send(sender, kwargs),
            None => {
                debug!(signal = %name, "Send on unknown signal ignored");
                Ok(Vec::new())
            }
        }
    }

    /// Sends `name` with failures isolated per receiver.
    pub fn send_robust(
        &self,
        name: &str,
        sender: Option<&Sender>,
        kwargs: &Map<String, Value>,
    ) -> Vec<RobustResponse> {
        self.get(name)
            .map(|signal| signal.send_robust(sender, kwargs))
            .unwrap_or_default()
    }

    /// Returns the signal registered under `name`.
    pub fn get(&self, name: &str) -> Option<Arc<Signal>> {
        self.signals.get(name).map(|entry| entry.value().clone())
    }

    /// Returns whether `name` is known.
    pub fn contains(&self, name: &str) -> bool {
        self.signals.contains_key(name)
    }

    /// Returns all known signal names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.signals.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Forgets every signal and its receivers.
    pub fn clear(&self) {
        self.signals.clear();
        debug!("Signal hooks cleared");
    }
}

/// The process-wide signal dispatcher.
pub fn signals() -> &'static SignalHooks {
    static SIGNALS: LazyLock<SignalHooks> = LazyLock::new(SignalHooks::new);
    &SIGNALS
}
