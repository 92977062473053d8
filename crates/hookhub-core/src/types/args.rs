//! Positional and keyword arguments forwarded to hook members.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Arguments a registry forwards, unchanged, to every member it fans out to.
///
/// Values are JSON so that plugins developed independently of the core
/// can exchange data without sharing concrete Rust types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HookArgs {
    /// Positional arguments, in call order.
    #[serde(default)]
    pub args: Vec<Value>,
    /// Keyword arguments.
    #[serde(default)]
    pub kwargs: Map<String, Value>,
}

impl HookArgs {
    /// Creates an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an argument set holding only keyword arguments.
    pub fn from_kwargs(kwargs: Map<String, Value>) -> Self {
        Self {
            args: Vec::new(),
            kwargs,
        }
    }

    /// Appends a positional argument.
    pub fn with_arg(mut self, value: impl Into<Value>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Inserts a keyword argument.
    pub fn with_kwarg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.kwargs.insert(key.to_string(), value.into());
        self
    }

    /// Returns a copy with `value` placed in front of the positional arguments.
    pub fn prepend(&self, value: impl Into<Value>) -> Self {
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(value.into());
        args.extend(self.args.iter().cloned());
        Self {
            args,
            kwargs: self.kwargs.clone(),
        }
    }

    /// Gets a positional argument by index.
    pub fn arg(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    /// Gets a keyword argument by key.
    pub fn kwarg(&self, key: &str) -> Option<&Value> {
        self.kwargs.get(key)
    }

    /// Gets a string keyword argument.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.kwargs.get(key).and_then(|v| v.as_str())
    }

    /// Gets an i64 keyword argument.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.kwargs.get(key).and_then(|v| v.as_i64())
    }

    /// Gets a bool keyword argument.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.kwargs.get(key).and_then(|v| v.as_bool())
    }

    /// Returns whether no arguments of either kind are present.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.kwargs.is_empty()
    }
}
