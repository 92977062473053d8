//! Sender identity used to filter signal receivers.

use std::any::TypeId;
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SenderKey {
    Type(TypeId),
    Named(Cow<'static, str>),
}

/// Identifies who sends a signal.
///
/// Receivers connected with a sender only fire for sends carrying an equal
/// sender; receivers connected without one fire for every send.
#[derive(Debug, Clone)]
pub struct Sender {
    key: SenderKey,
    name: Cow<'static, str>,
}

impl Sender {
    /// A sender identified by a Rust type.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            key: SenderKey::Type(TypeId::of::<T>()),
            name: Cow::Borrowed(std::any::type_name::<T>()),
        }
    }

    /// A sender identified by name.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        Self {
            key: SenderKey::Named(name.clone()),
            name,
        }
    }

    /// Human-readable sender name, for logs.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Sender {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Sender {}

impl Hash for Sender {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
