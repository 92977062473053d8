//! Ordered member lists shared by every registry.
//!
//! Registration and unregistration are expected during the load phase,
//! invocation afterwards. The lock keeps a late registration from tearing
//! the list, but fan-out always works on a [`MemberList::snapshot`] so no
//! member ever runs while the lock is held.

use std::sync::Arc;

use parking_lot::RwLock;

/// How a registry recognizes "the same member" when unregistering or when
/// enforcing idempotent registration.
pub trait Identity {
    /// Returns whether `self` and `other` denote the same member.
    fn is_same(&self, other: &Self) -> bool;
}

impl<T: ?Sized> Identity for Arc<T> {
    fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

/// Insertion-ordered list of registered members.
#[derive(Debug)]
pub struct MemberList<T> {
    members: RwLock<Vec<T>>,
}

impl<T: Clone + Identity> MemberList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            members: RwLock::new(Vec::new()),
        }
    }

    /// Appends a member, even if an identical one is already present.
    pub fn push(&self, member: T) {
        self.members.write().push(member);
    }

    /// Appends a member unless an identical one is already present.
    ///
    /// Returns whether the member was inserted.
    pub fn push_unique(&self, member: T) -> bool {
        let mut members = self.members.write();
        if members.iter().any(|m| m.is_same(&member)) {
            return false;
        }
        members.push(member);
        true
    }

    /// Appends a member unless an identical one is already present, in
    /// which case that one is returned instead.
    pub fn push_or_get(&self, member: T) -> Option<T> {
        let mut members = self.members.write();
        if let Some(existing) = members.iter().find(|m| m.is_same(&member)) {
            return Some(existing.clone());
        }
        members.push(member);
        None
    }

    /// Removes the first member identical to `member`.
    ///
    /// Absence is not an error; returns whether something was removed.
    pub fn remove(&self, member: &T) -> bool {
        let mut members = self.members.write();
        match members.iter().position(|m| m.is_same(member)) {
            Some(index) => {
                members.remove(index);
                true
            }
            None => false,
        }
    }

    /// Removes every member matching `predicate`, returning how many went.
    pub fn remove_where(&self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let mut members = self.members.write();
        let before = members.len();
        members.retain(|m| !predicate(m));
        before - members.len()
    }

    /// Returns whether an identical member is registered.
    pub fn contains(&self, member: &T) -> bool {
        self.members.read().iter().any(|m| m.is_same(member))
    }

    /// Clones the current members, in registration order.
    pub fn snapshot(&self) -> Vec<T> {
        self.members.read().clone()
    }

    /// Returns the number of registered members.
    pub fn len(&self) -> usize {
        self.members.read().len()
    }

    /// Returns whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.members.read().is_empty()
    }

    /// Removes every member, returning how many were dropped.
    pub fn clear(&self) -> usize {
        let mut members = self.members.write();
        let count = members.len();
        members.clear();
        count
    }
}

impl<T: Clone + Identity> Default for MemberList<T> {
    fn default() -> Self {
        Self::new()
    }
}
