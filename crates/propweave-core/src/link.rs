#![forbid(unsafe_code)]

//! Linked fields.
//!
//! A [`LinkedField`] is what a redirected field slot turns into: instead of
//! storing a value, the slot forwards every read and write to the same-named
//! field of a backing target object.
//!
//! # Invariants
//!
//! 1. `get()` always equals `target.get(key)` at the time of the call.
//! 2. `set(v)` is exactly `target.set(key, v)`, including its errors.
//! 3. The link keeps its target alive; there is no way to detach it.
//!
//! Links may chain: if the target's field is itself linked, reads and writes
//! keep forwarding until they reach a plain slot. Cycles are not detected.

use std::fmt;
use std::rc::Rc;

use crate::error::Result;
use crate::object::Object;
use crate::value::Value;

/// Forwarding handle to one named field of a target object.
///
/// Cloning a `LinkedField` creates another handle to the **same** target
/// field.
#[derive(Clone)]
pub struct LinkedField {
    target: Object,
    key: Rc<str>,
}

impl LinkedField {
    /// Create a link to `target.key`.
    #[must_use]
    pub fn new(target: &Object, key: &str) -> Self {
        Self {
            target: target.clone(),
            key: Rc::from(key),
        }
    }

    /// Read the target's field.
    #[must_use]
    pub fn get(&self) -> Value {
        self.target.get(&self.key)
    }

    /// Write the target's field.
    pub fn set(&self, value: impl Into<Value>) -> Result<()> {
        self.target.set(&self.key, value)
    }

    /// The backing object.
    #[must_use]
    pub fn target(&self) -> &Object {
        &self.target
    }

    /// Name of the target field.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether this link forwards to `target.key`.
    #[must_use]
    pub fn points_to(&self, target: &Object, key: &str) -> bool {
        self.target.ptr_eq(target) && &*self.key == key
    }
}

impl fmt::Debug for LinkedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedField")
            .field("target", &self.target.id())
            .field("key", &&*self.key)
            .finish()
    }
}
