#![forbid(unsafe_code)]

//! Objects with named, mutable fields.
//!
//! # Design
//!
//! [`Object`] is a handle to shared, reference-counted field storage
//! (`Rc<RefCell<..>>`). Cloning the handle aliases the same object.
//!
//! Each own field is a slot holding either a plain [`Value`] or a
//! [`LinkedField`] that forwards to another object. An object may also have a
//! **parent**: an explicit fallback consulted when a name has no own slot.
//! Parent lookups walk the chain until a slot is found or the chain ends.
//!
//! # Invariants
//!
//! 1. `get(name)` on a linked slot always equals the link target's value.
//! 2. A `RefCell` borrow is never held across a call into another object, so
//!    linked chains and parent walks cannot panic on re-entrant borrows.
//! 3. Linked slots are permanent: they can be replaced by another link but
//!    never removed.
//!
//! # Failure Modes
//!
//! - **Frozen / non-extensible objects**: writes and link installation that
//!   the integrity level forbids return a [`FieldError`].
//! - **Link cycles**: a field linked (directly or transitively) to itself
//!   recurses without bound. Cycle detection is out of scope.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;

use crate::error::{FieldError, Result};
use crate::link::LinkedField;
use crate::value::Value;

// ─── Object ID generation ────────────────────────────────────────────────────

static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

fn next_object_id() -> u64 {
    NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)
}

// ─── Integrity ───────────────────────────────────────────────────────────────

/// How far an object may still change shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Integrity {
    /// Fields may be added, written, and relinked.
    #[default]
    Open,
    /// No new fields. Existing fields behave as before.
    NonExtensible,
    /// No new fields, plain fields are read-only, and no field may be
    /// relinked. Linked slots still forward writes to their target.
    Frozen,
}

// ─── Slots ───────────────────────────────────────────────────────────────────

#[derive(Clone)]
enum Slot {
    Plain(Value),
    Linked(LinkedField),
}

#[derive(Clone)]
struct Field {
    slot: Slot,
    configurable: bool,
}

impl Field {
    fn plain(value: Value) -> Self {
        Self {
            slot: Slot::Plain(value),
            configurable: true,
        }
    }
}

/// One step of a lookup, computed under a short-lived borrow.
enum Step {
    Done(Value),
    Link(LinkedField),
    Parent(Object),
}

struct ObjectInner {
    id: u64,
    fields: AHashMap<String, Field>,
    parent: Option<Object>,
    integrity: Integrity,
}

/// Handle to an object with named fields.
///
/// Cloning an `Object` creates a new handle to the **same** storage.
#[derive(Clone)]
pub struct Object {
    inner: Rc<RefCell<ObjectInner>>,
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl Object {
    /// Create an empty, open object with no parent.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObjectInner {
                id: next_object_id(),
                fields: AHashMap::new(),
                parent: None,
                integrity: Integrity::Open,
            })),
        }
    }

    /// Create an empty object that falls back to `parent` for unresolved
    /// names.
    #[must_use]
    pub fn with_parent(parent: &Object) -> Self {
        let obj = Self::new();
        obj.inner.borrow_mut().parent = Some(parent.clone());
        obj
    }

    /// Create an object holding the given plain fields. Later duplicates
    /// overwrite earlier ones.
    #[must_use]
    pub fn from_fields<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        let obj = Self::new();
        {
            let mut inner = obj.inner.borrow_mut();
            for (k, v) in fields {
                inner.fields.insert(k.into(), Field::plain(v.into()));
            }
        }
        obj
    }

    /// Process-unique identity, stable for the object's lifetime.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.inner.borrow().id
    }

    /// Whether both handles refer to the same object.
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // ── Reads ────────────────────────────────────────────────────────────

    /// Resolve `name`: own plain value, own linked field, then the parent
    /// chain. Yields [`Value::Undefined`] when nothing resolves.
    #[must_use]
    pub fn get(&self, name: &str) -> Value {
        let mut current = self.clone();
        loop {
            let step = {
                let inner = current.inner.borrow();
                match inner.fields.get(name) {
                    Some(Field {
                        slot: Slot::Plain(v),
                        ..
                    }) => Step::Done(v.clone()),
                    Some(Field {
                        slot: Slot::Linked(link),
                        ..
                    }) => Step::Link(link.clone()),
                    None => match &inner.parent {
                        Some(parent) => Step::Parent(parent.clone()),
                        None => Step::Done(Value::Undefined),
                    },
                }
            };
            match step {
                Step::Done(v) => return v,
                Step::Link(link) => return link.get(),
                Step::Parent(parent) => current = parent,
            }
        }
    }

    /// Whether `name` is an own field (plain or linked).
    #[must_use]
    pub fn has_own(&self, name: &str) -> bool {
        self.inner.borrow().fields.contains_key(name)
    }

    /// Whether `name` resolves to a slot on this object or any parent.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        let mut current = self.clone();
        loop {
            let parent = {
                let inner = current.inner.borrow();
                if inner.fields.contains_key(name) {
                    return true;
                }
                inner.parent.clone()
            };
            match parent {
                Some(p) => current = p,
                None => return false,
            }
        }
    }

    /// Own field names, sorted.
    #[must_use]
    pub fn own_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner.borrow().fields.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Whether the own field `name` forwards to another object.
    #[must_use]
    pub fn is_linked(&self, name: &str) -> bool {
        matches!(
            self.inner.borrow().fields.get(name),
            Some(Field {
                slot: Slot::Linked(_),
                ..
            })
        )
    }

    /// The link installed on own field `name`, if any.
    #[must_use]
    pub fn link_of(&self, name: &str) -> Option<LinkedField> {
        match self.inner.borrow().fields.get(name) {
            Some(Field {
                slot: Slot::Linked(link),
                ..
            }) => Some(link.clone()),
            _ => None,
        }
    }

    /// Resolved values of all own fields, linked ones included.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.own_keys()
            .into_iter()
            .map(|k| {
                let v = self.get(&k);
                (k, v)
            })
            .collect()
    }

    // ── Writes ───────────────────────────────────────────────────────────

    /// Assign `name`.
    ///
    /// An own linked slot forwards the write to its target. An own plain
    /// slot is replaced. With no own slot, a linked slot inherited from the
    /// parent chain receives the write; otherwise a new own plain field is
    /// created.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let own_link = {
            let mut inner = self.inner.borrow_mut();
            let (id, integrity) = (inner.id, inner.integrity);
            match inner.fields.get_mut(name) {
                Some(Field {
                    slot: Slot::Linked(link),
                    ..
                }) => Some(link.clone()),
                Some(Field {
                    slot: Slot::Plain(current),
                    ..
                }) => {
                    if integrity == Integrity::Frozen {
                        return Err(FieldError::ReadOnly {
                            object: id,
                            field: name.to_owned(),
                        });
                    }
                    *current = value;
                    return Ok(());
                }
                None => None,
            }
        };
        if let Some(link) = own_link.or_else(|| self.inherited_link(name)) {
            return link.set(value);
        }

        let mut inner = self.inner.borrow_mut();
        if inner.integrity != Integrity::Open {
            return Err(FieldError::NotExtensible {
                object: inner.id,
                field: name.to_owned(),
            });
        }
        inner.fields.insert(name.to_owned(), Field::plain(value));
        Ok(())
    }

    /// Bulk [`set`](Self::set) in iteration order. Stops at the first error;
    /// earlier writes stay applied.
    pub fn assign<K, V>(&self, fields: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        for (k, v) in fields {
            self.set(k.as_ref(), v)?;
        }
        Ok(())
    }

    /// Install `link` on own field `name`, replacing any prior plain value
    /// or link.
    pub fn define_linked(&self, name: &str, link: LinkedField) -> Result<()> {
        self.define(name, Slot::Linked(link), true)
    }

    /// Define a plain field that can never be relinked or removed. It stays
    /// writable until the object is frozen.
    pub fn define_fixed(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.define(name, Slot::Plain(value.into()), false)
    }

    /// Remove own plain field `name`, returning its value.
    ///
    /// Linked fields are permanent and non-configurable fields cannot be
    /// removed; both return an error. Removing a missing field is a no-op.
    pub fn remove(&self, name: &str) -> Result<Option<Value>> {
        let mut inner = self.inner.borrow_mut();
        let id = inner.id;
        match inner.fields.get(name) {
            None => return Ok(None),
            Some(field) if !field.configurable => {
                return Err(FieldError::NonConfigurable {
                    object: id,
                    field: name.to_owned(),
                });
            }
            Some(Field {
                slot: Slot::Linked(_),
                ..
            }) => {
                return Err(FieldError::LinkedPermanent {
                    object: id,
                    field: name.to_owned(),
                });
            }
            Some(_) => {}
        }
        Ok(inner.fields.remove(name).and_then(|f| match f.slot {
            Slot::Plain(v) => Some(v),
            Slot::Linked(_) => None,
        }))
    }

    // ── Parent ───────────────────────────────────────────────────────────

    /// The fallback object for unresolved names.
    #[must_use]
    pub fn parent(&self) -> Option<Object> {
        self.inner.borrow().parent.clone()
    }

    /// Replace the fallback object. Rejected once the object is no longer
    /// open.
    pub fn set_parent(&self, parent: Option<&Object>) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.integrity != Integrity::Open {
            return Err(FieldError::NotExtensible {
                object: inner.id,
                field: "<parent>".to_owned(),
            });
        }
        inner.parent = parent.cloned();
        Ok(())
    }

    // ── Integrity ────────────────────────────────────────────────────────

    #[must_use]
    pub fn integrity(&self) -> Integrity {
        self.inner.borrow().integrity
    }

    /// Forbid adding new fields.
    pub fn prevent_extensions(&self) {
        let mut inner = self.inner.borrow_mut();
        if inner.integrity == Integrity::Open {
            inner.integrity = Integrity::NonExtensible;
        }
    }

    /// Forbid adding fields, writing plain fields, and relinking.
    pub fn freeze(&self) {
        let mut inner = self.inner.borrow_mut();
        inner.integrity = Integrity::Frozen;
        for field in inner.fields.values_mut() {
            field.configurable = false;
        }
        tracing::trace!(object = inner.id, fields = inner.fields.len(), "object frozen");
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn define(&self, name: &str, slot: Slot, configurable: bool) -> Result<()> {
        let mut inner = self.inner.borrow_mut();
        let (id, integrity) = (inner.id, inner.integrity);
        match inner.fields.get_mut(name) {
            Some(field) => {
                if !field.configurable {
                    return Err(FieldError::NonConfigurable {
                        object: id,
                        field: name.to_owned(),
                    });
                }
                field.slot = slot;
                field.configurable = configurable;
            }
            None => {
                if integrity != Integrity::Open {
                    return Err(FieldError::NotExtensible {
                        object: id,
                        field: name.to_owned(),
                    });
                }
                inner
                    .fields
                    .insert(name.to_owned(), Field { slot, configurable });
            }
        }
        Ok(())
    }

    /// First slot for `name` up the parent chain, if it is linked. A plain
    /// ancestor slot is shadowed by assignment, so it yields `None`.
    fn inherited_link(&self, name: &str) -> Option<LinkedField> {
        let mut current = self.parent()?;
        loop {
            let next = {
                let inner = current.inner.borrow();
                match inner.fields.get(name) {
                    Some(Field {
                        slot: Slot::Linked(link),
                        ..
                    }) => return Some(link.clone()),
                    Some(_) => return None,
                    None => inner.parent.clone(),
                }
            };
            current = next?;
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Field values may link back to this object; print shape only.
        match self.inner.try_borrow() {
            Ok(inner) => {
                let mut keys: Vec<&str> = inner.fields.keys().map(String::as_str).collect();
                keys.sort_unstable();
                f.debug_struct("Object")
                    .field("id", &inner.id)
                    .field("integrity", &inner.integrity)
                    .field("parent", &inner.parent.as_ref().map(Object::id))
                    .field("fields", &keys)
                    .finish()
            }
            Err(_) => f.write_str("Object(<borrowed>)"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
