#![forbid(unsafe_code)]

//! Shared-state container.
//!
//! # Design
//!
//! A [`Container`] owns a backing [`Object`] holding its own fields. Each
//! contained member is a separate object whose parent is the container
//! object, so names the member does not define resolve to container fields.
//! Members are stored as ordinary container fields under caller-chosen keys.
//!
//! Linking a member field seeds the container field from the member (subject
//! to [`ContainerConfig::seed_policy`] unless overridden) and then turns the
//! member field into a [`LinkedField`](propweave_core::LinkedField) that
//! forwards to the container. Every member linked on the same name therefore
//! shares one slot.
//!
//! # Invariants
//!
//! 1. The member's parent is set before its factory runs.
//! 2. A member is stored only after its factory succeeds.
//! 3. Container field names only accumulate; links are never undone.
//!
//! # Failure Modes
//!
//! - **Factory error**: [`ContainerError::ConstructionFailure`], nothing is
//!   stored.
//! - **Unknown key**: [`ContainerError::KeyNotFound`]. Keys processed earlier
//!   in the same call stay linked.
//! - **Rejected link** (frozen member, fixed field):
//!   [`ContainerError::InvalidOperation`], same partial-progress rule.
//!
//! # Ownership
//!
//! Members hold the container's backing object as their parent and as the
//! target of their linked fields, and the backing object stores the members.
//! That is an `Rc` cycle: dropping the `Container` only drops its own handle,
//! so every field stays readable through any member that is still alive.
//! Nothing is removed on drop. Callers that need the graph freed call
//! [`Container::release_members`], which removes the stored member entries
//! and leaves links in place.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use propweave_core::{Object, RedirectOptions, SeedPolicy, Value, redirect_field};

use crate::error::{ContainerError, Result};
use crate::factory::{ClassFactory, ContainRequest};

/// Container-wide settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ContainerConfig {
    /// When linking without override seeds the container field.
    pub seed_policy: SeedPolicy,
}

impl ContainerConfig {
    #[must_use]
    pub fn with_seed_policy(mut self, seed_policy: SeedPolicy) -> Self {
        self.seed_policy = seed_policy;
        self
    }

    /// Falsy seeding, matching the legacy behavior.
    #[must_use]
    pub fn legacy() -> Self {
        Self::default().with_seed_policy(SeedPolicy::Falsy)
    }
}

/// Owns member objects and shares selected member fields through its own
/// storage.
#[derive(Debug)]
pub struct Container {
    object: Object,
    config: ContainerConfig,
    /// Keys stored by `contain_class`, with the member id, in insertion order.
    members: Vec<(String, u64)>,
}

impl Default for Container {
    fn default() -> Self {
        Self::with_config(std::iter::empty::<(String, Value)>(), ContainerConfig::default())
    }
}

impl Container {
    /// Create a container holding `fields`.
    #[must_use]
    pub fn new<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self::with_config(fields, ContainerConfig::default())
    }

    #[must_use]
    pub fn with_config<K, V>(
        fields: impl IntoIterator<Item = (K, V)>,
        config: ContainerConfig,
    ) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            object: Object::from_fields(fields),
            config,
            members: Vec::new(),
        }
    }

    /// The backing object holding container fields.
    #[must_use]
    pub fn object(&self) -> &Object {
        &self.object
    }

    #[must_use]
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Read a container field (including members stored as fields).
    #[must_use]
    pub fn get(&self, name: &str) -> Value {
        self.object.get(name)
    }

    pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<()> {
        self.object.set(name, value)?;
        Ok(())
    }

    /// Bulk-assign container fields. Existing fields are overwritten; linked
    /// members observe the new values.
    pub fn set_fields<K, V>(&self, fields: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: AsRef<str>,
        V: Into<Value>,
    {
        self.object.assign(fields)?;
        Ok(())
    }

    /// Construct a member, store it under the request key, and link the
    /// requested fields. Returns the member handle.
    ///
    /// A key that already holds a value is silently replaced.
    pub fn contain_class<P, F>(&mut self, request: ContainRequest<P, F>) -> Result<Object>
    where
        F: ClassFactory<P>,
    {
        let ContainRequest {
            key,
            factory,
            params,
            link_props,
            link_props_override,
        } = request;

        let span = tracing::debug_span!(
            "container.contain_class",
            key = %key,
            factory = factory.name(),
            link_props = link_props.len()
        );
        let _guard = span.enter();

        // Parent first: the factory must already see container fields.
        let member = Object::with_parent(&self.object);
        factory
            .construct(&member, params)
            .map_err(|source| ContainerError::ConstructionFailure {
                key: key.clone(),
                factory: factory.name().to_owned(),
                source,
            })?;

        if self.object.has_own(&key) {
            tracing::warn!(key = %key, "container key overwritten");
        }
        self.object.set(&key, &member)?;
        let member_id = member.id();
        match self.members.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = member_id,
            None => self.members.push((key.clone(), member_id)),
        }
        tracing::debug!(key = %key, member_id, "member contained");

        if !link_props.is_empty() {
            self.link_props_of([&key], &link_props, link_props_override)?;
        }
        Ok(member)
    }

    /// Link `props` of every member in `keys` to the container.
    ///
    /// For each key, then each prop: seed the container field from the member
    /// (always when `props_override`, otherwise when unset under the
    /// configured seed policy), then make the member field forward to the
    /// container.
    pub fn link_props_of<K, P>(&self, keys: K, props: P, props_override: bool) -> Result<()>
    where
        K: IntoIterator,
        K::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let props: Vec<P::Item> = props.into_iter().collect();
        let options = RedirectOptions::default()
            .with_force_override(props_override)
            .with_seed_policy(self.config.seed_policy);

        for key in keys {
            let member = self.member(key.as_ref())?;
            for prop in &props {
                redirect_field(&self.object, &member, prop.as_ref(), &options)?;
            }
        }
        Ok(())
    }

    /// The member stored under `key`.
    pub fn member(&self, key: &str) -> Result<Object> {
        match self.object.get(key) {
            Value::Object(member) => Ok(member),
            Value::Undefined | Value::Null => Err(ContainerError::KeyNotFound {
                key: key.to_owned(),
            }),
            other => Err(ContainerError::NotAMember {
                key: key.to_owned(),
                found: other.type_name(),
            }),
        }
    }

    /// Keys stored through [`contain_class`](Self::contain_class) that still
    /// hold the member stored there, in first insertion order.
    ///
    /// A key later overwritten with another value (through
    /// [`set_fields`](Self::set_fields) or [`set`](Self::set)) is skipped.
    pub fn member_keys(&self) -> impl Iterator<Item = &str> {
        self.members
            .iter()
            .filter(|(key, member_id)| self.holds_member(key, *member_id))
            .map(|(key, _)| key.as_str())
    }

    /// Remove the member entries this container stored and consume it.
    ///
    /// Only keys that still hold the member stored by `contain_class` are
    /// removed. Links installed by [`link_props_of`](Self::link_props_of)
    /// stay, so member handles held elsewhere keep reading and writing the
    /// shared fields. Returns the released members in insertion order.
    pub fn release_members(self) -> Vec<Object> {
        let mut released = Vec::with_capacity(self.members.len());
        for (key, member_id) in &self.members {
            let Value::Object(member) = self.object.get(key) else {
                continue;
            };
            if member.id() != *member_id {
                continue;
            }
            match self.object.remove(key) {
                Ok(_) => released.push(member),
                Err(err) => {
                    tracing::trace!(key = %key, error = %err, "member entry kept on release");
                }
            }
        }
        tracing::debug!(
            container_id = self.object.id(),
            released = released.len(),
            "members released"
        );
        released
    }

    fn holds_member(&self, key: &str, member_id: u64) -> bool {
        matches!(self.object.get(key), Value::Object(ref m) if m.id() == member_id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
