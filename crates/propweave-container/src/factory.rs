#![forbid(unsafe_code)]

//! Member factories.
//!
//! A [`ClassFactory`] populates a freshly created member object. The member
//! already falls back to its container when the factory runs, so container
//! fields are readable from inside `construct`.

use propweave_core::Object;

use crate::error::BoxError;

/// Builds a member from constructor parameters `P`.
///
/// Implemented for every `Fn(&Object, P) -> Result<(), BoxError>`, so plain
/// closures work as factories.
pub trait ClassFactory<P> {
    /// Populate `this`. An error aborts containment and nothing is stored.
    fn construct(&self, this: &Object, params: P) -> Result<(), BoxError>;

    /// Name used in logs and construction errors.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<P, F> ClassFactory<P> for F
where
    F: Fn(&Object, P) -> Result<(), BoxError>,
{
    fn construct(&self, this: &Object, params: P) -> Result<(), BoxError> {
        self(this, params)
    }
}

/// Request to contain a new member, built fluently.
#[derive(Debug, Clone)]
pub struct ContainRequest<P, F> {
    pub(crate) key: String,
    pub(crate) factory: F,
    pub(crate) params: P,
    pub(crate) link_props: Vec<String>,
    pub(crate) link_props_override: bool,
}

impl<P, F: ClassFactory<P>> ContainRequest<P, F> {
    /// Contain the member built by `factory(params)` under `key`.
    #[must_use]
    pub fn new(key: impl Into<String>, factory: F, params: P) -> Self {
        Self {
            key: key.into(),
            factory,
            params,
            link_props: Vec::new(),
            link_props_override: false,
        }
    }

    /// Member fields to seed into and link to the container.
    #[must_use]
    pub fn with_link_props<I>(mut self, props: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.link_props = props.into_iter().map(Into::into).collect();
        self
    }

    /// Seed linked fields unconditionally from the member.
    #[must_use]
    pub fn with_link_props_override(mut self, link_props_override: bool) -> Self {
        self.link_props_override = link_props_override;
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn link_props(&self) -> &[String] {
        &self.link_props
    }
}
