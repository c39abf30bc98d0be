#![forbid(unsafe_code)]

//! Property redirection.
//!
//! [`redirect`] rewires named fields of one or more source objects so that
//! reads and writes land on the same-named fields of a target object,
//! optionally seeding the target from the source first.
//!
//! # Ordering
//!
//! Pairs are processed sources-outer, properties-inner, in the order given.
//! For each pair the seed (if any) happens before the link is installed, and
//! the source value is read before anything is written.
//!
//! # Failure Modes
//!
//! The first [`FieldError`](crate::error::FieldError) aborts the call. Pairs
//! processed before it stay redirected; there is no rollback.

use crate::error::Result;
use crate::link::LinkedField;
use crate::object::Object;
use crate::options::RedirectOptions;

/// Redirect `properties` of every object in `sources` to `target`.
///
/// A single source or property is passed as a one-element array:
///
/// ```
/// use propweave_core::{Object, RedirectOptions, Value, redirect};
///
/// let shared = Object::new();
/// let a = Object::from_fields([("hp", Value::from(10))]);
/// let b = Object::new();
///
/// redirect(&shared, [&a, &b], ["hp"], RedirectOptions::default()).unwrap();
///
/// b.set("hp", 3).unwrap();
/// assert_eq!(a.get("hp"), Value::Int(3));
/// assert_eq!(shared.get("hp"), Value::Int(3));
/// ```
pub fn redirect<'a, S, P>(
    target: &Object,
    sources: S,
    properties: P,
    options: RedirectOptions,
) -> Result<()>
where
    S: IntoIterator<Item = &'a Object>,
    P: IntoIterator,
    P::Item: AsRef<str>,
{
    let properties: Vec<P::Item> = properties.into_iter().collect();
    for source in sources {
        for property in &properties {
            redirect_field(target, source, property.as_ref(), &options)?;
        }
    }
    Ok(())
}

/// [`redirect`] with default options: copy on, no override, seed only when
/// the target field is undefined.
pub fn redirect_with_defaults<'a, S, P>(target: &Object, sources: S, properties: P) -> Result<()>
where
    S: IntoIterator<Item = &'a Object>,
    P: IntoIterator,
    P::Item: AsRef<str>,
{
    redirect(target, sources, properties, RedirectOptions::default())
}

/// Redirect a single `(source, name)` pair to `target.name`.
pub fn redirect_field(
    target: &Object,
    source: &Object,
    name: &str,
    options: &RedirectOptions,
) -> Result<()> {
    if options.copy {
        let current = target.get(name);
        let seed = options.should_seed(&current);
        tracing::trace!(
            target_id = target.id(),
            source_id = source.id(),
            field = name,
            current = current.type_name(),
            seed,
            "redirect seed decision"
        );
        if seed {
            let incoming = source.get(name);
            target.set(name, incoming)?;
        }
    }

    source.define_linked(name, LinkedField::new(target, name))?;
    tracing::debug!(
        target_id = target.id(),
        source_id = source.id(),
        field = name,
        "field linked"
    );
    Ok(())
}
