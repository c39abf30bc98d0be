#![forbid(unsafe_code)]

//! Core: dynamic values, objects with named fields, linked fields, and
//! property redirection.
//!
//! Objects are single-threaded shared handles (`Rc<RefCell<..>>`). A
//! redirected field stops storing its own value and forwards every read and
//! write to the same-named field of a target object, so several objects can
//! share one field without copying it around.

pub mod error;
pub mod link;
pub mod object;
pub mod options;
pub mod redirect;
pub mod value;

pub use error::FieldError;
pub use link::LinkedField;
pub use object::{Integrity, Object};
pub use options::{RedirectOptions, SeedPolicy};
pub use redirect::{redirect, redirect_field, redirect_with_defaults};
pub use value::Value;
