#![forbid(unsafe_code)]

//! propweave public facade.
//!
//! Share fields between independently built objects by redirecting reads and
//! writes to a common backing object, either directly with
//! [`redirect`](prelude::redirect) or through a [`Container`](prelude::Container).
//!
//! ```
//! use propweave::prelude::*;
//!
//! let mut hub = Container::new([("score", 0)]);
//! let player = |this: &Object, name: &str| -> Result<(), BoxError> {
//!     this.set("name", name)?;
//!     this.set("score", 10)?;
//!     Ok(())
//! };
//!
//! let a = hub
//!     .contain_class(ContainRequest::new("a", player, "ann").with_link_props(["score"]))
//!     .unwrap();
//! let b = hub
//!     .contain_class(ContainRequest::new("b", player, "bo").with_link_props(["score"]))
//!     .unwrap();
//!
//! // The container already held a real 0, so it was kept.
//! assert_eq!(hub.get("score"), Value::Int(0));
//! a.set("score", 3).unwrap();
//! assert_eq!(b.get("score"), Value::Int(3));
//! ```

pub mod prelude {
    pub use propweave_container::{
        BoxError, ClassFactory, ContainRequest, Container, ContainerConfig, ContainerError,
    };
    pub use propweave_core::{
        FieldError, Integrity, LinkedField, Object, RedirectOptions, SeedPolicy, Value, redirect,
        redirect_field, redirect_with_defaults,
    };
}
