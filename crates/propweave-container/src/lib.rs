#![forbid(unsafe_code)]

//! Shared-state container.
//!
//! A [`Container`] constructs member objects that fall back to the container
//! for unresolved names, stores them under caller-chosen keys, and links
//! selected member fields to its own storage so every linked member shares
//! one value.

pub mod container;
pub mod error;
pub mod factory;

pub use container::{Container, ContainerConfig};
pub use error::{BoxError, ContainerError};
pub use factory::{ClassFactory, ContainRequest};
