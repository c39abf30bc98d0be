#![forbid(unsafe_code)]

use propweave_core::FieldError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContainerError>;

/// Error type returned by member factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum ContainerError {
    /// A field write or link was rejected by an object's integrity rules.
    #[error(transparent)]
    InvalidOperation(#[from] FieldError),

    #[error("factory `{factory}` failed to construct member `{key}`: {source}")]
    ConstructionFailure {
        key: String,
        factory: String,
        source: BoxError,
    },

    #[error("no member stored under key `{key}`")]
    KeyNotFound { key: String },

    #[error("key `{key}` holds a {found} value, not a member")]
    NotAMember { key: String, found: &'static str },
}

impl ContainerError {
    /// Whether the error belongs to the "invalid operation" category:
    /// rejected field operations and keys that hold a non-member value.
    #[must_use]
    pub fn is_invalid_operation(&self) -> bool {
        matches!(self, Self::InvalidOperation(_) | Self::NotAMember { .. })
    }

    /// The container key involved, when the error is about one.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::ConstructionFailure { key, .. }
            | Self::KeyNotFound { key }
            | Self::NotAMember { key, .. } => Some(key),
            Self::InvalidOperation(_) => None,
        }
    }
}
