#![forbid(unsafe_code)]

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FieldError>;

/// A field operation was rejected by the object's integrity rules.
///
/// Every variant belongs to the "invalid operation" category: the caller
/// tried to add, write, or relink a field the object does not allow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("cannot add field `{field}`: object #{object} is not extensible")]
    NotExtensible { object: u64, field: String },

    #[error("cannot redefine non-configurable field `{field}` on object #{object}")]
    NonConfigurable { object: u64, field: String },

    #[error("cannot assign read-only field `{field}` on object #{object}")]
    ReadOnly { object: u64, field: String },

    #[error("field `{field}` on object #{object} is linked and cannot be removed")]
    LinkedPermanent { object: u64, field: String },
}

impl FieldError {
    /// Name of the field the rejected operation targeted.
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::NotExtensible { field, .. }
            | Self::NonConfigurable { field, .. }
            | Self::ReadOnly { field, .. }
            | Self::LinkedPermanent { field, .. } => field,
        }
    }

    /// Id of the object that rejected the operation.
    #[must_use]
    pub fn object_id(&self) -> u64 {
        match self {
            Self::NotExtensible { object, .. }
            | Self::NonConfigurable { object, .. }
            | Self::ReadOnly { object, .. }
            | Self::LinkedPermanent { object, .. } => *object,
        }
    }
}
