//! Error types for the document model, its dtype engine and the merge engine.

use thiserror::Error;

use crate::model::DType;
use crate::tree::NodeKind;

/// Coarse error categories.
///
/// Every [`Error`] variant maps to exactly one kind, so callers can branch on
/// the category without matching individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Unrecognized dtype token or invalid dtype assignment.
    InvalidDType,
    /// Value insertion or coercion incompatible with the container's dtype.
    ValueConflict,
    /// Entity parented under an incompatible kind, a cycle, or a name clash.
    OwnershipViolation,
    /// Explicit identifier failed syntax validation.
    IdentityMalformed,
    /// Attribute or dtype incompatibility detected during a merge.
    MergeConflict,
    /// Handle refers to an entity that is no longer in the store.
    UnknownEntity,
}

impl ErrorKind {
    /// Returns a stable lowercase name for the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidDType => "invalid-dtype",
            ErrorKind::ValueConflict => "value-conflict",
            ErrorKind::OwnershipViolation => "ownership-violation",
            ErrorKind::IdentityMalformed => "identity-malformed",
            ErrorKind::MergeConflict => "merge-conflict",
            ErrorKind::UnknownEntity => "unknown-entity",
        }
    }
}

/// Error raised by any operation on the document model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    // === InvalidDType ===
    #[error("unknown dtype {token:?}")]
    UnknownDType { token: String },

    // === ValueConflict ===
    #[error("value {value:?} cannot be converted to dtype '{dtype}'")]
    Coercion { value: String, dtype: DType },

    #[error("value of dtype '{found}' does not match property dtype '{expected}'")]
    TypeMismatch { expected: DType, found: DType },

    #[error("tuple length mismatch: expected {expected} elements, found {found}")]
    TupleLength { expected: usize, found: usize },

    #[error("expected a single value, got {count}; use extend to add several values")]
    MultipleValues { count: usize },

    #[error("index {index} out of bounds (len: {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("unit mismatch: property has {expected:?}, source has {found:?}")]
    UnitMismatch {
        expected: Option<String>,
        found: Option<String>,
    },

    // === OwnershipViolation ===
    #[error("a {parent} cannot hold a {child}")]
    InvalidParent { child: NodeKind, parent: NodeKind },

    #[error("section {name:?} cannot be placed inside itself or one of its descendants")]
    Cycle { name: String },

    #[error("a {kind} named {name:?} already exists under this parent")]
    DuplicateName { kind: NodeKind, name: String },

    // === IdentityMalformed ===
    #[error("malformed identifier {id:?}")]
    MalformedId { id: String },

    // === MergeConflict ===
    #[error("merge conflict on {attribute}: destination has {destination:?}, source has {incoming:?}")]
    AttributeConflict {
        attribute: &'static str,
        destination: String,
        incoming: String,
    },

    #[error("merge conflict: destination dtype {destination:?} does not match source dtype {incoming:?}")]
    DTypeConflict {
        destination: Option<DType>,
        incoming: Option<DType>,
    },

    #[error("cannot merge a {kind} into itself")]
    SelfMerge { kind: NodeKind },

    // === UnknownEntity ===
    #[error("{kind} handle does not refer to a live entity")]
    UnknownEntity { kind: NodeKind },
}

impl Error {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownDType { .. } => ErrorKind::InvalidDType,
            Error::Coercion { .. }
            | Error::TypeMismatch { .. }
            | Error::TupleLength { .. }
            | Error::MultipleValues { .. }
            | Error::IndexOutOfBounds { .. }
            | Error::UnitMismatch { .. } => ErrorKind::ValueConflict,
            Error::InvalidParent { .. } | Error::Cycle { .. } | Error::DuplicateName { .. } => {
                ErrorKind::OwnershipViolation
            }
            Error::MalformedId { .. } => ErrorKind::IdentityMalformed,
            Error::AttributeConflict { .. } | Error::DTypeConflict { .. } | Error::SelfMerge { .. } => {
                ErrorKind::MergeConflict
            }
            Error::UnknownEntity { .. } => ErrorKind::UnknownEntity,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error reported by the tree validator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{child} at {path:?} does not point back to the parent that lists it")]
    BrokenParentLink { child: NodeKind, path: String },

    #[error("{kind} name {name:?} appears more than once under {path:?}")]
    DuplicateSibling {
        kind: NodeKind,
        name: String,
        path: String,
    },

    #[error("value {index} of property {path:?} does not conform to dtype '{dtype}'")]
    HeterogeneousValues {
        path: String,
        index: usize,
        dtype: DType,
    },

    #[error("property {path:?} holds values but declares no dtype")]
    MissingDType { path: String },
}
