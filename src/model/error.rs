//! Error types for model editing operations.

use thiserror::Error;
use uuid::Uuid;

use super::element::ElementKind;
use crate::base::ElementId;
use crate::multiplicity::MultiplicityError;

/// Errors raised by [`Model`](super::Model) editing operations.
///
/// These reject a malformed edit request. They never describe a
/// well-formedness problem of the graph itself; that is the job of the
/// validators.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    /// The id does not name a live element.
    #[error("unknown element {0}")]
    UnknownElement(ElementId),

    /// The element exists but is the wrong kind for the operation.
    #[error("{element} is a {found}, expected {expected}")]
    KindMismatch {
        element: ElementId,
        expected: &'static str,
        found: ElementKind,
    },

    /// An imported element reused a uuid already present in the model.
    #[error("duplicate element uuid {0}")]
    DuplicateUuid(Uuid),

    /// Multiplicity text could not be parsed.
    #[error(transparent)]
    Multiplicity(#[from] MultiplicityError),

    /// Direction text is not one of `in`, `out`, `inout`.
    #[error(transparent)]
    InvalidDirection(#[from] InvalidDirection),

    /// Loop kind text is not a known loop kind.
    #[error(transparent)]
    InvalidLoopKind(#[from] InvalidLoopKind),
}

impl ModelError {
    pub(crate) fn mismatch(element: ElementId, expected: &'static str, found: ElementKind) -> Self {
        Self::KindMismatch {
            element,
            expected,
            found,
        }
    }
}

/// Direction text outside `{in, out, inout}`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid direction '{0}', expected 'in', 'out' or 'inout'")]
pub struct InvalidDirection(pub String);

/// Loop kind text outside `{while, until, for-count, for-each}`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid loop kind '{0}', expected 'while', 'until', 'for-count' or 'for-each'")]
pub struct InvalidLoopKind(pub String);
