//! Error type for conversion attempts.

use thiserror::Error;

use crate::handle::ClassId;

/// A single tag-against-value conversion failed.
///
/// Consumed by the dispatcher to fall through to the next candidate
/// signature; it never surfaces to the host caller directly. The one
/// exception is [`Consumed`](ConvertError::Consumed), which the dispatcher
/// escalates to a use-after-consume error instead of masking it as a
/// no-matching-signature failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    #[error("expected {expected}, got {got}")]
    Mismatch { expected: String, got: &'static str },

    #[error("integer {value} out of range for int32")]
    IntOutOfRange { value: i64 },

    #[error("object of class {actual} where {expected} was required")]
    ClassMismatch { expected: ClassId, actual: ClassId },

    #[error("interior nul byte in C string argument")]
    InteriorNul,

    #[error("handle of class {0} was already consumed")]
    Consumed(ClassId),
}
