//! Error types for protocol adapters.

use thiserror::Error;

use crate::handle::ClassId;

/// Errors raised by the generic protocol adapters.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// The class has no native comparator; ordering comparisons report
    /// this rather than producing an arbitrary result.
    #[error("ordering is not supported for class {0}")]
    OrderingUnsupported(ClassId),

    /// The class has no stable native hash; its handles do not claim to
    /// be hashable.
    #[error("hashing is not supported for class {0}")]
    HashUnsupported(ClassId),

    #[error("class {0} is not iterable")]
    NotIterable(ClassId),

    /// A registered adapter entry point returned a result shape the
    /// adapter cannot interpret.
    #[error("adapter for class {class} returned unexpected {got}")]
    BadAdapterResult { class: ClassId, got: &'static str },
}
