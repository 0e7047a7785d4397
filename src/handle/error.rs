//! Error types for handle and class-registry operations.

use thiserror::Error;

use crate::native::TypeKey;

use super::ClassId;

/// Errors that can occur while wrapping or using a handle.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandleError {
    #[error("native factory returned null for class {0}")]
    NullNativeObject(ClassId),

    #[error("handle of class {0} used after its ownership was transferred out")]
    UseAfterConsume(ClassId),

    #[error("handle of class {0} does not own its native object")]
    NotOwner(ClassId),

    #[error("class {0} is not registered")]
    UnknownClass(ClassId),

    #[error("class {0} has no retain/release pair for ref-counted wrapping")]
    MissingRefCount(ClassId),
}

/// Errors detected while freezing a [`ClassRegistry`](super::ClassRegistry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("class {0} registered twice")]
    DuplicateClass(ClassId),

    #[error("class {child} names unregistered base {base}")]
    UnknownBase { child: ClassId, base: ClassId },

    #[error("base chain of class {0} contains a cycle")]
    CyclicHierarchy(ClassId),

    #[error("native type key {0} mapped to more than one class")]
    DuplicateTypeKey(TypeKey),

    #[error("text class {0} is not registered")]
    UnknownTextClass(ClassId),
}
