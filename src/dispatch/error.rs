//! Error types for overload dispatch.

use thiserror::Error;

/// Errors raised by the dispatcher before or instead of any native call.
///
/// All of these indicate caller misuse and are never retried; a native
/// call that has begun reports through the status translator instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unknown method {0}")]
    UnknownMethod(String),

    #[error("wrong argument count for {name}: got {got}, declared arities {arities:?}")]
    Arity {
        name: String,
        got: usize,
        arities: Vec<usize>,
    },

    #[error("no signature of {name} matches the given arguments; candidates: {}", .candidates.join(" | "))]
    NoMatchingSignature {
        name: String,
        candidates: Vec<String>,
    },

    #[error("signature of {name} routes the return through argument {index}, which is not a text slot")]
    SlotMismatch { name: String, index: usize },
}
