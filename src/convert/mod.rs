//! The type-tag registry: matching and conversion in both directions.
//!
//! Each [`TypeTag`] defines a cheap, side-effect-free match test against a
//! host value and a fallible conversion. Host→native conversion is
//! *lowering* and produces a [`Lowered`] argument; native→host conversion
//! is *lifting* and consumes a [`Lifted`] result.
//!
//! # Module Organization
//!
//! - [`error`]: the conversion error consumed by the dispatcher
//! - [`lower`]: host value → native argument representation
//! - [`lift`]: native result → host value
//! - [`trampoline`]: native-callable shims around host callables

mod error;
mod lift;
mod lower;
mod trampoline;

pub use error::ConvertError;
pub use lift::{Lifted, lift};
pub use lower::{Lowered, TextArg, TextSlot};
pub use trampoline::Trampoline;

use std::fmt;

use crate::handle::{ClassId, ClassRegistry};
use crate::value::HostValue;

/// The closed set of marshalable argument and result shapes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TypeTag {
    /// A native 32-bit signed integer.
    Int32,
    /// A native boolean.
    Bool,
    /// A native double-precision float. Matching is strict: host integers
    /// do not coerce, so an integer argument falls through to a later
    /// integer signature instead of silently widening.
    Double,
    /// Immutable native text, by value (a host string normalized into a
    /// transient native string) or by reference (a handle of the
    /// registry's text class).
    Text,
    /// An in/out text parameter written by the native call and routed
    /// back as the host-visible result.
    MutableTextSlot,
    /// A wrapped native object of the given class or a descendant.
    Object(ClassId),
    /// Any host callable, wrapped in a native-callable trampoline.
    Callable,
    /// A raw byte buffer.
    ByteBuffer,
    /// A nul-terminated C string.
    RawCString,
}

impl TypeTag {
    /// Side-effect-free match test: does this value have the shape
    /// [`lower`](TypeTag::lower) accepts? Shape only — a consumed handle
    /// still matches here, and lowering it escalates the misuse.
    pub fn matches(&self, value: &HostValue, classes: &ClassRegistry) -> bool {
        match (self, value) {
            (TypeTag::Int32, HostValue::Int(v)) => i32::try_from(*v).is_ok(),
            (TypeTag::Bool, HostValue::Bool(_)) => true,
            (TypeTag::Double, HostValue::Float(_)) => true,
            (TypeTag::Text, HostValue::Str(_)) => true,
            (TypeTag::Text, HostValue::Object(h)) => classes
                .text_class()
                .is_some_and(|text| classes.is_descendant(h.class_id(), text)),
            (TypeTag::MutableTextSlot, HostValue::Str(_)) => true,
            (TypeTag::Object(class), HostValue::Object(h)) => {
                classes.is_descendant(h.class_id(), *class)
            }
            (TypeTag::Callable, HostValue::Callable(_)) => true,
            (TypeTag::ByteBuffer, HostValue::Bytes(_)) => true,
            (TypeTag::RawCString, HostValue::Str(s)) => !s.contains('\0'),
            _ => false,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Int32 => f.write_str("int32"),
            TypeTag::Bool => f.write_str("bool"),
            TypeTag::Double => f.write_str("double"),
            TypeTag::Text => f.write_str("text"),
            TypeTag::MutableTextSlot => f.write_str("text-slot"),
            TypeTag::Object(class) => write!(f, "object<{class}>"),
            TypeTag::Callable => f.write_str("callable"),
            TypeTag::ByteBuffer => f.write_str("byte-buffer"),
            TypeTag::RawCString => f.write_str("c-string"),
        }
    }
}
