//! Host value → native argument lowering.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::rc::Rc;

use crate::handle::{ClassRegistry, Handle};
use crate::value::{HostValue, NativeString};

use super::error::ConvertError;
use super::trampoline::Trampoline;
use super::TypeTag;

/// One lowered argument, in the representation the native entry point
/// consumes.
#[derive(Clone)]
pub enum Lowered {
    Int32(i32),
    Bool(bool),
    Double(f64),
    Text(TextArg),
    TextSlot(TextSlot),
    Object(Handle),
    Callable(Trampoline),
    Bytes(Vec<u8>),
    CString(CString),
}

impl Lowered {
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Lowered::Int32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Lowered::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Lowered::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextArg> {
        match self {
            Lowered::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_slot(&self) -> Option<&TextSlot> {
        match self {
            Lowered::TextSlot(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Handle> {
        match self {
            Lowered::Object(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_callable(&self) -> Option<&Trampoline> {
        match self {
            Lowered::Callable(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Lowered::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_c_str(&self) -> Option<&CStr> {
        match self {
            Lowered::CString(s) => Some(s),
            _ => None,
        }
    }
}

/// An immutable text argument: either a transient native string built
/// from a host string for the duration of one call, or a reference to a
/// native string object wrapped behind a handle.
#[derive(Clone)]
pub enum TextArg {
    Transient(NativeString),
    Shared(Handle),
}

impl TextArg {
    /// Resolve to the native text layout the entry point reads.
    pub fn as_native(&self) -> Result<&NativeString, crate::handle::HandleError> {
        match self {
            TextArg::Transient(text) => Ok(text),
            TextArg::Shared(handle) => {
                let ptr = handle.borrow_ptr()?;
                // The match test guaranteed this handle wraps the text
                // class, whose native layout is `NativeString`; the
                // handle in `Shared` keeps the object alive for the
                // borrow's duration.
                Ok(unsafe { &*(ptr as *const NativeString) })
            }
        }
    }
}

/// An in/out text parameter: the native call writes it, the dispatcher
/// routes it back as the host-visible result.
#[derive(Clone)]
pub struct TextSlot(Rc<RefCell<NativeString>>);

impl TextSlot {
    /// Allocate a slot seeded with the host-provided content.
    pub fn new(seed: NativeString) -> Self {
        Self(Rc::new(RefCell::new(seed)))
    }

    /// Replace the slot's content.
    pub fn set(&self, text: NativeString) {
        *self.0.borrow_mut() = text;
    }

    /// Mutate the slot's content in place.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut NativeString) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    /// Snapshot the slot's current content.
    pub fn get(&self) -> NativeString {
        self.0.borrow().clone()
    }
}

impl TypeTag {
    /// Convert one host value into its native argument representation.
    ///
    /// Failures are consumed by the dispatcher to try the next candidate
    /// signature; a [`ConvertError::Consumed`] is escalated instead.
    pub fn lower(
        &self,
        value: &HostValue,
        classes: &ClassRegistry,
    ) -> Result<Lowered, ConvertError> {
        match (self, value) {
            (TypeTag::Int32, HostValue::Int(v)) => i32::try_from(*v)
                .map(Lowered::Int32)
                .map_err(|_| ConvertError::IntOutOfRange { value: *v }),
            (TypeTag::Bool, HostValue::Bool(b)) => Ok(Lowered::Bool(*b)),
            (TypeTag::Double, HostValue::Float(d)) => Ok(Lowered::Double(*d)),
            (TypeTag::Text, HostValue::Str(s)) => {
                Ok(Lowered::Text(TextArg::Transient(NativeString::from_str(s))))
            }
            (TypeTag::Text, HostValue::Object(h)) => {
                let Some(text) = classes.text_class() else {
                    return Err(self.mismatch(value));
                };
                if !classes.is_descendant(h.class_id(), text) {
                    return Err(ConvertError::ClassMismatch {
                        expected: text,
                        actual: h.class_id(),
                    });
                }
                if !h.is_live() {
                    return Err(ConvertError::Consumed(h.class_id()));
                }
                Ok(Lowered::Text(TextArg::Shared(h.clone())))
            }
            (TypeTag::MutableTextSlot, HostValue::Str(s)) => {
                Ok(Lowered::TextSlot(TextSlot::new(NativeString::from_str(s))))
            }
            (TypeTag::Object(class), HostValue::Object(h)) => {
                if !classes.is_descendant(h.class_id(), *class) {
                    return Err(ConvertError::ClassMismatch {
                        expected: *class,
                        actual: h.class_id(),
                    });
                }
                if !h.is_live() {
                    return Err(ConvertError::Consumed(h.class_id()));
                }
                Ok(Lowered::Object(h.clone()))
            }
            (TypeTag::Callable, HostValue::Callable(c)) => {
                Ok(Lowered::Callable(Trampoline::new(c.clone())))
            }
            (TypeTag::ByteBuffer, HostValue::Bytes(b)) => Ok(Lowered::Bytes(b.clone())),
            (TypeTag::RawCString, HostValue::Str(s)) => CString::new(s.as_str())
                .map(Lowered::CString)
                .map_err(|_| ConvertError::InteriorNul),
            _ => Err(self.mismatch(value)),
        }
    }

    fn mismatch(&self, value: &HostValue) -> ConvertError {
        ConvertError::Mismatch {
            expected: self.to_string(),
            got: value.kind(),
        }
    }
}
