//! Native result → host value lifting.

use crate::handle::{ClassId, ClassRegistry, Handle, HandleError, Ownership};
use crate::native::RawPtr;
use crate::value::{HostValue, NativeString};

/// One native result, as produced by an entry point.
///
/// Object results carry the statically declared class and the ownership
/// the host side takes over the pointer; lifting performs the most-derived
/// re-wrap and rejects null pointers.
#[derive(Clone, Debug)]
pub enum Lifted {
    Unit,
    Int32(i32),
    Bool(bool),
    Double(f64),
    Text(NativeString),
    Object {
        ptr: RawPtr,
        class: ClassId,
        ownership: Ownership,
    },
}

impl Lifted {
    /// Short name of this result's shape, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Lifted::Unit => "unit",
            Lifted::Int32(_) => "int32",
            Lifted::Bool(_) => "bool",
            Lifted::Double(_) => "double",
            Lifted::Text(_) => "text",
            Lifted::Object { .. } => "object",
        }
    }
}

/// Convert one native result into a host value, wrapping object pointers
/// behind handles.
pub fn lift(out: Lifted, classes: &ClassRegistry) -> Result<HostValue, HandleError> {
    match out {
        Lifted::Unit => Ok(HostValue::Unit),
        Lifted::Int32(v) => Ok(HostValue::Int(i64::from(v))),
        Lifted::Bool(v) => Ok(HostValue::Bool(v)),
        Lifted::Double(v) => Ok(HostValue::Float(v)),
        Lifted::Text(text) => Ok(HostValue::Str(text.to_host_string())),
        Lifted::Object {
            ptr,
            class,
            ownership,
        } => Handle::wrap(ptr, class, ownership, classes).map(HostValue::Object),
    }
}
