//! Native-callable shims around host callables.

use crate::error::Error;
use crate::handle::ClassRegistry;
use crate::value::{HostCallable, HostValue};

use super::error::ConvertError;
use super::lift::{Lifted, lift};
use super::lower::{Lowered, TextArg};
use crate::value::NativeString;

/// Marshals the reverse direction: the native side invokes the trampoline
/// with native values, which are lifted to host values through the same
/// registry, handed to the host callable, and the result lowered back.
#[derive(Clone)]
pub struct Trampoline {
    callable: HostCallable,
}

impl Trampoline {
    pub(crate) fn new(callable: HostCallable) -> Self {
        Self { callable }
    }

    /// Invoke the wrapped host callable from the native side.
    ///
    /// Returns `None` for a unit result. Host callable failures surface as
    /// [`Error::Callback`]; the native caller decides how to map them into
    /// its own status convention.
    pub fn call(
        &self,
        args: Vec<Lifted>,
        classes: &ClassRegistry,
    ) -> Result<Option<Lowered>, Error> {
        let mut host_args = Vec::with_capacity(args.len());
        for arg in args {
            host_args.push(lift(arg, classes)?);
        }
        let result = self.callable.invoke(&host_args).map_err(Error::Callback)?;
        lower_inferred(result)
    }
}

/// Lower a callback result by its own shape; callbacks have no declared
/// tag list, so the host value picks its native representation.
fn lower_inferred(value: HostValue) -> Result<Option<Lowered>, Error> {
    match value {
        HostValue::Unit => Ok(None),
        HostValue::Int(v) => i32::try_from(v)
            .map(|v| Some(Lowered::Int32(v)))
            .map_err(|_| Error::Callback(anyhow::Error::new(ConvertError::IntOutOfRange { value: v }))),
        HostValue::Bool(v) => Ok(Some(Lowered::Bool(v))),
        HostValue::Float(v) => Ok(Some(Lowered::Double(v))),
        HostValue::Str(s) => Ok(Some(Lowered::Text(TextArg::Transient(
            NativeString::from_str(&s),
        )))),
        HostValue::Bytes(b) => Ok(Some(Lowered::Bytes(b))),
        HostValue::Object(h) => {
            if !h.is_live() {
                return Err(Error::Callback(anyhow::Error::new(ConvertError::Consumed(
                    h.class_id(),
                ))));
            }
            Ok(Some(Lowered::Object(h)))
        }
        HostValue::Callable(c) => Ok(Some(Lowered::Callable(Trampoline::new(c)))),
    }
}
