//! Overload resolution and invocation.
//!
//! Candidate signatures sharing one host-visible name are grouped by
//! arity; within a group they are tried in declaration order. A signature
//! is *committed* once every argument lowers successfully — the native
//! entry point is then invoked and no later candidate is tried, even if
//! the native call itself fails. Overload ambiguity is therefore resolved
//! entirely during conversion, before any native code runs: a native call
//! may have side effects, and retrying another overload after one began
//! would risk doubling them.

mod error;

pub use error::DispatchError;

use crate::convert::{ConvertError, Lifted, Lowered, TypeTag, lift};
use crate::error::{Error, Result};
use crate::handle::{ClassRegistry, HandleError};
use crate::logging::{debug, error, trace};
use crate::native::EntryFn;
use crate::status::{ErrorCatalog, Status};
use crate::value::HostValue;

/// How a committed call's result reaches the host.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ReturnSpec {
    /// The call returns nothing; the host sees a unit value.
    Void,
    /// The lifted native result is returned.
    Value,
    /// The mutable text slot at this argument position is written by the
    /// native call and returned as the result, so the host call appears
    /// to return the argument it passed in.
    Slot(usize),
}

/// One candidate native call shape: an ordered tag list, the entry point,
/// and the return routing.
#[derive(Clone)]
pub struct Signature {
    tags: Vec<TypeTag>,
    ret: ReturnSpec,
    entry: EntryFn,
}

impl Signature {
    pub fn new(tags: Vec<TypeTag>, ret: ReturnSpec, entry: EntryFn) -> Self {
        Self { tags, ret, entry }
    }

    /// Number of arguments this signature accepts.
    pub fn arity(&self) -> usize {
        self.tags.len()
    }

    /// The tag list, for diagnostics.
    pub fn tags(&self) -> &[TypeTag] {
        &self.tags
    }

    fn render_tags(&self) -> String {
        let tags: Vec<String> = self.tags.iter().map(ToString::to_string).collect();
        format!("({})", tags.join(", "))
    }
}

/// All host-visible methods, each holding its signatures in declaration
/// order. Built once at startup, immutable afterwards.
pub struct MethodTable {
    methods: std::collections::HashMap<String, Vec<Signature>>,
}

impl MethodTable {
    pub fn builder() -> MethodTableBuilder {
        MethodTableBuilder {
            methods: std::collections::HashMap::new(),
        }
    }

    /// The declaration-ordered signatures for `name`, if any.
    pub fn signatures(&self, name: &str) -> Option<&[Signature]> {
        self.methods.get(name).map(Vec::as_slice)
    }
}

/// Builder for [`MethodTable`].
#[derive(Default)]
pub struct MethodTableBuilder {
    methods: std::collections::HashMap<String, Vec<Signature>>,
}

impl MethodTableBuilder {
    /// Append one signature under `name`; later definitions of the same
    /// name and arity are tried after earlier ones.
    pub fn define(mut self, name: &str, signature: Signature) -> Self {
        self.methods
            .entry(name.to_string())
            .or_default()
            .push(signature);
        self
    }

    /// Validate return routing and freeze the table.
    pub fn build(self) -> std::result::Result<MethodTable, DispatchError> {
        for (name, signatures) in &self.methods {
            for signature in signatures {
                if let ReturnSpec::Slot(index) = signature.ret {
                    let routed = signature.tags.get(index);
                    if routed != Some(&TypeTag::MutableTextSlot) {
                        return Err(DispatchError::SlotMismatch {
                            name: name.clone(),
                            index,
                        });
                    }
                }
            }
        }
        Ok(MethodTable {
            methods: self.methods,
        })
    }
}

/// Resolves and invokes overloaded native entry points.
///
/// Borrows the immutable registries built at startup; one dispatcher can
/// serve any number of calls.
pub struct Dispatcher<'a> {
    classes: &'a ClassRegistry,
    catalog: &'a ErrorCatalog,
    methods: &'a MethodTable,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        classes: &'a ClassRegistry,
        catalog: &'a ErrorCatalog,
        methods: &'a MethodTable,
    ) -> Self {
        Self {
            classes,
            catalog,
            methods,
        }
    }

    /// Resolve `name` against `args` and invoke the first fully-matching
    /// signature.
    pub fn dispatch(&self, name: &str, args: &[HostValue]) -> Result<HostValue> {
        let Some(signatures) = self.methods.signatures(name) else {
            return Err(DispatchError::UnknownMethod(name.to_string()).into());
        };

        let group: Vec<&Signature> = signatures
            .iter()
            .filter(|s| s.arity() == args.len())
            .collect();
        if group.is_empty() {
            let mut arities: Vec<usize> = signatures.iter().map(Signature::arity).collect();
            arities.sort_unstable();
            arities.dedup();
            return Err(DispatchError::Arity {
                name: name.to_string(),
                got: args.len(),
                arities,
            }
            .into());
        }

        'candidates: for signature in &group {
            let mut lowered = Vec::with_capacity(args.len());
            for (tag, value) in signature.tags.iter().zip(args) {
                match tag.lower(value, self.classes) {
                    Ok(arg) => lowered.push(arg),
                    Err(ConvertError::Consumed(class)) => {
                        return Err(HandleError::UseAfterConsume(class).into());
                    }
                    Err(_) => {
                        trace!(method = name, "candidate signature rejected");
                        continue 'candidates;
                    }
                }
            }

            // Committed: later candidates are never tried, even if the
            // native call fails.
            debug!(
                method = name,
                signature = %signature.render_tags(),
                "signature committed"
            );
            let mut status = Status::zero();
            let out = (signature.entry)(&lowered, &mut status);
            if status.is_failure() {
                error!(method = name, code = status.code().0, "native call failed");
                return Err(self.catalog.translate(&status).into());
            }
            if status.is_warning() {
                debug!(
                    method = name,
                    code = status.code().0,
                    "native call reported a warning status"
                );
            }
            return self.route_return(name, signature, &lowered, out);
        }

        Err(DispatchError::NoMatchingSignature {
            name: name.to_string(),
            candidates: group.iter().map(|s| s.render_tags()).collect(),
        }
        .into())
    }

    fn route_return(
        &self,
        name: &str,
        signature: &Signature,
        lowered: &[Lowered],
        out: Lifted,
    ) -> Result<HostValue> {
        match signature.ret {
            ReturnSpec::Void => Ok(HostValue::Unit),
            ReturnSpec::Value => lift(out, self.classes).map_err(Error::from),
            ReturnSpec::Slot(index) => match lowered.get(index) {
                Some(Lowered::TextSlot(slot)) => {
                    Ok(HostValue::Str(slot.get().to_host_string()))
                }
                _ => Err(DispatchError::SlotMismatch {
                    name: name.to_string(),
                    index,
                }
                .into()),
            },
        }
    }
}
