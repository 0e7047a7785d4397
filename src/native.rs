//! Boundary contracts consumed from the native library.
//!
//! The wrapped library is opaque: this module declares only the shapes the
//! marshaling layer relies on — entry points with a status out-parameter,
//! per-class lifecycle function pointers, and the dynamic-type
//! identification primitive used for most-derived re-wrapping.

use std::ffi::c_void;
use std::fmt;
use std::sync::Arc;

use crate::convert::{Lifted, Lowered};
use crate::status::Status;

/// Address of a native object.
pub type RawPtr = *mut c_void;

/// Destroys a natively-allocated object. Called at most once per pointer,
/// only by the finalization of an `Owned` handle.
///
/// # Safety
///
/// `ptr` must be a live pointer previously produced by the native library
/// for the class this function was registered on.
pub type DestroyFn = unsafe fn(RawPtr);

/// Increments or decrements an intrusive native reference count.
///
/// # Safety
///
/// `ptr` must be a live pointer to an object of the registered class.
pub type RefCountFn = unsafe fn(RawPtr);

/// Queries a polymorphic native object's dynamic type identity.
///
/// Registered on the polymorphic base class; the returned key is resolved
/// through the class registry's most-derived table.
///
/// # Safety
///
/// `ptr` must be a live pointer to an object of the base class hierarchy
/// this function was registered on.
pub type TypeOfFn = unsafe fn(*const c_void) -> TypeKey;

/// Native dynamic-type identity, as reported by [`TypeOfFn`].
///
/// Distinct from [`ClassId`](crate::handle::ClassId): a `TypeKey` names a
/// native runtime type, a `ClassId` names a host-visible wrapper class.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TypeKey(pub &'static str);

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// One native entry point, in the library's status out-parameter
/// convention: the caller zeroes `status` before the call and checks it
/// immediately after. The returned [`Lifted`] is meaningful only when the
/// status does not carry a failure code.
pub type EntryFn = Arc<dyn Fn(&[Lowered], &mut Status) -> Lifted>;

/// Wrap a closure as an [`EntryFn`].
pub fn entry<F>(f: F) -> EntryFn
where
    F: Fn(&[Lowered], &mut Status) -> Lifted + 'static,
{
    Arc::new(f)
}
