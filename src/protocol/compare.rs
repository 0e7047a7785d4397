//! Equality, ordering, and hashing adapters.

use std::cmp::Ordering;

use crate::convert::{Lifted, Lowered};
use crate::error::Result;
use crate::handle::{ClassRegistry, Handle};
use crate::status::{ErrorCatalog, Status};

use super::ProtocolError;

/// Test two handles for equality.
///
/// Delegates to the class's native equality entry point when one is
/// registered; otherwise two handles are equal exactly when they wrap the
/// same native pointer.
pub fn eq(
    a: &Handle,
    b: &Handle,
    classes: &ClassRegistry,
    catalog: &ErrorCatalog,
) -> Result<bool> {
    let a_ptr = a.borrow_ptr()?;
    let b_ptr = b.borrow_ptr()?;

    let Some(entry) = classes.capability(a.class_id(), |p| p.eq.as_ref()) else {
        return Ok(std::ptr::eq(a_ptr, b_ptr));
    };

    let args = [Lowered::Object(a.clone()), Lowered::Object(b.clone())];
    let mut status = Status::zero();
    let out = entry(&args, &mut status);
    if status.is_failure() {
        return Err(catalog.translate(&status).into());
    }
    match out {
        Lifted::Bool(v) => Ok(v),
        other => Err(ProtocolError::BadAdapterResult {
            class: a.class_id(),
            got: other.kind(),
        }
        .into()),
    }
}

/// Order two handles through the class's native comparator.
///
/// Classes without a native comparator support only equality; ordering
/// reports [`ProtocolError::OrderingUnsupported`] rather than inventing a
/// result.
pub fn compare(
    a: &Handle,
    b: &Handle,
    classes: &ClassRegistry,
    catalog: &ErrorCatalog,
) -> Result<Ordering> {
    a.borrow_ptr()?;
    b.borrow_ptr()?;

    let Some(entry) = classes.capability(a.class_id(), |p| p.cmp.as_ref()) else {
        return Err(ProtocolError::OrderingUnsupported(a.class_id()).into());
    };

    let args = [Lowered::Object(a.clone()), Lowered::Object(b.clone())];
    let mut status = Status::zero();
    let out = entry(&args, &mut status);
    if status.is_failure() {
        return Err(catalog.translate(&status).into());
    }
    match out {
        Lifted::Int32(v) => Ok(v.cmp(&0)),
        other => Err(ProtocolError::BadAdapterResult {
            class: a.class_id(),
            got: other.kind(),
        }
        .into()),
    }
}

/// Hash a handle through the class's native hash function.
///
/// Classes without a stable native hash report
/// [`ProtocolError::HashUnsupported`].
pub fn hash(handle: &Handle, classes: &ClassRegistry, catalog: &ErrorCatalog) -> Result<i32> {
    handle.borrow_ptr()?;

    let Some(entry) = classes.capability(handle.class_id(), |p| p.hash.as_ref()) else {
        return Err(ProtocolError::HashUnsupported(handle.class_id()).into());
    };

    let args = [Lowered::Object(handle.clone())];
    let mut status = Status::zero();
    let out = entry(&args, &mut status);
    if status.is_failure() {
        return Err(catalog.translate(&status).into());
    }
    match out {
        Lifted::Int32(v) => Ok(v),
        other => Err(ProtocolError::BadAdapterResult {
            class: handle.class_id(),
            got: other.kind(),
        }
        .into()),
    }
}
