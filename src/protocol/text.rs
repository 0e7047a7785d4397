//! Stringification adapter.

use crate::convert::{Lifted, Lowered};
use crate::error::Result;
use crate::handle::{ClassRegistry, Handle};
use crate::status::{ErrorCatalog, Status};

use super::ProtocolError;

/// Render a handle to host text.
///
/// Delegates to the class's native render-to-text entry point when one is
/// registered. Classes without a canonical text form fall back to the
/// class name and native address; the adapter never re-invents native
/// formatting logic.
pub fn stringify(
    handle: &Handle,
    classes: &ClassRegistry,
    catalog: &ErrorCatalog,
) -> Result<String> {
    let ptr = handle.borrow_ptr()?;

    let Some(entry) = classes.capability(handle.class_id(), |p| p.to_text.as_ref()) else {
        return Ok(format!("<{}: 0x{:x}>", handle.class_id(), ptr as usize));
    };

    let args = [Lowered::Object(handle.clone())];
    let mut status = Status::zero();
    let out = entry(&args, &mut status);
    if status.is_failure() {
        return Err(catalog.translate(&status).into());
    }
    match out {
        Lifted::Text(text) => Ok(text.to_host_string()),
        other => Err(ProtocolError::BadAdapterResult {
            class: handle.class_id(),
            got: other.kind(),
        }
        .into()),
    }
}
