//! DONE-sentinel cursor iteration.
//!
//! Native cursor types advance and either return a value or a reserved
//! DONE sentinel. The adapter exposes this as a lazy, forward-only,
//! non-restartable sequence: each `next` advances native state, the
//! sentinel ends the sequence without being yielded, and a failure status
//! yields one error and fuses the iterator.

use crate::convert::{Lifted, Lowered, lift};
use crate::error::{Error, Result};
use crate::handle::{ClassRegistry, Handle};
use crate::native::EntryFn;
use crate::status::{ErrorCatalog, Status};
use crate::value::HostValue;

use super::ProtocolError;

/// The cursor capability of one wrapped class.
#[derive(Clone)]
pub struct CursorSpec {
    /// Advance the cursor: `(object) -> value-or-sentinel`.
    pub advance: EntryFn,
    /// Recognizes the DONE sentinel in the advance result.
    pub is_done: fn(&Lifted) -> bool,
    /// Rewind the cursor to its start: `(object) -> unit`.
    pub reset: Option<EntryFn>,
    /// Whether starting a new iteration pass resets the cursor first.
    ///
    /// Per-type decision: types whose native reset is cheap and
    /// idempotent opt in; the default resumes from the current position.
    pub reset_on_iter: bool,
}

impl CursorSpec {
    pub fn new(advance: EntryFn, is_done: fn(&Lifted) -> bool) -> Self {
        Self {
            advance,
            is_done,
            reset: None,
            reset_on_iter: false,
        }
    }

    /// Register a reset entry point and whether new iteration passes
    /// invoke it.
    pub fn with_reset(mut self, reset: EntryFn, reset_on_iter: bool) -> Self {
        self.reset = Some(reset);
        self.reset_on_iter = reset_on_iter;
        self
    }
}

/// Start an iteration pass over a cursor handle.
pub fn iterate<'a>(
    handle: &Handle,
    classes: &'a ClassRegistry,
    catalog: &'a ErrorCatalog,
) -> Result<CursorIter<'a>> {
    handle.borrow_ptr()?;
    let spec = classes
        .cursor_for(handle.class_id())
        .ok_or(ProtocolError::NotIterable(handle.class_id()))?
        .clone();

    if spec.reset_on_iter {
        if let Some(reset) = &spec.reset {
            let args = [Lowered::Object(handle.clone())];
            let mut status = Status::zero();
            reset(&args, &mut status);
            if status.is_failure() {
                return Err(catalog.translate(&status).into());
            }
        }
    }

    Ok(CursorIter {
        handle: handle.clone(),
        classes,
        catalog,
        spec,
        fused: false,
    })
}

/// A lazy, forward-only pass over a native cursor.
///
/// Each `next` mutates native cursor state in place; iterating the same
/// handle again resumes from the current position unless the type's spec
/// opts into reset-on-iteration.
pub struct CursorIter<'a> {
    handle: Handle,
    classes: &'a ClassRegistry,
    catalog: &'a ErrorCatalog,
    spec: CursorSpec,
    fused: bool,
}

impl std::fmt::Debug for CursorIter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CursorIter")
            .field("handle", &self.handle)
            .field("fused", &self.fused)
            .finish_non_exhaustive()
    }
}

impl Iterator for CursorIter<'_> {
    type Item = Result<HostValue>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.fused {
            return None;
        }

        let args = [Lowered::Object(self.handle.clone())];
        let mut status = Status::zero();
        let out = (self.spec.advance)(&args, &mut status);
        if status.is_failure() {
            self.fused = true;
            return Some(Err(self.catalog.translate(&status).into()));
        }
        if (self.spec.is_done)(&out) {
            self.fused = true;
            return None;
        }
        match lift(out, self.classes) {
            Ok(value) => Some(Ok(value)),
            Err(err) => {
                self.fused = true;
                Some(Err(Error::from(err)))
            }
        }
    }
}
