//! Generic protocol adapters over wrapped native objects.
//!
//! Thin, type-family-agnostic shims built on the dispatcher's calling
//! convention and the handle model. Each wrapped class declares its
//! capabilities in a [`ProtocolSpec`] on its class spec; derived classes
//! inherit what their base registered. A capability a class does not
//! declare is reported as unsupported rather than approximated.
//!
//! # Module Organization
//!
//! - [`compare`]: equality, ordering, and hashing
//! - [`cursor`]: DONE-sentinel cursor iteration
//! - [`text`]: stringification

mod compare;
mod cursor;
mod error;
mod text;

pub use compare::{compare, eq, hash};
pub use cursor::{CursorIter, CursorSpec, iterate};
pub use error::ProtocolError;
pub use text::stringify;

use crate::native::EntryFn;

/// The protocol capability set of one wrapped class.
///
/// Every entry point follows the status out-parameter convention and
/// receives its operands as lowered object arguments:
///
/// - `eq`: `(object, object) -> bool`
/// - `cmp`: `(object, object) -> int32` (sign gives the ordering)
/// - `hash`: `(object) -> int32`
/// - `to_text`: `(object) -> text`
#[derive(Clone, Default)]
pub struct ProtocolSpec {
    pub eq: Option<EntryFn>,
    pub cmp: Option<EntryFn>,
    pub hash: Option<EntryFn>,
    pub to_text: Option<EntryFn>,
    pub cursor: Option<CursorSpec>,
}

impl ProtocolSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_eq(mut self, entry: EntryFn) -> Self {
        self.eq = Some(entry);
        self
    }

    pub fn with_cmp(mut self, entry: EntryFn) -> Self {
        self.cmp = Some(entry);
        self
    }

    pub fn with_hash(mut self, entry: EntryFn) -> Self {
        self.hash = Some(entry);
        self
    }

    pub fn with_to_text(mut self, entry: EntryFn) -> Self {
        self.to_text = Some(entry);
        self
    }

    pub fn with_cursor(mut self, cursor: CursorSpec) -> Self {
        self.cursor = Some(cursor);
        self
    }
}
