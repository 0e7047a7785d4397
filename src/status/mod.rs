//! Status codes, the status out-parameter, and error translation.
//!
//! Every fallible native entry point reports through an out-of-band
//! [`Status`] rather than an exception. The code ranges follow the native
//! library's own convention: negative codes are informational warnings,
//! zero is success, positive codes are failures. Only failure codes are
//! translated into a host-visible [`NativeError`]; warnings never
//! short-circuit a call.

mod catalog;

pub use catalog::{ErrorCatalog, ErrorCatalogBuilder, code};

use std::fmt;

use thiserror::Error;

/// A raw native status code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct StatusCode(pub i32);

impl StatusCode {
    /// The success code.
    pub const ZERO: StatusCode = StatusCode(0);

    /// Whether this code reports success (warnings included).
    pub fn is_success(self) -> bool {
        self.0 <= 0
    }

    /// Whether this code reports a failure.
    pub fn is_failure(self) -> bool {
        self.0 > 0
    }

    /// Whether this code is an informational warning.
    pub fn is_warning(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Positional detail attached by native operations that parse an input
/// grammar: the failing line and offset plus the text immediately before
/// and after the failure point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseErrorContext {
    pub line: i32,
    pub offset: i32,
    pub pre_context: String,
    pub post_context: String,
}

/// The status out-parameter passed to every fallible native entry point.
///
/// The caller zeroes it before the call and checks it immediately after;
/// the native side reports through [`set`](Status::set) and, for grammar
/// parsers, [`set_parse_context`](Status::set_parse_context).
#[derive(Clone, Debug, Default)]
pub struct Status {
    code: StatusCode,
    parse: Option<ParseErrorContext>,
}

impl Default for StatusCode {
    fn default() -> Self {
        StatusCode::ZERO
    }
}

impl Status {
    /// A fresh success status.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Report a status code.
    pub fn set(&mut self, code: i32) {
        self.code = StatusCode(code);
    }

    /// Attach positional parse detail to a failure.
    pub fn set_parse_context(&mut self, ctx: ParseErrorContext) {
        self.parse = Some(ctx);
    }

    /// The current code.
    pub fn code(&self) -> StatusCode {
        self.code
    }

    /// The attached parse detail, if any.
    pub fn parse_context(&self) -> Option<&ParseErrorContext> {
        self.parse.as_ref()
    }

    /// Whether a failure code has been reported.
    pub fn is_failure(&self) -> bool {
        self.code.is_failure()
    }

    /// Whether an informational warning has been reported.
    pub fn is_warning(&self) -> bool {
        self.code.is_warning()
    }
}

/// A native operation reported a failure status.
///
/// Carries the numeric code, the catalog message, and optional parse
/// detail. Produced only by [`ErrorCatalog::translate`]; no call site
/// invents its own message text.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("native error {code}: {message}{}", position(.parse_context))]
pub struct NativeError {
    pub code: i32,
    pub message: String,
    pub parse_context: Option<ParseErrorContext>,
}

fn position(ctx: &Option<ParseErrorContext>) -> String {
    match ctx {
        Some(ctx) => format!(" (line {}, offset {})", ctx.line, ctx.offset),
        None => String::new(),
    }
}
