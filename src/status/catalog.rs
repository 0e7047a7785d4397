//! The static code → message catalog.
//!
//! Populated once at startup and read-only afterwards. The standard table
//! ships the wrapped library's documented messages for its warning and
//! error ranges; deployments add library-extension codes through the
//! builder before freezing the catalog.

use std::collections::HashMap;

use crate::logging::warn;

use super::{NativeError, Status};

/// Well-known status codes of the wrapped library.
///
/// Warnings occupy the negative range, failures the positive range; the
/// `0x10100` block is reserved for pattern-syntax failures reported by
/// grammar-parsing operations.
pub mod code {
    pub const USING_FALLBACK_WARNING: i32 = -128;
    pub const USING_DEFAULT_WARNING: i32 = -127;
    pub const SAFECLONE_ALLOCATED_WARNING: i32 = -126;
    pub const STATE_OLD_WARNING: i32 = -125;
    pub const STRING_NOT_TERMINATED_WARNING: i32 = -124;
    pub const SORT_KEY_TOO_SHORT_WARNING: i32 = -123;
    pub const AMBIGUOUS_ALIAS_WARNING: i32 = -122;

    pub const ZERO: i32 = 0;

    pub const ILLEGAL_ARGUMENT: i32 = 1;
    pub const MISSING_RESOURCE: i32 = 2;
    pub const INVALID_FORMAT: i32 = 3;
    pub const FILE_ACCESS: i32 = 4;
    pub const INTERNAL_PROGRAM: i32 = 5;
    pub const MESSAGE_PARSE: i32 = 6;
    pub const MEMORY_ALLOCATION: i32 = 7;
    pub const INDEX_OUT_OF_BOUNDS: i32 = 8;
    pub const PARSE: i32 = 9;
    pub const INVALID_CHAR_FOUND: i32 = 10;
    pub const TRUNCATED_CHAR_FOUND: i32 = 11;
    pub const ILLEGAL_CHAR_FOUND: i32 = 12;
    pub const BUFFER_OVERFLOW: i32 = 15;
    pub const UNSUPPORTED: i32 = 16;
    pub const RESOURCE_TYPE_MISMATCH: i32 = 17;
    pub const ENUM_OUT_OF_SYNC: i32 = 25;
    pub const INVALID_STATE: i32 = 27;

    pub const UNEXPECTED_TOKEN: i32 = 0x10100;
    pub const MULTIPLE_DECIMAL_SEPARATORS: i32 = 0x10101;
    pub const MULTIPLE_EXPONENTIAL_SYMBOLS: i32 = 0x10102;
    pub const MALFORMED_EXPONENTIAL_PATTERN: i32 = 0x10103;
    pub const MULTIPLE_PERCENT_SYMBOLS: i32 = 0x10104;
    pub const MULTIPLE_PERMILL_SYMBOLS: i32 = 0x10105;
    pub const MULTIPLE_PAD_SPECIFIERS: i32 = 0x10106;
    pub const PATTERN_SYNTAX: i32 = 0x10107;
    pub const ILLEGAL_PAD_POSITION: i32 = 0x10108;
    pub const UNMATCHED_BRACES: i32 = 0x10109;
}

/// The wrapped library's documented messages, keyed by code.
const STANDARD_MESSAGES: &[(i32, &str)] = &[
    (
        code::USING_FALLBACK_WARNING,
        "A resource lookup returned a fallback result (not an error)",
    ),
    (
        code::USING_DEFAULT_WARNING,
        "A resource lookup returned a result from the root locale (not an error)",
    ),
    (
        code::SAFECLONE_ALLOCATED_WARNING,
        "A safe-clone operation required allocating memory (informational only)",
    ),
    (
        code::STATE_OLD_WARNING,
        "A compatibility layer was used to construct the service; expect degradation",
    ),
    (
        code::STRING_NOT_TERMINATED_WARNING,
        "An output string could not be terminated because output length equals capacity",
    ),
    (
        code::SORT_KEY_TOO_SHORT_WARNING,
        "Number of levels requested is higher than the number of levels in the sort key",
    ),
    (
        code::AMBIGUOUS_ALIAS_WARNING,
        "This alias can go to different implementations",
    ),
    (code::ZERO, "No error, no warning."),
    (code::ILLEGAL_ARGUMENT, "Illegal argument"),
    (code::MISSING_RESOURCE, "The requested resource cannot be found"),
    (code::INVALID_FORMAT, "Data format is not what is expected"),
    (code::FILE_ACCESS, "The requested file cannot be found"),
    (code::INTERNAL_PROGRAM, "Indicates a bug in the library code"),
    (code::MESSAGE_PARSE, "Unable to parse a message"),
    (code::MEMORY_ALLOCATION, "Memory allocation error"),
    (
        code::INDEX_OUT_OF_BOUNDS,
        "Trying to access an index that is out of bounds",
    ),
    (code::PARSE, "Unable to parse the input text"),
    (
        code::INVALID_CHAR_FOUND,
        "Character conversion: unmappable input sequence",
    ),
    (
        code::TRUNCATED_CHAR_FOUND,
        "Character conversion: incomplete input sequence",
    ),
    (
        code::ILLEGAL_CHAR_FOUND,
        "Character conversion: illegal input sequence",
    ),
    (
        code::BUFFER_OVERFLOW,
        "A result would not fit in the supplied buffer",
    ),
    (
        code::UNSUPPORTED,
        "Requested operation not supported in current context",
    ),
    (
        code::RESOURCE_TYPE_MISMATCH,
        "An operation is requested over a resource that does not support it",
    ),
    (
        code::ENUM_OUT_OF_SYNC,
        "Enumeration out of sync with underlying collection",
    ),
    (
        code::INVALID_STATE,
        "Requested operation cannot be completed in the current state",
    ),
    (code::UNEXPECTED_TOKEN, "Syntax error in format pattern"),
    (
        code::MULTIPLE_DECIMAL_SEPARATORS,
        "More than one decimal separator in number pattern",
    ),
    (
        code::MULTIPLE_EXPONENTIAL_SYMBOLS,
        "More than one exponent symbol in number pattern",
    ),
    (
        code::MALFORMED_EXPONENTIAL_PATTERN,
        "Grouping symbol in exponent pattern",
    ),
    (
        code::MULTIPLE_PERCENT_SYMBOLS,
        "More than one percent symbol in number pattern",
    ),
    (
        code::MULTIPLE_PERMILL_SYMBOLS,
        "More than one permill symbol in number pattern",
    ),
    (
        code::MULTIPLE_PAD_SPECIFIERS,
        "More than one pad symbol in number pattern",
    ),
    (code::PATTERN_SYNTAX, "Syntax error in format pattern"),
    (
        code::ILLEGAL_PAD_POSITION,
        "Pad symbol misplaced in number pattern",
    ),
    (code::UNMATCHED_BRACES, "Braces do not match in message pattern"),
];

/// Immutable code → message table, built once at startup.
#[derive(Debug, Clone)]
pub struct ErrorCatalog {
    messages: HashMap<i32, &'static str>,
}

impl ErrorCatalog {
    /// Start an empty catalog.
    pub fn builder() -> ErrorCatalogBuilder {
        ErrorCatalogBuilder {
            messages: HashMap::new(),
        }
    }

    /// A catalog pre-populated with the wrapped library's standard
    /// messages for its warning and error ranges.
    pub fn with_standard_messages() -> Self {
        let mut builder = Self::builder();
        for &(code, message) in STANDARD_MESSAGES {
            builder = builder.insert(code, message);
        }
        builder.build()
    }

    /// The message registered for `code`, if any.
    pub fn message(&self, code: i32) -> Option<&'static str> {
        self.messages.get(&code).copied()
    }

    /// Translate a failure status into the host-visible error shape,
    /// falling back to a generic message for unregistered codes.
    pub fn translate(&self, status: &Status) -> NativeError {
        let code = status.code().0;
        let message = match self.message(code) {
            Some(msg) => msg.to_string(),
            None => {
                warn!(code, "status code missing from catalog");
                format!("unknown native error {code}")
            }
        };
        NativeError {
            code,
            message,
            parse_context: status.parse_context().cloned(),
        }
    }
}

/// Builder for [`ErrorCatalog`]; insertion happens only here, the built
/// catalog is never mutated.
#[derive(Debug, Default)]
pub struct ErrorCatalogBuilder {
    messages: HashMap<i32, &'static str>,
}

impl ErrorCatalogBuilder {
    /// Register a message for a code, replacing any earlier registration.
    pub fn insert(mut self, code: i32, message: &'static str) -> Self {
        self.messages.insert(code, message);
        self
    }

    /// Freeze the catalog.
    pub fn build(self) -> ErrorCatalog {
        ErrorCatalog {
            messages: self.messages,
        }
    }
}
