//! Unified error type for the ffi-bridge library.
//!
//! This module provides a single [`Error`] type that encompasses all
//! errors a host-visible call can surface, making it easier to handle
//! errors in application code. Conversion failures are deliberately
//! absent: the dispatcher consumes them while trying overload candidates
//! and they never reach the caller.

use thiserror::Error;

use crate::dispatch::DispatchError;
use crate::handle::{HandleError, RegistryError};
use crate::protocol::ProtocolError;
use crate::status::NativeError;

/// Unified error type for all host-visible operations.
///
/// # Example
///
/// ```ignore
/// use ffi_bridge::{Dispatcher, Result};
///
/// fn set_attribute(dispatcher: &Dispatcher<'_>) -> Result<()> {
///     dispatcher.dispatch("setAttribute", &["strength".into(), 2.into()])?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// No signature matched the call, before any native code ran.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// A handle operation failed (null factory result, use after
    /// consume, ownership misuse).
    #[error(transparent)]
    Handle(#[from] HandleError),

    /// A registry could not be frozen at startup.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A native call reported a failure status, translated through the
    /// error catalog.
    #[error(transparent)]
    Native(#[from] NativeError),

    /// A protocol adapter refused the operation.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A host callable invoked through a trampoline failed.
    #[error("callback error: {0}")]
    Callback(#[source] anyhow::Error),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if this is a dispatch error.
    pub fn is_dispatch(&self) -> bool {
        matches!(self, Self::Dispatch(_))
    }

    /// Returns `true` if this is a handle error.
    pub fn is_handle(&self) -> bool {
        matches!(self, Self::Handle(_))
    }

    /// Returns `true` if this is a translated native failure.
    pub fn is_native(&self) -> bool {
        matches!(self, Self::Native(_))
    }

    /// Returns `true` if this is a protocol adapter error.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }

    /// The native status code, if this is a translated native failure.
    pub fn native_code(&self) -> Option<i32> {
        match self {
            Self::Native(err) => Some(err.code),
            _ => None,
        }
    }
}
