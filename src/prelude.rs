//! Convenient re-exports for common usage patterns.
//!
//! This module provides a single import to bring all commonly used types
//! into scope.
//!
//! # Example
//!
//! ```ignore
//! use ffi_bridge::prelude::*;
//!
//! let classes = ClassRegistry::builder().build()?;
//! let catalog = ErrorCatalog::with_standard_messages();
//! let dispatcher = Dispatcher::new(&classes, &catalog, &methods);
//! let result = dispatcher.dispatch("setOffset", &[3.into()])?;
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Host values and native text
pub use crate::value::{HostCallable, HostValue, NativeString};

// Conversion registry
pub use crate::convert::{
    ConvertError, Lifted, Lowered, TextArg, TextSlot, Trampoline, TypeTag, lift,
};

// Overload dispatch
pub use crate::dispatch::{DispatchError, Dispatcher, MethodTable, ReturnSpec, Signature};

// Handles and the class registry
pub use crate::handle::{
    ClassId, ClassRegistry, ClassSpec, Handle, HandleError, Lifecycle, Ownership, RegistryError,
    SideBuffer,
};

// Status translation
pub use crate::status::{ErrorCatalog, NativeError, ParseErrorContext, Status, StatusCode};

// Protocol adapters
pub use crate::protocol::{CursorSpec, ProtocolError, ProtocolSpec};

// Native boundary contracts
pub use crate::native::{EntryFn, RawPtr, TypeKey, entry};
