//! Marshaling layer for dynamic hosts calling status-code-based native
//! libraries.
//!
//! This library provides the cross-cutting infrastructure every wrapped
//! native entry point relies on: runtime overload resolution, type
//! conversion between dynamic host values and native fixed-layout types
//! (*lowering* host→native, *lifting* native→host), ownership-tagged
//! object handles with most-derived re-wrapping, status-code translation,
//! and generic protocol adapters for iteration, comparison, hashing, and
//! stringification.
//!
//! # Quick Start
//!
//! ```ignore
//! use ffi_bridge::prelude::*;
//!
//! // Freeze the registries once at startup.
//! let classes = ClassRegistry::builder()
//!     .register(ClassSpec::new(ClassId("Collator")).with_destroy(collator_destroy))
//!     .build()?;
//! let catalog = ErrorCatalog::with_standard_messages();
//! let methods = MethodTable::builder()
//!     .define("setStrength", Signature::new(
//!         vec![TypeTag::Object(ClassId("Collator")), TypeTag::Int32],
//!         ReturnSpec::Void,
//!         entry(collator_set_strength),
//!     ))
//!     .build()?;
//!
//! // Dispatch host calls by name.
//! let dispatcher = Dispatcher::new(&classes, &catalog, &methods);
//! dispatcher.dispatch("setStrength", &[collator.into(), 2.into()])?;
//! ```
//!
//! # Modules
//!
//! - [`convert`] - Type tags, matching, and lower/lift conversion
//! - [`dispatch`] - Overload resolution and invocation
//! - [`handle`] - Ownership-tagged handles and the class registry
//! - [`status`] - Status codes, the error catalog, and translation
//! - [`protocol`] - Iteration, comparison, hashing, stringification
//! - [`native`] - Boundary contracts consumed from the native library
//!
//! # Feature Flags
//!
//! - `logging` - Enable library-level tracing (consumers provide their
//!   own subscriber)
//! - `full` - Enable all features

pub mod convert;
pub mod dispatch;
pub mod handle;
mod logging;
pub mod native;
pub mod prelude;
pub mod protocol;
pub mod status;
pub mod value;

mod error;

// Re-export the unified error type
pub use error::{Error, Result};

// Re-export host values and native text
pub use value::{HostCallable, HostValue, NativeString};

// Re-export conversion types at crate root for convenience
pub use convert::{ConvertError, Lifted, Lowered, TextArg, TextSlot, Trampoline, TypeTag, lift};

// Re-export dispatch types at crate root for convenience
pub use dispatch::{DispatchError, Dispatcher, MethodTable, ReturnSpec, Signature};

// Re-export handle types at crate root for convenience
pub use handle::{
    ClassId, ClassRegistry, ClassSpec, Handle, HandleError, Lifecycle, Ownership, RegistryError,
    SideBuffer,
};

// Re-export status types at crate root for convenience
pub use status::{ErrorCatalog, ErrorCatalogBuilder, NativeError, ParseErrorContext, Status, StatusCode};

// Re-export protocol types at crate root for convenience
pub use protocol::{CursorIter, CursorSpec, ProtocolError, ProtocolSpec};

// Re-export native boundary contracts
pub use native::{DestroyFn, EntryFn, RawPtr, RefCountFn, TypeKey, TypeOfFn, entry};
