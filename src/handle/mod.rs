//! Ownership-tagged handles around native object pointers.
//!
//! A [`Handle`] is the host-visible wrapper produced at the return
//! boundary of every native-returning operation. It carries the pointer,
//! an [`Ownership`] tag deciding who destroys the object and when, the
//! host-visible [`ClassId`], and any side buffers the native object reads
//! through. Wrapping performs the most-derived lookup: a base-class
//! pointer whose dynamic type maps to a registered derived class produces
//! a handle of the derived class.
//!
//! Handles are shared (`Arc`): several host references to one wrapper can
//! exist, so finalization is flag-guarded and idempotent — the native
//! object is destroyed at most once no matter how many references race.

mod error;
mod registry;

pub use error::{HandleError, RegistryError};
pub use registry::{ClassId, ClassRegistry, ClassRegistryBuilder, ClassSpec, Lifecycle};

use std::ffi::c_void;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::logging::debug;
use crate::native::RawPtr;
use crate::value::NativeString;

/// Who may destroy the underlying native object, and when.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Ownership {
    /// The handle destroys the object exactly once, at finalization.
    Owned,
    /// Another owner guarantees the object's lifetime; the handle never
    /// destroys it and must not outlive that owner.
    Borrowed,
    /// The object manages its own lifetime through intrusive reference
    /// counting; the handle retains on wrap and releases on finalize.
    RefCounted,
}

impl fmt::Display for Ownership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Ownership::Owned => "owned",
            Ownership::Borrowed => "borrowed",
            Ownership::RefCounted => "ref-counted",
        })
    }
}

/// Host-owned memory a native object reads through.
///
/// A back-reference, not an ownership edge: the buffer must stay alive at
/// least as long as the native object may read it, so it is released only
/// during finalization, strictly after any native destruction.
#[derive(Debug)]
pub enum SideBuffer {
    /// UTF-16 backing storage, e.g. for a native text cursor.
    Utf16(Box<[u16]>),
    /// Raw byte backing storage.
    Bytes(Box<[u8]>),
}

impl From<NativeString> for SideBuffer {
    fn from(text: NativeString) -> Self {
        SideBuffer::Utf16(text.into_units().into_boxed_slice())
    }
}

struct HandleState {
    ptr: Option<RawPtr>,
    buffers: Vec<SideBuffer>,
    finalized: bool,
}

struct HandleCore {
    class: ClassId,
    ownership: Ownership,
    lifecycle: Lifecycle,
    state: Mutex<HandleState>,
}

fn lock(state: &Mutex<HandleState>) -> MutexGuard<'_, HandleState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl HandleCore {
    fn finalize_state(&self, state: &mut HandleState) {
        if state.finalized {
            return;
        }
        state.finalized = true;
        if let Some(ptr) = state.ptr.take() {
            match self.ownership {
                Ownership::Owned => {
                    if let Some(destroy) = self.lifecycle.destroy {
                        debug!(class = self.class.0, "destroying owned native object");
                        unsafe { destroy(ptr) };
                    }
                }
                Ownership::RefCounted => {
                    if let Some(release) = self.lifecycle.release {
                        debug!(class = self.class.0, "releasing ref-counted native object");
                        unsafe { release(ptr) };
                    }
                }
                Ownership::Borrowed => {}
            }
        }
        // Side buffers are dropped only after the native object can no
        // longer read them.
        state.buffers.clear();
    }
}

impl Drop for HandleCore {
    fn drop(&mut self) {
        let mut state = HandleState {
            ptr: None,
            buffers: Vec::new(),
            finalized: true,
        };
        {
            let mut guard = lock(&self.state);
            std::mem::swap(&mut *guard, &mut state);
        }
        self.finalize_state(&mut state);
    }
}

/// Host-visible wrapper around a native object pointer.
#[derive(Clone)]
pub struct Handle {
    core: Arc<HandleCore>,
}

impl Handle {
    /// Wrap a native pointer returned by the library.
    ///
    /// Performs the most-derived lookup: if the object's dynamic type
    /// (queried through the polymorphic base's identification primitive)
    /// maps to a registered class derived from `declared`, the handle
    /// takes that class instead. A null pointer is rejected immediately
    /// rather than producing a handle that would crash later.
    pub fn wrap(
        ptr: RawPtr,
        declared: ClassId,
        ownership: Ownership,
        classes: &ClassRegistry,
    ) -> Result<Handle, HandleError> {
        if ptr.is_null() {
            return Err(HandleError::NullNativeObject(declared));
        }
        if classes.spec(declared).is_none() {
            return Err(HandleError::UnknownClass(declared));
        }

        let class = match classes.type_of_for(declared) {
            Some(type_of) => {
                let key = unsafe { type_of(ptr as *const c_void) };
                match classes.class_for_type_key(key) {
                    Some(derived) if classes.is_descendant(derived, declared) => derived,
                    _ => declared,
                }
            }
            None => declared,
        };

        let lifecycle = classes
            .spec(class)
            .map(ClassSpec::lifecycle)
            .unwrap_or_default();

        if ownership == Ownership::RefCounted {
            let Some(retain) = lifecycle.retain else {
                return Err(HandleError::MissingRefCount(class));
            };
            unsafe { retain(ptr) };
        }

        Ok(Handle {
            core: Arc::new(HandleCore {
                class,
                ownership,
                lifecycle,
                state: Mutex::new(HandleState {
                    ptr: Some(ptr),
                    buffers: Vec::new(),
                    finalized: false,
                }),
            }),
        })
    }

    /// The handle's class identity (most-derived at wrap time).
    pub fn class_id(&self) -> ClassId {
        self.core.class
    }

    /// The ownership tag carried by this handle.
    pub fn ownership(&self) -> Ownership {
        self.core.ownership
    }

    /// Whether this handle will destroy its native object.
    pub fn is_owned(&self) -> bool {
        self.core.ownership == Ownership::Owned
    }

    /// Borrow the native pointer for the duration of a call, without
    /// transferring ownership.
    pub fn borrow_ptr(&self) -> Result<RawPtr, HandleError> {
        lock(&self.core.state)
            .ptr
            .ok_or(HandleError::UseAfterConsume(self.core.class))
    }

    /// Transfer ownership of the native pointer out of this handle, for
    /// native operations that take ownership (e.g. collection insertion).
    ///
    /// The handle is left inert: any later operation fails with
    /// [`HandleError::UseAfterConsume`]. Borrowed handles have no
    /// ownership to transfer and fail with [`HandleError::NotOwner`].
    pub fn consume(&self) -> Result<RawPtr, HandleError> {
        if self.core.ownership == Ownership::Borrowed {
            return Err(HandleError::NotOwner(self.core.class));
        }
        let mut state = lock(&self.core.state);
        let ptr = state
            .ptr
            .take()
            .ok_or(HandleError::UseAfterConsume(self.core.class))?;
        // Nothing left for finalization to do.
        state.finalized = true;
        Ok(ptr)
    }

    /// Attach host-owned memory the native object reads through; released
    /// only at finalization, after the native object is gone.
    pub fn push_side_buffer(&self, buffer: SideBuffer) -> Result<(), HandleError> {
        let mut state = lock(&self.core.state);
        if state.ptr.is_none() {
            return Err(HandleError::UseAfterConsume(self.core.class));
        }
        state.buffers.push(buffer);
        Ok(())
    }

    /// Destroy or release the native object according to the ownership
    /// tag. Idempotent: only the first call acts, no matter how many host
    /// references invoke it.
    pub fn finalize(&self) {
        let mut state = lock(&self.core.state);
        self.core.finalize_state(&mut state);
    }

    /// Whether the handle still holds a live pointer.
    pub fn is_live(&self) -> bool {
        let state = lock(&self.core.state);
        state.ptr.is_some() && !state.finalized
    }

    /// The native address, if the handle is still live.
    pub fn address(&self) -> Option<usize> {
        lock(&self.core.state).ptr.map(|p| p as usize)
    }

    /// Whether two handles are the same host wrapper (not merely wrappers
    /// of the same pointer).
    pub fn same_handle(&self, other: &Handle) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address() {
            Some(addr) => write!(f, "<{}: 0x{:x}>", self.core.class, addr),
            None => write!(f, "<{}: null>", self.core.class),
        }
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({self})")
    }
}
