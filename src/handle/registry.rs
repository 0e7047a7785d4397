//! The immutable class registry.
//!
//! Maps host-visible class identities onto the native boundary: base
//! chains for hierarchy checks, lifecycle function pointers, native
//! dynamic-type keys for most-derived re-wrapping, and per-class protocol
//! capability sets. Built once at startup through the builder and passed
//! by reference into the dispatcher and the adapters; never mutated after
//! [`build`](ClassRegistryBuilder::build).

use std::collections::HashMap;
use std::fmt;

use crate::logging::info;
use crate::native::{DestroyFn, RefCountFn, TypeKey, TypeOfFn};
use crate::protocol::{CursorSpec, ProtocolSpec};

use super::error::RegistryError;

/// Host-visible class identity of a wrapper.
///
/// Forms a hierarchy mirroring the native class hierarchy; identity and
/// descendant checks during dispatch go through the registry.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ClassId(pub &'static str);

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Lifecycle function pointers for one class.
#[derive(Clone, Copy, Default)]
pub struct Lifecycle {
    pub destroy: Option<DestroyFn>,
    pub retain: Option<RefCountFn>,
    pub release: Option<RefCountFn>,
}

impl fmt::Debug for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lifecycle")
            .field("destroy", &self.destroy.is_some())
            .field("retain", &self.retain.is_some())
            .field("release", &self.release.is_some())
            .finish()
    }
}

/// Everything the registry knows about one wrapped class.
#[derive(Clone)]
pub struct ClassSpec {
    pub(crate) id: ClassId,
    pub(crate) base: Option<ClassId>,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) type_key: Option<TypeKey>,
    pub(crate) type_of: Option<TypeOfFn>,
    pub(crate) protocols: ProtocolSpec,
}

impl ClassSpec {
    /// A spec with no base, no lifecycle, and no protocols.
    pub fn new(id: ClassId) -> Self {
        Self {
            id,
            base: None,
            lifecycle: Lifecycle::default(),
            type_key: None,
            type_of: None,
            protocols: ProtocolSpec::default(),
        }
    }

    /// Name the base class this class derives from.
    pub fn with_base(mut self, base: ClassId) -> Self {
        self.base = Some(base);
        self
    }

    /// Register the destructor used when an `Owned` handle finalizes.
    pub fn with_destroy(mut self, destroy: DestroyFn) -> Self {
        self.lifecycle.destroy = Some(destroy);
        self
    }

    /// Register the intrusive reference-count pair for `RefCounted`
    /// wrapping.
    pub fn with_refcount(mut self, retain: RefCountFn, release: RefCountFn) -> Self {
        self.lifecycle.retain = Some(retain);
        self.lifecycle.release = Some(release);
        self
    }

    /// Name the native dynamic type this class wraps, enabling
    /// most-derived re-wrapping onto it.
    pub fn with_type_key(mut self, key: TypeKey) -> Self {
        self.type_key = Some(key);
        self
    }

    /// Register the dynamic-type identification primitive for this
    /// polymorphic base class.
    pub fn with_type_of(mut self, type_of: TypeOfFn) -> Self {
        self.type_of = Some(type_of);
        self
    }

    /// Attach the protocol capability set (equality, hashing, text,
    /// cursors).
    pub fn with_protocols(mut self, protocols: ProtocolSpec) -> Self {
        self.protocols = protocols;
        self
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }
}

impl fmt::Debug for ClassSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassSpec")
            .field("id", &self.id)
            .field("base", &self.base)
            .field("lifecycle", &self.lifecycle)
            .field("type_key", &self.type_key)
            .finish()
    }
}

/// Immutable registry of all wrapped classes.
pub struct ClassRegistry {
    specs: HashMap<ClassId, ClassSpec>,
    by_key: HashMap<TypeKey, ClassId>,
    text_class: Option<ClassId>,
}

impl ClassRegistry {
    /// Start an empty registry.
    pub fn builder() -> ClassRegistryBuilder {
        ClassRegistryBuilder {
            specs: Vec::new(),
            text_class: None,
        }
    }

    /// The spec registered for `id`, if any.
    pub fn spec(&self, id: ClassId) -> Option<&ClassSpec> {
        self.specs.get(&id)
    }

    /// Whether `id` is `ancestor` or derives from it.
    pub fn is_descendant(&self, id: ClassId, ancestor: ClassId) -> bool {
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ancestor {
                return true;
            }
            cur = self.specs.get(&c).and_then(|s| s.base);
        }
        false
    }

    /// The class registered for a native dynamic-type key.
    pub fn class_for_type_key(&self, key: TypeKey) -> Option<ClassId> {
        self.by_key.get(&key).copied()
    }

    /// The class designated as wrapping the native immutable text type.
    pub fn text_class(&self) -> Option<ClassId> {
        self.text_class
    }

    /// The dynamic-type identification primitive visible from `id`,
    /// searching up the base chain to the polymorphic root.
    pub(crate) fn type_of_for(&self, id: ClassId) -> Option<TypeOfFn> {
        let mut cur = Some(id);
        while let Some(c) = cur {
            let spec = self.specs.get(&c)?;
            if let Some(f) = spec.type_of {
                return Some(f);
            }
            cur = spec.base;
        }
        None
    }

    /// A protocol capability visible from `id`, searching up the base
    /// chain so derived classes inherit what their base registered.
    pub(crate) fn capability<T>(
        &self,
        id: ClassId,
        select: impl Fn(&ProtocolSpec) -> Option<&T>,
    ) -> Option<&T> {
        let mut cur = Some(id);
        while let Some(c) = cur {
            let spec = self.specs.get(&c)?;
            if let Some(found) = select(&spec.protocols) {
                return Some(found);
            }
            cur = spec.base;
        }
        None
    }

    /// The cursor capability visible from `id`.
    pub(crate) fn cursor_for(&self, id: ClassId) -> Option<&CursorSpec> {
        self.capability(id, |p| p.cursor.as_ref())
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassRegistry")
            .field("classes", &self.specs.len())
            .field("text_class", &self.text_class)
            .finish()
    }
}

/// Builder for [`ClassRegistry`].
pub struct ClassRegistryBuilder {
    specs: Vec<ClassSpec>,
    text_class: Option<ClassId>,
}

impl ClassRegistryBuilder {
    /// Add one class spec.
    pub fn register(mut self, spec: ClassSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Designate the class wrapping the native immutable text type; the
    /// `Text` tag accepts handles of this class and its descendants.
    pub fn with_text_class(mut self, id: ClassId) -> Self {
        self.text_class = Some(id);
        self
    }

    /// Validate the hierarchy and freeze the registry.
    pub fn build(self) -> Result<ClassRegistry, RegistryError> {
        let mut specs: HashMap<ClassId, ClassSpec> = HashMap::new();
        let mut by_key: HashMap<TypeKey, ClassId> = HashMap::new();

        for spec in self.specs {
            if specs.contains_key(&spec.id) {
                return Err(RegistryError::DuplicateClass(spec.id));
            }
            if let Some(key) = spec.type_key {
                if by_key.contains_key(&key) {
                    return Err(RegistryError::DuplicateTypeKey(key));
                }
                by_key.insert(key, spec.id);
            }
            specs.insert(spec.id, spec);
        }

        for spec in specs.values() {
            if let Some(base) = spec.base {
                if !specs.contains_key(&base) {
                    return Err(RegistryError::UnknownBase {
                        child: spec.id,
                        base,
                    });
                }
            }
            // Walk the base chain; it must terminate within the number of
            // registered classes.
            let mut cur = spec.base;
            let mut steps = 0usize;
            while let Some(c) = cur {
                steps += 1;
                if steps > specs.len() {
                    return Err(RegistryError::CyclicHierarchy(spec.id));
                }
                cur = specs.get(&c).and_then(|s| s.base);
            }
        }

        if let Some(text) = self.text_class {
            if !specs.contains_key(&text) {
                return Err(RegistryError::UnknownTextClass(text));
            }
        }

        info!(classes = specs.len(), "class registry frozen");
        Ok(ClassRegistry {
            specs,
            by_key,
            text_class: self.text_class,
        })
    }
}
