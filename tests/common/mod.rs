//! Common test utilities and fixtures.
//!
//! A small mock native library shared across the test suite: a
//! polymorphic unit family behind a factory, text objects using the
//! native text layout, DONE-sentinel cursors, and a ref-counted pool.
//! Destruction is counted through atomics so ownership tests can assert
//! single-destruction.

// Not every test binary exercises every fixture.
#![allow(dead_code)]

use std::ffi::c_void;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use ffi_bridge::prelude::*;
use ffi_bridge::status::code;

// =============================================================================
// Class identities and native type keys
// =============================================================================

pub const CLS_UNIT: ClassId = ClassId("Unit");
pub const CLS_METRIC_UNIT: ClassId = ClassId("MetricUnit");
pub const CLS_TEXT: ClassId = ClassId("Text");
pub const CLS_SCANNER: ClassId = ClassId("Scanner");
pub const CLS_COUNTER: ClassId = ClassId("Counter");
pub const CLS_POOL: ClassId = ClassId("Pool");

pub const KEY_UNIT: TypeKey = TypeKey("native.Unit");
pub const KEY_METRIC_UNIT: TypeKey = TypeKey("native.MetricUnit");

// =============================================================================
// Native object layouts
// =============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnitKind {
    Base,
    Metric,
}

/// A polymorphic measurement unit; factories return base-class pointers.
///
/// Each instance carries its own destruction counter so ownership tests
/// can assert single-destruction without cross-test interference.
pub struct Unit {
    pub kind: UnitKind,
    pub label: &'static str,
    pub destructions: Arc<AtomicUsize>,
}

/// A cursor reading UTF-16 units through a host-owned side buffer.
pub struct Scanner {
    pub data: *const u16,
    pub len: usize,
    pub pos: usize,
}

/// A resettable counting cursor.
pub struct Counter {
    pub limit: i32,
    pub pos: i32,
}

/// An intrusively ref-counted resource.
pub struct Pool {
    pub refs: std::cell::Cell<usize>,
    pub destructions: Arc<AtomicUsize>,
}

// =============================================================================
// Allocation and lifecycle entry points
// =============================================================================

pub fn new_unit(kind: UnitKind, label: &'static str) -> RawPtr {
    Box::into_raw(Box::new(Unit {
        kind,
        label,
        destructions: Arc::new(AtomicUsize::new(0)),
    })) as RawPtr
}

/// Allocate a unit along with a counter observing its destruction.
pub fn new_tracked_unit(kind: UnitKind, label: &'static str) -> (RawPtr, Arc<AtomicUsize>) {
    let destructions = Arc::new(AtomicUsize::new(0));
    let ptr = Box::into_raw(Box::new(Unit {
        kind,
        label,
        destructions: destructions.clone(),
    })) as RawPtr;
    (ptr, destructions)
}

pub unsafe fn destroy_unit(ptr: RawPtr) {
    let unit = unsafe { Box::from_raw(ptr as *mut Unit) };
    unit.destructions.fetch_add(1, AtomicOrdering::SeqCst);
    drop(unit);
}

pub unsafe fn unit_type_of(ptr: *const c_void) -> TypeKey {
    match unsafe { &*(ptr as *const Unit) }.kind {
        UnitKind::Base => KEY_UNIT,
        UnitKind::Metric => KEY_METRIC_UNIT,
    }
}

pub fn new_text(s: &str) -> RawPtr {
    Box::into_raw(Box::new(NativeString::from_str(s))) as RawPtr
}

pub unsafe fn destroy_text(ptr: RawPtr) {
    drop(unsafe { Box::from_raw(ptr as *mut NativeString) });
}

pub fn new_scanner(data: &[u16]) -> RawPtr {
    Box::into_raw(Box::new(Scanner {
        data: data.as_ptr(),
        len: data.len(),
        pos: 0,
    })) as RawPtr
}

pub unsafe fn destroy_scanner(ptr: RawPtr) {
    drop(unsafe { Box::from_raw(ptr as *mut Scanner) });
}

pub fn new_counter(limit: i32) -> RawPtr {
    Box::into_raw(Box::new(Counter { limit, pos: 0 })) as RawPtr
}

pub unsafe fn destroy_counter(ptr: RawPtr) {
    drop(unsafe { Box::from_raw(ptr as *mut Counter) });
}

pub fn new_pool() -> RawPtr {
    Box::into_raw(Box::new(Pool {
        refs: std::cell::Cell::new(0),
        destructions: Arc::new(AtomicUsize::new(0)),
    })) as RawPtr
}

/// Allocate a pool along with a counter observing its destruction.
pub fn new_tracked_pool() -> (RawPtr, Arc<AtomicUsize>) {
    let destructions = Arc::new(AtomicUsize::new(0));
    let ptr = Box::into_raw(Box::new(Pool {
        refs: std::cell::Cell::new(0),
        destructions: destructions.clone(),
    })) as RawPtr;
    (ptr, destructions)
}

pub unsafe fn pool_retain(ptr: RawPtr) {
    let pool = unsafe { &*(ptr as *const Pool) };
    pool.refs.set(pool.refs.get() + 1);
}

pub unsafe fn pool_release(ptr: RawPtr) {
    let remaining = {
        let pool = unsafe { &*(ptr as *const Pool) };
        pool.refs.set(pool.refs.get() - 1);
        pool.refs.get()
    };
    if remaining == 0 {
        let pool = unsafe { Box::from_raw(ptr as *mut Pool) };
        pool.destructions.fetch_add(1, AtomicOrdering::SeqCst);
        drop(pool);
    }
}

pub fn pool_refs(ptr: RawPtr) -> usize {
    unsafe { &*(ptr as *const Pool) }.refs.get()
}

// =============================================================================
// Protocol entry points
// =============================================================================

fn object_arg<'a>(args: &'a [Lowered], index: usize, status: &mut Status) -> Option<&'a Handle> {
    match args.get(index).and_then(Lowered::as_object) {
        Some(handle) => Some(handle),
        None => {
            status.set(code::ILLEGAL_ARGUMENT);
            None
        }
    }
}

fn native_ref<'a, T>(handle: &Handle, status: &mut Status) -> Option<&'a T> {
    match handle.borrow_ptr() {
        Ok(ptr) => Some(unsafe { &*(ptr as *const T) }),
        Err(_) => {
            status.set(code::INVALID_STATE);
            None
        }
    }
}

fn native_mut<'a, T>(handle: &Handle, status: &mut Status) -> Option<&'a mut T> {
    match handle.borrow_ptr() {
        Ok(ptr) => Some(unsafe { &mut *(ptr as *mut T) }),
        Err(_) => {
            status.set(code::INVALID_STATE);
            None
        }
    }
}

pub fn unit_eq(args: &[Lowered], status: &mut Status) -> Lifted {
    let (Some(a), Some(b)) = (object_arg(args, 0, status), object_arg(args, 1, status)) else {
        return Lifted::Unit;
    };
    let (Some(ua), Some(ub)) = (native_ref::<Unit>(a, status), native_ref::<Unit>(b, status))
    else {
        return Lifted::Unit;
    };
    Lifted::Bool(ua.kind == ub.kind && ua.label == ub.label)
}

pub fn unit_to_text(args: &[Lowered], status: &mut Status) -> Lifted {
    let Some(handle) = object_arg(args, 0, status) else {
        return Lifted::Unit;
    };
    let Some(unit) = native_ref::<Unit>(handle, status) else {
        return Lifted::Unit;
    };
    Lifted::Text(NativeString::from_str(unit.label))
}

pub fn text_eq(args: &[Lowered], status: &mut Status) -> Lifted {
    let (Some(a), Some(b)) = (object_arg(args, 0, status), object_arg(args, 1, status)) else {
        return Lifted::Unit;
    };
    let (Some(ta), Some(tb)) = (
        native_ref::<NativeString>(a, status),
        native_ref::<NativeString>(b, status),
    ) else {
        return Lifted::Unit;
    };
    Lifted::Bool(ta == tb)
}

pub fn text_cmp(args: &[Lowered], status: &mut Status) -> Lifted {
    let (Some(a), Some(b)) = (object_arg(args, 0, status), object_arg(args, 1, status)) else {
        return Lifted::Unit;
    };
    let (Some(ta), Some(tb)) = (
        native_ref::<NativeString>(a, status),
        native_ref::<NativeString>(b, status),
    ) else {
        return Lifted::Unit;
    };
    Lifted::Int32(match ta.units().cmp(tb.units()) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    })
}

pub fn text_hash(args: &[Lowered], status: &mut Status) -> Lifted {
    let Some(handle) = object_arg(args, 0, status) else {
        return Lifted::Unit;
    };
    let Some(text) = native_ref::<NativeString>(handle, status) else {
        return Lifted::Unit;
    };
    // The native library's string hash: a small polynomial over the units.
    let mut hash: i32 = 0;
    for unit in text.units() {
        hash = hash.wrapping_mul(31).wrapping_add(i32::from(*unit));
    }
    Lifted::Int32(hash)
}

pub fn text_render(args: &[Lowered], status: &mut Status) -> Lifted {
    let Some(handle) = object_arg(args, 0, status) else {
        return Lifted::Unit;
    };
    let Some(text) = native_ref::<NativeString>(handle, status) else {
        return Lifted::Unit;
    };
    Lifted::Text(text.clone())
}

/// The native DONE sentinel for integer cursors.
pub const DONE: i32 = -1;

pub fn int_cursor_done(out: &Lifted) -> bool {
    matches!(out, Lifted::Int32(v) if *v == DONE)
}

pub fn scanner_next(args: &[Lowered], status: &mut Status) -> Lifted {
    let Some(handle) = object_arg(args, 0, status) else {
        return Lifted::Unit;
    };
    let Some(scanner) = native_mut::<Scanner>(handle, status) else {
        return Lifted::Unit;
    };
    if scanner.pos >= scanner.len {
        return Lifted::Int32(DONE);
    }
    let unit = unsafe { *scanner.data.add(scanner.pos) };
    scanner.pos += 1;
    Lifted::Int32(i32::from(unit))
}

pub fn counter_next(args: &[Lowered], status: &mut Status) -> Lifted {
    let Some(handle) = object_arg(args, 0, status) else {
        return Lifted::Unit;
    };
    let Some(counter) = native_mut::<Counter>(handle, status) else {
        return Lifted::Unit;
    };
    if counter.pos >= counter.limit {
        return Lifted::Int32(DONE);
    }
    let value = counter.pos;
    counter.pos += 1;
    Lifted::Int32(value)
}

pub fn counter_reset(args: &[Lowered], status: &mut Status) -> Lifted {
    let Some(handle) = object_arg(args, 0, status) else {
        return Lifted::Unit;
    };
    let Some(counter) = native_mut::<Counter>(handle, status) else {
        return Lifted::Unit;
    };
    counter.pos = 0;
    Lifted::Unit
}

// =============================================================================
// Registry fixtures
// =============================================================================

pub fn registry() -> ClassRegistry {
    ClassRegistry::builder()
        .register(
            ClassSpec::new(CLS_UNIT)
                .with_destroy(destroy_unit)
                .with_type_key(KEY_UNIT)
                .with_type_of(unit_type_of)
                .with_protocols(
                    ProtocolSpec::new()
                        .with_eq(entry(unit_eq))
                        .with_to_text(entry(unit_to_text)),
                ),
        )
        .register(
            ClassSpec::new(CLS_METRIC_UNIT)
                .with_base(CLS_UNIT)
                .with_type_key(KEY_METRIC_UNIT)
                .with_destroy(destroy_unit),
        )
        .register(
            ClassSpec::new(CLS_TEXT)
                .with_destroy(destroy_text)
                .with_protocols(
                    ProtocolSpec::new()
                        .with_eq(entry(text_eq))
                        .with_cmp(entry(text_cmp))
                        .with_hash(entry(text_hash))
                        .with_to_text(entry(text_render)),
                ),
        )
        .register(
            ClassSpec::new(CLS_SCANNER)
                .with_destroy(destroy_scanner)
                .with_protocols(
                    ProtocolSpec::new()
                        .with_cursor(CursorSpec::new(entry(scanner_next), int_cursor_done)),
                ),
        )
        .register(
            ClassSpec::new(CLS_COUNTER)
                .with_destroy(destroy_counter)
                .with_protocols(ProtocolSpec::new().with_cursor(
                    CursorSpec::new(entry(counter_next), int_cursor_done)
                        .with_reset(entry(counter_reset), true),
                )),
        )
        .register(ClassSpec::new(CLS_POOL).with_refcount(pool_retain, pool_release))
        .with_text_class(CLS_TEXT)
        .build()
        .unwrap()
}

// =============================================================================
// Method table fixtures
// =============================================================================

/// Build the shared method table over `classes`.
///
/// Entry closures capture the registry the way the production glue layer
/// is configured at startup, so factory results and callback trampolines
/// can resolve classes.
pub fn methods(classes: Arc<ClassRegistry>) -> MethodTable {
    let for_apply = classes.clone();

    MethodTable::builder()
        // Overload fixture: declaration order double, (int32, bool), int32.
        .define(
            "setOffset",
            Signature::new(
                vec![TypeTag::Double],
                ReturnSpec::Value,
                entry(|_, _| Lifted::Int32(1)),
            ),
        )
        .define(
            "setOffset",
            Signature::new(
                vec![TypeTag::Int32, TypeTag::Bool],
                ReturnSpec::Value,
                entry(|_, _| Lifted::Int32(2)),
            ),
        )
        .define(
            "setOffset",
            Signature::new(
                vec![TypeTag::Int32],
                ReturnSpec::Value,
                entry(|_, _| Lifted::Int32(3)),
            ),
        )
        // Factory returning a base-class pointer whose dynamic type is
        // the derived metric unit.
        .define(
            "createDefaultUnit",
            Signature::new(
                vec![],
                ReturnSpec::Value,
                entry(|_, _| Lifted::Object {
                    ptr: new_unit(UnitKind::Metric, "meter"),
                    class: CLS_UNIT,
                    ownership: Ownership::Owned,
                }),
            ),
        )
        .define(
            "createBaseUnit",
            Signature::new(
                vec![],
                ReturnSpec::Value,
                entry(|_, _| Lifted::Object {
                    ptr: new_unit(UnitKind::Base, "scalar"),
                    class: CLS_UNIT,
                    ownership: Ownership::Owned,
                }),
            ),
        )
        // A factory that unexpectedly returns null.
        .define(
            "createBrokenUnit",
            Signature::new(
                vec![],
                ReturnSpec::Value,
                entry(|_, _| Lifted::Object {
                    ptr: std::ptr::null_mut(),
                    class: CLS_UNIT,
                    ownership: Ownership::Owned,
                }),
            ),
        )
        .define(
            "unitLabel",
            Signature::new(
                vec![TypeTag::Object(CLS_UNIT)],
                ReturnSpec::Value,
                entry(unit_to_text),
            ),
        )
        // Takes ownership of the unit and destroys it on the native side.
        .define(
            "adoptUnit",
            Signature::new(
                vec![TypeTag::Object(CLS_UNIT)],
                ReturnSpec::Void,
                entry(|args: &[Lowered], status: &mut Status| {
                    let Some(handle) = args.first().and_then(Lowered::as_object) else {
                        status.set(code::ILLEGAL_ARGUMENT);
                        return Lifted::Unit;
                    };
                    match handle.consume() {
                        Ok(ptr) => unsafe { destroy_unit(ptr) },
                        Err(_) => status.set(code::INVALID_STATE),
                    }
                    Lifted::Unit
                }),
            ),
        )
        // Ref-counted factory; the wrap adds the handle's reference.
        .define(
            "defaultPool",
            Signature::new(
                vec![],
                ReturnSpec::Value,
                entry(|_, _| Lifted::Object {
                    ptr: new_pool(),
                    class: CLS_POOL,
                    ownership: Ownership::RefCounted,
                }),
            ),
        )
        // Counts the UTF-16 units of a text argument.
        .define(
            "textLength",
            Signature::new(
                vec![TypeTag::Text],
                ReturnSpec::Value,
                entry(|args: &[Lowered], status: &mut Status| {
                    let text = args.first().and_then(Lowered::as_text);
                    let Some(Ok(text)) = text.map(TextArg::as_native) else {
                        status.set(code::ILLEGAL_ARGUMENT);
                        return Lifted::Unit;
                    };
                    match i32::try_from(text.len()) {
                        Ok(len) => Lifted::Int32(len),
                        Err(_) => {
                            status.set(code::INDEX_OUT_OF_BOUNDS);
                            Lifted::Unit
                        }
                    }
                }),
            ),
        )
        // Writes a zero-padded rendering into the caller's text slot and
        // routes the slot back as the result.
        .define(
            "renderPadded",
            Signature::new(
                vec![TypeTag::Int32, TypeTag::MutableTextSlot],
                ReturnSpec::Slot(1),
                entry(|args: &[Lowered], status: &mut Status| {
                    let (Some(value), Some(slot)) = (
                        args.first().and_then(Lowered::as_i32),
                        args.get(1).and_then(Lowered::as_slot),
                    ) else {
                        status.set(code::ILLEGAL_ARGUMENT);
                        return Lifted::Unit;
                    };
                    slot.with_mut(|text| {
                        text.push_str(&format!("{value:04}"));
                    });
                    Lifted::Unit
                }),
            ),
        )
        // Parses an integer out of a text argument; reports a parse
        // failure with positional context.
        .define(
            "parseInt",
            Signature::new(
                vec![TypeTag::Text],
                ReturnSpec::Value,
                entry(|args: &[Lowered], status: &mut Status| {
                    let text = args.first().and_then(Lowered::as_text);
                    let Some(Ok(text)) = text.map(TextArg::as_native) else {
                        status.set(code::ILLEGAL_ARGUMENT);
                        return Lifted::Unit;
                    };
                    let rendered = text.to_host_string();
                    match rendered.parse::<i32>() {
                        Ok(value) => Lifted::Int32(value),
                        Err(_) => {
                            let offset = rendered
                                .chars()
                                .position(|c| !c.is_ascii_digit() && c != '-')
                                .unwrap_or(0);
                            status.set(code::PARSE);
                            status.set_parse_context(ParseErrorContext {
                                line: 1,
                                offset: offset as i32,
                                pre_context: rendered.chars().take(offset).collect(),
                                post_context: rendered.chars().skip(offset).collect(),
                            });
                            Lifted::Unit
                        }
                    }
                }),
            ),
        )
        // Invokes a host callable with 21 and doubles whatever comes back.
        .define(
            "applyTwice",
            Signature::new(
                vec![TypeTag::Callable],
                ReturnSpec::Value,
                entry(move |args: &[Lowered], status: &mut Status| {
                    let Some(trampoline) = args.first().and_then(Lowered::as_callable) else {
                        status.set(code::ILLEGAL_ARGUMENT);
                        return Lifted::Unit;
                    };
                    match trampoline.call(vec![Lifted::Int32(21)], &for_apply) {
                        Ok(Some(Lowered::Int32(v))) => Lifted::Int32(v * 2),
                        Ok(_) => {
                            status.set(code::ILLEGAL_ARGUMENT);
                            Lifted::Unit
                        }
                        Err(_) => {
                            status.set(code::INTERNAL_PROGRAM);
                            Lifted::Unit
                        }
                    }
                }),
            ),
        )
        // Sums a raw byte buffer.
        .define(
            "byteChecksum",
            Signature::new(
                vec![TypeTag::ByteBuffer],
                ReturnSpec::Value,
                entry(|args: &[Lowered], status: &mut Status| {
                    let Some(bytes) = args.first().and_then(Lowered::as_bytes) else {
                        status.set(code::ILLEGAL_ARGUMENT);
                        return Lifted::Unit;
                    };
                    let sum = bytes.iter().fold(0i32, |acc, b| acc.wrapping_add(i32::from(*b)));
                    Lifted::Int32(sum)
                }),
            ),
        )
        // Measures a nul-terminated C string argument.
        .define(
            "cstringLength",
            Signature::new(
                vec![TypeTag::RawCString],
                ReturnSpec::Value,
                entry(|args: &[Lowered], status: &mut Status| {
                    let Some(cstr) = args.first().and_then(Lowered::as_c_str) else {
                        status.set(code::ILLEGAL_ARGUMENT);
                        return Lifted::Unit;
                    };
                    match i32::try_from(cstr.to_bytes().len()) {
                        Ok(len) => Lifted::Int32(len),
                        Err(_) => {
                            status.set(code::INDEX_OUT_OF_BOUNDS);
                            Lifted::Unit
                        }
                    }
                }),
            ),
        )
        // Always fails, exercising translation of a catalogued code.
        .define(
            "alwaysFails",
            Signature::new(
                vec![],
                ReturnSpec::Value,
                entry(|_, status: &mut Status| {
                    status.set(code::MISSING_RESOURCE);
                    Lifted::Unit
                }),
            ),
        )
        // Succeeds while reporting an informational warning code.
        .define(
            "lookupWithFallback",
            Signature::new(
                vec![],
                ReturnSpec::Value,
                entry(|_, status: &mut Status| {
                    status.set(code::USING_FALLBACK_WARNING);
                    Lifted::Int32(7)
                }),
            ),
        )
        .build()
        .unwrap()
}
