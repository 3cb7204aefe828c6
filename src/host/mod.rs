//! Host engine adapter
//!
//! The bridge never touches host memory directly. Everything it needs from the
//! underlying engine goes through [`HostEngine`]: allocation, rooting, length
//! and range queries, string transcoding. [`HeapHost`] is the in-process
//! implementation shipped with the crate.

pub mod heap;

pub use heap::HeapHost;

use std::ffi::c_void;

use crate::error::HostResult;
use crate::gc::{CellId, HeapStatistics};

/// Largest absolute time value, in milliseconds from the epoch, a date can hold
pub const MAX_TIME_MS: f64 = 8.64e15;

/// ECMAScript TimeClip: NaN outside ±[`MAX_TIME_MS`], else the integer part
/// with `-0` folded to `+0`
pub fn time_clip(time: f64) -> f64 {
    if !time.is_finite() || time.abs() > MAX_TIME_MS {
        return f64::NAN;
    }
    time.trunc() + 0.0
}

/// A host engine value: a tagged union of immediates and GC cell references.
///
/// Equality is identity: two `String` values are equal only if they name the
/// same cell, whatever their content, and doubles compare by bit pattern so a
/// NaN equals itself and `-0` differs from `+0`.
#[derive(Clone, Copy, Debug, Default)]
pub enum HostValue {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Int32(i32),
    Double(f64),
    String(CellId),
    Symbol(CellId),
    Object(CellId),
}

impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HostValue::Undefined, HostValue::Undefined) | (HostValue::Null, HostValue::Null) => {
                true
            }
            (HostValue::Boolean(a), HostValue::Boolean(b)) => a == b,
            (HostValue::Int32(a), HostValue::Int32(b)) => a == b,
            (HostValue::Double(a), HostValue::Double(b)) => a.to_bits() == b.to_bits(),
            (HostValue::String(a), HostValue::String(b))
            | (HostValue::Symbol(a), HostValue::Symbol(b))
            | (HostValue::Object(a), HostValue::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for HostValue {}

impl HostValue {
    /// Store a number, preferring the int32 tag when it is exact
    pub fn number(value: f64) -> Self {
        let int = value as i32;
        if int as f64 == value && !(value == 0.0 && value.is_sign_negative()) {
            HostValue::Int32(int)
        } else {
            HostValue::Double(value)
        }
    }

    /// The cell this value references, if it is a GC thing
    pub fn cell(&self) -> Option<CellId> {
        match self {
            HostValue::String(id) | HostValue::Symbol(id) | HostValue::Object(id) => Some(*id),
            _ => None,
        }
    }

    /// Numeric payload of `Int32`/`Double` values
    pub fn as_number(&self) -> Option<f64> {
        match self {
            HostValue::Int32(n) => Some(f64::from(*n)),
            HostValue::Double(n) => Some(*n),
            _ => None,
        }
    }
}

/// Element kind of a typed array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Int8,
    Uint8,
    Uint8Clamped,
    Int16,
    Uint16,
    Int32,
    Uint32,
    Float32,
    Float64,
    BigInt64,
    BigUint64,
}

impl ElementKind {
    /// Width of one element in bytes
    pub const fn width(self) -> usize {
        match self {
            ElementKind::Int8 | ElementKind::Uint8 | ElementKind::Uint8Clamped => 1,
            ElementKind::Int16 | ElementKind::Uint16 => 2,
            ElementKind::Int32 | ElementKind::Uint32 | ElementKind::Float32 => 4,
            ElementKind::Float64 | ElementKind::BigInt64 | ElementKind::BigUint64 => 8,
        }
    }

    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            ElementKind::Int8
                | ElementKind::Int16
                | ElementKind::Int32
                | ElementKind::BigInt64
                | ElementKind::Float32
                | ElementKind::Float64
        )
    }

    pub const fn is_float(self) -> bool {
        matches!(self, ElementKind::Float32 | ElementKind::Float64)
    }

    /// Constructor name, as reported by `Object.prototype.toString`
    pub const fn name(self) -> &'static str {
        match self {
            ElementKind::Int8 => "Int8Array",
            ElementKind::Uint8 => "Uint8Array",
            ElementKind::Uint8Clamped => "Uint8ClampedArray",
            ElementKind::Int16 => "Int16Array",
            ElementKind::Uint16 => "Uint16Array",
            ElementKind::Int32 => "Int32Array",
            ElementKind::Uint32 => "Uint32Array",
            ElementKind::Float32 => "Float32Array",
            ElementKind::Float64 => "Float64Array",
            ElementKind::BigInt64 => "BigInt64Array",
            ElementKind::BigUint64 => "BigUint64Array",
        }
    }
}

/// Classification of a host value. This is the discriminant a handle carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Symbol,
    /// Any object the bridge has no finer kind for
    Object,
    ArrayBuffer,
    TypedArray(ElementKind),
    DataView,
    StringObject,
    BooleanObject,
    /// An object wrapping an embedder pointer
    External,
    Date,
}

impl ValueKind {
    pub fn is_object(self) -> bool {
        matches!(
            self,
            ValueKind::Object
                | ValueKind::ArrayBuffer
                | ValueKind::TypedArray(_)
                | ValueKind::DataView
                | ValueKind::StringObject
                | ValueKind::BooleanObject
                | ValueKind::External
                | ValueKind::Date
        )
    }

    pub fn is_array_buffer_view(self) -> bool {
        matches!(self, ValueKind::TypedArray(_) | ValueKind::DataView)
    }
}

/// What happens to a buffer's bytes when it is detached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachPolicy {
    /// Keep the bytes until the buffer object itself is collected
    KeepData,
    /// Free engine-owned bytes immediately
    ReleaseData,
}

/// Native API of the underlying engine.
///
/// Every `HostValue` passed in must be live: rooted, or reachable from a root.
/// Methods that allocate may collect garbage before returning.
pub trait HostEngine {
    // ------------------------------------------------------------------
    // Values and rooting
    // ------------------------------------------------------------------

    fn classify(&self, value: HostValue) -> ValueKind;

    fn add_root(&mut self, value: HostValue);

    fn remove_root(&mut self, value: HostValue);

    fn collect_garbage(&mut self);

    fn heap_statistics(&self) -> HeapStatistics;

    /// ECMAScript ToString
    fn to_string(&mut self, value: HostValue) -> HostResult<HostValue>;

    // ------------------------------------------------------------------
    // Array buffers
    // ------------------------------------------------------------------

    /// Zero-filled engine-owned buffer
    fn new_array_buffer(&mut self, byte_length: usize) -> HostResult<HostValue>;

    /// Buffer that takes ownership of `contents`
    fn new_array_buffer_with_contents(&mut self, contents: Box<[u8]>) -> HostResult<HostValue>;

    /// Buffer over memory the engine never frees.
    ///
    /// # Safety
    /// `data` must be valid for reads and writes of `byte_length` bytes for as
    /// long as the buffer is attached and not collected.
    unsafe fn new_array_buffer_with_external_contents(
        &mut self,
        data: *mut u8,
        byte_length: usize,
    ) -> HostResult<HostValue>;

    /// Current byte length; 0 once detached
    fn array_buffer_byte_length(&self, buffer: HostValue) -> usize;

    /// Data pointer and length; null and 0 once detached
    fn array_buffer_data(&mut self, buffer: HostValue) -> (*mut u8, usize);

    fn is_external_array_buffer(&self, buffer: HostValue) -> bool;

    fn detach_array_buffer(&mut self, buffer: HostValue, policy: DetachPolicy) -> HostResult<()>;

    // ------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------

    fn new_typed_array_with_buffer(
        &mut self,
        kind: ElementKind,
        buffer: HostValue,
        byte_offset: usize,
        length: usize,
    ) -> HostResult<HostValue>;

    fn new_data_view(
        &mut self,
        buffer: HostValue,
        byte_offset: usize,
        byte_length: usize,
    ) -> HostResult<HostValue>;

    fn array_buffer_view_buffer(&mut self, view: HostValue) -> HostResult<HostValue>;

    fn typed_array_byte_offset(&self, view: HostValue) -> usize;

    fn typed_array_byte_length(&self, view: HostValue) -> usize;

    /// Element count
    fn typed_array_length(&self, view: HostValue) -> usize;

    fn data_view_byte_offset(&self, view: HostValue) -> usize;

    fn data_view_byte_length(&self, view: HostValue) -> usize;

    // ------------------------------------------------------------------
    // Strings
    // ------------------------------------------------------------------

    /// Decode UTF-8 (invalid sequences become U+FFFD)
    fn new_string_copy_utf8(&mut self, bytes: &[u8]) -> HostResult<HostValue>;

    fn new_string_copy_utf16(&mut self, units: &[u16]) -> HostResult<HostValue>;

    /// Length in UTF-16 code units
    fn string_length(&self, string: HostValue) -> usize;

    /// Resolve a rope in place. Identity is unchanged.
    fn flatten_string(&mut self, string: HostValue) -> HostResult<()>;

    /// UTF-8 byte count of a flat string
    fn deflated_utf8_length(&self, string: HostValue) -> HostResult<usize>;

    /// Encode a flat string into `out`, which must hold its deflated length.
    /// Returns the number of bytes written.
    fn deflate_string_to_utf8(&self, string: HostValue, out: &mut [u8]) -> HostResult<usize>;

    /// Copy the code units of any string into `out[..length]`
    fn copy_string_chars(&self, string: HostValue, out: &mut [u16]) -> HostResult<()>;

    fn concat_strings(&mut self, left: HostValue, right: HostValue) -> HostResult<HostValue>;

    // ------------------------------------------------------------------
    // Symbols and wrapper objects
    // ------------------------------------------------------------------

    fn new_symbol(&mut self, description: Option<HostValue>) -> HostResult<HostValue>;

    fn symbol_description(&self, symbol: HostValue) -> Option<HostValue>;

    /// ECMAScript ToObject for a string or boolean
    fn box_primitive(&mut self, value: HostValue) -> HostResult<HostValue>;

    fn unbox(&self, object: HostValue) -> HostResult<HostValue>;

    // ------------------------------------------------------------------
    // Externals and dates
    // ------------------------------------------------------------------

    /// Object holding an embedder pointer the engine never dereferences
    fn new_external(&mut self, data: *mut c_void) -> HostResult<HostValue>;

    /// The wrapped pointer; null if `value` is not an external
    fn external_value(&self, value: HostValue) -> *mut c_void;

    /// Date object for `time` after [`time_clip`]
    fn new_date(&mut self, time: f64) -> HostResult<HostValue>;

    /// Time value in milliseconds; NaN if `date` is not a date
    fn date_value(&self, date: HostValue) -> f64;
}
