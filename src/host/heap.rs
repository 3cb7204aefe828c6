//! In-process host engine.
//!
//! Strings, symbols, array buffers, views and wrapper objects live as cells in
//! one [`Arena`]. Strings are UTF-16; concatenation builds ropes which are
//! flattened in place on demand. Buffer payloads are charged against the
//! arena's byte budget, external memory is not.

use std::ffi::c_void;
use std::ptr::NonNull;

use super::{DetachPolicy, ElementKind, HostEngine, HostValue, ValueKind, time_clip};
use crate::config::CreateParams;
use crate::error::{HostError, HostResult};
use crate::gc::{Arena, CellId, HeapStatistics, Trace};

// ============================================================================
// Cells
// ============================================================================

enum StringCell {
    Flat(Box<[u16]>),
    Rope {
        left: CellId,
        right: CellId,
        length: usize,
    },
}

enum BackingStore {
    Owned(Box<[u8]>),
    /// Embedder memory. Never freed here.
    External { data: NonNull<u8>, len: usize },
}

impl BackingStore {
    fn len(&self) -> usize {
        match self {
            BackingStore::Owned(bytes) => bytes.len(),
            BackingStore::External { len, .. } => *len,
        }
    }

    fn as_slice(&self) -> &[u8] {
        match self {
            BackingStore::Owned(bytes) => bytes,
            // Valid per the contract of `new_array_buffer_with_external_contents`
            BackingStore::External { data, len } => unsafe {
                std::slice::from_raw_parts(data.as_ptr(), *len)
            },
        }
    }

    fn as_mut_ptr(&mut self) -> *mut u8 {
        match self {
            BackingStore::Owned(bytes) => bytes.as_mut_ptr(),
            BackingStore::External { data, .. } => data.as_ptr(),
        }
    }

    fn charged_bytes(&self) -> usize {
        match self {
            BackingStore::Owned(bytes) => bytes.len(),
            BackingStore::External { .. } => 0,
        }
    }
}

struct BufferCell {
    attached: Option<BackingStore>,
    /// Bytes kept after a `KeepData` detach, dropped with the cell
    retained: Option<BackingStore>,
    external: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum ViewKind {
    Typed(ElementKind),
    DataView,
}

struct ViewCell {
    kind: ViewKind,
    buffer: CellId,
    byte_offset: usize,
    byte_length: usize,
}

enum HostCell {
    String(StringCell),
    Symbol { description: Option<CellId> },
    ArrayBuffer(BufferCell),
    View(ViewCell),
    /// String or boolean wrapper object
    Boxed(HostValue),
    /// Embedder pointer, opaque to the heap
    External(*mut c_void),
    /// Time value in milliseconds, already clipped
    Date(f64),
}

impl Trace for HostCell {
    fn trace<F: FnMut(CellId)>(&self, mut visitor: F) {
        match self {
            HostCell::String(StringCell::Rope { left, right, .. }) => {
                visitor(*left);
                visitor(*right);
            }
            HostCell::Symbol {
                description: Some(description),
            } => visitor(*description),
            HostCell::View(view) => visitor(view.buffer),
            HostCell::Boxed(value) => {
                if let Some(id) = value.cell() {
                    visitor(id);
                }
            }
            _ => {}
        }
    }

    fn heap_size(&self) -> usize {
        match self {
            HostCell::String(StringCell::Flat(units)) => units.len() * 2,
            HostCell::ArrayBuffer(buffer) => {
                buffer.attached.as_ref().map_or(0, BackingStore::charged_bytes)
                    + buffer.retained.as_ref().map_or(0, BackingStore::charged_bytes)
            }
            _ => 0,
        }
    }
}

// ============================================================================
// HeapHost
// ============================================================================

/// The in-process [`HostEngine`]
pub struct HeapHost {
    arena: Arena<HostCell>,
    max_string_length: usize,
}

impl HeapHost {
    pub fn new(params: &CreateParams) -> Self {
        Self {
            arena: Arena::new(params.gc_threshold, params.max_heap_bytes),
            max_string_length: params.max_string_length,
        }
    }

    fn cell(&self, value: HostValue) -> Option<&HostCell> {
        self.arena.get(value.cell()?)
    }

    fn string_id(&self, value: HostValue) -> HostResult<CellId> {
        match value {
            HostValue::String(id) if self.arena.contains(id) => Ok(id),
            HostValue::String(id) => Err(HostError::DeadCell(id)),
            _ => Err(HostError::type_error("value is not a string")),
        }
    }

    fn buffer_cell(&self, value: HostValue) -> Option<&BufferCell> {
        match self.cell(value)? {
            HostCell::ArrayBuffer(buffer) => Some(buffer),
            _ => None,
        }
    }

    fn view_cell(&self, value: HostValue) -> Option<&ViewCell> {
        match self.cell(value)? {
            HostCell::View(view) => Some(view),
            _ => None,
        }
    }

    fn is_detached(&self, view: &ViewCell) -> bool {
        match self.arena.get(view.buffer) {
            Some(HostCell::ArrayBuffer(buffer)) => buffer.attached.is_none(),
            _ => true,
        }
    }

    /// Bytes a view covers, or `None` once its buffer is detached
    fn view_bytes(&self, view: &ViewCell) -> Option<&[u8]> {
        let Some(HostCell::ArrayBuffer(buffer)) = self.arena.get(view.buffer) else {
            return None;
        };
        let end = view.byte_offset.checked_add(view.byte_length)?;
        buffer
            .attached
            .as_ref()?
            .as_slice()
            .get(view.byte_offset..end)
    }

    fn alloc_string(&mut self, units: Vec<u16>) -> HostResult<HostValue> {
        if units.len() > self.max_string_length {
            return Err(HostError::StringTooLong {
                length: units.len(),
                max: self.max_string_length,
            });
        }
        let id = self
            .arena
            .alloc(HostCell::String(StringCell::Flat(units.into_boxed_slice())))?;
        Ok(HostValue::String(id))
    }

    fn alloc_str(&mut self, s: &str) -> HostResult<HostValue> {
        self.alloc_string(s.encode_utf16().collect())
    }

    /// Append the code units of a flat or rope string. Iterative, so deep
    /// ropes can't overflow the stack.
    fn collect_units(&self, id: CellId, out: &mut Vec<u16>) -> HostResult<()> {
        let mut pending = vec![id];
        while let Some(id) = pending.pop() {
            match self.arena.get(id) {
                Some(HostCell::String(StringCell::Flat(units))) => out.extend_from_slice(units),
                Some(HostCell::String(StringCell::Rope { left, right, .. })) => {
                    pending.push(*right);
                    pending.push(*left);
                }
                _ => return Err(HostError::DeadCell(id)),
            }
        }
        Ok(())
    }

    fn flat_units(&self, string: HostValue) -> HostResult<&[u16]> {
        let id = self.string_id(string)?;
        match self.arena.get(id) {
            Some(HostCell::String(StringCell::Flat(units))) => Ok(units),
            Some(HostCell::String(StringCell::Rope { .. })) => Err(HostError::NotFlat(id)),
            _ => Err(HostError::DeadCell(id)),
        }
    }

    fn typed_array_join(&self, kind: ElementKind, view: &ViewCell) -> String {
        let Some(bytes) = self.view_bytes(view) else {
            return String::new();
        };
        bytes
            .chunks_exact(kind.width())
            .filter_map(|element| element_to_string(kind, element))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn buffer_error(&self, buffer: HostValue) -> HostError {
        match buffer.cell() {
            Some(id) if !self.arena.contains(id) => HostError::DeadCell(id),
            _ => HostError::type_error("argument is not an ArrayBuffer"),
        }
    }

    /// Byte length of an attached buffer, for view construction
    fn attached_length(&self, buffer: HostValue) -> HostResult<usize> {
        let cell = self
            .buffer_cell(buffer)
            .ok_or_else(|| self.buffer_error(buffer))?;
        cell.attached
            .as_ref()
            .map(BackingStore::len)
            .ok_or_else(|| HostError::type_error("attempting to access detached ArrayBuffer"))
    }

    fn alloc_view(&mut self, view: ViewCell) -> HostResult<HostValue> {
        Ok(HostValue::Object(self.arena.alloc(HostCell::View(view))?))
    }

    fn alloc_buffer(&mut self, store: BackingStore) -> HostResult<HostValue> {
        let external = matches!(store, BackingStore::External { .. });
        let id = self.arena.alloc(HostCell::ArrayBuffer(BufferCell {
            attached: Some(store),
            retained: None,
            external,
        }))?;
        Ok(HostValue::Object(id))
    }
}

impl Default for HeapHost {
    fn default() -> Self {
        Self::new(&CreateParams::default())
    }
}

impl HostEngine for HeapHost {
    fn classify(&self, value: HostValue) -> ValueKind {
        match value {
            HostValue::Undefined => ValueKind::Undefined,
            HostValue::Null => ValueKind::Null,
            HostValue::Boolean(_) => ValueKind::Boolean,
            HostValue::Int32(_) | HostValue::Double(_) => ValueKind::Number,
            HostValue::String(_) => ValueKind::String,
            HostValue::Symbol(_) => ValueKind::Symbol,
            HostValue::Object(id) => match self.arena.get(id) {
                Some(HostCell::ArrayBuffer(_)) => ValueKind::ArrayBuffer,
                Some(HostCell::View(view)) => match view.kind {
                    ViewKind::Typed(kind) => ValueKind::TypedArray(kind),
                    ViewKind::DataView => ValueKind::DataView,
                },
                Some(HostCell::Boxed(HostValue::String(_))) => ValueKind::StringObject,
                Some(HostCell::Boxed(HostValue::Boolean(_))) => ValueKind::BooleanObject,
                Some(HostCell::External(_)) => ValueKind::External,
                Some(HostCell::Date(_)) => ValueKind::Date,
                _ => ValueKind::Object,
            },
        }
    }

    fn add_root(&mut self, value: HostValue) {
        if let Some(id) = value.cell() {
            self.arena.add_root(id);
        }
    }

    fn remove_root(&mut self, value: HostValue) {
        if let Some(id) = value.cell() {
            self.arena.remove_root(id);
        }
    }

    fn collect_garbage(&mut self) {
        self.arena.collect();
    }

    fn heap_statistics(&self) -> HeapStatistics {
        self.arena.statistics()
    }

    fn to_string(&mut self, value: HostValue) -> HostResult<HostValue> {
        let text = match value {
            HostValue::String(_) => return Ok(value),
            HostValue::Undefined => "undefined".to_string(),
            HostValue::Null => "null".to_string(),
            HostValue::Boolean(b) => b.to_string(),
            HostValue::Int32(n) => n.to_string(),
            HostValue::Double(n) => number_to_string(n),
            HostValue::Symbol(_) => {
                return Err(HostError::type_error("can't convert symbol to string"));
            }
            HostValue::Object(id) => match self.arena.get(id) {
                Some(HostCell::ArrayBuffer(_)) => "[object ArrayBuffer]".to_string(),
                Some(HostCell::View(view)) => match view.kind {
                    ViewKind::Typed(kind) => self.typed_array_join(kind, view),
                    ViewKind::DataView => "[object DataView]".to_string(),
                },
                Some(HostCell::Boxed(inner)) => {
                    let inner = *inner;
                    return self.to_string(inner);
                }
                Some(HostCell::Date(time)) => date_to_string(*time),
                Some(_) => "[object Object]".to_string(),
                None => return Err(HostError::DeadCell(id)),
            },
        };
        self.alloc_str(&text)
    }

    fn new_array_buffer(&mut self, byte_length: usize) -> HostResult<HostValue> {
        let exhausted = self.arena.out_of_memory(byte_length);
        let id = self.arena.alloc_with(byte_length, || {
            let mut data = Vec::new();
            data.try_reserve_exact(byte_length)
                .map_err(|_| exhausted)?;
            data.resize(byte_length, 0);
            Ok(HostCell::ArrayBuffer(BufferCell {
                attached: Some(BackingStore::Owned(data.into_boxed_slice())),
                retained: None,
                external: false,
            }))
        })?;
        Ok(HostValue::Object(id))
    }

    fn new_array_buffer_with_contents(&mut self, contents: Box<[u8]>) -> HostResult<HostValue> {
        self.alloc_buffer(BackingStore::Owned(contents))
    }

    unsafe fn new_array_buffer_with_external_contents(
        &mut self,
        data: *mut u8,
        byte_length: usize,
    ) -> HostResult<HostValue> {
        let data = match NonNull::new(data) {
            Some(data) => data,
            None if byte_length == 0 => NonNull::dangling(),
            None => return Err(HostError::type_error("external contents must not be null")),
        };
        self.alloc_buffer(BackingStore::External {
            data,
            len: byte_length,
        })
    }

    fn array_buffer_byte_length(&self, buffer: HostValue) -> usize {
        self.buffer_cell(buffer)
            .and_then(|cell| cell.attached.as_ref())
            .map_or(0, BackingStore::len)
    }

    fn array_buffer_data(&mut self, buffer: HostValue) -> (*mut u8, usize) {
        let Some(id) = buffer.cell() else {
            return (std::ptr::null_mut(), 0);
        };
        match self.arena.get_mut(id) {
            Some(HostCell::ArrayBuffer(BufferCell {
                attached: Some(store),
                ..
            })) => (store.as_mut_ptr(), store.len()),
            _ => (std::ptr::null_mut(), 0),
        }
    }

    fn is_external_array_buffer(&self, buffer: HostValue) -> bool {
        self.buffer_cell(buffer).is_some_and(|cell| cell.external)
    }

    fn detach_array_buffer(&mut self, buffer: HostValue, policy: DetachPolicy) -> HostResult<()> {
        let cell = match buffer.cell().and_then(|id| self.arena.get_mut(id)) {
            Some(HostCell::ArrayBuffer(cell)) => cell,
            _ => return Err(self.buffer_error(buffer)),
        };
        let Some(store) = cell.attached.take() else {
            return Ok(());
        };
        match policy {
            DetachPolicy::KeepData => {
                cell.retained = Some(store);
            }
            DetachPolicy::ReleaseData => {
                let freed = store.charged_bytes();
                drop(store);
                self.arena.release(freed);
            }
        }
        Ok(())
    }

    fn new_typed_array_with_buffer(
        &mut self,
        kind: ElementKind,
        buffer: HostValue,
        byte_offset: usize,
        length: usize,
    ) -> HostResult<HostValue> {
        let buffer_length = self.attached_length(buffer)?;
        let width = kind.width();
        if byte_offset % width != 0 {
            return Err(HostError::range_error(format!(
                "start offset of {} should be a multiple of {}",
                kind.name(),
                width
            )));
        }
        if byte_offset > buffer_length {
            return Err(HostError::range_error(format!(
                "start offset {} is outside the bounds of the buffer",
                byte_offset
            )));
        }
        let byte_length = length
            .checked_mul(width)
            .filter(|bytes| *bytes <= buffer_length - byte_offset)
            .ok_or_else(|| {
                HostError::range_error(format!("invalid typed array length: {}", length))
            })?;
        let Some(buffer) = buffer.cell() else {
            return Err(HostError::type_error("argument is not an ArrayBuffer"));
        };
        self.alloc_view(ViewCell {
            kind: ViewKind::Typed(kind),
            buffer,
            byte_offset,
            byte_length,
        })
    }

    fn new_data_view(
        &mut self,
        buffer: HostValue,
        byte_offset: usize,
        byte_length: usize,
    ) -> HostResult<HostValue> {
        let buffer_length = self.attached_length(buffer)?;
        if byte_offset > buffer_length {
            return Err(HostError::range_error(format!(
                "start offset {} is outside the bounds of the buffer",
                byte_offset
            )));
        }
        if byte_length > buffer_length - byte_offset {
            return Err(HostError::range_error(format!(
                "invalid DataView length {}",
                byte_length
            )));
        }
        let Some(buffer) = buffer.cell() else {
            return Err(HostError::type_error("argument is not an ArrayBuffer"));
        };
        self.alloc_view(ViewCell {
            kind: ViewKind::DataView,
            buffer,
            byte_offset,
            byte_length,
        })
    }

    fn array_buffer_view_buffer(&mut self, view: HostValue) -> HostResult<HostValue> {
        let view = self
            .view_cell(view)
            .ok_or_else(|| HostError::type_error("value is not an ArrayBufferView"))?;
        match self.arena.get(view.buffer) {
            Some(HostCell::ArrayBuffer(_)) => Ok(HostValue::Object(view.buffer)),
            _ => Err(HostError::DeadCell(view.buffer)),
        }
    }

    fn typed_array_byte_offset(&self, view: HostValue) -> usize {
        match self.view_cell(view) {
            Some(cell) if matches!(cell.kind, ViewKind::Typed(_)) && !self.is_detached(cell) => {
                cell.byte_offset
            }
            _ => 0,
        }
    }

    fn typed_array_byte_length(&self, view: HostValue) -> usize {
        match self.view_cell(view) {
            Some(cell) if matches!(cell.kind, ViewKind::Typed(_)) && !self.is_detached(cell) => {
                cell.byte_length
            }
            _ => 0,
        }
    }

    fn typed_array_length(&self, view: HostValue) -> usize {
        match self.view_cell(view).map(|cell| cell.kind) {
            Some(ViewKind::Typed(kind)) => self.typed_array_byte_length(view) / kind.width(),
            _ => 0,
        }
    }

    fn data_view_byte_offset(&self, view: HostValue) -> usize {
        match self.view_cell(view) {
            Some(cell) if cell.kind == ViewKind::DataView && !self.is_detached(cell) => {
                cell.byte_offset
            }
            _ => 0,
        }
    }

    fn data_view_byte_length(&self, view: HostValue) -> usize {
        match self.view_cell(view) {
            Some(cell) if cell.kind == ViewKind::DataView && !self.is_detached(cell) => {
                cell.byte_length
            }
            _ => 0,
        }
    }

    fn new_string_copy_utf8(&mut self, bytes: &[u8]) -> HostResult<HostValue> {
        let units = String::from_utf8_lossy(bytes).encode_utf16().collect();
        self.alloc_string(units)
    }

    fn new_string_copy_utf16(&mut self, units: &[u16]) -> HostResult<HostValue> {
        self.alloc_string(units.to_vec())
    }

    fn string_length(&self, string: HostValue) -> usize {
        match self.cell(string) {
            Some(HostCell::String(StringCell::Flat(units))) => units.len(),
            Some(HostCell::String(StringCell::Rope { length, .. })) => *length,
            _ => 0,
        }
    }

    fn flatten_string(&mut self, string: HostValue) -> HostResult<()> {
        let id = self.string_id(string)?;
        let length = match self.arena.get(id) {
            Some(HostCell::String(StringCell::Rope { length, .. })) => *length,
            _ => return Ok(()),
        };

        self.arena.reserve(length * 2)?;
        let mut units = Vec::with_capacity(length);
        if let Err(err) = self.collect_units(id, &mut units) {
            self.arena.release(length * 2);
            return Err(err);
        }
        if let Some(HostCell::String(cell)) = self.arena.get_mut(id) {
            *cell = StringCell::Flat(units.into_boxed_slice());
        }
        Ok(())
    }

    fn deflated_utf8_length(&self, string: HostValue) -> HostResult<usize> {
        Ok(utf8_length(self.flat_units(string)?))
    }

    fn deflate_string_to_utf8(&self, string: HostValue, out: &mut [u8]) -> HostResult<usize> {
        let units = self.flat_units(string)?;
        let mut written = 0;
        for ch in char::decode_utf16(units.iter().copied()) {
            let ch = ch.unwrap_or(char::REPLACEMENT_CHARACTER);
            let mut encoded = [0u8; 4];
            let encoded = ch.encode_utf8(&mut encoded).as_bytes();
            let Some(dest) = out.get_mut(written..written + encoded.len()) else {
                return Err(HostError::range_error("UTF-8 output buffer is too small"));
            };
            dest.copy_from_slice(encoded);
            written += encoded.len();
        }
        Ok(written)
    }

    fn copy_string_chars(&self, string: HostValue, out: &mut [u16]) -> HostResult<()> {
        let id = self.string_id(string)?;
        let mut units = Vec::with_capacity(self.string_length(string));
        self.collect_units(id, &mut units)?;
        let dest = out
            .get_mut(..units.len())
            .ok_or_else(|| HostError::range_error("UTF-16 output buffer is too small"))?;
        dest.copy_from_slice(&units);
        Ok(())
    }

    fn concat_strings(&mut self, left: HostValue, right: HostValue) -> HostResult<HostValue> {
        let left_id = self.string_id(left)?;
        let right_id = self.string_id(right)?;
        let left_length = self.string_length(left);
        let right_length = self.string_length(right);
        if left_length == 0 {
            return Ok(right);
        }
        if right_length == 0 {
            return Ok(left);
        }

        let length = left_length + right_length;
        if length > self.max_string_length {
            return Err(HostError::StringTooLong {
                length,
                max: self.max_string_length,
            });
        }
        let id = self.arena.alloc(HostCell::String(StringCell::Rope {
            left: left_id,
            right: right_id,
            length,
        }))?;
        Ok(HostValue::String(id))
    }

    fn new_symbol(&mut self, description: Option<HostValue>) -> HostResult<HostValue> {
        let description = description.map(|d| self.string_id(d)).transpose()?;
        let id = self.arena.alloc(HostCell::Symbol { description })?;
        Ok(HostValue::Symbol(id))
    }

    fn symbol_description(&self, symbol: HostValue) -> Option<HostValue> {
        match self.cell(symbol)? {
            HostCell::Symbol {
                description: Some(id),
            } => Some(HostValue::String(*id)),
            _ => None,
        }
    }

    fn box_primitive(&mut self, value: HostValue) -> HostResult<HostValue> {
        match value {
            HostValue::String(_) | HostValue::Boolean(_) => {
                let id = self.arena.alloc(HostCell::Boxed(value))?;
                Ok(HostValue::Object(id))
            }
            _ => Err(HostError::type_error("value can't be converted to a wrapper object")),
        }
    }

    fn unbox(&self, object: HostValue) -> HostResult<HostValue> {
        match self.cell(object) {
            Some(HostCell::Boxed(value)) => Ok(*value),
            _ => Err(HostError::type_error("value is not a wrapper object")),
        }
    }

    fn new_external(&mut self, data: *mut c_void) -> HostResult<HostValue> {
        let id = self.arena.alloc(HostCell::External(data))?;
        Ok(HostValue::Object(id))
    }

    fn external_value(&self, value: HostValue) -> *mut c_void {
        match self.cell(value) {
            Some(HostCell::External(data)) => *data,
            _ => std::ptr::null_mut(),
        }
    }

    fn new_date(&mut self, time: f64) -> HostResult<HostValue> {
        let id = self.arena.alloc(HostCell::Date(time_clip(time)))?;
        Ok(HostValue::Object(id))
    }

    fn date_value(&self, date: HostValue) -> f64 {
        match self.cell(date) {
            Some(HostCell::Date(time)) => *time,
            _ => f64::NAN,
        }
    }
}

// ============================================================================
// Conversions
// ============================================================================

/// UTF-8 byte count of UTF-16 units; unpaired surrogates count as U+FFFD
fn utf8_length(units: &[u16]) -> usize {
    char::decode_utf16(units.iter().copied())
        .map(|ch| ch.map_or(char::REPLACEMENT_CHARACTER.len_utf8(), char::len_utf8))
        .sum()
}

/// ECMAScript Number::toString(10)
fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }

    // Exponent form: Rust writes 1e21 and 1.5e-7, JS wants 1e+21 and 1.5e-7
    let formatted = format!("{:e}", n);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

/// Date.prototype.toString, in UTC
fn date_to_string(time: f64) -> String {
    if time.is_nan() {
        return "Invalid Date".to_string();
    }
    // Clipped times are integral and within ±8.64e15, so the cast is exact
    match chrono::DateTime::from_timestamp_millis(time as i64) {
        Some(dt) => dt.format("%a %b %d %Y %H:%M:%S GMT+0000 (UTC)").to_string(),
        None => "Invalid Date".to_string(),
    }
}

fn element_to_string(kind: ElementKind, bytes: &[u8]) -> Option<String> {
    Some(match kind {
        ElementKind::Int8 => i8::from_le_bytes(bytes.try_into().ok()?).to_string(),
        ElementKind::Uint8 | ElementKind::Uint8Clamped => {
            u8::from_le_bytes(bytes.try_into().ok()?).to_string()
        }
        ElementKind::Int16 => i16::from_le_bytes(bytes.try_into().ok()?).to_string(),
        ElementKind::Uint16 => u16::from_le_bytes(bytes.try_into().ok()?).to_string(),
        ElementKind::Int32 => i32::from_le_bytes(bytes.try_into().ok()?).to_string(),
        ElementKind::Uint32 => u32::from_le_bytes(bytes.try_into().ok()?).to_string(),
        ElementKind::Float32 => {
            number_to_string(f64::from(f32::from_le_bytes(bytes.try_into().ok()?)))
        }
        ElementKind::Float64 => number_to_string(f64::from_le_bytes(bytes.try_into().ok()?)),
        ElementKind::BigInt64 => i64::from_le_bytes(bytes.try_into().ok()?).to_string(),
        ElementKind::BigUint64 => u64::from_le_bytes(bytes.try_into().ok()?).to_string(),
    })
}
