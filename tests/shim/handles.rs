//! Tests for the handle bridge: casting, identity, isolate entry, and the
//! host engine seam

use std::cell::Cell;
use std::ffi::c_void;
use std::rc::Rc;

use spidershim::{
    ArrayBuffer, BooleanObject, CreateParams, Date, DetachPolicy, ElementKind, HandleScope, HeapHost,
    HeapStatistics, HostEngine, HostResult, HostValue, Isolate, Local, Number, Object, String,
    StringObject, TypedArray, Uint8Array, Utf8Value, Value, ValueKind,
};

use super::create_test_isolate;

#[test]
fn test_checked_casts() {
    let mut isolate = create_test_isolate();
    let scope = &mut HandleScope::new(&mut isolate);
    let buffer = ArrayBuffer::new(scope, 4).unwrap();
    let values: [Local<Value>; 3] = [
        buffer.into(),
        Uint8Array::new(scope, buffer, 0, 4).unwrap().into(),
        String::new(scope, "s").unwrap().into(),
    ];

    let casts: Vec<(bool, bool, bool, bool)> = values
        .iter()
        .map(|v| {
            (
                v.try_cast::<ArrayBuffer>().is_some(),
                v.try_cast::<TypedArray>().is_some(),
                v.try_cast::<String>().is_some(),
                v.try_cast::<Object>().is_some(),
            )
        })
        .collect();
    assert_eq!(
        casts,
        [
            (true, false, false, true),
            (false, true, false, true),
            (false, false, true, false),
        ]
    );
}

#[test]
fn test_unchecked_cast_after_predicate() {
    let mut isolate = create_test_isolate();
    let scope = &mut HandleScope::new(&mut isolate);
    let value: Local<Value> = String::new(scope, "checked").unwrap().into();

    assert!(value.is_string());
    let string = unsafe { value.cast_unchecked::<String>() };
    assert_eq!(string.length(scope), 7);
}

#[test]
fn test_copies_alias_one_value() {
    let mut isolate = create_test_isolate();
    let scope = &mut HandleScope::new(&mut isolate);
    let buffer = ArrayBuffer::new(scope, 4).unwrap();
    let copy = buffer;
    let widened = buffer.into_value();

    assert_eq!(buffer, copy);
    assert_eq!(widened, buffer);
    assert_ne!(buffer, ArrayBuffer::new(scope, 4).unwrap());
}

#[test]
fn test_wrapper_objects() {
    let mut isolate = create_test_isolate();
    let scope = &mut HandleScope::new(&mut isolate);
    let string = String::new(scope, "inner").unwrap();
    let wrapped = StringObject::new(scope, string).unwrap();
    let flag = BooleanObject::new(scope, true).unwrap();

    assert_eq!(wrapped.value_of(scope), Some(string));
    assert!(flag.value_of(scope));
    let text = flag.to_string(scope).unwrap();
    assert_eq!(text.to_rust_string_lossy(scope), "true");
}

#[test]
fn test_current_isolate_follows_enter_and_exit() {
    let mut first = create_test_isolate();
    let mut second = create_test_isolate();
    let first_id = first.id();

    assert_eq!(Isolate::current_id(), None);
    {
        let mut entered = first.enter();
        assert_eq!(Isolate::current_id(), Some(first_id));
        {
            let nested = second.enter();
            assert_eq!(Isolate::current_id(), Some(nested.id()));
        }
        assert_eq!(Isolate::current_id(), Some(first_id));

        let scope = &mut HandleScope::new(&mut entered);
        assert!(String::new(scope, "inside").is_some());
    }
    assert_eq!(Isolate::current_id(), None);
}

// ============================================================================
// Counting host
// ============================================================================

#[derive(Default)]
struct RootCounts {
    added: Cell<usize>,
    removed: Cell<usize>,
}

/// A host that forwards to a [`HeapHost`] and counts root traffic
struct CountingHost {
    inner: HeapHost,
    counts: Rc<RootCounts>,
}

impl HostEngine for CountingHost {
    fn classify(&self, value: HostValue) -> ValueKind {
        self.inner.classify(value)
    }

    fn add_root(&mut self, value: HostValue) {
        self.counts.added.set(self.counts.added.get() + 1);
        self.inner.add_root(value);
    }

    fn remove_root(&mut self, value: HostValue) {
        self.counts.removed.set(self.counts.removed.get() + 1);
        self.inner.remove_root(value);
    }

    fn collect_garbage(&mut self) {
        self.inner.collect_garbage();
    }

    fn heap_statistics(&self) -> HeapStatistics {
        self.inner.heap_statistics()
    }

    fn to_string(&mut self, value: HostValue) -> HostResult<HostValue> {
        self.inner.to_string(value)
    }

    fn new_array_buffer(&mut self, byte_length: usize) -> HostResult<HostValue> {
        self.inner.new_array_buffer(byte_length)
    }

    fn new_array_buffer_with_contents(&mut self, contents: Box<[u8]>) -> HostResult<HostValue> {
        self.inner.new_array_buffer_with_contents(contents)
    }

    unsafe fn new_array_buffer_with_external_contents(
        &mut self,
        data: *mut u8,
        byte_length: usize,
    ) -> HostResult<HostValue> {
        unsafe { self.inner.new_array_buffer_with_external_contents(data, byte_length) }
    }

    fn array_buffer_byte_length(&self, buffer: HostValue) -> usize {
        self.inner.array_buffer_byte_length(buffer)
    }

    fn array_buffer_data(&mut self, buffer: HostValue) -> (*mut u8, usize) {
        self.inner.array_buffer_data(buffer)
    }

    fn is_external_array_buffer(&self, buffer: HostValue) -> bool {
        self.inner.is_external_array_buffer(buffer)
    }

    fn detach_array_buffer(&mut self, buffer: HostValue, policy: DetachPolicy) -> HostResult<()> {
        self.inner.detach_array_buffer(buffer, policy)
    }

    fn new_typed_array_with_buffer(
        &mut self,
        kind: ElementKind,
        buffer: HostValue,
        byte_offset: usize,
        length: usize,
    ) -> HostResult<HostValue> {
        self.inner
            .new_typed_array_with_buffer(kind, buffer, byte_offset, length)
    }

    fn new_data_view(
        &mut self,
        buffer: HostValue,
        byte_offset: usize,
        byte_length: usize,
    ) -> HostResult<HostValue> {
        self.inner.new_data_view(buffer, byte_offset, byte_length)
    }

    fn array_buffer_view_buffer(&mut self, view: HostValue) -> HostResult<HostValue> {
        self.inner.array_buffer_view_buffer(view)
    }

    fn typed_array_byte_offset(&self, view: HostValue) -> usize {
        self.inner.typed_array_byte_offset(view)
    }

    fn typed_array_byte_length(&self, view: HostValue) -> usize {
        self.inner.typed_array_byte_length(view)
    }

    fn typed_array_length(&self, view: HostValue) -> usize {
        self.inner.typed_array_length(view)
    }

    fn data_view_byte_offset(&self, view: HostValue) -> usize {
        self.inner.data_view_byte_offset(view)
    }

    fn data_view_byte_length(&self, view: HostValue) -> usize {
        self.inner.data_view_byte_length(view)
    }

    fn new_string_copy_utf8(&mut self, bytes: &[u8]) -> HostResult<HostValue> {
        self.inner.new_string_copy_utf8(bytes)
    }

    fn new_string_copy_utf16(&mut self, units: &[u16]) -> HostResult<HostValue> {
        self.inner.new_string_copy_utf16(units)
    }

    fn string_length(&self, string: HostValue) -> usize {
        self.inner.string_length(string)
    }

    fn flatten_string(&mut self, string: HostValue) -> HostResult<()> {
        self.inner.flatten_string(string)
    }

    fn deflated_utf8_length(&self, string: HostValue) -> HostResult<usize> {
        self.inner.deflated_utf8_length(string)
    }

    fn deflate_string_to_utf8(&self, string: HostValue, out: &mut [u8]) -> HostResult<usize> {
        self.inner.deflate_string_to_utf8(string, out)
    }

    fn copy_string_chars(&self, string: HostValue, out: &mut [u16]) -> HostResult<()> {
        self.inner.copy_string_chars(string, out)
    }

    fn concat_strings(&mut self, left: HostValue, right: HostValue) -> HostResult<HostValue> {
        self.inner.concat_strings(left, right)
    }

    fn new_symbol(&mut self, description: Option<HostValue>) -> HostResult<HostValue> {
        self.inner.new_symbol(description)
    }

    fn symbol_description(&self, symbol: HostValue) -> Option<HostValue> {
        self.inner.symbol_description(symbol)
    }

    fn box_primitive(&mut self, value: HostValue) -> HostResult<HostValue> {
        self.inner.box_primitive(value)
    }

    fn unbox(&self, object: HostValue) -> HostResult<HostValue> {
        self.inner.unbox(object)
    }

    fn new_external(&mut self, data: *mut c_void) -> HostResult<HostValue> {
        self.inner.new_external(data)
    }

    fn external_value(&self, value: HostValue) -> *mut c_void {
        self.inner.external_value(value)
    }

    fn new_date(&mut self, time: f64) -> HostResult<HostValue> {
        self.inner.new_date(time)
    }

    fn date_value(&self, date: HostValue) -> f64 {
        self.inner.date_value(date)
    }
}

fn counting_isolate() -> (Isolate, Rc<RootCounts>) {
    let counts = Rc::new(RootCounts::default());
    let host = CountingHost {
        inner: HeapHost::new(&CreateParams::default().with_gc_threshold(1)),
        counts: Rc::clone(&counts),
    };
    (Isolate::with_host(Box::new(host)), counts)
}

#[test]
fn test_scopes_release_every_root_they_register() {
    let (mut isolate, counts) = counting_isolate();
    {
        let scope = &mut HandleScope::new(&mut isolate);
        let buffer = ArrayBuffer::new(scope, 8).unwrap();
        Uint8Array::new(scope, buffer, 0, 8).unwrap();
        let string = String::new(scope, "héllo").unwrap();
        // Immediates never reach the host's root set
        Number::new(scope, 1.5);

        // Extraction roots its intermediate in a child scope
        let utf8 = Utf8Value::new(scope, string);
        assert_eq!(utf8.as_str(), Some("héllo"));
        {
            let inner = &mut scope.nested();
            Date::new(inner, 0.0).unwrap();
        }
        assert_eq!(counts.added.get(), 5);
        assert_eq!(counts.removed.get(), 2);
        assert_eq!(scope.root_count(), 3);
    }
    assert_eq!(counts.added.get(), 5);
    assert_eq!(counts.removed.get(), 5);
    assert_eq!(isolate.heap_statistics().rooted_cells, 0);

    isolate.collect_garbage();
    assert_eq!(isolate.heap_statistics().live_cells, 0);
}

#[test]
fn test_rejected_requests_register_no_roots() {
    let (mut isolate, counts) = counting_isolate();
    {
        let scope = &mut HandleScope::new(&mut isolate);
        let buffer = ArrayBuffer::new(scope, 4).unwrap();
        assert!(Uint8Array::new(scope, buffer, 2, 8).is_none());
        assert!(BooleanObject::new(scope, true).is_some());
        assert_eq!(counts.added.get(), 2);
    }
    assert_eq!(counts.removed.get(), 2);
}
