//! Tests for array buffers: creation, contents, detach and external memory

use spidershim::{ArrayBuffer, ArrayBufferCreationMode, CreateParams, HandleScope, Uint8Array};

use super::{create_test_isolate, create_test_isolate_with};

// ═══════════════════════════════════════════════════════════════════════════════
// Creation
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_create_16() {
    let mut isolate = create_test_isolate();
    let scope = &mut HandleScope::new(&mut isolate);
    let buffer = ArrayBuffer::new(scope, 16).unwrap();

    assert_eq!(buffer.byte_length(scope), 16);
    let contents = buffer.get_contents(scope);
    assert!(!contents.data().is_null());
    assert_eq!(contents.byte_length(), 16);

    buffer.detach(scope);
    assert_eq!(buffer.byte_length(scope), 0);
}

#[test]
fn test_every_size_is_zero_filled() {
    let mut isolate = create_test_isolate();
    let scope = &mut HandleScope::new(&mut isolate);
    for size in 0..=64 {
        let buffer = ArrayBuffer::new(scope, size).unwrap();
        assert_eq!(buffer.byte_length(scope), size);
        let contents = buffer.get_contents(scope);
        assert!(unsafe { contents.as_slice() }.iter().all(|b| *b == 0));
    }
}

#[test]
fn test_from_boxed_slice_keeps_bytes() {
    let mut isolate = create_test_isolate();
    let scope = &mut HandleScope::new(&mut isolate);
    let bytes = b"bytes".to_vec().into_boxed_slice();
    let buffer = ArrayBuffer::from_boxed_slice(scope, bytes).unwrap();

    assert_eq!(unsafe { buffer.get_contents(scope).as_slice() }, b"bytes");
    assert!(!buffer.is_external(scope));
}

#[test]
fn test_allocation_over_budget_is_empty() {
    let mut isolate = create_test_isolate_with(CreateParams::default().with_max_heap_bytes(64));
    let scope = &mut HandleScope::new(&mut isolate);

    assert!(ArrayBuffer::new(scope, 128).is_none());
    let first = ArrayBuffer::new(scope, 48).unwrap();
    assert!(ArrayBuffer::new(scope, 32).is_none());
    assert_eq!(first.byte_length(scope), 48);
}

#[test]
fn test_budget_is_reclaimed_after_scope_drops() {
    let mut isolate = create_test_isolate_with(CreateParams::default().with_max_heap_bytes(64));
    {
        let scope = &mut HandleScope::new(&mut isolate);
        ArrayBuffer::new(scope, 48).unwrap();
    }
    let scope = &mut HandleScope::new(&mut isolate);
    assert!(ArrayBuffer::new(scope, 48).is_some());
}

// ═══════════════════════════════════════════════════════════════════════════════
// Detach
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_detach_is_observed_by_every_handle() {
    let mut isolate = create_test_isolate();
    let scope = &mut HandleScope::new(&mut isolate);
    let buffer = ArrayBuffer::new(scope, 8).unwrap();
    let alias = buffer.into_value().try_cast::<ArrayBuffer>().unwrap();

    alias.detach(scope);
    assert_eq!(buffer.byte_length(scope), 0);
    assert!(buffer.get_contents(scope).data().is_null());
}

#[test]
fn test_view_creation_over_detached_buffer_fails() {
    let mut isolate = create_test_isolate();
    let scope = &mut HandleScope::new(&mut isolate);
    let buffer = ArrayBuffer::new(scope, 8).unwrap();
    buffer.detach(scope);

    assert!(Uint8Array::new(scope, buffer, 0, 0).is_none());
}

#[test]
fn test_detached_bytes_are_released_with_the_buffer() {
    let mut isolate = create_test_isolate();
    {
        let scope = &mut HandleScope::new(&mut isolate);
        let buffer = ArrayBuffer::new(scope, 100).unwrap();
        buffer.detach(scope);
        assert_eq!(scope.isolate().heap_statistics().used_bytes, 100);
    }
    isolate.collect_garbage();
    assert_eq!(isolate.heap_statistics().used_bytes, 0);
}

// ═══════════════════════════════════════════════════════════════════════════════
// External memory
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_externalized_memory_is_shared_and_never_freed() {
    let mut memory = vec![0u8; 4];
    let data = memory.as_mut_ptr();
    {
        let mut isolate = create_test_isolate();
        let scope = &mut HandleScope::new(&mut isolate);
        let buffer = unsafe {
            ArrayBuffer::new_external(
                scope,
                data,
                4,
                ArrayBufferCreationMode::Externalized,
            )
        }
        .unwrap();
        assert!(buffer.is_external(scope));

        let mut contents = buffer.get_contents(scope);
        assert_eq!(contents.data(), data);
        unsafe { contents.as_mut_slice() }.copy_from_slice(&[1, 2, 3, 4]);

        buffer.detach(scope);
        assert_eq!(buffer.byte_length(scope), 0);
    }
    assert_eq!(memory, [1, 2, 3, 4]);
}

#[test]
fn test_internalized_memory_reads_the_same_bytes() {
    let mut isolate = create_test_isolate();
    let scope = &mut HandleScope::new(&mut isolate);
    let data: Box<[u8]> = vec![9; 6].into_boxed_slice();
    let raw = Box::into_raw(data).cast::<u8>();

    let buffer = unsafe {
        ArrayBuffer::new_external(scope, raw, 6, ArrayBufferCreationMode::Internalized)
    }
    .unwrap();
    assert_eq!(buffer.byte_length(scope), 6);
    assert_eq!(unsafe { buffer.get_contents(scope).as_slice() }, &[9; 6]);
}
