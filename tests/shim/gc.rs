//! Tests for rooting: scoped handles survive collection and are released with
//! their scope

use spidershim::{ArrayBuffer, DataView, HandleScope, String, Uint8Array, Utf8Value};

use super::create_test_isolate;

#[test]
fn test_handles_survive_collection_while_scope_lives() {
    let mut isolate = create_test_isolate();
    let scope = &mut HandleScope::new(&mut isolate);
    let strings: Vec<_> = (0..20)
        .map(|i| String::new(scope, &format!("value {i}")).unwrap())
        .collect();

    for (i, string) in strings.iter().enumerate() {
        assert_eq!(string.to_rust_string_lossy(scope), format!("value {i}"));
    }
}

#[test]
fn test_roots_return_to_baseline() {
    let mut isolate = create_test_isolate();
    let baseline = isolate.heap_statistics().rooted_cells;
    {
        let scope = &mut HandleScope::new(&mut isolate);
        let buffer = ArrayBuffer::new(scope, 8).unwrap();
        Uint8Array::new(scope, buffer, 0, 8).unwrap();
        DataView::new(scope, buffer, 0, 8).unwrap();
        let left = String::new(scope, "left").unwrap();
        let right = String::new(scope, "right").unwrap();
        String::concat(scope, left, right).unwrap();
        assert_eq!(scope.root_count(), 6);
    }
    assert_eq!(isolate.heap_statistics().rooted_cells, baseline);

    isolate.collect_garbage();
    assert_eq!(isolate.heap_statistics().live_cells, 0);
    assert_eq!(isolate.heap_statistics().used_bytes, 0);
}

#[test]
fn test_nested_scope_releases_intermediates() {
    let mut isolate = create_test_isolate();
    let scope = &mut HandleScope::new(&mut isolate);
    let kept = String::new(scope, "kept").unwrap();
    {
        let inner = &mut scope.nested();
        for i in 0..10 {
            String::new(inner, &i.to_string()).unwrap();
        }
        assert_eq!(inner.root_count(), 10);
    }
    assert_eq!(scope.root_count(), 1);
    assert_eq!(scope.isolate().heap_statistics().rooted_cells, 1);

    // The next allocation collects the released strings
    let fresh = String::new(scope, "fresh").unwrap();
    assert_eq!(kept.to_rust_string_lossy(scope), "kept");
    assert_eq!(fresh.to_rust_string_lossy(scope), "fresh");
}

#[test]
fn test_view_reports_its_buffer_after_collections() {
    let mut isolate = create_test_isolate();
    let scope = &mut HandleScope::new(&mut isolate);
    let view = {
        let buffer = ArrayBuffer::new(scope, 4).unwrap();
        Uint8Array::new(scope, buffer, 1, 2).unwrap()
    };
    for _ in 0..5 {
        String::new(scope, "churn").unwrap();
    }

    let buffer = view.buffer(scope).unwrap();
    assert_eq!(buffer.byte_length(scope), 4);
    assert_eq!(Utf8Value::new(scope, view).as_str(), Some("0,0"));
}
