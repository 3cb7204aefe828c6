#![no_main]

use libfuzzer_sys::fuzz_target;
use spidershim::{CreateParams, HandleScope, Isolate, NewStringType, String, Utf8Value, Utf16Value};

fuzz_target!(|data: &[u8]| {
    // Limit input size to avoid timeout
    if data.len() > 100_000 {
        return;
    }

    let mut isolate = Isolate::new(CreateParams::default().with_gc_threshold(1));
    let scope = &mut HandleScope::new(&mut isolate);

    // Arbitrary bytes decode lossily and must never panic
    let string = String::new_from_utf8(scope, data, NewStringType::Normal).unwrap();
    let lossy = std::string::String::from_utf8_lossy(data);
    assert_eq!(string.length(scope), lossy.encode_utf16().count());
    assert_eq!(string.utf8_length(scope), lossy.len());

    // Valid UTF-8 round-trips byte for byte
    let utf8 = Utf8Value::new(scope, string);
    assert_eq!(utf8.as_bytes(), Some(lossy.as_bytes()));
    if std::str::from_utf8(data).is_ok() {
        assert_eq!(utf8.as_bytes(), Some(data));
    }

    // Splitting and concatenating preserves content
    let units: Vec<u16> = lossy.encode_utf16().collect();
    let (head, tail) = units.split_at(units.len() / 2);
    let left = String::new_from_two_byte(scope, head, NewStringType::Normal).unwrap();
    let right = String::new_from_two_byte(scope, tail, NewStringType::Normal).unwrap();
    let joined = String::concat(scope, left, right).unwrap();
    assert_eq!(Utf16Value::new(scope, joined).as_units(), Some(&units[..]));
});
