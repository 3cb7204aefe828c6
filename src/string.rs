//! Strings and string extraction
//!
//! Strings are immutable UTF-16 sequences owned by the host. [`Utf8Value`]
//! and [`Utf16Value`] copy any value's string form out into an owned,
//! NUL-terminated buffer.

use std::ffi::CStr;

use crate::host::{HostValue, ValueKind};
use crate::local::{Local, handle_type};
use crate::scope::HandleScope;

handle_type!(
    /// An immutable sequence of UTF-16 code units
    String,
    |kind| kind == ValueKind::String
);

/// Kind of string to create
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewStringType {
    #[default]
    Normal,
    /// Not supported: creating one fails an assertion
    Internalized,
}

fn assert_normal(string_type: NewStringType) {
    assert!(
        string_type == NewStringType::Normal,
        "internalized strings are not supported"
    );
}

impl String {
    /// Decode UTF-8. Invalid sequences become U+FFFD.
    pub fn new_from_utf8<'s>(
        scope: &mut HandleScope<'s>,
        bytes: &[u8],
        string_type: NewStringType,
    ) -> Option<Local<'s, String>> {
        assert_normal(string_type);
        let result = scope.host_mut().new_string_copy_utf8(bytes);
        scope.adopt(result, "String::new_from_utf8")
    }

    /// Decode a NUL-terminated UTF-8 string
    pub fn new_from_c_str<'s>(
        scope: &mut HandleScope<'s>,
        c_str: &CStr,
        string_type: NewStringType,
    ) -> Option<Local<'s, String>> {
        Self::new_from_utf8(scope, c_str.to_bytes(), string_type)
    }

    pub fn new_from_two_byte<'s>(
        scope: &mut HandleScope<'s>,
        units: &[u16],
        string_type: NewStringType,
    ) -> Option<Local<'s, String>> {
        assert_normal(string_type);
        let result = scope.host_mut().new_string_copy_utf16(units);
        scope.adopt(result, "String::new_from_two_byte")
    }

    pub fn new<'s>(scope: &mut HandleScope<'s>, value: &str) -> Option<Local<'s, String>> {
        Self::new_from_utf8(scope, value.as_bytes(), NewStringType::Normal)
    }

    /// The zero-length string
    pub fn empty<'s>(scope: &mut HandleScope<'s>) -> Option<Local<'s, String>> {
        Self::new_from_utf8(scope, b"", NewStringType::Normal)
    }

    /// A string holding `left` followed by `right`. If the host can't build
    /// it (too long, out of memory) the result is the empty string.
    pub fn concat<'s>(
        scope: &mut HandleScope<'s>,
        left: Local<'_, String>,
        right: Local<'_, String>,
    ) -> Option<Local<'s, String>> {
        let result = scope
            .host_mut()
            .concat_strings(left.host_value(), right.host_value());
        match result {
            Ok(value) => scope.make_local(value),
            Err(err) => {
                tracing::debug!(error = %err, "concat failed, returning the empty string");
                Self::empty(scope)
            }
        }
    }
}

impl Local<'_, String> {
    /// Length in UTF-16 code units
    pub fn length(&self, scope: &HandleScope<'_>) -> usize {
        scope.host().string_length(self.host_value())
    }

    /// Bytes needed to encode the string as UTF-8, without a terminator.
    /// Unpaired surrogates count as U+FFFD. 0 if the string can't be
    /// flattened.
    pub fn utf8_length(&self, scope: &mut HandleScope<'_>) -> usize {
        let string = self.host_value();
        let host = scope.host_mut();
        match host
            .flatten_string(string)
            .and_then(|()| host.deflated_utf8_length(string))
        {
            Ok(length) => length,
            Err(err) => {
                tracing::debug!(error = %err, "utf8_length failed");
                0
            }
        }
    }

    /// Copy the string out, replacing unpaired surrogates with U+FFFD
    pub fn to_rust_string_lossy(&self, scope: &HandleScope<'_>) -> std::string::String {
        let host = scope.host();
        let mut units = vec![0; host.string_length(self.host_value())];
        match host.copy_string_chars(self.host_value(), &mut units) {
            Ok(()) => std::string::String::from_utf16_lossy(&units),
            Err(err) => {
                tracing::debug!(error = %err, "string copy failed");
                std::string::String::new()
            }
        }
    }
}

/// Flatten `value`'s string form in a child scope, then hand it to `extract`.
/// The child scope releases every intermediate handle when this returns.
fn with_flat_string<T, R>(
    scope: &mut HandleScope<'_>,
    value: Local<'_, T>,
    extract: impl FnOnce(&HandleScope<'_>, HostValue) -> Option<R>,
) -> Option<R> {
    let scope = &mut scope.nested();
    let string = value.to_string(scope)?;
    if let Err(err) = scope.host_mut().flatten_string(string.host_value()) {
        tracing::debug!(error = %err, "flatten failed");
        return None;
    }
    extract(scope, string.host_value())
}

/// A value's string form as owned, NUL-terminated UTF-8.
///
/// If the value can't be converted (a symbol, or the host is out of memory)
/// there is no data and the length is 0.
pub struct Utf8Value {
    /// Encoded bytes plus the terminating NUL
    data: Option<Box<[u8]>>,
}

impl Utf8Value {
    pub fn new<T>(scope: &mut HandleScope<'_>, value: Local<'_, T>) -> Self {
        let data = with_flat_string(scope, value, |scope, string| {
            let host = scope.host();
            let length = host.deflated_utf8_length(string).ok()?;
            let mut data = vec![0u8; length + 1];
            let written = host.deflate_string_to_utf8(string, data.get_mut(..length)?).ok()?;
            debug_assert_eq!(written, length);
            Some(data.into_boxed_slice())
        });
        Self { data }
    }

    /// Byte length, excluding the terminator
    pub fn length(&self) -> usize {
        self.data.as_ref().map_or(0, |data| data.len() - 1)
    }

    /// Null if the conversion failed
    pub fn as_ptr(&self) -> *const u8 {
        self.data.as_ref().map_or(std::ptr::null(), |data| data.as_ptr())
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        let data = self.data.as_ref()?;
        data.get(..data.len() - 1)
    }

    pub fn as_bytes_with_nul(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(self.as_bytes()?).ok()
    }
}

/// A value's string form as owned, NUL-terminated UTF-16.
///
/// Same failure behavior as [`Utf8Value`].
pub struct Utf16Value {
    /// Code units plus the terminating NUL
    data: Option<Box<[u16]>>,
}

impl Utf16Value {
    pub fn new<T>(scope: &mut HandleScope<'_>, value: Local<'_, T>) -> Self {
        let data = with_flat_string(scope, value, |scope, string| {
            let host = scope.host();
            let length = host.string_length(string);
            let mut data = vec![0u16; length + 1];
            host.copy_string_chars(string, data.get_mut(..length)?).ok()?;
            Some(data.into_boxed_slice())
        });
        Self { data }
    }

    /// Length in code units, excluding the terminator
    pub fn length(&self) -> usize {
        self.data.as_ref().map_or(0, |data| data.len() - 1)
    }

    /// Null if the conversion failed
    pub fn as_ptr(&self) -> *const u16 {
        self.data.as_ref().map_or(std::ptr::null(), |data| data.as_ptr())
    }

    pub fn as_units(&self) -> Option<&[u16]> {
        let data = self.data.as_ref()?;
        data.get(..data.len() - 1)
    }
}
