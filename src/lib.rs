//! Embedding-API compatibility layer over a tagged-value host engine
//!
//! Handles, strings, array buffers and typed arrays with the semantics of a
//! scope-rooted embedding API, implemented on top of any [`HostEngine`]. The
//! crate ships [`HeapHost`], an in-process host with a mark-and-sweep heap.
//!
//! # Example
//!
//! ```
//! use spidershim::{ArrayBuffer, CreateParams, HandleScope, Isolate, String, Uint8Array, Utf8Value};
//!
//! let mut isolate = Isolate::new(CreateParams::default());
//! let scope = &mut HandleScope::new(&mut isolate);
//!
//! let greeting = String::new(scope, "hello").unwrap();
//! assert_eq!(greeting.length(scope), 5);
//! assert_eq!(Utf8Value::new(scope, greeting).as_str(), Some("hello"));
//!
//! let buffer = ArrayBuffer::new(scope, 16).unwrap();
//! let view = Uint8Array::new(scope, buffer, 4, 8).unwrap();
//! assert_eq!(view.byte_offset(scope), 4);
//! assert!(Uint8Array::new(scope, buffer, 12, 8).is_none());
//! ```

pub mod array_buffer;
pub mod config;
pub mod error;
pub mod gc;
pub mod host;
pub mod isolate;
pub mod local;
pub mod object;
pub mod primitive;
pub mod scope;
pub mod string;
pub mod typed_array;

pub use array_buffer::{ArrayBuffer, ArrayBufferCreationMode, Contents};
pub use config::CreateParams;
pub use error::{ConfigError, HostError, HostResult};
pub use gc::HeapStatistics;
pub use host::{DetachPolicy, ElementKind, HeapHost, HostEngine, HostValue, ValueKind};
pub use isolate::{Isolate, IsolateId, IsolateScope};
pub use local::{HandleType, Local, Value};
pub use object::{BooleanObject, Date, External, Object, StringObject};
pub use primitive::{Boolean, Integer, Number, Primitive, Symbol, null, undefined};
pub use scope::HandleScope;
pub use string::{NewStringType, String, Utf16Value, Utf8Value};
pub use typed_array::{
    ArrayBufferView, ArrayBufferViewType, BigInt64Array, BigUint64Array, DataView,
    ElementArrayType, Float32Array, Float64Array, Int8Array, Int16Array, Int32Array, TypedArray,
    TypedArrayType, Uint8Array, Uint8ClampedArray, Uint16Array, Uint32Array, new_typed_array,
};
