//! Typed arrays and data views
//!
//! Every typed array kind is created by the same algorithm,
//! [`new_typed_array`], keyed by the marker type's [`ElementKind`]. The
//! accessors shared by all views dispatch on the host-reported kind per call.

use crate::array_buffer::ArrayBuffer;
use crate::host::{ElementKind, ValueKind};
use crate::local::{HandleType, Local, handle_type};
use crate::scope::HandleScope;

/// Handle types that are views over an [`ArrayBuffer`]
pub trait ArrayBufferViewType: HandleType {}

/// Handle types that are typed arrays of some element kind
pub trait TypedArrayType: ArrayBufferViewType {}

/// Typed array handle types with one fixed element kind
pub trait ElementArrayType: TypedArrayType {
    const KIND: ElementKind;
}

handle_type!(
    /// Any typed array or data view
    ArrayBufferView,
    |kind| kind.is_array_buffer_view()
);

handle_type!(
    /// A typed array of any element kind
    TypedArray,
    |kind| matches!(kind, ValueKind::TypedArray(_))
);

handle_type!(
    /// Unaligned, mixed-width access to a byte range of a buffer
    DataView,
    |kind| kind == ValueKind::DataView
);

impl ArrayBufferViewType for ArrayBufferView {}
impl ArrayBufferViewType for TypedArray {}
impl ArrayBufferViewType for DataView {}
impl TypedArrayType for TypedArray {}

macro_rules! typed_arrays {
    ($($name:ident => $kind:ident, $is:ident;)*) => {
        $(
            handle_type!(
                #[doc = concat!("A `", stringify!($name), "` view")]
                $name,
                |kind| kind == ValueKind::TypedArray(ElementKind::$kind)
            );

            impl ArrayBufferViewType for $name {}
            impl TypedArrayType for $name {}

            impl ElementArrayType for $name {
                const KIND: ElementKind = ElementKind::$kind;
            }

            impl $name {
                /// View `length` elements of `buffer` starting at `byte_offset`.
                /// `None` if the range is misaligned or doesn't fit.
                pub fn new<'s>(
                    scope: &mut HandleScope<'s>,
                    buffer: Local<'_, ArrayBuffer>,
                    byte_offset: usize,
                    length: usize,
                ) -> Option<Local<'s, $name>> {
                    new_typed_array(scope, buffer, byte_offset, length)
                }
            }

            impl<T> Local<'_, T> {
                pub fn $is(&self) -> bool {
                    self.kind() == ValueKind::TypedArray(ElementKind::$kind)
                }
            }
        )*
    };
}

typed_arrays! {
    Int8Array => Int8, is_int8_array;
    Uint8Array => Uint8, is_uint8_array;
    Uint8ClampedArray => Uint8Clamped, is_uint8_clamped_array;
    Int16Array => Int16, is_int16_array;
    Uint16Array => Uint16, is_uint16_array;
    Int32Array => Int32, is_int32_array;
    Uint32Array => Uint32, is_uint32_array;
    Float32Array => Float32, is_float32_array;
    Float64Array => Float64, is_float64_array;
    BigInt64Array => BigInt64, is_big_int64_array;
    BigUint64Array => BigUint64, is_big_uint64_array;
}

/// Create a typed array of `T`'s element kind over `buffer`
pub fn new_typed_array<'s, T: ElementArrayType>(
    scope: &mut HandleScope<'s>,
    buffer: Local<'_, ArrayBuffer>,
    byte_offset: usize,
    length: usize,
) -> Option<Local<'s, T>> {
    let result = scope.host_mut().new_typed_array_with_buffer(
        T::KIND,
        buffer.host_value(),
        byte_offset,
        length,
    );
    scope.adopt(result, T::NAME)
}

impl DataView {
    /// View `byte_length` bytes of `buffer` starting at `byte_offset`
    pub fn new<'s>(
        scope: &mut HandleScope<'s>,
        buffer: Local<'_, ArrayBuffer>,
        byte_offset: usize,
        byte_length: usize,
    ) -> Option<Local<'s, DataView>> {
        let result = scope
            .host_mut()
            .new_data_view(buffer.host_value(), byte_offset, byte_length);
        scope.adopt(result, "DataView")
    }
}

impl<T: ArrayBufferViewType> Local<'_, T> {
    /// The buffer this view covers
    pub fn buffer<'t>(&self, scope: &mut HandleScope<'t>) -> Option<Local<'t, ArrayBuffer>> {
        let result = scope.host_mut().array_buffer_view_buffer(self.host_value());
        scope.adopt(result, "ArrayBufferView::buffer")
    }

    pub fn byte_offset(&self, scope: &HandleScope<'_>) -> usize {
        let host = scope.host();
        match self.kind() {
            ValueKind::TypedArray(_) => host.typed_array_byte_offset(self.host_value()),
            ValueKind::DataView => host.data_view_byte_offset(self.host_value()),
            _ => 0,
        }
    }

    pub fn byte_length(&self, scope: &HandleScope<'_>) -> usize {
        let host = scope.host();
        match self.kind() {
            ValueKind::TypedArray(_) => host.typed_array_byte_length(self.host_value()),
            ValueKind::DataView => host.data_view_byte_length(self.host_value()),
            _ => 0,
        }
    }
}

impl<T: TypedArrayType> Local<'_, T> {
    /// Element count
    pub fn length(&self, scope: &HandleScope<'_>) -> usize {
        scope.host().typed_array_length(self.host_value())
    }
}
