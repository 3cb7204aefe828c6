//! Array buffers

use std::ptr;

use crate::host::{DetachPolicy, ValueKind};
use crate::local::{Local, handle_type};
use crate::scope::HandleScope;

handle_type!(
    /// A fixed-length byte buffer
    ArrayBuffer,
    |kind| kind == ValueKind::ArrayBuffer
);

/// Who owns the memory handed to [`ArrayBuffer::new_external`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayBufferCreationMode {
    /// The embedder keeps ownership and frees the memory itself
    Externalized,
    /// The engine takes ownership and frees the memory with the buffer
    Internalized,
}

/// Data pointer and length of a buffer at the time they were read.
///
/// The pointer is valid until the buffer is detached or collected. A detached
/// buffer reports a null pointer and zero length.
#[derive(Debug, Clone, Copy)]
pub struct Contents {
    data: *mut u8,
    byte_length: usize,
}

impl Contents {
    pub fn data(&self) -> *mut u8 {
        self.data
    }

    pub fn byte_length(&self) -> usize {
        self.byte_length
    }

    /// # Safety
    /// The buffer must still be attached and alive, and nothing may write to
    /// it while the slice is in use.
    pub unsafe fn as_slice<'a>(&self) -> &'a [u8] {
        if self.data.is_null() {
            return &[];
        }
        unsafe { std::slice::from_raw_parts(self.data, self.byte_length) }
    }

    /// # Safety
    /// The buffer must still be attached and alive, and the slice must be the
    /// only access to its bytes while in use.
    pub unsafe fn as_mut_slice<'a>(&mut self) -> &'a mut [u8] {
        if self.data.is_null() {
            return &mut [];
        }
        unsafe { std::slice::from_raw_parts_mut(self.data, self.byte_length) }
    }
}

impl ArrayBuffer {
    /// Zero-filled buffer of `byte_length` bytes. `None` if the heap can't
    /// hold it even after a collection.
    pub fn new<'s>(scope: &mut HandleScope<'s>, byte_length: usize) -> Option<Local<'s, ArrayBuffer>> {
        let result = scope.host_mut().new_array_buffer(byte_length);
        scope.adopt(result, "ArrayBuffer::new")
    }

    /// Buffer that takes ownership of `data`
    pub fn from_boxed_slice<'s>(
        scope: &mut HandleScope<'s>,
        data: Box<[u8]>,
    ) -> Option<Local<'s, ArrayBuffer>> {
        let result = scope.host_mut().new_array_buffer_with_contents(data);
        scope.adopt(result, "ArrayBuffer::from_boxed_slice")
    }

    /// Buffer over memory supplied by the embedder.
    ///
    /// The bytes exposed are the same in both modes; the mode only decides who
    /// frees them. A null `data` with a non-zero length gives `None`.
    ///
    /// # Safety
    /// - `Externalized`: `data` must be valid for reads and writes of
    ///   `byte_length` bytes until the buffer is detached or collected.
    /// - `Internalized`: `data` must come from a `Box<[u8]>` of exactly
    ///   `byte_length` bytes, whose ownership passes to the buffer.
    pub unsafe fn new_external<'s>(
        scope: &mut HandleScope<'s>,
        data: *mut u8,
        byte_length: usize,
        mode: ArrayBufferCreationMode,
    ) -> Option<Local<'s, ArrayBuffer>> {
        match mode {
            ArrayBufferCreationMode::Externalized => {
                let result = unsafe {
                    scope
                        .host_mut()
                        .new_array_buffer_with_external_contents(data, byte_length)
                };
                scope.adopt(result, "ArrayBuffer::new_external")
            }
            ArrayBufferCreationMode::Internalized => {
                let contents: Box<[u8]> = if data.is_null() {
                    if byte_length != 0 {
                        tracing::debug!(byte_length, "null contents for an internalized buffer");
                        return None;
                    }
                    Box::default()
                } else {
                    unsafe { Box::from_raw(ptr::slice_from_raw_parts_mut(data, byte_length)) }
                };
                Self::from_boxed_slice(scope, contents)
            }
        }
    }
}

impl Local<'_, ArrayBuffer> {
    /// Current length, read from the host on every call; 0 once detached
    pub fn byte_length(&self, scope: &HandleScope<'_>) -> usize {
        scope.host().array_buffer_byte_length(self.host_value())
    }

    pub fn get_contents(&self, scope: &mut HandleScope<'_>) -> Contents {
        let (data, byte_length) = scope.host_mut().array_buffer_data(self.host_value());
        Contents { data, byte_length }
    }

    /// Whether the backing memory belongs to the embedder
    pub fn is_external(&self, scope: &HandleScope<'_>) -> bool {
        scope.host().is_external_array_buffer(self.host_value())
    }

    /// Disassociate the buffer from its storage. Its length becomes 0; the old
    /// bytes are kept until the buffer itself is collected, and embedder-owned
    /// memory is never freed.
    #[doc(alias = "neuter")]
    pub fn detach(&self, scope: &mut HandleScope<'_>) {
        let buffer = self.host_value();
        if let Err(err) = scope.host_mut().detach_array_buffer(buffer, DetachPolicy::KeepData) {
            tracing::debug!(error = %err, "detach failed");
        }
    }
}
