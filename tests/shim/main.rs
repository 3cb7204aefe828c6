//! Integration tests for the shim, organized by subsystem
//!
//! These tests exercise the bridge through the public API.
//!
//! ## Aggressive Test Defaults
//!
//! Tests use aggressive defaults to catch rooting bugs early:
//! - `GC_THRESHOLD=1` - collect on every allocation, so any value a scope
//!   forgot to root is gone before the next call
//!
//! Override via environment variables:
//!
//! ```bash
//! cargo test                           # Default: aggressive settings
//! GC_THRESHOLD=100 cargo test          # Less aggressive GC for faster runs
//! ```

mod array_buffer;
mod gc;
mod handles;

use spidershim::{CreateParams, Isolate};

/// Create an isolate with aggressive defaults for testing:
/// - GC_THRESHOLD=1 (collect on every allocation) to catch rooting bugs
pub fn create_test_isolate() -> Isolate {
    create_test_isolate_with(CreateParams::default())
}

/// Like [`create_test_isolate`], keeping the other fields of `params`
pub fn create_test_isolate_with(params: CreateParams) -> Isolate {
    // GC_THRESHOLD=0 disables automatic collection
    let gc_threshold = std::env::var("GC_THRESHOLD")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1);
    Isolate::new(params.with_gc_threshold(gc_threshold))
}
