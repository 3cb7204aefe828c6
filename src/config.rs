//! Isolate configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::gc::DEFAULT_GC_THRESHOLD;

/// Longest string the heap will create, in UTF-16 code units
pub const MAX_STRING_LENGTH: usize = (1 << 30) - 2;

/// Parameters for creating an isolate.
///
/// Every field has a default, so a JSON document only needs the fields it
/// changes:
///
/// ```
/// use spidershim::CreateParams;
///
/// let params = CreateParams::from_json(r#"{ "max_heap_bytes": 1048576 }"#).unwrap();
/// assert_eq!(params.max_heap_bytes, Some(1 << 20));
/// assert_eq!(params.gc_threshold, 100);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateParams {
    /// Allocations between automatic collections (0 disables them)
    pub gc_threshold: usize,

    /// Budget for string and buffer payload bytes. Allocations that don't fit
    /// after a collection fail with an empty handle.
    pub max_heap_bytes: Option<usize>,

    /// Longest string, in UTF-16 code units
    pub max_string_length: usize,
}

impl Default for CreateParams {
    fn default() -> Self {
        Self {
            gc_threshold: DEFAULT_GC_THRESHOLD,
            max_heap_bytes: None,
            max_string_length: MAX_STRING_LENGTH,
        }
    }
}

impl CreateParams {
    /// Parse and validate parameters from JSON
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let params: CreateParams = serde_json::from_str(source)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_string_length > MAX_STRING_LENGTH {
            return Err(ConfigError::invalid(format!(
                "max_string_length {} exceeds the engine limit of {}",
                self.max_string_length, MAX_STRING_LENGTH
            )));
        }
        Ok(())
    }

    pub fn with_gc_threshold(mut self, threshold: usize) -> Self {
        self.gc_threshold = threshold;
        self
    }

    pub fn with_max_heap_bytes(mut self, bytes: usize) -> Self {
        self.max_heap_bytes = Some(bytes);
        self
    }

    pub fn with_max_string_length(mut self, length: usize) -> Self {
        self.max_string_length = length;
        self
    }
}
