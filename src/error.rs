//! Error types for the host adapter and isolate configuration
//!
//! None of these reach embedder code through the handle API: bridge
//! operations map a `HostError` onto the empty handle (or the per-operation
//! fallback) after logging it.

use thiserror::Error;

use crate::gc::CellId;

/// Failure reported by a host engine primitive
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    #[error("out of memory: requested {requested} bytes with {used} of {limit} in use")]
    OutOfMemory {
        requested: usize,
        used: usize,
        limit: usize,
    },

    #[error("RangeError: {message}")]
    RangeError { message: String },

    #[error("TypeError: {message}")]
    TypeError { message: String },

    #[error("string of {length} code units exceeds the maximum of {max}")]
    StringTooLong { length: usize, max: usize },

    /// The primitive needs a flat string and was handed a rope
    #[error("string {0} is not flat")]
    NotFlat(CellId),

    /// The value refers to a cell that has been collected
    #[error("cell {0} is not live")]
    DeadCell(CellId),
}

impl HostError {
    pub fn range_error(message: impl Into<String>) -> Self {
        HostError::RangeError {
            message: message.into(),
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        HostError::TypeError {
            message: message.into(),
        }
    }

    /// Whether this failure is an allocation failure rather than a rejected request
    pub fn is_allocation_failure(&self) -> bool {
        matches!(
            self,
            HostError::OutOfMemory { .. } | HostError::StringTooLong { .. }
        )
    }
}

/// Result of a host engine primitive
pub type HostResult<T> = Result<T, HostError>;

/// Invalid isolate configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid isolate configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid isolate configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid {
            message: message.into(),
        }
    }
}
