//! Error types for RangeDB core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur while building indexes.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The index parameters are inconsistent. Raised before any store is opened.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    /// A block store or object file could not be opened or used.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] rangedb_storage::StorageError),

    /// Existing storage does not hold the expected structure.
    #[error("invalid index format: {message}")]
    InvalidFormat {
        /// Description of the format issue.
        message: String,
    },
}

impl CoreError {
    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Returns the configuration problem, if this is one.
    #[must_use]
    pub fn config_error(&self) -> Option<&ConfigError> {
        match self {
            Self::InvalidConfiguration(err) => Some(err),
            _ => None,
        }
    }
}

/// Problems with index parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An order was given without a block size.
    #[error("block size not specified (order {order} given)")]
    BlockSizeUnspecified {
        /// The order that was supplied.
        order: u32,
    },

    /// Neither parameter was given.
    #[error("neither block size nor order specified")]
    NeitherSpecified,

    /// The supplied order disagrees with the one the block size implies.
    #[error("wrong order ({order}), calculated = {calculated}")]
    OrderMismatch {
        /// The order that was supplied.
        order: u32,
        /// The order computed from block size and record length.
        calculated: u32,
    },

    /// The block cannot hold a tree node of order 2.
    #[error("block size {block_size} too small for record length {record_length}")]
    BlockTooSmall {
        /// The block size in bytes.
        block_size: u32,
        /// The record length in bytes.
        record_length: usize,
    },

    /// Records must have at least one byte.
    #[error("record length must be positive")]
    ZeroRecordLength,
}
