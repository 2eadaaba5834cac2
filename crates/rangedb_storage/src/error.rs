//! Storage errors.

use std::io;
use thiserror::Error;

/// Result of a storage call.
pub type StorageResult<T> = Result<T, StorageError>;

/// Failures raised by backends, block stores and object files.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The operating system reported a failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A read reached past the last byte.
    #[error("read of {len} bytes at {offset} runs past end ({size} bytes)")]
    ReadPastEnd {
        /// Start of the read.
        offset: u64,
        /// Bytes asked for.
        len: usize,
        /// Bytes present.
        size: u64,
    },

    /// An overwrite reached past the last byte.
    #[error("write of {len} bytes at {offset} runs past end ({size} bytes)")]
    WritePastEnd {
        /// Start of the write.
        offset: u64,
        /// Bytes supplied.
        len: usize,
        /// Bytes present.
        size: u64,
    },

    /// The block id has not been allocated.
    #[error("no such block {id} in {label} ({count} blocks)")]
    NoSuchBlock {
        /// Store the lookup was made against.
        label: String,
        /// The requested block.
        id: u64,
        /// Number of allocated blocks.
        count: u64,
    },

    /// A block buffer does not match the store's block size.
    #[error("block size mismatch: expected {expected} bytes, got {actual}")]
    BlockSize {
        /// The store's block size.
        expected: usize,
        /// The size of the supplied buffer.
        actual: usize,
    },

    /// Stored bytes do not have the expected layout.
    #[error("corrupt storage: {0}")]
    Corrupted(String),
}

impl StorageError {
    /// Creates a corruption error.
    pub fn corrupted(message: impl Into<String>) -> Self {
        Self::Corrupted(message.into())
    }

    /// Wraps a rejected argument as an `InvalidInput` I/O error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::Io(io::Error::new(io::ErrorKind::InvalidInput, message.into()))
    }
}
