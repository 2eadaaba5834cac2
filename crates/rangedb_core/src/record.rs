//! Fixed-length record layout.

use crate::error::{ConfigError, CoreResult};

/// Describes the fixed-length records an index stores.
///
/// A record is a key followed by an optional value. Only the total length
/// matters to the builders; it drives the tree order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordFactory {
    key_length: usize,
    value_length: usize,
}

impl RecordFactory {
    /// Creates a record layout.
    ///
    /// # Errors
    ///
    /// Returns `ZeroRecordLength` if both lengths are zero.
    pub fn new(key_length: usize, value_length: usize) -> CoreResult<Self> {
        if key_length + value_length == 0 {
            return Err(ConfigError::ZeroRecordLength.into());
        }
        Ok(Self {
            key_length,
            value_length,
        })
    }

    /// Bytes in the key part.
    #[must_use]
    pub fn key_length(&self) -> usize {
        self.key_length
    }

    /// Bytes in the value part.
    #[must_use]
    pub fn value_length(&self) -> usize {
        self.value_length
    }

    /// Returns true if records carry a value after the key.
    #[must_use]
    pub fn has_value(&self) -> bool {
        self.value_length > 0
    }

    /// Serialized length of one record. Always positive.
    #[must_use]
    pub fn record_length(&self) -> usize {
        self.key_length + self.value_length
    }
}
