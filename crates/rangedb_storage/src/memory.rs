//! Heap-backed bytes for memory locations.

use crate::backend::{span, StorageBackend};
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::ops::Range;

/// Bytes held in a single growable buffer.
///
/// Nothing outlives the value. Every store created at a memory location
/// sits on one of these.
///
/// ```rust
/// use rangedb_storage::{InMemoryBackend, StorageBackend};
///
/// let mut bytes = InMemoryBackend::new();
/// assert_eq!(bytes.append(b"leaf node").unwrap(), 0);
/// bytes.write_at(0, b"root").unwrap();
/// assert_eq!(bytes.read_at(0, 9).unwrap(), b"root node");
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    buf: RwLock<Vec<u8>>,
}

impl InMemoryBackend {
    /// An empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer seeded with `bytes`.
    #[must_use]
    pub fn with_data(bytes: Vec<u8>) -> Self {
        Self {
            buf: RwLock::new(bytes),
        }
    }

    /// Snapshot of the buffer.
    #[must_use]
    pub fn data(&self) -> Vec<u8> {
        self.buf.read().clone()
    }
}

fn indices(range: Range<u64>) -> Range<usize> {
    range.start as usize..range.end as usize
}

impl StorageBackend for InMemoryBackend {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        let buf = self.buf.read();
        let size = buf.len() as u64;
        let range = span(offset, len, size).ok_or(StorageError::ReadPastEnd { offset, len, size })?;
        Ok(buf[indices(range)].to_vec())
    }

    fn write_at(&mut self, offset: u64, bytes: &[u8]) -> StorageResult<()> {
        let buf = self.buf.get_mut();
        let size = buf.len() as u64;
        let range = span(offset, bytes.len(), size).ok_or(StorageError::WritePastEnd {
            offset,
            len: bytes.len(),
            size,
        })?;
        buf[indices(range)].copy_from_slice(bytes);
        Ok(())
    }

    fn append(&mut self, bytes: &[u8]) -> StorageResult<u64> {
        let buf = self.buf.get_mut();
        let at = buf.len() as u64;
        buf.extend_from_slice(bytes);
        Ok(at)
    }

    fn flush(&mut self) -> StorageResult<()> {
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.buf.read().len() as u64)
    }

    fn sync(&mut self) -> StorageResult<()> {
        Ok(())
    }

    fn truncate(&mut self, new_size: u64) -> StorageResult<()> {
        let buf = self.buf.get_mut();
        if new_size > buf.len() as u64 {
            return Err(StorageError::invalid_input(format!(
                "cannot grow {} byte buffer to {} by truncation",
                buf.len(),
                new_size
            )));
        }
        buf.truncate(new_size as usize);
        Ok(())
    }
}
