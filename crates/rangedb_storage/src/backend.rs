//! Raw byte storage beneath block stores and object files.

use crate::error::StorageResult;

/// A flat run of bytes addressed by offset.
///
/// Block stores carve it into fixed-size blocks and object files into
/// length-prefixed records; the backend itself knows neither layout.
///
/// Offsets handed out by `append` stay valid until a `truncate` cuts below
/// them. `write_at` never changes the size.
///
/// Implemented by [`super::InMemoryBackend`] for memory locations and
/// [`super::FileBackend`] for disk locations.
pub trait StorageBackend: Send + Sync {
    /// Copies out `len` bytes at `offset`.
    ///
    /// # Errors
    ///
    /// `ReadPastEnd` when any of the range lies beyond the current size;
    /// `Io` when the underlying read fails.
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>>;

    /// Replaces bytes at `offset`. Use [`append`](Self::append) to grow.
    ///
    /// # Errors
    ///
    /// `WritePastEnd` when any of the range lies beyond the current size;
    /// `Io` when the underlying write fails.
    fn write_at(&mut self, offset: u64, data: &[u8]) -> StorageResult<()>;

    /// Adds `data` at the end and returns the offset it starts at.
    ///
    /// # Errors
    ///
    /// `Io` when the underlying write fails.
    fn append(&mut self, data: &[u8]) -> StorageResult<u64>;

    /// Hands buffered writes to the OS.
    ///
    /// # Errors
    ///
    /// `Io` on failure.
    fn flush(&mut self) -> StorageResult<()>;

    /// Current length in bytes, which is also the next `append` offset.
    ///
    /// # Errors
    ///
    /// `Io` on failure.
    fn size(&self) -> StorageResult<u64>;

    /// Waits until everything written so far is durable.
    ///
    /// # Errors
    ///
    /// `Io` on failure.
    fn sync(&mut self) -> StorageResult<()>;

    /// Drops every byte from `new_size` on.
    ///
    /// # Errors
    ///
    /// `Io` when `new_size` exceeds the current size or the cut fails.
    fn truncate(&mut self, new_size: u64) -> StorageResult<()>;
}

/// The byte range `offset..offset + len` if it lies within `size` bytes.
pub(crate) fn span(offset: u64, len: usize, size: u64) -> Option<std::ops::Range<u64>> {
    let end = offset.checked_add(len as u64)?;
    (end <= size).then_some(offset..end)
}
