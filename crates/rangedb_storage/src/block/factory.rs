//! Opening block stores at a storage location.

use super::{BlockStore, BlockStoreKind, CachedBlockStore, FileMode, PagedBlockStore};
use crate::error::StorageResult;
use crate::file::FileBackend;
use crate::location::StorageLocation;
use crate::memory::InMemoryBackend;
use std::path::Path;
use tracing::debug;

/// Opens raw block stores and layers caches over them.
///
/// `create` never adds a cache; callers decide that with [`add_cache`](Self::add_cache).
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockStoreFactory;

impl BlockStoreFactory {
    /// Opens the block store for `ext` at `location`.
    ///
    /// Memory locations get a fresh in-memory store; disk locations open
    /// (or create) `<dir>/<base>.<ext>`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or holds a partial block.
    pub fn create(
        location: &StorageLocation,
        ext: &str,
        block_size: usize,
        mode: FileMode,
    ) -> StorageResult<Box<dyn BlockStore>> {
        match location.path(ext) {
            None => Self::create_mem(&location.filename(ext), block_size),
            Some(path) => Self::create_file(&path, block_size, mode),
        }
    }

    /// Creates an empty in-memory block store.
    ///
    /// # Errors
    ///
    /// Returns an error if `block_size` is zero.
    pub fn create_mem(label: &str, block_size: usize) -> StorageResult<Box<dyn BlockStore>> {
        debug!("Creating memory block store {} (block size {})", label, block_size);
        let store = PagedBlockStore::new(
            label,
            InMemoryBackend::new(),
            block_size,
            BlockStoreKind::Memory,
        )?;
        Ok(Box::new(store))
    }

    /// Opens or creates a file-backed block store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or holds a partial block.
    pub fn create_file(
        path: &Path,
        block_size: usize,
        mode: FileMode,
    ) -> StorageResult<Box<dyn BlockStore>> {
        debug!(
            "Opening {} block store {:?} (block size {})",
            mode, path, block_size
        );
        let backend = FileBackend::open_with_create_dirs(path)?;
        let store = PagedBlockStore::new(
            path.display().to_string(),
            backend,
            block_size,
            BlockStoreKind::File(mode),
        )?;
        Ok(Box::new(store))
    }

    /// Wraps a store in read and write-back caches.
    #[must_use]
    pub fn add_cache(
        store: Box<dyn BlockStore>,
        read_cache_size: usize,
        write_cache_size: usize,
    ) -> Box<dyn BlockStore> {
        debug!(
            "Caching {} (read {}, write {})",
            store.label(),
            read_cache_size,
            write_cache_size
        );
        Box::new(CachedBlockStore::new(store, read_cache_size, write_cache_size))
    }
}
