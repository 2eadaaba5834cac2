//! LRU caching layer over a block store.
//!
//! Two independent caches:
//! - a read cache of clean blocks
//! - a write-back cache of dirty blocks, written to the inner store on
//!   eviction, `sync` and `close`
//!
//! A zero size disables the corresponding cache; with no write cache every
//! write goes straight through.

use super::{check_block, Block, BlockId, BlockStore, BlockStoreKind};
use crate::error::StorageResult;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use tracing::warn;

/// Cache statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads served from either cache.
    pub hits: u64,
    /// Reads that went to the inner store.
    pub misses: u64,
    /// Dirty blocks pushed out of the write cache.
    pub evictions: u64,
    /// Dirty blocks written to the inner store, for any reason.
    pub write_backs: u64,
}

/// A block store with LRU read and write-back caches.
pub struct CachedBlockStore {
    inner: Box<dyn BlockStore>,
    read_cache: Option<Mutex<LruCache<BlockId, Vec<u8>>>>,
    write_cache: Option<LruCache<BlockId, Vec<u8>>>,
    stats: Mutex<CacheStats>,
}

impl CachedBlockStore {
    /// Wraps `inner` with caches of the given sizes (in blocks).
    #[must_use]
    pub fn new(inner: Box<dyn BlockStore>, read_cache_size: usize, write_cache_size: usize) -> Self {
        Self {
            inner,
            read_cache: NonZeroUsize::new(read_cache_size).map(|n| Mutex::new(LruCache::new(n))),
            write_cache: NonZeroUsize::new(write_cache_size).map(LruCache::new),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    /// The store underneath the caches.
    #[must_use]
    pub fn inner(&self) -> &dyn BlockStore {
        self.inner.as_ref()
    }

    /// Read cache capacity in blocks, 0 if disabled.
    #[must_use]
    pub fn read_cache_size(&self) -> usize {
        self.read_cache
            .as_ref()
            .map_or(0, |cache| cache.lock().cap().get())
    }

    /// Write cache capacity in blocks, 0 if disabled.
    #[must_use]
    pub fn write_cache_size(&self) -> usize {
        self.write_cache.as_ref().map_or(0, |cache| cache.cap().get())
    }

    /// Number of blocks written but not yet passed to the inner store.
    #[must_use]
    pub fn dirty_count(&self) -> usize {
        self.write_cache.as_ref().map_or(0, |cache| cache.len())
    }

    /// Get cache statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }

    fn flush_dirty(&mut self) -> StorageResult<()> {
        let Some(cache) = self.write_cache.as_mut() else {
            return Ok(());
        };

        while let Some((id, data)) = cache.pop_lru() {
            let block = Block::new(id, data);
            if let Err(err) = self.inner.write(&block) {
                cache.put(id, block.into_data());
                return Err(err);
            }
            self.stats.get_mut().write_backs += 1;
        }
        Ok(())
    }
}

impl BlockStore for CachedBlockStore {
    fn label(&self) -> &str {
        self.inner.label()
    }

    fn kind(&self) -> BlockStoreKind {
        BlockStoreKind::Cached
    }

    fn block_size(&self) -> usize {
        self.inner.block_size()
    }

    fn block_count(&self) -> u64 {
        self.inner.block_count()
    }

    fn allocate(&mut self) -> StorageResult<Block> {
        self.inner.allocate()
    }

    fn read(&self, id: BlockId) -> StorageResult<Block> {
        if let Some(data) = self.write_cache.as_ref().and_then(|cache| cache.peek(&id)) {
            self.stats.lock().hits += 1;
            return Ok(Block::new(id, data.clone()));
        }

        if let Some(cache) = &self.read_cache {
            if let Some(data) = cache.lock().get(&id) {
                self.stats.lock().hits += 1;
                return Ok(Block::new(id, data.clone()));
            }
        }

        self.stats.lock().misses += 1;
        let block = self.inner.read(id)?;
        if let Some(cache) = &self.read_cache {
            cache.lock().put(id, block.data().to_vec());
        }
        Ok(block)
    }

    fn write(&mut self, block: &Block) -> StorageResult<()> {
        check_block(
            self.inner.label(),
            block,
            self.inner.block_size(),
            self.inner.block_count(),
        )?;

        let id = block.id();
        match self.write_cache.as_mut() {
            None => {
                self.inner.write(block)?;
                self.stats.get_mut().write_backs += 1;
            }
            Some(cache) => {
                if let Some(slot) = cache.get_mut(&id) {
                    slot.copy_from_slice(block.data());
                } else {
                    // The LRU block leaves the cache only once the inner store has it.
                    if cache.len() == cache.cap().get() {
                        let lru = cache
                            .peek_lru()
                            .map(|(lru_id, data)| Block::new(*lru_id, data.clone()));
                        if let Some(lru) = lru {
                            self.inner.write(&lru)?;
                            cache.pop_lru();
                            let stats = self.stats.get_mut();
                            stats.evictions += 1;
                            stats.write_backs += 1;
                        }
                    }
                    cache.put(id, block.data().to_vec());
                }
            }
        }

        if let Some(cache) = self.read_cache.as_mut() {
            if let Some(slot) = cache.get_mut().get_mut(&id) {
                slot.copy_from_slice(block.data());
            }
        }
        Ok(())
    }

    fn sync(&mut self) -> StorageResult<()> {
        self.flush_dirty()?;
        self.inner.sync()
    }

    fn close(&mut self) -> StorageResult<()> {
        self.flush_dirty()?;
        self.inner.close()
    }
}

impl Drop for CachedBlockStore {
    fn drop(&mut self) {
        if self.dirty_count() == 0 {
            return;
        }
        if let Err(err) = self.flush_dirty() {
            warn!("dropping {} with unwritten blocks: {}", self.inner.label(), err);
        }
    }
}

impl std::fmt::Debug for CachedBlockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedBlockStore")
            .field("label", &self.inner.label())
            .field("read_cache_size", &self.read_cache_size())
            .field("write_cache_size", &self.write_cache_size())
            .field("dirty", &self.dirty_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::PagedBlockStore;
    use crate::error::StorageError;
    use crate::InMemoryBackend;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Passes everything through until `fail` is set, then rejects writes.
    struct Flaky {
        inner: Box<dyn BlockStore>,
        fail: Arc<AtomicBool>,
    }

    impl BlockStore for Flaky {
        fn label(&self) -> &str {
            self.inner.label()
        }

        fn kind(&self) -> BlockStoreKind {
            self.inner.kind()
        }

        fn block_size(&self) -> usize {
            self.inner.block_size()
        }

        fn block_count(&self) -> u64 {
            self.inner.block_count()
        }

        fn allocate(&mut self) -> StorageResult<Block> {
            self.inner.allocate()
        }

        fn read(&self, id: BlockId) -> StorageResult<Block> {
            self.inner.read(id)
        }

        fn write(&mut self, block: &Block) -> StorageResult<()> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(StorageError::corrupted("device gone"));
            }
            self.inner.write(block)
        }

        fn sync(&mut self) -> StorageResult<()> {
            self.inner.sync()
        }
    }

    fn flaky(blocks: u64, read: usize, write: usize) -> (CachedBlockStore, Arc<AtomicBool>) {
        let fail = Arc::new(AtomicBool::new(false));
        let inner = Flaky {
            inner: paged(blocks),
            fail: Arc::clone(&fail),
        };
        (CachedBlockStore::new(Box::new(inner), read, write), fail)
    }

    fn paged(blocks: u64) -> Box<dyn BlockStore> {
        let mut inner =
            PagedBlockStore::new("cached", InMemoryBackend::new(), 8, BlockStoreKind::Memory)
                .unwrap();
        for _ in 0..blocks {
            inner.allocate().unwrap();
        }
        Box::new(inner)
    }

    fn cached(blocks: u64, read: usize, write: usize) -> CachedBlockStore {
        CachedBlockStore::new(paged(blocks), read, write)
    }

    fn block(id: u64, fill: u8) -> Block {
        Block::new(BlockId(id), vec![fill; 8])
    }

    #[test]
    fn read_cache_serves_repeat_reads() {
        let store = cached(2, 4, 0);

        store.read(BlockId(1)).unwrap();
        store.read(BlockId(1)).unwrap();

        let stats = store.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn write_back_defers_inner_writes() {
        let mut store = cached(2, 0, 4);
        store.write(&block(0, 9)).unwrap();

        assert_eq!(store.dirty_count(), 1);
        assert_eq!(store.inner().read(BlockId(0)).unwrap().data(), &[0; 8]);
        assert_eq!(store.read(BlockId(0)).unwrap().data(), &[9; 8]);

        store.sync().unwrap();
        assert_eq!(store.dirty_count(), 0);
        assert_eq!(store.inner().read(BlockId(0)).unwrap().data(), &[9; 8]);
    }

    #[test]
    fn eviction_writes_through() {
        let mut store = cached(3, 0, 2);
        store.write(&block(0, 1)).unwrap();
        store.write(&block(1, 2)).unwrap();
        store.write(&block(2, 3)).unwrap();

        assert_eq!(store.stats().evictions, 1);
        assert_eq!(store.inner().read(BlockId(0)).unwrap().data(), &[1; 8]);
        assert_eq!(store.dirty_count(), 2);
    }

    #[test]
    fn rewrite_of_dirty_block_stays_cached() {
        let mut store = cached(1, 0, 1);
        store.write(&block(0, 1)).unwrap();
        store.write(&block(0, 2)).unwrap();

        assert_eq!(store.stats().evictions, 0);
        assert_eq!(store.read(BlockId(0)).unwrap().data(), &[2; 8]);
    }

    #[test]
    fn writes_refresh_read_cache() {
        let mut store = cached(1, 4, 0);
        store.read(BlockId(0)).unwrap();
        store.write(&block(0, 5)).unwrap();

        assert_eq!(store.read(BlockId(0)).unwrap().data(), &[5; 8]);
        assert_eq!(store.inner().read(BlockId(0)).unwrap().data(), &[5; 8]);
    }

    #[test]
    fn unallocated_write_is_rejected() {
        let mut store = cached(1, 4, 4);
        assert!(store.write(&block(3, 1)).is_err());
        assert_eq!(store.dirty_count(), 0);
    }

    #[test]
    fn reports_sizes_and_kind() {
        let store = cached(0, 10, 0);
        assert_eq!(store.kind(), BlockStoreKind::Cached);
        assert_eq!(store.inner().kind(), BlockStoreKind::Memory);
        assert_eq!(store.read_cache_size(), 10);
        assert_eq!(store.write_cache_size(), 0);
    }

    #[test]
    fn failed_eviction_keeps_dirty_block() {
        let (mut store, fail) = flaky(2, 0, 1);
        store.write(&block(0, 7)).unwrap();

        fail.store(true, Ordering::SeqCst);
        assert!(store.write(&block(1, 9)).is_err());
        assert_eq!(store.dirty_count(), 1);
        assert_eq!(store.read(BlockId(0)).unwrap().data(), &[7; 8]);
        assert_eq!(store.read(BlockId(1)).unwrap().data(), &[0; 8]);
        assert_eq!(store.stats().evictions, 0);

        fail.store(false, Ordering::SeqCst);
        store.sync().unwrap();
        assert_eq!(store.inner().read(BlockId(0)).unwrap().data(), &[7; 8]);
        assert_eq!(store.inner().read(BlockId(1)).unwrap().data(), &[0; 8]);
    }

    #[test]
    fn failed_write_through_is_not_counted() {
        let (mut store, fail) = flaky(1, 4, 0);
        store.read(BlockId(0)).unwrap();

        fail.store(true, Ordering::SeqCst);
        assert!(store.write(&block(0, 3)).is_err());
        assert_eq!(store.stats().write_backs, 0);
        assert_eq!(store.read(BlockId(0)).unwrap().data(), &[0; 8]);

        fail.store(false, Ordering::SeqCst);
        store.write(&block(0, 3)).unwrap();
        assert_eq!(store.stats().write_backs, 1);
    }
}
