//! Block store builders.

use crate::config::IndexParams;
use crate::error::{ConfigError, CoreResult};
use rangedb_storage::{BlockStore, BlockStoreFactory, FileMode, StorageLocation};
use std::sync::Arc;
use tracing::debug;

/// Builds the block store for one purpose tag at a location.
///
/// Implementations are stateless apart from the builders they wrap, so one
/// chain can be shared by every index built in the process.
pub trait BlockStoreBuilder: Send + Sync {
    /// Opens the block store for `ext` at `location`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if `params` has no block size, or
    /// `StorageUnavailable` if the store cannot be opened.
    fn build_block_store(
        &self,
        location: &StorageLocation,
        ext: &str,
        params: &IndexParams,
    ) -> CoreResult<Box<dyn BlockStore>>;
}

/// Opens raw block stores. Never adds a cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdBlockStoreBuilder;

impl StdBlockStoreBuilder {
    /// Creates the builder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl BlockStoreBuilder for StdBlockStoreBuilder {
    fn build_block_store(
        &self,
        location: &StorageLocation,
        ext: &str,
        params: &IndexParams,
    ) -> CoreResult<Box<dyn BlockStore>> {
        let block_size = match (params.block_size, params.order) {
            (Some(block_size), _) => block_size,
            (None, Some(order)) => return Err(ConfigError::BlockSizeUnspecified { order }.into()),
            (None, None) => return Err(ConfigError::NeitherSpecified.into()),
        };

        let store =
            BlockStoreFactory::create(location, ext, block_size as usize, params.file_mode)?;
        Ok(store)
    }
}

/// Adds a cache to the stores another builder opens, where one helps.
///
/// The wrapped store is returned unchanged when:
/// - the location is in memory, or
/// - the file mode is [`FileMode::Mapped`], or
/// - both cache sizes are zero.
pub struct CachingBlockStoreBuilder {
    inner: Arc<dyn BlockStoreBuilder>,
}

impl CachingBlockStoreBuilder {
    /// Wraps `inner`.
    pub fn new(inner: Arc<dyn BlockStoreBuilder>) -> Self {
        Self { inner }
    }

    /// Returns true if stores built at `location` with `params` get a cache.
    #[must_use]
    pub fn adds_cache(location: &StorageLocation, params: &IndexParams) -> bool {
        !location.is_mem() && params.file_mode != FileMode::Mapped && params.has_cache()
    }
}

impl BlockStoreBuilder for CachingBlockStoreBuilder {
    fn build_block_store(
        &self,
        location: &StorageLocation,
        ext: &str,
        params: &IndexParams,
    ) -> CoreResult<Box<dyn BlockStore>> {
        let store = self.inner.build_block_store(location, ext, params)?;
        if !Self::adds_cache(location, params) {
            debug!(
                "No block cache for {} (mem: {}, mode: {}, read: {}, write: {})",
                store.label(),
                location.is_mem(),
                params.file_mode,
                params.read_cache_size,
                params.write_cache_size
            );
            return Ok(store);
        }

        Ok(BlockStoreFactory::add_cache(
            store,
            params.read_cache_size,
            params.write_cache_size,
        ))
    }
}

impl std::fmt::Debug for CachingBlockStoreBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingBlockStoreBuilder").finish_non_exhaustive()
    }
}
