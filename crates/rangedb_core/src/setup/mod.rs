//! Builders that turn a location and parameters into live indexes and files.
//!
//! The builders compose: a [`CachingBlockStoreBuilder`] wraps any other
//! [`BlockStoreBuilder`], and the index builders take one block store
//! builder for nodes and one for records. A chain is put together once,
//! usually with [`Builders::standard`], and reused for every build.
//!
//! ```text
//! StdIndexBuilder
//!   └─ StdRangeIndexBuilder ── validate_order
//!        ├─ nodes:   CachingBlockStoreBuilder ─ StdBlockStoreBuilder
//!        └─ records: CachingBlockStoreBuilder ─ StdBlockStoreBuilder
//! ```

mod block;
mod index;
mod object;
mod order;

pub use block::{BlockStoreBuilder, CachingBlockStoreBuilder, StdBlockStoreBuilder};
pub use index::{IndexBuilder, RangeIndexBuilder, StdIndexBuilder, StdRangeIndexBuilder};
pub use object::{ObjectFileBuilder, StdObjectFileBuilder};
pub use order::validate_order;

use std::sync::Arc;

/// The builder chain used for one process.
#[derive(Debug, Clone)]
pub struct Builders {
    index: StdIndexBuilder,
    object_file: StdObjectFileBuilder,
}

impl Builders {
    /// Caches node and record blocks where it helps.
    #[must_use]
    pub fn standard() -> Self {
        let block: Arc<dyn BlockStoreBuilder> = Arc::new(CachingBlockStoreBuilder::new(
            Arc::new(StdBlockStoreBuilder::new()),
        ));
        Self::new(block.clone(), block)
    }

    /// Never caches.
    #[must_use]
    pub fn uncached() -> Self {
        let block: Arc<dyn BlockStoreBuilder> = Arc::new(StdBlockStoreBuilder::new());
        Self::new(block.clone(), block)
    }

    /// Uses the given node and record block store builders.
    pub fn new(nodes: Arc<dyn BlockStoreBuilder>, records: Arc<dyn BlockStoreBuilder>) -> Self {
        Self {
            index: StdIndexBuilder::new(nodes, records),
            object_file: StdObjectFileBuilder::new(),
        }
    }

    /// Builds indexes of any kind.
    #[must_use]
    pub fn index_builder(&self) -> &dyn IndexBuilder {
        &self.index
    }

    /// Builds range indexes.
    #[must_use]
    pub fn range_index_builder(&self) -> &dyn RangeIndexBuilder {
        self.index.range_index_builder()
    }

    /// Builds object files.
    #[must_use]
    pub fn object_file_builder(&self) -> &dyn ObjectFileBuilder {
        &self.object_file
    }
}

impl Default for Builders {
    fn default() -> Self {
        Self::standard()
    }
}
