//! Fixed-size block storage.
//!
//! A block store hands out blocks of `block_size` bytes addressed by a
//! dense [`BlockId`]. Tree nodes and tree records each get their own store.
//!
//! - [`PagedBlockStore`] lays blocks end to end over a [`StorageBackend`](crate::StorageBackend)
//! - [`CachedBlockStore`] adds LRU read and write-back caches to any store
//! - [`BlockStoreFactory`] opens the right store for a [`StorageLocation`](crate::StorageLocation)

mod cache;
mod factory;
mod paged;

pub use cache::{CacheStats, CachedBlockStore};
pub use factory::BlockStoreFactory;
pub use paged::PagedBlockStore;

use crate::error::{StorageError, StorageResult};
use std::fmt;
use std::str::FromStr;

/// Address of a block within one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u64);

impl BlockId {
    /// Byte offset of this block for the given block size.
    #[must_use]
    pub fn offset(self, block_size: usize) -> u64 {
        self.0 * block_size as u64
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A block and its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    id: BlockId,
    data: Vec<u8>,
}

impl Block {
    /// Creates a block from its id and contents.
    #[must_use]
    pub fn new(id: BlockId, data: Vec<u8>) -> Self {
        Self { id, data }
    }

    /// The block's address.
    #[must_use]
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// The block's contents.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable access to the block's contents.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Consumes the block, returning its contents.
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// How file-backed blocks reach the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FileMode {
    /// Pages are served through the OS page cache; no block cache is added.
    #[default]
    Mapped,
    /// Explicit reads and writes; a block cache pays off.
    Direct,
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mapped => f.write_str("mapped"),
            Self::Direct => f.write_str("direct"),
        }
    }
}

impl FromStr for FileMode {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mapped" => Ok(Self::Mapped),
            "direct" => Ok(Self::Direct),
            other => Err(StorageError::invalid_input(format!(
                "unknown file mode '{other}' (expected 'mapped' or 'direct')"
            ))),
        }
    }
}

/// What sits behind a [`BlockStore`] handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStoreKind {
    /// Blocks held in memory.
    Memory,
    /// Blocks in a file, accessed with the given mode.
    File(FileMode),
    /// A caching layer over another store.
    Cached,
}

impl fmt::Display for BlockStoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::File(mode) => write!(f, "file ({mode})"),
            Self::Cached => f.write_str("cached"),
        }
    }
}

/// Fixed-size block storage.
///
/// # Invariants
///
/// - Block ids are dense: `0..block_count()` are all valid
/// - Every block is exactly `block_size()` bytes
/// - `allocate` returns a zeroed block that is already readable
pub trait BlockStore: Send + Sync {
    /// Name of the store, usually the resolved file name.
    fn label(&self) -> &str;

    /// What kind of store this is.
    fn kind(&self) -> BlockStoreKind;

    /// Size of every block in bytes.
    fn block_size(&self) -> usize;

    /// Number of allocated blocks.
    fn block_count(&self) -> u64;

    /// Returns true if no block has been allocated yet.
    fn is_empty(&self) -> bool {
        self.block_count() == 0
    }

    /// Returns true if `id` has been allocated.
    fn valid(&self, id: BlockId) -> bool {
        id.0 < self.block_count()
    }

    /// Allocates a new zeroed block at the end of the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot grow.
    fn allocate(&mut self) -> StorageResult<Block>;

    /// Reads a block.
    ///
    /// # Errors
    ///
    /// Returns `NoSuchBlock` for unallocated ids, or an I/O error.
    fn read(&self, id: BlockId) -> StorageResult<Block>;

    /// Overwrites an allocated block.
    ///
    /// # Errors
    ///
    /// Returns `BlockSize` if the buffer has the wrong length, `NoSuchBlock`
    /// for unallocated ids, or an I/O error.
    fn write(&mut self, block: &Block) -> StorageResult<()>;

    /// Makes all written blocks durable.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync fails.
    fn sync(&mut self) -> StorageResult<()>;

    /// Flushes and releases the store.
    ///
    /// # Errors
    ///
    /// Returns an error if pending blocks cannot be written.
    fn close(&mut self) -> StorageResult<()> {
        self.sync()
    }
}

pub(crate) fn check_block(
    label: &str,
    block: &Block,
    block_size: usize,
    count: u64,
) -> StorageResult<()> {
    if block.data().len() != block_size {
        return Err(StorageError::BlockSize {
            expected: block_size,
            actual: block.data().len(),
        });
    }
    check_id(label, block.id(), count)
}

pub(crate) fn check_id(label: &str, id: BlockId, count: u64) -> StorageResult<()> {
    if id.0 >= count {
        return Err(StorageError::NoSuchBlock {
            label: label.to_string(),
            id: id.0,
            count,
        });
    }
    Ok(())
}
