//! Blocks laid end to end over a byte backend.

use super::{check_block, check_id, Block, BlockId, BlockStore, BlockStoreKind};
use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};

/// A block store over a [`StorageBackend`].
///
/// Block `i` occupies bytes `i * block_size .. (i + 1) * block_size`.
/// No caching; every read and write goes to the backend.
#[derive(Debug)]
pub struct PagedBlockStore<B: StorageBackend> {
    label: String,
    backend: B,
    block_size: usize,
    count: u64,
    kind: BlockStoreKind,
}

impl<B: StorageBackend> PagedBlockStore<B> {
    /// Wraps a backend, picking up any blocks it already holds.
    ///
    /// # Errors
    ///
    /// Returns `Corrupted` if the backend size is not a whole number of
    /// blocks, or an error if the size cannot be read.
    pub fn new(
        label: impl Into<String>,
        backend: B,
        block_size: usize,
        kind: BlockStoreKind,
    ) -> StorageResult<Self> {
        let label = label.into();
        if block_size == 0 {
            return Err(StorageError::BlockSize {
                expected: 1,
                actual: 0,
            });
        }

        let size = backend.size()?;
        if size % block_size as u64 != 0 {
            return Err(StorageError::corrupted(format!(
                "{label}: size {size} is not a multiple of block size {block_size}"
            )));
        }

        Ok(Self {
            label,
            count: size / block_size as u64,
            backend,
            block_size,
            kind,
        })
    }

    /// The backend underneath.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: StorageBackend> BlockStore for PagedBlockStore<B> {
    fn label(&self) -> &str {
        &self.label
    }

    fn kind(&self) -> BlockStoreKind {
        self.kind
    }

    fn block_size(&self) -> usize {
        self.block_size
    }

    fn block_count(&self) -> u64 {
        self.count
    }

    fn allocate(&mut self) -> StorageResult<Block> {
        let data = vec![0u8; self.block_size];
        let offset = self.backend.append(&data)?;
        let id = BlockId(offset / self.block_size as u64);
        self.count += 1;
        Ok(Block::new(id, data))
    }

    fn read(&self, id: BlockId) -> StorageResult<Block> {
        check_id(&self.label, id, self.count)?;
        let data = self
            .backend
            .read_at(id.offset(self.block_size), self.block_size)?;
        Ok(Block::new(id, data))
    }

    fn write(&mut self, block: &Block) -> StorageResult<()> {
        check_block(&self.label, block, self.block_size, self.count)?;
        self.backend
            .write_at(block.id().offset(self.block_size), block.data())
    }

    fn sync(&mut self) -> StorageResult<()> {
        self.backend.flush()?;
        self.backend.sync()
    }
}
