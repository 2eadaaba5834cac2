//! Index traits handed back by the builders.

use crate::bptree::BPlusTreeParams;
use crate::error::CoreResult;
use crate::record::RecordFactory;
use rangedb_storage::BlockStore;

/// An index over fixed-length records.
pub trait Index: Send + Sync {
    /// Layout of the records this index holds.
    fn record_factory(&self) -> &RecordFactory;

    /// Returns true if the index holds no records.
    ///
    /// # Errors
    ///
    /// Returns an error if the root cannot be read.
    fn is_empty(&self) -> CoreResult<bool>;

    /// Makes all changes durable.
    ///
    /// # Errors
    ///
    /// Returns an error if either store fails to sync.
    fn sync(&mut self) -> CoreResult<()>;

    /// Flushes and releases the underlying stores.
    ///
    /// # Errors
    ///
    /// Returns an error if either store fails to close.
    fn close(&mut self) -> CoreResult<()>;
}

/// An ordered index that supports range scans.
pub trait RangeIndex: Index {
    /// Shape of the tree.
    fn params(&self) -> &BPlusTreeParams;

    /// Branching factor of the tree.
    fn order(&self) -> u32 {
        self.params().order()
    }

    /// Store holding internal nodes.
    fn node_store(&self) -> &dyn BlockStore;

    /// Store holding records.
    fn record_store(&self) -> &dyn BlockStore;
}
