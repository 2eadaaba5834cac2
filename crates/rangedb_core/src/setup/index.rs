//! Index builders.

use super::block::BlockStoreBuilder;
use super::order::validate_order;
use crate::bptree::{BPlusTree, BPlusTreeParams};
use crate::config::IndexParams;
use crate::error::CoreResult;
use crate::index::{Index, RangeIndex};
use crate::names::{EXT_TREE_NODES, EXT_TREE_RECORDS};
use crate::record::RecordFactory;
use rangedb_storage::StorageLocation;
use std::sync::Arc;
use tracing::debug;

/// Builds an index of whatever kind suits the caller.
pub trait IndexBuilder: Send + Sync {
    /// Builds an index at `location`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for inconsistent parameters or
    /// `StorageUnavailable` if a store cannot be opened.
    fn build_index(
        &self,
        location: &StorageLocation,
        record_factory: RecordFactory,
        params: &IndexParams,
    ) -> CoreResult<Box<dyn Index>>;
}

/// Builds ordered indexes.
pub trait RangeIndexBuilder: Send + Sync {
    /// Builds a range index at `location`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for inconsistent parameters or
    /// `StorageUnavailable` if a store cannot be opened.
    fn build_range_index(
        &self,
        location: &StorageLocation,
        record_factory: RecordFactory,
        params: &IndexParams,
    ) -> CoreResult<Box<dyn RangeIndex>>;
}

/// Builds B+Trees with nodes and records in separate block stores.
///
/// The node and record builders are independent, so nodes can be cached
/// while records are not, or the other way round.
#[derive(Clone)]
pub struct StdRangeIndexBuilder {
    nodes: Arc<dyn BlockStoreBuilder>,
    records: Arc<dyn BlockStoreBuilder>,
}

impl StdRangeIndexBuilder {
    /// Creates a builder from the node and record block store builders.
    pub fn new(nodes: Arc<dyn BlockStoreBuilder>, records: Arc<dyn BlockStoreBuilder>) -> Self {
        Self { nodes, records }
    }

    /// Builds the tree itself.
    ///
    /// The order is settled before any store is opened, so a configuration
    /// error leaves nothing behind.
    ///
    /// # Errors
    ///
    /// See [`RangeIndexBuilder::build_range_index`].
    pub fn build_tree(
        &self,
        location: &StorageLocation,
        record_factory: RecordFactory,
        params: &IndexParams,
    ) -> CoreResult<BPlusTree> {
        let order = validate_order(
            params.block_size,
            params.order,
            record_factory.record_length(),
        )?;
        debug!(
            "Building range index at {} (order {}, record length {})",
            location,
            order,
            record_factory.record_length()
        );

        let tree_params = BPlusTreeParams::new(order, record_factory);
        let nodes = self
            .nodes
            .build_block_store(location, EXT_TREE_NODES, params)?;
        let records = self
            .records
            .build_block_store(location, EXT_TREE_RECORDS, params)?;
        BPlusTree::create(tree_params, nodes, records)
    }
}

impl RangeIndexBuilder for StdRangeIndexBuilder {
    fn build_range_index(
        &self,
        location: &StorageLocation,
        record_factory: RecordFactory,
        params: &IndexParams,
    ) -> CoreResult<Box<dyn RangeIndex>> {
        Ok(Box::new(self.build_tree(location, record_factory, params)?))
    }
}

impl std::fmt::Debug for StdRangeIndexBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdRangeIndexBuilder").finish_non_exhaustive()
    }
}

/// The entry point for building indexes.
///
/// Every index is currently a range index; this layer is where other kinds
/// would be chosen.
#[derive(Debug, Clone)]
pub struct StdIndexBuilder {
    range: StdRangeIndexBuilder,
}

impl StdIndexBuilder {
    /// Creates a builder from the node and record block store builders.
    pub fn new(nodes: Arc<dyn BlockStoreBuilder>, records: Arc<dyn BlockStoreBuilder>) -> Self {
        Self {
            range: StdRangeIndexBuilder::new(nodes, records),
        }
    }

    /// The range index builder this delegates to.
    #[must_use]
    pub fn range_index_builder(&self) -> &StdRangeIndexBuilder {
        &self.range
    }
}

impl IndexBuilder for StdIndexBuilder {
    fn build_index(
        &self,
        location: &StorageLocation,
        record_factory: RecordFactory,
        params: &IndexParams,
    ) -> CoreResult<Box<dyn Index>> {
        Ok(Box::new(self.range.build_tree(location, record_factory, params)?))
    }
}
