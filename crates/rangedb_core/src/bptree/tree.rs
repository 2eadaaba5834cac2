//! Assembling a B+Tree over its two block stores.

use super::params::BPlusTreeParams;
use crate::error::{ConfigError, CoreError, CoreResult};
use crate::index::{Index, RangeIndex};
use crate::record::RecordFactory;
use rangedb_storage::{Block, BlockId, BlockStore};
use tracing::debug;

/// Root node lives in the first node block.
const ROOT: BlockId = BlockId(0);

/// First record block, where an empty tree's root leaf points.
const FIRST_RECORDS: BlockId = BlockId(0);

/// High bit of the node count marks a leaf node.
const LEAF_FLAG: u32 = 1 << 31;

/// Record block link meaning "no next block".
const NO_LINK: u32 = u32::MAX;

/// A B+Tree with nodes and records in separate block stores.
pub struct BPlusTree {
    params: BPlusTreeParams,
    nodes: Box<dyn BlockStore>,
    records: Box<dyn BlockStore>,
}

impl BPlusTree {
    /// Builds a tree over the given stores.
    ///
    /// Empty stores are formatted with an empty root leaf; stores that
    /// already hold a tree are attached after checking the stored order.
    ///
    /// # Errors
    ///
    /// Returns `BlockTooSmall` if a node does not fit a node block,
    /// `InvalidFormat` if existing stores hold a different tree, or a
    /// storage error.
    pub fn create(
        params: BPlusTreeParams,
        mut nodes: Box<dyn BlockStore>,
        mut records: Box<dyn BlockStore>,
    ) -> CoreResult<Self> {
        let record_length = params.record_factory().record_length();
        if params.node_size() > nodes.block_size() || params.records_per_block(records.block_size()) == 0 {
            return Err(ConfigError::BlockTooSmall {
                block_size: u32::try_from(nodes.block_size()).unwrap_or(u32::MAX),
                record_length,
            }
            .into());
        }

        if nodes.is_empty() {
            debug!(
                "Formatting tree of order {} in {} / {}",
                params.order(),
                nodes.label(),
                records.label()
            );
            format_empty(&params, nodes.as_mut(), records.as_mut())?;
        } else {
            debug!("Attaching to tree in {}", nodes.label());
            check_existing(&params, nodes.as_ref(), records.as_ref())?;
        }

        Ok(Self {
            params,
            nodes,
            records,
        })
    }

    /// Id of the root node block.
    #[must_use]
    pub fn root_id(&self) -> BlockId {
        ROOT
    }

    fn read_root(&self) -> CoreResult<NodeHeader> {
        let root = self.nodes.read(ROOT)?;
        Ok(NodeHeader::decode(root.data()))
    }
}

fn format_empty(
    params: &BPlusTreeParams,
    nodes: &mut dyn BlockStore,
    records: &mut dyn BlockStore,
) -> CoreResult<()> {
    let mut leaf = records.allocate()?;
    write_u32(leaf.data_mut(), 0, 0);
    write_u32(leaf.data_mut(), 4, NO_LINK);
    records.write(&leaf)?;

    let mut root = nodes.allocate()?;
    NodeHeader {
        count: 0,
        leaf: true,
        order: params.order(),
    }
    .encode(root.data_mut());
    write_u32(
        root.data_mut(),
        params.pointer_offset(),
        u32::try_from(leaf.id().0).map_err(|_| CoreError::invalid_format("record block id overflow"))?,
    );
    nodes.write(&root)?;

    Ok(())
}

fn check_existing(
    params: &BPlusTreeParams,
    nodes: &dyn BlockStore,
    records: &dyn BlockStore,
) -> CoreResult<()> {
    let root: Block = nodes.read(ROOT)?;
    let header = NodeHeader::decode(root.data());
    if header.order != params.order() {
        return Err(CoreError::invalid_format(format!(
            "{} holds a tree of order {}, expected {}",
            nodes.label(),
            header.order,
            params.order()
        )));
    }
    if !records.valid(FIRST_RECORDS) {
        return Err(CoreError::invalid_format(format!(
            "{} has a root but {} has no record blocks",
            nodes.label(),
            records.label()
        )));
    }
    Ok(())
}

/// First bytes of every node block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeHeader {
    count: u32,
    leaf: bool,
    order: u32,
}

impl NodeHeader {
    fn encode(&self, buf: &mut [u8]) {
        let flag = if self.leaf { LEAF_FLAG } else { 0 };
        write_u32(buf, 0, self.count | flag);
        write_u32(buf, 4, self.order);
    }

    fn decode(buf: &[u8]) -> Self {
        let raw = read_u32(buf, 0);
        Self {
            count: raw & !LEAF_FLAG,
            leaf: raw & LEAF_FLAG != 0,
            order: read_u32(buf, 4),
        }
    }
}

fn write_u32(buf: &mut [u8], at: usize, value: u32) {
    buf[at..at + 4].copy_from_slice(&value.to_be_bytes());
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[at..at + 4]);
    u32::from_be_bytes(bytes)
}

impl Index for BPlusTree {
    fn record_factory(&self) -> &RecordFactory {
        self.params.record_factory()
    }

    fn is_empty(&self) -> CoreResult<bool> {
        let root = self.read_root()?;
        Ok(root.leaf && root.count == 0)
    }

    fn sync(&mut self) -> CoreResult<()> {
        self.nodes.sync()?;
        self.records.sync()?;
        Ok(())
    }

    fn close(&mut self) -> CoreResult<()> {
        self.nodes.close()?;
        self.records.close()?;
        Ok(())
    }
}

impl RangeIndex for BPlusTree {
    fn params(&self) -> &BPlusTreeParams {
        &self.params
    }

    fn node_store(&self) -> &dyn BlockStore {
        self.nodes.as_ref()
    }

    fn record_store(&self) -> &dyn BlockStore {
        self.records.as_ref()
    }
}

impl std::fmt::Debug for BPlusTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BPlusTree")
            .field("params", &self.params)
            .field("nodes", &self.nodes.label())
            .field("records", &self.records.label())
            .finish()
    }
}
