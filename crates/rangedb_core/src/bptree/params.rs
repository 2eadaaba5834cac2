//! B+Tree shape parameters.
//!
//! A node block of order `N` holds a fixed header, `2N - 1` keys and `2N`
//! child pointers:
//!
//! ```text
//! | header (8) | key * (2N-1) | ptr * 2N |
//! ```
//!
//! Record blocks hold an 8-byte header followed by whole records.

use crate::error::{ConfigError, CoreResult};
use crate::record::RecordFactory;

/// Bytes at the start of every node block.
pub const BLOCK_HEADER_SIZE: usize = 8;

/// Bytes at the start of every record block.
pub const RECORD_BLOCK_HEADER_SIZE: usize = 8;

/// Bytes per child pointer.
pub const POINTER_SIZE: usize = 4;

/// Smallest order that makes a usable tree.
pub const MIN_ORDER: u32 = 2;

/// Order and record layout of one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BPlusTreeParams {
    order: u32,
    record_factory: RecordFactory,
}

impl BPlusTreeParams {
    /// Creates tree parameters.
    #[must_use]
    pub fn new(order: u32, record_factory: RecordFactory) -> Self {
        Self {
            order,
            record_factory,
        }
    }

    /// The largest order whose node fits in `block_size` bytes.
    ///
    /// Deterministic and non-decreasing in `block_size`. May return less
    /// than [`MIN_ORDER`]; use [`checked_order`](Self::checked_order) to
    /// reject that.
    #[must_use]
    pub fn calc_order(block_size: u32, record_length: usize) -> u32 {
        let usable = (block_size as usize).saturating_sub(BLOCK_HEADER_SIZE);
        let order = (usable + record_length) / (2 * (record_length + POINTER_SIZE));
        u32::try_from(order).unwrap_or(u32::MAX)
    }

    /// [`calc_order`](Self::calc_order), failing when the node would be degenerate.
    ///
    /// # Errors
    ///
    /// Returns `BlockTooSmall` if the order would be below [`MIN_ORDER`].
    pub fn checked_order(block_size: u32, record_length: usize) -> CoreResult<u32> {
        let order = Self::calc_order(block_size, record_length);
        if order < MIN_ORDER {
            return Err(ConfigError::BlockTooSmall {
                block_size,
                record_length,
            }
            .into());
        }
        Ok(order)
    }

    /// Branching factor.
    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Layout of the stored records.
    #[must_use]
    pub fn record_factory(&self) -> &RecordFactory {
        &self.record_factory
    }

    /// Most child pointers in a node.
    #[must_use]
    pub fn max_ptrs(&self) -> usize {
        2 * self.order as usize
    }

    /// Fewest child pointers in a non-root node.
    #[must_use]
    pub fn min_ptrs(&self) -> usize {
        self.order as usize
    }

    /// Most keys in a node.
    #[must_use]
    pub fn max_recs(&self) -> usize {
        self.max_ptrs() - 1
    }

    /// Fewest keys in a non-root node.
    #[must_use]
    pub fn min_recs(&self) -> usize {
        self.min_ptrs() - 1
    }

    /// Bytes a node of this order needs.
    #[must_use]
    pub fn node_size(&self) -> usize {
        BLOCK_HEADER_SIZE
            + self.max_recs() * self.record_factory.record_length()
            + self.max_ptrs() * POINTER_SIZE
    }

    /// Offset of the first child pointer within a node block.
    #[must_use]
    pub fn pointer_offset(&self) -> usize {
        BLOCK_HEADER_SIZE + self.max_recs() * self.record_factory.record_length()
    }

    /// Records that fit in one record block of `block_size` bytes.
    #[must_use]
    pub fn records_per_block(&self, block_size: usize) -> usize {
        block_size.saturating_sub(RECORD_BLOCK_HEADER_SIZE) / self.record_factory.record_length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn params(order: u32, record_length: usize) -> BPlusTreeParams {
        BPlusTreeParams::new(order, RecordFactory::new(record_length, 0).unwrap())
    }

    #[test]
    fn order_for_common_block() {
        assert_eq!(BPlusTreeParams::calc_order(8192, 20), 170);
        assert_eq!(BPlusTreeParams::calc_order(8192, 24), 146);
    }

    #[test]
    fn derived_sizes() {
        let p = params(170, 20);
        assert_eq!(p.max_ptrs(), 340);
        assert_eq!(p.max_recs(), 339);
        assert_eq!(p.min_ptrs(), 170);
        assert_eq!(p.min_recs(), 169);
        assert_eq!(p.node_size(), 8 + 339 * 20 + 340 * 4);
        assert_eq!(p.records_per_block(8192), 409);
    }

    #[test]
    fn tiny_block_is_rejected() {
        // Order 2 needs 8 + 3 * 20 + 4 * 4 = 84 bytes.
        assert_eq!(BPlusTreeParams::checked_order(84, 20).unwrap(), 2);
        assert!(BPlusTreeParams::checked_order(83, 20).is_err());
        assert!(BPlusTreeParams::checked_order(0, 20).is_err());
    }

    proptest! {
        #[test]
        fn computed_node_fits_block(block_size in 0u32..200_000, record_length in 1usize..512) {
            let order = BPlusTreeParams::calc_order(block_size, record_length);
            if order >= MIN_ORDER {
                prop_assert!(params(order, record_length).node_size() <= block_size as usize);
                prop_assert!(params(order + 1, record_length).node_size() > block_size as usize);
            }
        }

        #[test]
        fn order_is_monotonic(block_size in 0u32..200_000, extra in 0u32..10_000, record_length in 1usize..512) {
            prop_assert!(
                BPlusTreeParams::calc_order(block_size, record_length)
                    <= BPlusTreeParams::calc_order(block_size + extra, record_length)
            );
        }
    }
}
