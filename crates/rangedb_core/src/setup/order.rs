//! Reconciling block size and order.

use crate::bptree::BPlusTreeParams;
use crate::error::{ConfigError, CoreResult};

/// Works out the tree order for a build.
///
/// Rules, first match wins:
///
/// 1. No block size: rejected, even when an order is given.
/// 2. No block size and no order: rejected.
/// 3. Block size only: the order is computed from it.
/// 4. Both: the supplied order must equal the computed one.
///
/// The returned order always equals
/// [`BPlusTreeParams::calc_order`]`(block_size, record_length)` and is at
/// least [`MIN_ORDER`](crate::bptree::MIN_ORDER).
///
/// # Errors
///
/// Returns an `InvalidConfiguration` error describing the first rule that failed.
pub fn validate_order(
    block_size: Option<u32>,
    order: Option<u32>,
    record_length: usize,
) -> CoreResult<u32> {
    match (block_size, order) {
        // An order on its own would be enough to size the nodes, but that
        // mode has never been accepted.
        (None, Some(order)) => Err(ConfigError::BlockSizeUnspecified { order }.into()),
        (None, None) => Err(ConfigError::NeitherSpecified.into()),
        (Some(block_size), None) => BPlusTreeParams::checked_order(block_size, record_length),
        (Some(block_size), Some(order)) => {
            let calculated = BPlusTreeParams::checked_order(block_size, record_length)?;
            if order != calculated {
                return Err(ConfigError::OrderMismatch { order, calculated }.into());
            }
            Ok(order)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use proptest::prelude::*;

    fn config_error(result: CoreResult<u32>) -> ConfigError {
        match result {
            Err(CoreError::InvalidConfiguration(err)) => err,
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn block_size_alone_computes_order() {
        assert_eq!(validate_order(Some(8192), None, 20).unwrap(), 170);
    }

    #[test]
    fn matching_order_is_kept() {
        assert_eq!(validate_order(Some(8192), Some(170), 20).unwrap(), 170);
    }

    #[test]
    fn mismatched_order_is_rejected() {
        assert_eq!(
            config_error(validate_order(Some(8192), Some(171), 20)),
            ConfigError::OrderMismatch {
                order: 171,
                calculated: 170
            }
        );
    }

    #[test]
    fn order_without_block_size_is_rejected() {
        assert_eq!(
            config_error(validate_order(None, Some(170), 20)),
            ConfigError::BlockSizeUnspecified { order: 170 }
        );
    }

    #[test]
    fn nothing_specified_is_rejected() {
        let err = config_error(validate_order(None, None, 20));
        assert_eq!(err, ConfigError::NeitherSpecified);
        assert_eq!(err.to_string(), "neither block size nor order specified");
    }

    #[test]
    fn degenerate_order_is_rejected() {
        assert!(matches!(
            config_error(validate_order(Some(64), None, 20)),
            ConfigError::BlockTooSmall { block_size: 64, record_length: 20 }
        ));
    }

    proptest! {
        #[test]
        fn validated_order_matches_calculation(
            block_size in 0u32..65_536,
            order in 0u32..2_000,
            record_length in 1usize..256,
        ) {
            let calculated = BPlusTreeParams::calc_order(block_size, record_length);
            match validate_order(Some(block_size), Some(order), record_length) {
                Ok(validated) => {
                    prop_assert_eq!(validated, calculated);
                    prop_assert_eq!(validated, order);
                }
                Err(_) => prop_assert!(order != calculated || calculated < 2),
            }
        }

        #[test]
        fn unspecified_order_always_uses_calculation(
            block_size in 0u32..65_536,
            record_length in 1usize..256,
        ) {
            let calculated = BPlusTreeParams::calc_order(block_size, record_length);
            match validate_order(Some(block_size), None, record_length) {
                Ok(validated) => prop_assert_eq!(validated, calculated),
                Err(_) => prop_assert!(calculated < 2),
            }
        }
    }
}
