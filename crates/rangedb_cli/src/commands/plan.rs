//! Plan command implementation.

use rangedb_core::bptree::BPlusTreeParams;
use rangedb_core::setup::validate_order;
use rangedb_core::{CoreResult, RecordFactory};
use serde::Serialize;

/// Geometry of an index that would be built with the given settings.
#[derive(Debug, Serialize)]
pub struct PlanResult {
    /// Block size in bytes.
    pub block_size: u32,
    /// Record length in bytes.
    pub record_length: usize,
    /// Validated tree order.
    pub order: u32,
    /// Most keys in a node.
    pub max_keys: usize,
    /// Most child pointers in a node.
    pub max_pointers: usize,
    /// Bytes a node occupies.
    pub node_size: usize,
    /// Records held by one record block.
    pub records_per_block: usize,
}

/// Validates the settings and derives the node layout.
pub fn plan(block_size: u32, record_length: usize, order: Option<u32>) -> CoreResult<PlanResult> {
    let record_factory = RecordFactory::new(record_length, 0)?;
    let order = validate_order(Some(block_size), order, record_length)?;
    let params = BPlusTreeParams::new(order, record_factory);

    Ok(PlanResult {
        block_size,
        record_length,
        order,
        max_keys: params.max_recs(),
        max_pointers: params.max_ptrs(),
        node_size: params.node_size(),
        records_per_block: params.records_per_block(block_size as usize),
    })
}

/// Runs the plan command.
pub fn run(
    block_size: u32,
    record_length: usize,
    order: Option<u32>,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = plan(block_size, record_length, order)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

fn print_text_output(result: &PlanResult) {
    println!("RangeDB Index Plan");
    println!("==================");
    println!();
    println!("Block size:    {} bytes", result.block_size);
    println!("Record length: {} bytes", result.record_length);
    println!();
    println!("Nodes:");
    println!("  Order:         {}", result.order);
    println!("  Max keys:      {}", result.max_keys);
    println!("  Max pointers:  {}", result.max_pointers);
    println!("  Node size:     {} bytes", result.node_size);
    println!();
    println!("Records:");
    println!("  Per block:     {}", result.records_per_block);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rangedb_core::{ConfigError, CoreError};

    #[test]
    fn plan_from_block_size() {
        let result = plan(8192, 20, None).unwrap();
        assert_eq!(result.order, 170);
        assert_eq!(result.max_keys, 339);
        assert_eq!(result.max_pointers, 340);
        assert!(result.node_size <= 8192);
        assert_eq!(result.records_per_block, 409);
    }

    #[test]
    fn plan_rejects_wrong_order() {
        let err = plan(8192, 20, Some(100)).unwrap_err();
        assert_eq!(
            err.config_error(),
            Some(&ConfigError::OrderMismatch {
                order: 100,
                calculated: 170
            })
        );
    }

    #[test]
    fn plan_rejects_zero_record_length() {
        let err = plan(8192, 0, None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfiguration(_)));
    }

    #[test]
    fn plan_rejects_block_too_small() {
        let err = plan(64, 20, None).unwrap_err();
        assert!(matches!(
            err.config_error(),
            Some(ConfigError::BlockTooSmall { block_size: 64, record_length: 20 })
        ));
    }

    #[test]
    fn plan_serializes_every_field() {
        let json = serde_json::to_value(plan(4096, 24, None).unwrap()).unwrap();
        assert_eq!(json["block_size"], 4096);
        assert_eq!(json["order"], 73);
        assert_eq!(json["records_per_block"], 170);
    }
}
