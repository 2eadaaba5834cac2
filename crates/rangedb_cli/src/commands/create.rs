//! Create command implementation.

use rangedb_core::{Builders, Index, IndexParams, RangeIndex, RecordFactory};
use rangedb_storage::{BlockStore, BlockStoreKind, StorageLocation};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// Summary of a built index.
#[derive(Debug, Serialize)]
pub struct CreateResult {
    /// Where the index lives.
    pub location: String,
    /// Tree order.
    pub order: u32,
    /// Record length in bytes.
    pub record_length: usize,
    /// Node block store.
    pub nodes: StoreSummary,
    /// Record block store.
    pub records: StoreSummary,
}

/// One block store of a built index.
#[derive(Debug, Serialize)]
pub struct StoreSummary {
    /// File name, or label for memory stores.
    pub file: String,
    /// What backs the store.
    pub kind: String,
    /// Whether a block cache sits in front of it.
    pub cached: bool,
    /// Blocks allocated so far.
    pub blocks: u64,
}

impl StoreSummary {
    fn of(store: &dyn BlockStore) -> Self {
        Self {
            file: store.label().to_string(),
            kind: store.kind().to_string(),
            cached: store.kind() == BlockStoreKind::Cached,
            blocks: store.block_count(),
        }
    }
}

/// Resolves the command line into a location.
pub fn location(
    path: Option<PathBuf>,
    name: &str,
    mem: bool,
) -> Result<StorageLocation, Box<dyn std::error::Error>> {
    if mem {
        return Ok(StorageLocation::mem(name));
    }
    let dir = path.ok_or("Index directory required unless --mem is given")?;
    Ok(StorageLocation::disk(dir, name))
}

/// Builds the index, syncs and closes it.
pub fn create(
    location: &StorageLocation,
    key_length: usize,
    value_length: usize,
    params: &IndexParams,
) -> Result<CreateResult, Box<dyn std::error::Error>> {
    let record_factory = RecordFactory::new(key_length, value_length)?;
    let builders = Builders::standard();
    let mut index = builders
        .range_index_builder()
        .build_range_index(location, record_factory, params)?;

    let result = CreateResult {
        location: location.to_string(),
        order: index.order(),
        record_length: record_factory.record_length(),
        nodes: StoreSummary::of(index.node_store()),
        records: StoreSummary::of(index.record_store()),
    };

    index.sync()?;
    index.close()?;
    info!("Created index at {}", location);
    Ok(result)
}

/// Runs the create command.
pub fn run(
    location: &StorageLocation,
    key_length: usize,
    value_length: usize,
    params: &IndexParams,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = create(location, key_length, value_length, params)?;

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

fn print_text_output(result: &CreateResult) {
    println!("RangeDB Index");
    println!("=============");
    println!();
    println!("Location:      {}", result.location);
    println!("Order:         {}", result.order);
    println!("Record length: {} bytes", result.record_length);
    println!();
    print_store("Nodes", &result.nodes);
    println!();
    print_store("Records", &result.records);
}

fn print_store(title: &str, store: &StoreSummary) {
    println!("{}:", title);
    println!("  File:   {}", store.file);
    println!("  Kind:   {}", store.kind);
    println!("  Blocks: {}", store.blocks);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rangedb_storage::FileMode;
    use tempfile::tempdir;

    #[test]
    fn location_requires_path_on_disk() {
        assert!(location(None, "SPO", false).is_err());
        assert!(location(None, "SPO", true).unwrap().is_mem());

        let loc = location(Some(PathBuf::from("/tmp/db")), "SPO", false).unwrap();
        assert!(!loc.is_mem());
        assert_eq!(loc.base(), "SPO");
    }

    #[test]
    fn create_on_disk() {
        let dir = tempdir().unwrap();
        let loc = StorageLocation::disk(dir.path(), "SPO");
        let params = IndexParams::new()
            .block_size(8192)
            .file_mode(FileMode::Direct);

        let result = create(&loc, 12, 8, &params).unwrap();

        assert_eq!(result.order, 170);
        assert_eq!(result.record_length, 20);
        assert!(result.nodes.cached);
        assert!(result.records.cached);
        assert_eq!(result.nodes.blocks, 1);
        assert!(dir.path().join("SPO.idn").exists());
        assert!(dir.path().join("SPO.dat").exists());
    }

    #[test]
    fn create_in_memory_is_uncached() {
        let loc = StorageLocation::mem("SPO");
        let result = create(&loc, 20, 0, &IndexParams::new()).unwrap();

        assert!(!result.nodes.cached);
        assert_eq!(result.nodes.kind, "memory");
        assert_eq!(result.nodes.file, "SPO.idn");
    }

    #[test]
    fn create_rejects_mismatched_order() {
        let loc = StorageLocation::mem("SPO");
        let params = IndexParams::new().block_size(8192).order(7);
        assert!(create(&loc, 20, 0, &params).is_err());
    }
}
