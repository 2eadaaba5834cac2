//! End-to-end tests for the builder chain.

use rangedb_core::names::{EXT_OBJECTS, EXT_TREE_NODES, EXT_TREE_RECORDS};
use rangedb_core::{
    BPlusTreeParams, BlockStoreBuilder, Builders, CachingBlockStoreBuilder, ConfigError,
    CoreError, Index, IndexParams, RangeIndex, RecordFactory, StdBlockStoreBuilder,
};
use rangedb_storage::{Backing, BlockStoreKind, FileMode, StorageLocation};
use std::sync::Arc;
use tempfile::tempdir;

fn record() -> RecordFactory {
    RecordFactory::new(20, 0).unwrap()
}

fn direct() -> IndexParams {
    IndexParams::new()
        .block_size(8192)
        .file_mode(FileMode::Direct)
}

#[test]
fn build_on_disk_with_computed_order() {
    let dir = tempdir().unwrap();
    let location = StorageLocation::disk(dir.path(), "SPO");
    let expected = BPlusTreeParams::calc_order(8192, 20);

    let mut index = Builders::standard()
        .range_index_builder()
        .build_range_index(&location, record(), &direct())
        .unwrap();

    assert_eq!(index.order(), expected);
    assert_eq!(index.node_store().label(), location.filename(EXT_TREE_NODES));
    assert_eq!(index.record_store().label(), location.filename(EXT_TREE_RECORDS));
    assert_eq!(index.node_store().kind(), BlockStoreKind::Cached);
    index.close().unwrap();

    assert!(dir.path().join("SPO.idn").exists());
    assert!(dir.path().join("SPO.dat").exists());
}

#[test]
fn off_by_one_order_is_rejected_before_any_file_exists() {
    let dir = tempdir().unwrap();
    let location = StorageLocation::disk(dir.path().join("db"), "SPO");
    let k = BPlusTreeParams::calc_order(8192, 20);

    let result = Builders::standard().index_builder().build_index(
        &location,
        record(),
        &direct().order(k + 1),
    );

    match result {
        Err(CoreError::InvalidConfiguration(ConfigError::OrderMismatch { order, calculated })) => {
            assert_eq!(order, k + 1);
            assert_eq!(calculated, k);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("mismatched order was accepted"),
    }
    assert!(!dir.path().join("db").exists());
}

#[test]
fn neither_block_size_nor_order() {
    let location = StorageLocation::mem("SPO");
    let params = IndexParams::new().without_block_size();

    let err = match Builders::standard()
        .index_builder()
        .build_index(&location, record(), &params)
    {
        Err(err) => err,
        Ok(_) => panic!("build without block size succeeded"),
    };
    assert_eq!(err.config_error(), Some(&ConfigError::NeitherSpecified));
    assert_eq!(
        err.to_string(),
        "invalid configuration: neither block size nor order specified"
    );
}

#[test]
fn transient_location_is_never_cached() {
    let location = StorageLocation::mem("SPO");
    let params = direct().read_cache_size(100).write_cache_size(100);

    let index = Builders::standard()
        .range_index_builder()
        .build_range_index(&location, record(), &params)
        .unwrap();

    assert_eq!(index.node_store().kind(), BlockStoreKind::Memory);
    assert_eq!(index.record_store().kind(), BlockStoreKind::Memory);
}

#[test]
fn mapped_mode_is_never_cached() {
    let dir = tempdir().unwrap();
    let location = StorageLocation::disk(dir.path(), "SPO");
    let params = direct()
        .file_mode(FileMode::Mapped)
        .read_cache_size(100);

    let index = Builders::standard()
        .range_index_builder()
        .build_range_index(&location, record(), &params)
        .unwrap();

    assert_eq!(index.node_store().kind(), BlockStoreKind::File(FileMode::Mapped));
}

#[test]
fn nodes_cached_records_not() {
    let dir = tempdir().unwrap();
    let location = StorageLocation::disk(dir.path(), "OSP");
    let plain: Arc<dyn BlockStoreBuilder> = Arc::new(StdBlockStoreBuilder::new());
    let cached: Arc<dyn BlockStoreBuilder> =
        Arc::new(CachingBlockStoreBuilder::new(plain.clone()));

    let index = Builders::new(cached, plain)
        .range_index_builder()
        .build_range_index(&location, record(), &direct().read_cache_size(10))
        .unwrap();

    assert_eq!(index.node_store().kind(), BlockStoreKind::Cached);
    assert_eq!(index.record_store().kind(), BlockStoreKind::File(FileMode::Direct));
}

#[test]
fn reopen_existing_index() {
    let dir = tempdir().unwrap();
    let location = StorageLocation::disk(dir.path(), "SPO");
    let builders = Builders::standard();

    {
        let mut index = builders
            .index_builder()
            .build_index(&location, record(), &direct())
            .unwrap();
        index.sync().unwrap();
        index.close().unwrap();
    }

    let index = builders
        .range_index_builder()
        .build_range_index(&location, record(), &direct())
        .unwrap();
    assert!(index.is_empty().unwrap());
    assert_eq!(index.node_store().block_count(), 1);

    // Same files, different record length: the stored order no longer fits.
    let wider = RecordFactory::new(40, 0).unwrap();
    let result = builders
        .range_index_builder()
        .build_range_index(&location, wider, &direct());
    assert!(matches!(result, Err(CoreError::InvalidFormat { .. })));
}

#[test]
fn unopenable_block_store_is_storage_unavailable() {
    let dir = tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"x").unwrap();
    let location = StorageLocation::disk(&blocker, "SPO");
    let builders = Builders::standard();

    let range = builders
        .range_index_builder()
        .build_range_index(&location, record(), &direct());
    assert!(matches!(range, Err(CoreError::StorageUnavailable(_))));

    let index = builders
        .index_builder()
        .build_index(&location, record(), &direct());
    assert!(matches!(index, Err(CoreError::StorageUnavailable(_))));
}

#[test]
fn object_file_follows_location() {
    let dir = tempdir().unwrap();
    let builders = Builders::standard();
    let builder = builders.object_file_builder();

    let mem = builder
        .build_object_file(&StorageLocation::mem("nodes"), EXT_OBJECTS)
        .unwrap();
    assert_eq!(mem.backing(), Backing::Memory);

    let disk_location = StorageLocation::disk(dir.path(), "nodes");
    let disk = builder.build_object_file(&disk_location, EXT_OBJECTS).unwrap();
    assert_eq!(disk.backing(), Backing::Disk);
    assert_eq!(disk.label(), disk_location.filename(EXT_OBJECTS));
}

#[test]
fn concurrent_builds_at_different_locations() {
    let builders = Arc::new(Builders::standard());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let builders = Arc::clone(&builders);
            std::thread::spawn(move || {
                let location = StorageLocation::mem(format!("index-{i}"));
                builders
                    .range_index_builder()
                    .build_range_index(&location, record(), &IndexParams::new())
                    .map(|index| index.order())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().unwrap(), 170);
    }
}
