//! # RangeDB Core
//!
//! Index construction for RangeDB.
//!
//! This crate provides:
//! - [`IndexParams`] and [`RecordFactory`], the inputs to every build
//! - Order computation and validation for B+Trees
//! - Block store builders, including a caching decorator
//! - Object file builders for memory and disk locations
//! - Range index and index builders, and the [`Builders`] chain tying them together
//!
//! ## Example
//!
//! ```rust
//! use rangedb_core::{Builders, IndexParams, RangeIndex, RecordFactory};
//! use rangedb_storage::StorageLocation;
//!
//! let builders = Builders::standard();
//! let location = StorageLocation::mem("SPO");
//! let record = RecordFactory::new(20, 0).unwrap();
//! let params = IndexParams::new().block_size(8192);
//!
//! let index = builders
//!     .range_index_builder()
//!     .build_range_index(&location, record, &params)
//!     .unwrap();
//! assert_eq!(index.order(), 170);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod bptree;
mod config;
mod error;
mod index;
pub mod names;
mod record;
pub mod setup;

pub use bptree::{BPlusTree, BPlusTreeParams};
pub use config::{IndexParams, DEFAULT_BLOCK_SIZE, DEFAULT_READ_CACHE_SIZE, DEFAULT_WRITE_CACHE_SIZE};
pub use error::{ConfigError, CoreError, CoreResult};
pub use index::{Index, RangeIndex};
pub use record::RecordFactory;
pub use setup::{
    BlockStoreBuilder, Builders, CachingBlockStoreBuilder, IndexBuilder, ObjectFileBuilder,
    RangeIndexBuilder, StdBlockStoreBuilder, StdIndexBuilder, StdObjectFileBuilder,
    StdRangeIndexBuilder,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
