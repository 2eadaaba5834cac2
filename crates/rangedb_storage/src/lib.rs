//! # RangeDB Storage
//!
//! Storage primitives underneath RangeDB indexes.
//!
//! This crate provides:
//! - Byte backends ([`InMemoryBackend`], [`FileBackend`]) behind [`StorageBackend`]
//! - [`StorageLocation`], a named area that is either transient or on disk
//! - Fixed-size [`BlockStore`]s, with an optional LRU caching layer
//! - Append-only [`ObjectFile`]s of variable-length objects
//!
//! Nothing here decides *whether* to cache or which backing to use for a
//! location; that is the job of the builders in `rangedb_core`.
//!
//! ## Example
//!
//! ```rust
//! use rangedb_storage::{BlockStoreFactory, FileMode, StorageLocation};
//!
//! let location = StorageLocation::mem("SPO");
//! let mut store = BlockStoreFactory::create(&location, "idn", 4096, FileMode::Direct).unwrap();
//! let block = store.allocate().unwrap();
//! assert_eq!(block.data().len(), 4096);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
pub mod block;
mod error;
mod file;
mod location;
mod memory;
pub mod object;

pub use backend::StorageBackend;
pub use block::{
    Block, BlockId, BlockStore, BlockStoreFactory, BlockStoreKind, CacheStats, CachedBlockStore,
    FileMode, PagedBlockStore,
};
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use location::StorageLocation;
pub use memory::InMemoryBackend;
pub use object::{Backing, BackendObjectFile, DiskObjectFile, MemObjectFile, ObjectFile};
