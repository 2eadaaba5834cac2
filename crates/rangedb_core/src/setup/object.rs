//! Object file builders.

use crate::error::CoreResult;
use rangedb_storage::{DiskObjectFile, MemObjectFile, ObjectFile, StorageLocation};
use tracing::debug;

/// Builds the object file for one purpose tag at a location.
pub trait ObjectFileBuilder: Send + Sync {
    /// Opens the object file for `ext` at `location`.
    ///
    /// # Errors
    ///
    /// Returns `StorageUnavailable` if the file cannot be opened.
    fn build_object_file(
        &self,
        location: &StorageLocation,
        ext: &str,
    ) -> CoreResult<Box<dyn ObjectFile>>;
}

/// Memory-backed object files for memory locations, disk files otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdObjectFileBuilder;

impl StdObjectFileBuilder {
    /// Creates the builder.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ObjectFileBuilder for StdObjectFileBuilder {
    fn build_object_file(
        &self,
        location: &StorageLocation,
        ext: &str,
    ) -> CoreResult<Box<dyn ObjectFile>> {
        let filename = location.filename(ext);
        match location.path(ext) {
            None => {
                debug!("Creating memory object file {}", filename);
                Ok(Box::new(MemObjectFile::mem(filename)))
            }
            Some(path) => {
                debug!("Opening object file {}", filename);
                Ok(Box::new(DiskObjectFile::open(&path)?))
            }
        }
    }
}
