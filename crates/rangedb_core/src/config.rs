//! Index parameters.

use rangedb_storage::FileMode;

/// Default block size in bytes.
pub const DEFAULT_BLOCK_SIZE: u32 = 8 * 1024;

/// Default read cache size in blocks.
pub const DEFAULT_READ_CACHE_SIZE: usize = 10_000;

/// Default write cache size in blocks.
pub const DEFAULT_WRITE_CACHE_SIZE: usize = 2_000;

/// Parameters for building one index.
///
/// Passed by reference into every builder call and never modified by them,
/// so one value can be shared by concurrent builds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexParams {
    /// Block size in bytes, `None` if not specified.
    pub block_size: Option<u32>,

    /// Tree order, `None` to derive it from the block size.
    pub order: Option<u32>,

    /// Read cache size in blocks (0 = disabled).
    pub read_cache_size: usize,

    /// Write cache size in blocks (0 = disabled).
    pub write_cache_size: usize,

    /// How file-backed blocks are accessed.
    pub file_mode: FileMode,
}

impl Default for IndexParams {
    fn default() -> Self {
        Self {
            block_size: Some(DEFAULT_BLOCK_SIZE),
            order: None,
            read_cache_size: DEFAULT_READ_CACHE_SIZE,
            write_cache_size: DEFAULT_WRITE_CACHE_SIZE,
            file_mode: FileMode::Mapped,
        }
    }
}

impl IndexParams {
    /// Creates parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the block size.
    #[must_use]
    pub const fn block_size(mut self, size: u32) -> Self {
        self.block_size = Some(size);
        self
    }

    /// Clears the block size.
    #[must_use]
    pub const fn without_block_size(mut self) -> Self {
        self.block_size = None;
        self
    }

    /// Sets the tree order.
    #[must_use]
    pub const fn order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    /// Sets the read cache size.
    #[must_use]
    pub const fn read_cache_size(mut self, size: usize) -> Self {
        self.read_cache_size = size;
        self
    }

    /// Sets the write cache size.
    #[must_use]
    pub const fn write_cache_size(mut self, size: usize) -> Self {
        self.write_cache_size = size;
        self
    }

    /// Sets the file mode.
    #[must_use]
    pub const fn file_mode(mut self, mode: FileMode) -> Self {
        self.file_mode = mode;
        self
    }

    /// Returns true if either cache is enabled.
    #[must_use]
    pub const fn has_cache(&self) -> bool {
        self.read_cache_size > 0 || self.write_cache_size > 0
    }
}
