//! Append-only files of variable-length objects.
//!
//! Each object is stored as a 4-byte big-endian length followed by its
//! bytes. The id of an object is the offset of its length prefix.
//!
//! ```text
//! | len (4) | bytes (len) | len (4) | bytes (len) | ...
//! ```

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use crate::file::FileBackend;
use crate::memory::InMemoryBackend;
use std::fmt;
use std::path::Path;

/// Size of the length prefix in front of every object.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Where an object file keeps its bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backing {
    /// In memory; gone when the file is dropped.
    Memory,
    /// In a file on disk.
    Disk,
}

impl fmt::Display for Backing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory"),
            Self::Disk => f.write_str("disk"),
        }
    }
}

/// Variable-length object storage addressed by id.
pub trait ObjectFile: Send + Sync {
    /// Name the file was opened under.
    fn label(&self) -> &str;

    /// Where the bytes live.
    fn backing(&self) -> Backing;

    /// Appends an object, returning its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the object is larger than `u32::MAX` bytes or the
    /// append fails.
    fn write(&mut self, bytes: &[u8]) -> StorageResult<u64>;

    /// Reads the object with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` does not point at an object.
    fn read(&self, id: u64) -> StorageResult<Vec<u8>>;

    /// Total size in bytes, which is also the id of the next object.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn len(&self) -> StorageResult<u64>;

    /// Returns true if nothing has been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Every object in write order, with its id.
    ///
    /// # Errors
    ///
    /// Returns `Corrupted` if a length prefix runs past the end.
    fn all(&self) -> StorageResult<Vec<(u64, Vec<u8>)>>;

    /// Discards `id` and every object written after it.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is past the end or truncation fails.
    fn truncate(&mut self, id: u64) -> StorageResult<()>;

    /// Makes all written objects durable.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync fails.
    fn sync(&mut self) -> StorageResult<()>;
}

/// An object file over any [`StorageBackend`].
#[derive(Debug)]
pub struct BackendObjectFile<B: StorageBackend> {
    label: String,
    backend: B,
    backing: Backing,
}

/// Object file held in memory.
pub type MemObjectFile = BackendObjectFile<InMemoryBackend>;

/// Object file stored on disk.
pub type DiskObjectFile = BackendObjectFile<FileBackend>;

impl MemObjectFile {
    /// Creates an empty in-memory object file.
    pub fn mem(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            backend: InMemoryBackend::new(),
            backing: Backing::Memory,
        }
    }
}

impl DiskObjectFile {
    /// Opens or creates an object file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open(path: &Path) -> StorageResult<Self> {
        Ok(Self {
            label: path.display().to_string(),
            backend: FileBackend::open_with_create_dirs(path)?,
            backing: Backing::Disk,
        })
    }
}

impl<B: StorageBackend> BackendObjectFile<B> {
    fn read_len(&self, id: u64) -> StorageResult<usize> {
        let prefix = self.backend.read_at(id, LENGTH_PREFIX_SIZE)?;
        let mut len = [0u8; LENGTH_PREFIX_SIZE];
        len.copy_from_slice(&prefix);
        Ok(u32::from_be_bytes(len) as usize)
    }
}

impl<B: StorageBackend> ObjectFile for BackendObjectFile<B> {
    fn label(&self) -> &str {
        &self.label
    }

    fn backing(&self) -> Backing {
        self.backing
    }

    fn write(&mut self, bytes: &[u8]) -> StorageResult<u64> {
        let len = u32::try_from(bytes.len()).map_err(|_| {
            StorageError::invalid_input(format!("object of {} bytes is too large", bytes.len()))
        })?;

        let mut record = Vec::with_capacity(LENGTH_PREFIX_SIZE + bytes.len());
        record.extend_from_slice(&len.to_be_bytes());
        record.extend_from_slice(bytes);
        self.backend.append(&record)
    }

    fn read(&self, id: u64) -> StorageResult<Vec<u8>> {
        let len = self.read_len(id)?;
        self.backend.read_at(id + LENGTH_PREFIX_SIZE as u64, len)
    }

    fn len(&self) -> StorageResult<u64> {
        self.backend.size()
    }

    fn all(&self) -> StorageResult<Vec<(u64, Vec<u8>)>> {
        let size = self.backend.size()?;
        let mut objects = Vec::new();
        let mut id = 0u64;

        while id < size {
            let len = self.read_len(id).map_err(|_| {
                StorageError::corrupted(format!("{}: torn length prefix at {id}", self.label))
            })?;
            let start = id + LENGTH_PREFIX_SIZE as u64;
            if start + len as u64 > size {
                return Err(StorageError::corrupted(format!(
                    "{}: object at {id} runs past end ({len} bytes)",
                    self.label
                )));
            }
            objects.push((id, self.backend.read_at(start, len)?));
            id = start + len as u64;
        }

        Ok(objects)
    }

    fn truncate(&mut self, id: u64) -> StorageResult<()> {
        self.backend.truncate(id)
    }

    fn sync(&mut self) -> StorageResult<()> {
        self.backend.flush()?;
        self.backend.sync()
    }
}
