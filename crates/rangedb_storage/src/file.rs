//! File-backed bytes for disk locations.

use crate::backend::{span, StorageBackend};
use crate::error::{StorageError, StorageResult};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// Handle and logical length, locked together so appends and reads agree.
#[derive(Debug)]
struct Handle {
    file: File,
    len: u64,
}

impl Handle {
    fn seek_to(&mut self, offset: u64) -> StorageResult<&mut File> {
        self.file.seek(SeekFrom::Start(offset))?;
        Ok(&mut self.file)
    }
}

/// One file on disk.
///
/// `flush` hands buffered bytes to the OS; `sync` waits for them to reach
/// the device.
///
/// ```no_run
/// use rangedb_storage::{FileBackend, StorageBackend};
/// use std::path::Path;
///
/// let mut file = FileBackend::open(Path::new("SPO.dat")).unwrap();
/// file.append(&[0u8; 4096]).unwrap();
/// file.sync().unwrap();
/// ```
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    handle: Mutex<Handle>,
}

impl FileBackend {
    /// Opens `path` for reading and writing, creating an empty file if
    /// there is none. Existing contents are kept.
    ///
    /// # Errors
    ///
    /// Fails with `Io` when the file cannot be opened.
    pub fn open(path: &Path) -> StorageResult<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        let len = file.metadata()?.len();

        Ok(Self {
            path: path.to_path_buf(),
            handle: Mutex::new(Handle { file, len }),
        })
    }

    /// [`open`](Self::open), creating missing parent directories first.
    ///
    /// # Errors
    ///
    /// Fails with `Io` when a directory or the file cannot be created.
    pub fn open_with_create_dirs(path: &Path) -> StorageResult<Self> {
        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)?,
            _ => {}
        }
        Self::open(path)
    }

    /// Where the bytes live.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        let mut handle = self.handle.lock();
        let size = handle.len;
        span(offset, len, size).ok_or(StorageError::ReadPastEnd { offset, len, size })?;

        let mut buf = vec![0u8; len];
        if len > 0 {
            handle.seek_to(offset)?.read_exact(&mut buf)?;
        }
        Ok(buf)
    }

    fn write_at(&mut self, offset: u64, bytes: &[u8]) -> StorageResult<()> {
        let handle = self.handle.get_mut();
        let size = handle.len;
        span(offset, bytes.len(), size).ok_or(StorageError::WritePastEnd {
            offset,
            len: bytes.len(),
            size,
        })?;

        handle.seek_to(offset)?.write_all(bytes)?;
        Ok(())
    }

    fn append(&mut self, bytes: &[u8]) -> StorageResult<u64> {
        let handle = self.handle.get_mut();
        let at = handle.len;
        if !bytes.is_empty() {
            handle.seek_to(at)?.write_all(bytes)?;
            handle.len += bytes.len() as u64;
        }
        Ok(at)
    }

    fn flush(&mut self) -> StorageResult<()> {
        self.handle.get_mut().file.flush()?;
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.handle.lock().len)
    }

    fn sync(&mut self) -> StorageResult<()> {
        self.handle.get_mut().file.sync_all()?;
        Ok(())
    }

    fn truncate(&mut self, new_size: u64) -> StorageResult<()> {
        let handle = self.handle.get_mut();
        if new_size > handle.len {
            return Err(StorageError::invalid_input(format!(
                "cannot grow {} from {} to {} bytes by truncation",
                self.path.display(),
                handle.len,
                new_size
            )));
        }

        handle.file.set_len(new_size)?;
        handle.file.sync_all()?;
        handle.len = new_size;
        Ok(())
    }
}
