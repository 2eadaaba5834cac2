//! Named storage areas.
//!
//! A location groups several stores under one base name. Each store is
//! told apart by an extension (its purpose tag):
//!
//! ```text
//! <dir>/
//! ├─ SPO.idn     # tree nodes
//! ├─ SPO.dat     # tree records
//! └─ nodes.obj   # object file
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

/// A named storage area, either transient or on disk.
///
/// The location only names things. It never creates or removes the
/// directory; stores opened at a disk location create their own files.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageLocation {
    dir: Option<PathBuf>,
    base: String,
}

impl StorageLocation {
    /// A transient location; stores opened here live in memory.
    pub fn mem(base: impl Into<String>) -> Self {
        Self {
            dir: None,
            base: base.into(),
        }
    }

    /// A persistent location under `dir`.
    pub fn disk(dir: impl AsRef<Path>, base: impl Into<String>) -> Self {
        Self {
            dir: Some(dir.as_ref().to_path_buf()),
            base: base.into(),
        }
    }

    /// Returns true for transient (memory-only) locations.
    #[must_use]
    pub fn is_mem(&self) -> bool {
        self.dir.is_none()
    }

    /// Base name shared by every store at this location.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Directory of a persistent location.
    #[must_use]
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Resolves the store name for a purpose tag.
    ///
    /// Memory locations resolve to `<base>.<ext>`, disk locations to the
    /// full file path.
    #[must_use]
    pub fn filename(&self, ext: &str) -> String {
        match self.path(ext) {
            Some(path) => path.display().to_string(),
            None => self.leaf(ext),
        }
    }

    /// File path for a purpose tag, `None` at a memory location.
    #[must_use]
    pub fn path(&self, ext: &str) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join(self.leaf(ext)))
    }

    fn leaf(&self, ext: &str) -> String {
        if ext.is_empty() {
            self.base.clone()
        } else {
            format!("{}.{}", self.base, ext)
        }
    }
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.dir {
            Some(dir) => write!(f, "{}", dir.join(&self.base).display()),
            None => write!(f, "mem:{}", self.base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mem_location_names() {
        let location = StorageLocation::mem("SPO");
        assert!(location.is_mem());
        assert_eq!(location.filename("idn"), "SPO.idn");
        assert_eq!(location.path("idn"), None);
        assert_eq!(location.to_string(), "mem:SPO");
    }

    #[test]
    fn disk_location_names() {
        let location = StorageLocation::disk("/data/db", "SPO");
        assert!(!location.is_mem());
        assert_eq!(
            location.path("dat"),
            Some(PathBuf::from("/data/db").join("SPO.dat"))
        );
        assert_eq!(
            location.filename("dat"),
            PathBuf::from("/data/db").join("SPO.dat").display().to_string()
        );
    }

    #[test]
    fn empty_extension_uses_base() {
        let location = StorageLocation::mem("journal");
        assert_eq!(location.filename(""), "journal");
    }
}
