use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Represents a file or directory entry
#[derive(Debug, Clone)]
pub struct FsEntry {
    pub path: PathBuf,
    pub name: String,
    pub entry_type: FsEntryType,
    pub metadata: Option<FsMetadata>,
}

impl FsEntry {
    pub fn new(path: PathBuf, name: String, entry_type: FsEntryType) -> Self {
        Self {
            path,
            name,
            entry_type,
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: FsMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn is_dir(&self) -> bool {
        self.entry_type == FsEntryType::Directory
    }

    pub fn is_file(&self) -> bool {
        self.entry_type == FsEntryType::File
    }

    pub fn is_symlink(&self) -> bool {
        self.entry_type == FsEntryType::Symlink
    }

    pub fn is_special(&self) -> bool {
        self.entry_type == FsEntryType::Special
    }

    pub fn size(&self) -> Option<u64> {
        self.metadata.as_ref().and_then(|m| m.size)
    }

    pub fn is_hidden(&self) -> bool {
        self.metadata.as_ref().map(|m| m.is_hidden).unwrap_or(false)
    }
}

/// Type of filesystem entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsEntryType {
    File,
    Directory,
    Symlink,
    /// FIFO, socket or device node; never opened
    Special,
}

/// Metadata about a filesystem entry
#[derive(Debug, Clone)]
pub struct FsMetadata {
    pub size: Option<u64>,
    pub modified: Option<SystemTime>,
    /// Unix permission bits (`st_mode & 0o7777`), when the platform has them
    pub mode: Option<u32>,
    pub is_hidden: bool,
    pub is_readonly: bool,
}

impl FsMetadata {
    pub fn new() -> Self {
        Self {
            size: None,
            modified: None,
            mode: None,
            is_hidden: false,
            is_readonly: false,
        }
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn with_modified(mut self, modified: SystemTime) -> Self {
        self.modified = Some(modified);
        self
    }

    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.is_hidden = hidden;
        self
    }

    pub fn with_readonly(mut self, readonly: bool) -> Self {
        self.is_readonly = readonly;
        self
    }
}

impl Default for FsMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// Filesystem backend trait
///
/// Everything the navigator needs from the filesystem goes through this
/// trait so that tests can wrap or replace the local implementation. All
/// calls are blocking; the navigator only issues them from its own thread,
/// except `dir_size` which runs on background workers.
pub trait FsBackend: Send + Sync {
    /// List entries in a directory (non-recursive), with metadata
    ///
    /// Entries whose metadata cannot be read are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read (permission denied,
    /// doesn't exist, not a directory, etc.)
    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>>;

    /// Get single entry with metadata
    fn get_entry(&self, path: &Path) -> io::Result<FsEntry>;

    /// Read at most `limit` bytes from the start of a file
    ///
    /// Only regular files (or symlinks resolving to one) are opened; anything
    /// else is an `InvalidInput` error, since opening a FIFO or device can
    /// block or have side effects.
    fn read_head(&self, path: &Path, limit: usize) -> io::Result<Vec<u8>>;

    /// Sum the sizes of all regular files under `path`
    ///
    /// Symlinks are not followed. Any traversal error aborts the walk.
    fn dir_size(&self, path: &Path) -> io::Result<u64>;

    /// Get canonical (absolute, normalized) path
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_entry_creation() {
        let entry = FsEntry::new(
            PathBuf::from("/test/file.txt"),
            "file.txt".to_string(),
            FsEntryType::File,
        );

        assert_eq!(entry.name, "file.txt");
        assert!(entry.is_file());
        assert!(!entry.is_dir());
        assert!(!entry.is_symlink());
        assert!(entry.metadata.is_none());
        assert_eq!(entry.size(), None);
        assert!(!entry.is_hidden());
    }

    #[test]
    fn test_fs_entry_with_metadata() {
        let metadata = FsMetadata::new()
            .with_size(1024)
            .with_mode(0o644)
            .with_hidden(true);

        let entry = FsEntry::new(
            PathBuf::from("/test/.file"),
            ".file".to_string(),
            FsEntryType::File,
        )
        .with_metadata(metadata);

        assert_eq!(entry.size(), Some(1024));
        assert!(entry.is_hidden());
        assert_eq!(entry.metadata.unwrap().mode, Some(0o644));
    }
}
