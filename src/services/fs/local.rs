use super::backend::{FsBackend, FsEntry, FsEntryType, FsMetadata};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Local filesystem backend built on `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFsBackend;

impl LocalFsBackend {
    pub fn new() -> Self {
        Self
    }

    /// Check if a file is hidden (dot-file convention)
    fn is_hidden(path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'))
    }

    fn entry_type(file_type: fs::FileType) -> FsEntryType {
        if file_type.is_dir() {
            FsEntryType::Directory
        } else if file_type.is_symlink() {
            FsEntryType::Symlink
        } else if file_type.is_file() {
            FsEntryType::File
        } else {
            FsEntryType::Special
        }
    }

    /// Build FsMetadata from std::fs::Metadata
    fn build_metadata(path: &Path, meta: &fs::Metadata) -> FsMetadata {
        let mut metadata = FsMetadata::new()
            .with_size(meta.len())
            .with_hidden(Self::is_hidden(path))
            .with_readonly(meta.permissions().readonly());

        if let Ok(modified) = meta.modified() {
            metadata = metadata.with_modified(modified);
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            metadata = metadata.with_mode(meta.permissions().mode() & 0o7777);
        }

        metadata
    }

    /// Build an entry from `lstat` data; symlinks are reported as such and
    /// never treated as directories.
    fn build_entry(path: PathBuf, name: String) -> io::Result<FsEntry> {
        let meta = fs::symlink_metadata(&path)?;
        let metadata = Self::build_metadata(&path, &meta);
        Ok(FsEntry::new(path, name, Self::entry_type(meta.file_type())).with_metadata(metadata))
    }
}

impl FsBackend for LocalFsBackend {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            match Self::build_entry(entry.path(), name) {
                Ok(fs_entry) => entries.push(fs_entry),
                Err(e) => {
                    tracing::debug!("Skipping {:?}: {}", entry.path(), e);
                }
            }
        }
        Ok(entries)
    }

    fn get_entry(&self, path: &Path) -> io::Result<FsEntry> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self::build_entry(path.to_path_buf(), name)
    }

    fn read_head(&self, path: &Path, limit: usize) -> io::Result<Vec<u8>> {
        // Follows symlinks, so a link to a FIFO is refused too
        if !fs::metadata(path)?.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Not a regular file: {:?}", path),
            ));
        }
        let file = fs::File::open(path)?;
        let mut buf = Vec::with_capacity(limit);
        file.take(limit as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn dir_size(&self, path: &Path) -> io::Result<u64> {
        let walker = ignore::WalkBuilder::new(path)
            .standard_filters(false)
            .follow_links(false)
            .build();

        let mut total = 0u64;
        for result in walker {
            let entry = result.map_err(io::Error::other)?;
            let is_file = entry.file_type().is_some_and(|t| t.is_file());
            if is_file {
                total += entry.metadata().map_err(io::Error::other)?.len();
            }
        }
        Ok(total)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }
}
