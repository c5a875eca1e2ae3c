//! Backend trait for filesystem operations

use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One item returned by [`DiskBackend::read_dir`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskEntry {
    pub path: PathBuf,
    pub is_dir: bool,
    /// File length in bytes (0 for directories)
    pub size: u64,
    /// Last modification time, when the platform reports one
    pub modified: Option<SystemTime>,
}

/// Abstraction over filesystem operations used by the file storage
#[async_trait]
pub trait DiskBackend: Send + Sync {
    /// Read entire file contents
    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write file contents atomically (using temp file + rename)
    async fn write_file_atomic(&self, path: &Path, data: &[u8]) -> io::Result<()>;

    /// Whether a file exists at `path`
    async fn file_exists(&self, path: &Path) -> io::Result<bool>;

    /// Delete a file; a missing file is not an error
    async fn delete_file(&self, path: &Path) -> io::Result<()>;

    /// Create directory and all parent directories; existing directories are fine
    async fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Remove an empty directory
    async fn remove_dir(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory tree
    async fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// List the direct children of a directory
    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DiskEntry>>;
}
