//! Tokio-based filesystem backend (portable, works on all platforms)

use super::backend::{DiskBackend, DiskEntry};
use crate::constants::TEMP_EXTENSION;
use async_trait::async_trait;
use std::io;
use std::path::{Path, PathBuf};

/// Portable filesystem backend using tokio::fs
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioFsBackend;

impl TokioFsBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Sibling temp path unique to this write, so concurrent writers of the same
/// entry never share a temp file
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{:016x}.{}", rand::random::<u64>(), TEMP_EXTENSION));
    PathBuf::from(name)
}

#[async_trait]
impl DiskBackend for TokioFsBackend {
    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }

    async fn write_file_atomic(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        // Write to temp file
        let temp_path = temp_path_for(path);
        if let Err(e) = tokio::fs::write(&temp_path, data).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e);
        }

        // Atomically rename
        if let Err(e) = tokio::fs::rename(&temp_path, path).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(e);
        }

        Ok(())
    }

    async fn file_exists(&self, path: &Path) -> io::Result<bool> {
        tokio::fs::try_exists(path).await
    }

    async fn delete_file(&self, path: &Path) -> io::Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        match tokio::fs::create_dir_all(path).await {
            Ok(()) => Ok(()),
            // Lost a race with another writer creating the same shard
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn remove_dir(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_dir(path).await
    }

    async fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        match tokio::fs::remove_dir_all(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DiskEntry>> {
        let mut entries = Vec::new();
        let mut dir = tokio::fs::read_dir(path).await?;
        while let Some(entry) = dir.next_entry().await? {
            let file_type = entry.file_type().await?;
            let (size, modified) = if file_type.is_file() {
                match entry.metadata().await {
                    Ok(meta) => (meta.len(), meta.modified().ok()),
                    Err(_) => (0, None),
                }
            } else {
                (0, None)
            };
            entries.push(DiskEntry {
                path: entry.path(),
                is_dir: file_type.is_dir(),
                size,
                modified,
            });
        }
        Ok(entries)
    }
}
