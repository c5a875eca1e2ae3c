//! Fault-injecting disk backend for testing
//!
//! Delegates to the real tokio backend and fails selected operations on demand.

use async_trait::async_trait;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::backend::{DiskBackend, DiskEntry};
use super::tokio_backend::TokioFsBackend;

#[derive(Clone, Default)]
pub struct MockDiskBackend {
    inner: TokioFsBackend,
    /// Simulate errors if true
    simulate_storage_full: Arc<AtomicBool>,
    simulate_permission_denied: Arc<AtomicBool>,
}

impl MockDiskBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every write with `StorageFull`
    pub fn set_storage_full(&self, enabled: bool) {
        self.simulate_storage_full.store(enabled, Ordering::SeqCst);
    }

    /// Fail every read and delete with `PermissionDenied`
    pub fn set_permission_denied(&self, enabled: bool) {
        self.simulate_permission_denied
            .store(enabled, Ordering::SeqCst);
    }

    fn check_permission(&self) -> io::Result<()> {
        if self.simulate_permission_denied.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "Simulated permission denied",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl DiskBackend for MockDiskBackend {
    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.check_permission()?;
        self.inner.read_file(path).await
    }

    async fn write_file_atomic(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        if self.simulate_storage_full.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "Simulated storage full",
            ));
        }
        self.inner.write_file_atomic(path, data).await
    }

    async fn file_exists(&self, path: &Path) -> io::Result<bool> {
        self.check_permission()?;
        self.inner.file_exists(path).await
    }

    async fn delete_file(&self, path: &Path) -> io::Result<()> {
        self.check_permission()?;
        self.inner.delete_file(path).await
    }

    async fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.inner.create_dir_all(path).await
    }

    async fn remove_dir(&self, path: &Path) -> io::Result<()> {
        self.inner.remove_dir(path).await
    }

    async fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check_permission()?;
        self.inner.remove_dir_all(path).await
    }

    async fn read_dir(&self, path: &Path) -> io::Result<Vec<DiskEntry>> {
        self.inner.read_dir(path).await
    }
}
