//! File-based storage implementation

use async_trait::async_trait;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use super::backend::{DiskBackend, DiskEntry};
use super::tokio_backend::TokioFsBackend;
use super::utils::{
    content_path_for_meta, entry_paths, is_content_file, is_meta_file, is_temp_file,
    meta_path_for_content, EntryPaths,
};
use crate::cache::config::default_cache_path;
use crate::cache::entry::{now_secs, EntryMetadata};
use crate::cache::{CacheError, Storage, StorageStats};
use crate::constants::ORPHAN_GRACE_SECS;

/// Outcome of loading an entry's metadata sidecar
enum MetaState {
    Missing,
    Corrupt,
    Valid(EntryMetadata),
}

/// Files found under the storage root
#[derive(Default)]
struct Listing {
    metas: Vec<PathBuf>,
    contents: Vec<DiskEntry>,
    temps: Vec<DiskEntry>,
    /// Deepest first
    dirs: Vec<PathBuf>,
}

/// Stores each entry as a content file plus a JSON metadata sidecar,
/// sharded by the first two hex characters of the key hash
pub struct FileStorage {
    root: PathBuf,
    backend: Arc<dyn DiskBackend>,
    orphan_grace: Duration,
}

impl FileStorage {
    /// Create a file storage rooted at `root`
    ///
    /// Directories are created lazily on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, CacheError> {
        Self::with_backend(root, Arc::new(TokioFsBackend::new()))
    }

    /// Create a file storage over a custom filesystem backend
    pub fn with_backend(
        root: impl Into<PathBuf>,
        backend: Arc<dyn DiskBackend>,
    ) -> Result<Self, CacheError> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            return Err(CacheError::Configuration(
                "file storage requires a non-empty path".to_string(),
            ));
        }
        Ok(Self {
            root,
            backend,
            orphan_grace: Duration::from_secs(ORPHAN_GRACE_SECS),
        })
    }

    /// File storage at the default location under the system temp dir
    pub fn in_temp_dir() -> Self {
        Self {
            root: default_cache_path(),
            backend: Arc::new(TokioFsBackend::new()),
            orphan_grace: Duration::from_secs(ORPHAN_GRACE_SECS),
        }
    }

    /// Minimum age before GC sweeps content files lacking metadata and
    /// leftover temp files
    pub fn with_orphan_grace(mut self, grace: Duration) -> Self {
        self.orphan_grace = grace;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn load_meta(&self, meta_path: &Path) -> MetaState {
        let raw = match self.backend.read_file(meta_path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return MetaState::Missing,
            Err(e) => {
                tracing::warn!(path = %meta_path.display(), error = %e, "Unreadable cache metadata");
                return MetaState::Corrupt;
            }
        };
        match serde_json::from_slice::<EntryMetadata>(&raw) {
            Ok(meta) => MetaState::Valid(meta),
            Err(e) => {
                tracing::warn!(path = %meta_path.display(), error = %e, "Corrupt cache metadata");
                MetaState::Corrupt
            }
        }
    }

    /// Remove both files of an entry
    async fn evict(&self, paths: &EntryPaths) -> io::Result<()> {
        self.backend.delete_file(&paths.content).await?;
        self.backend.delete_file(&paths.meta).await
    }

    async fn evict_quietly(&self, paths: &EntryPaths) {
        if let Err(e) = self.evict(paths).await {
            tracing::warn!(path = %paths.content.display(), error = %e, "Failed to evict cache entry");
        }
    }

    /// Whether an orphaned file is old enough that no writer can still own it
    fn past_grace(&self, entry: &DiskEntry) -> bool {
        if self.orphan_grace.is_zero() {
            return true;
        }
        entry
            .modified
            .and_then(|m| SystemTime::now().duration_since(m).ok())
            .is_some_and(|age| age >= self.orphan_grace)
    }

    async fn walk(&self) -> io::Result<Listing> {
        let mut listing = Listing::default();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let entries = match self.backend.read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            };
            for entry in entries {
                if entry.is_dir {
                    listing.dirs.push(entry.path.clone());
                    pending.push(entry.path);
                } else if is_meta_file(&entry.path) {
                    listing.metas.push(entry.path);
                } else if is_content_file(&entry.path) {
                    listing.contents.push(entry);
                } else if is_temp_file(&entry.path) {
                    listing.temps.push(entry);
                }
            }
        }

        // Children were discovered after their parents
        listing.dirs.reverse();
        Ok(listing)
    }

    /// Remove content files whose sidecar never landed and abandoned temp
    /// files, once they are past the grace period
    async fn sweep_orphans(&self, listing: &Listing) -> usize {
        let known: HashSet<&Path> = listing.metas.iter().map(PathBuf::as_path).collect();
        let mut removed = 0;

        for entry in &listing.contents {
            let meta = meta_path_for_content(&entry.path);
            if known.contains(meta.as_path()) || !self.past_grace(entry) {
                continue;
            }
            // A writer may have finished since the listing
            if matches!(self.backend.file_exists(&meta).await, Ok(true)) {
                continue;
            }
            match self.backend.delete_file(&entry.path).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    tracing::warn!(path = %entry.path.display(), error = %e, "GC could not remove orphaned content")
                }
            }
        }

        for entry in &listing.temps {
            if !self.past_grace(entry) {
                continue;
            }
            match self.backend.delete_file(&entry.path).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    tracing::warn!(path = %entry.path.display(), error = %e, "GC could not remove temp file")
                }
            }
        }

        removed
    }
}

#[async_trait]
impl Storage for FileStorage {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        let paths = entry_paths(&self.root, key);

        let meta = match self.load_meta(&paths.meta).await {
            // Either never written or a writer has not finished yet
            MetaState::Missing => return Ok(None),
            MetaState::Corrupt => {
                self.evict_quietly(&paths).await;
                return Ok(None);
            }
            MetaState::Valid(meta) => meta,
        };

        if meta.is_expired(now_secs()) {
            tracing::debug!(key = %key, "Evicting expired cache entry on read");
            self.evict_quietly(&paths).await;
            return Ok(None);
        }

        let raw = match self.backend.read_file(&paths.content).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.evict_quietly(&paths).await;
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        match String::from_utf8(raw) {
            Ok(content) => Ok(Some(content)),
            Err(_) => {
                tracing::warn!(key = %key, "Cached content is not valid UTF-8, evicting");
                self.evict_quietly(&paths).await;
                Ok(None)
            }
        }
    }

    async fn write(&self, key: &str, content: &str, ttl: i64) -> Result<(), CacheError> {
        let paths = entry_paths(&self.root, key);

        self.backend
            .create_dir_all(&paths.dir)
            .await
            .map_err(|e| CacheError::write_failed(key, e))?;

        // Content first: until the sidecar lands, readers treat the entry as absent
        self.backend
            .write_file_atomic(&paths.content, content.as_bytes())
            .await
            .map_err(|e| CacheError::write_failed(key, e))?;

        let meta = serde_json::to_vec(&EntryMetadata::now(ttl))?;
        self.backend
            .write_file_atomic(&paths.meta, &meta)
            .await
            .map_err(|e| CacheError::write_failed(key, e))?;

        Ok(())
    }

    async fn exists(&self, key: &str) -> bool {
        !self.is_expired(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let paths = entry_paths(&self.root, key);
        self.evict(&paths).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let entries = match self.backend.read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        for entry in entries {
            if entry.is_dir {
                self.backend.remove_dir_all(&entry.path).await?;
            } else {
                self.backend.delete_file(&entry.path).await?;
            }
        }

        tracing::info!(root = %self.root.display(), "File cache cleared");
        Ok(())
    }

    async fn is_expired(&self, key: &str) -> bool {
        let paths = entry_paths(&self.root, key);
        match self.load_meta(&paths.meta).await {
            MetaState::Valid(meta) => {
                if meta.is_expired(now_secs()) {
                    return true;
                }
                // Metadata without content is a half-evicted entry
                !matches!(self.backend.file_exists(&paths.content).await, Ok(true))
            }
            MetaState::Missing | MetaState::Corrupt => true,
        }
    }

    async fn gc(&self) -> Result<usize, CacheError> {
        let listing = self.walk().await?;
        let now = now_secs();
        let mut removed = 0;

        for meta_path in listing.metas.iter().cloned() {
            let collect = match self.load_meta(&meta_path).await {
                MetaState::Valid(meta) => meta.is_expired(now),
                MetaState::Corrupt => true,
                // Vanished between listing and reading
                MetaState::Missing => false,
            };
            if !collect {
                continue;
            }
            let paths = EntryPaths {
                dir: meta_path.parent().map(Path::to_path_buf).unwrap_or_default(),
                content: content_path_for_meta(&meta_path),
                meta: meta_path,
            };
            match self.evict(&paths).await {
                Ok(()) => removed += 1,
                Err(e) => {
                    tracing::warn!(path = %paths.meta.display(), error = %e, "GC could not evict entry")
                }
            }
        }

        removed += self.sweep_orphans(&listing).await;

        // Best effort: drop shard directories left empty, never the root
        for dir in &listing.dirs {
            if *dir != self.root {
                let _ = self.backend.remove_dir(&dir).await;
            }
        }

        tracing::debug!(removed = removed, root = %self.root.display(), "File cache GC finished");
        Ok(removed)
    }

    async fn stats(&self) -> Result<StorageStats, CacheError> {
        let listing = self.walk().await?;
        let now = now_secs();
        let mut stats = StorageStats::new(self.name());

        for meta_path in &listing.metas {
            stats.entries += 1;
            match self.load_meta(meta_path).await {
                MetaState::Valid(meta) if !meta.is_expired(now) => {}
                _ => stats.expired_entries += 1,
            }
        }
        stats.size_bytes = listing.contents.iter().map(|entry| entry.size).sum();

        Ok(stats)
    }

    async fn ping(&self) -> bool {
        self.backend.create_dir_all(&self.root).await.is_ok()
    }
}
