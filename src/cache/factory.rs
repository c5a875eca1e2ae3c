//! Storage backend selection
//!
//! Resolves the configured [`StorageKind`] into a concrete [`StorageBackend`]
//! once, at bootstrap. `auto` probes Redis and falls back to a file store in
//! the system temp dir; that path never fails.

use async_trait::async_trait;

use super::config::{CacheConfig, StorageKind};
use super::disk::FileStorage;
use super::redis::RedisStorage;
use super::{CacheError, Storage, StorageStats};

/// The backends a view cache can run on
pub enum StorageBackend {
    File(FileStorage),
    Redis(RedisStorage),
}

impl StorageBackend {
    /// Concrete kind of this backend (never `Auto`)
    pub fn kind(&self) -> StorageKind {
        match self {
            StorageBackend::File(_) => StorageKind::File,
            StorageBackend::Redis(_) => StorageKind::Redis,
        }
    }

    fn inner(&self) -> &dyn Storage {
        match self {
            StorageBackend::File(storage) => storage,
            StorageBackend::Redis(storage) => storage,
        }
    }
}

#[async_trait]
impl Storage for StorageBackend {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    async fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.inner().read(key).await
    }

    async fn write(&self, key: &str, content: &str, ttl: i64) -> Result<(), CacheError> {
        self.inner().write(key, content, ttl).await
    }

    async fn exists(&self, key: &str) -> bool {
        self.inner().exists(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.inner().delete(key).await
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.inner().clear().await
    }

    async fn is_expired(&self, key: &str) -> bool {
        self.inner().is_expired(key).await
    }

    async fn gc(&self) -> Result<usize, CacheError> {
        self.inner().gc().await
    }

    async fn stats(&self) -> Result<StorageStats, CacheError> {
        self.inner().stats().await
    }

    async fn ping(&self) -> bool {
        self.inner().ping().await
    }
}

/// Build the backend named by `config.storage_type()`
///
/// # Errors
///
/// Explicit `file` fails with `CacheError::Configuration` on an empty path;
/// explicit `redis` fails with `Configuration` or `Connection` when the server
/// cannot be reached. `auto` never fails.
pub async fn create(config: &CacheConfig) -> Result<StorageBackend, CacheError> {
    create_kind(config.storage_type(), config).await
}

/// Build a specific backend kind, ignoring `config.storage_type()`
pub async fn create_kind(
    kind: StorageKind,
    config: &CacheConfig,
) -> Result<StorageBackend, CacheError> {
    match kind {
        StorageKind::File => {
            let storage = FileStorage::new(config.cache_path())?;
            tracing::info!(root = %storage.root().display(), "Using file view cache storage");
            Ok(StorageBackend::File(storage))
        }
        StorageKind::Redis => {
            let storage = RedisStorage::new(config.redis().clone()).await?;
            tracing::info!(
                host = %config.redis_host(),
                port = config.redis_port(),
                prefix = %config.redis_prefix(),
                "Using redis view cache storage"
            );
            Ok(StorageBackend::Redis(storage))
        }
        StorageKind::Auto => Ok(auto_detect(config).await),
    }
}

/// Prefer Redis when it answers a ping, otherwise use a file store in the
/// system temp dir
pub async fn auto_detect(config: &CacheConfig) -> StorageBackend {
    match RedisStorage::new(config.redis().clone()).await {
        Ok(storage) if storage.ping().await => {
            tracing::info!(
                host = %config.redis_host(),
                port = config.redis_port(),
                "Auto-detected redis view cache storage"
            );
            return StorageBackend::Redis(storage);
        }
        Ok(_) => tracing::warn!("Redis did not answer ping, falling back to file storage"),
        Err(e) => tracing::warn!(error = %e, "Redis unavailable, falling back to file storage"),
    }

    let storage = FileStorage::in_temp_dir();
    tracing::info!(root = %storage.root().display(), "Using file view cache storage");
    StorageBackend::File(storage)
}

/// Whether a backend of `kind` can be used right now
///
/// Builds a throwaway instance and pings it. For the file backend this creates
/// the root directory if it is missing.
pub async fn is_available(kind: StorageKind, config: &CacheConfig) -> bool {
    match kind {
        StorageKind::Auto => true,
        _ => match create_kind(kind, config).await {
            Ok(backend) => backend.ping().await,
            Err(e) => {
                tracing::debug!(backend = kind.as_str(), error = %e, "Storage backend unavailable");
                false
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::RedisConfig;
    use std::time::Duration;
    use tempfile::TempDir;

    fn unreachable_redis(config: CacheConfig) -> CacheConfig {
        config.with_redis(RedisConfig {
            port: 1,
            timeout: Duration::from_millis(500),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_create_file_backend() {
        let dir = TempDir::new().unwrap();
        let config = CacheConfig::default().with_path(dir.path());

        let backend = create(&config).await.unwrap();
        assert_eq!(backend.kind(), StorageKind::File);
        assert_eq!(backend.name(), "file");

        backend.write("k", "v", 60).await.unwrap();
        assert_eq!(backend.read("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_create_file_backend_requires_path() {
        let config = CacheConfig::default().with_path("");
        let result = create(&config).await;
        assert!(matches!(result, Err(CacheError::Configuration(_))));
    }

    #[tokio::test]
    async fn test_explicit_redis_surfaces_connection_error() {
        let config = unreachable_redis(CacheConfig::default().with_storage(StorageKind::Redis));
        match create(&config).await {
            Err(e) => assert!(e.is_construction_error()),
            Ok(_) => panic!("Expected a construction error"),
        }
    }

    #[tokio::test]
    async fn test_auto_detect_falls_back_to_temp_dir_file_storage() {
        let config = unreachable_redis(CacheConfig::default().with_storage(StorageKind::Auto));

        let backend = create(&config).await.unwrap();
        assert_eq!(backend.kind(), StorageKind::File);
        match &backend {
            StorageBackend::File(storage) => {
                assert!(storage.root().starts_with(std::env::temp_dir()));
            }
            StorageBackend::Redis(_) => panic!("Expected file fallback"),
        }
    }

    #[tokio::test]
    async fn test_is_available() {
        let dir = TempDir::new().unwrap();
        let config = unreachable_redis(CacheConfig::default().with_path(dir.path().join("views")));

        assert!(is_available(StorageKind::File, &config).await);
        assert!(!is_available(StorageKind::Redis, &config).await);
        assert!(is_available(StorageKind::Auto, &config).await);
    }
}
