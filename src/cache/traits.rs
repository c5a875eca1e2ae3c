//! Storage trait definition
//!
//! This module defines the `Storage` trait every view-cache backend satisfies.
//! The file and Redis backends expose identical observable behavior through it;
//! only their internal representation of an entry differs.

use async_trait::async_trait;

use super::error::CacheError;
use super::stats::StorageStats;

/// Storage contract for rendered view output
#[async_trait]
pub trait Storage: Send + Sync {
    /// Short backend name used in logs and statistics
    fn name(&self) -> &'static str;

    /// Get the content stored under `key`
    ///
    /// Returns `None` when the key is unknown or expired. An expired entry is
    /// evicted as a side effect of the read.
    async fn read(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Store `content` under `key` for `ttl` seconds
    ///
    /// `ttl <= 0` stores the entry without expiry. A write the medium cannot
    /// persist is reported as an error, never as a silent success.
    async fn write(&self, key: &str, content: &str, ttl: i64) -> Result<(), CacheError>;

    /// True iff a non-expired entry is present
    async fn exists(&self, key: &str) -> bool;

    /// Remove the entry; deleting an unknown key succeeds
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Remove every entry in this backend's namespace, keeping the namespace itself
    async fn clear(&self) -> Result<(), CacheError>;

    /// True when the key is absent, its metadata is unreadable, or it is past expiry
    async fn is_expired(&self, key: &str) -> bool;

    /// Evict all expired entries and return how many were removed
    async fn gc(&self) -> Result<usize, CacheError>;

    /// Entry count and size snapshot for diagnostics
    async fn stats(&self) -> Result<StorageStats, CacheError>;

    /// Cheap liveness probe
    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    // Minimal in-memory implementation to exercise the default methods
    struct MockStorage {
        entries: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl Storage for MockStorage {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
            Ok(self.entries.lock().await.get(key).cloned())
        }

        async fn write(&self, key: &str, content: &str, _ttl: i64) -> Result<(), CacheError> {
            self.entries
                .lock()
                .await
                .insert(key.to_string(), content.to_string());
            Ok(())
        }

        async fn exists(&self, key: &str) -> bool {
            self.entries.lock().await.contains_key(key)
        }

        async fn delete(&self, key: &str) -> Result<(), CacheError> {
            self.entries.lock().await.remove(key);
            Ok(())
        }

        async fn clear(&self) -> Result<(), CacheError> {
            self.entries.lock().await.clear();
            Ok(())
        }

        async fn is_expired(&self, key: &str) -> bool {
            !self.exists(key).await
        }

        async fn gc(&self) -> Result<usize, CacheError> {
            Ok(0)
        }

        async fn stats(&self) -> Result<StorageStats, CacheError> {
            Ok(StorageStats::new(self.name()))
        }
    }

    #[test]
    fn test_storage_is_object_safe() {
        fn _takes_dyn(_s: &dyn Storage) {}
    }

    #[tokio::test]
    async fn test_default_ping_is_true() {
        let storage = MockStorage {
            entries: Mutex::new(HashMap::new()),
        };
        assert!(storage.ping().await);
    }

    #[tokio::test]
    async fn test_mock_round_trip_through_trait_object() {
        let storage: Box<dyn Storage> = Box::new(MockStorage {
            entries: Mutex::new(HashMap::new()),
        });
        storage.write("k", "v", 60).await.unwrap();
        assert_eq!(storage.read("k").await.unwrap().as_deref(), Some("v"));
        assert!(!storage.is_expired("k").await);
        storage.delete("k").await.unwrap();
        assert!(storage.is_expired("k").await);
    }
}
