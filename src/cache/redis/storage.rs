// Redis storage implementation
//
// Entries are plain string values under "{prefix}{key}"; expiry is delegated
// to Redis' native per-key TTL, so there is no local metadata and nothing for
// GC to sweep.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, Cmd, FromRedisValue};

use super::config::RedisConfig;
use super::key::{format_key, namespace_pattern};
use crate::cache::{CacheError, Storage, StorageStats};
use crate::constants::REDIS_SCAN_COUNT;

/// Redis-backed view cache storage
///
/// With `persistent` set, one [`ConnectionManager`] (multiplexed, reconnecting)
/// is kept for the storage lifetime; otherwise every call opens its own
/// connection. Every command is bounded by the configured timeout and is
/// attempted once.
pub struct RedisStorage {
    client: Client,
    manager: Option<ConnectionManager>,
    config: RedisConfig,
}

impl RedisStorage {
    /// Connect to Redis and verify the server answers
    ///
    /// # Errors
    ///
    /// - `CacheError::Configuration` for invalid parameters
    /// - `CacheError::Connection` if the server is unreachable, rejects the
    ///   credentials, or the database cannot be selected
    pub async fn new(config: RedisConfig) -> Result<Self, CacheError> {
        config.validate()?;

        let client = Client::open(config.connection_url().as_str()).map_err(|e| {
            CacheError::Connection(format!("Invalid Redis URL: {}", e))
        })?;

        let manager = if config.persistent {
            let manager = tokio::time::timeout(config.timeout, ConnectionManager::new(client.clone()))
                .await
                .map_err(|_| {
                    CacheError::Connection(format!(
                        "Timed out connecting to Redis at {}:{}",
                        config.host, config.port
                    ))
                })?
                .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {}", e)))?;
            Some(manager)
        } else {
            None
        };

        let storage = Self {
            client,
            manager,
            config,
        };

        let pong: String = storage
            .query(redis::cmd("PING"))
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;
        tracing::debug!(
            host = %storage.config.host,
            port = storage.config.port,
            database = storage.config.database,
            reply = %pong,
            "Connected to Redis cache"
        );

        Ok(storage)
    }

    pub fn config(&self) -> &RedisConfig {
        &self.config
    }

    fn namespaced(&self, key: &str) -> String {
        format_key(&self.config.prefix, key)
    }

    /// Run one command with the configured timeout, translating every failure
    /// into `CacheError::Redis`
    async fn query<T: FromRedisValue>(&self, cmd: Cmd) -> Result<T, CacheError> {
        let attempt = async {
            match &self.manager {
                Some(manager) => {
                    let mut conn = manager.clone();
                    cmd.query_async::<T>(&mut conn).await
                }
                None => match self.client.get_multiplexed_async_connection().await {
                    Ok(mut conn) => cmd.query_async::<T>(&mut conn).await,
                    Err(e) => Err(e),
                },
            }
        };

        match tokio::time::timeout(self.config.timeout, attempt).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(CacheError::Redis(e.to_string())),
            Err(_) => Err(CacheError::Redis(format!(
                "operation timed out after {:?}",
                self.config.timeout
            ))),
        }
    }

    /// All namespaced keys currently stored
    async fn scan_namespace(&self) -> Result<Vec<String>, CacheError> {
        let pattern = namespace_pattern(&self.config.prefix);
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        loop {
            let mut cmd = redis::cmd("SCAN");
            cmd.arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(REDIS_SCAN_COUNT);
            let (next, batch): (u64, Vec<String>) = self.query(cmd).await?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(keys)
    }
}

#[async_trait]
impl Storage for RedisStorage {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn read(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut cmd = redis::cmd("GET");
        cmd.arg(self.namespaced(key));
        match self.query::<Option<String>>(cmd).await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Redis read failed, treating as miss");
                Ok(None)
            }
        }
    }

    async fn write(&self, key: &str, content: &str, ttl: i64) -> Result<(), CacheError> {
        let mut cmd = redis::cmd("SET");
        cmd.arg(self.namespaced(key)).arg(content);
        if ttl > 0 {
            cmd.arg("EX").arg(ttl);
        }
        self.query::<()>(cmd)
            .await
            .map_err(|e| CacheError::write_failed(key, e))
    }

    async fn exists(&self, key: &str) -> bool {
        let mut cmd = redis::cmd("EXISTS");
        cmd.arg(self.namespaced(key));
        match self.query::<i64>(cmd).await {
            Ok(count) => count > 0,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Redis EXISTS failed");
                false
            }
        }
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut cmd = redis::cmd("DEL");
        cmd.arg(self.namespaced(key));
        self.query::<i64>(cmd).await.map(|_| ())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let keys = self.scan_namespace().await?;
        let total = keys.len();

        for chunk in keys.chunks(REDIS_SCAN_COUNT) {
            let mut cmd = redis::cmd("DEL");
            for key in chunk {
                cmd.arg(key);
            }
            self.query::<i64>(cmd).await?;
        }

        tracing::info!(prefix = %self.config.prefix, removed = total, "Redis cache cleared");
        Ok(())
    }

    async fn is_expired(&self, key: &str) -> bool {
        !self.exists(key).await
    }

    async fn gc(&self) -> Result<usize, CacheError> {
        // Redis evicts expired keys on its own
        Ok(0)
    }

    async fn stats(&self) -> Result<StorageStats, CacheError> {
        let keys = self.scan_namespace().await?;
        let mut stats = StorageStats::new(self.name());
        stats.entries = keys.len() as u64;
        Ok(stats)
    }

    async fn ping(&self) -> bool {
        matches!(self.query::<String>(redis::cmd("PING")).await, Ok(reply) if reply == "PONG")
    }
}

// Verify Send + Sync bounds (required for async trait)
fn _assert_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    assert_send::<RedisStorage>();
    assert_sync::<RedisStorage>();
}
