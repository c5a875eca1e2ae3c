//! View cache facade
//!
//! [`ViewCache`] is what the rendering layer talks to. It owns the storage
//! backend, gates every runtime lookup on the enabled flag, derives keys from
//! render inputs and runs sampled GC after successful writes.
//!
//! Per-render overrides are passed explicitly as a [`CacheOverride`]; the
//! shared enabled flag is never flipped on behalf of a single render.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::config::CacheConfig;
use super::factory;
use super::gc::GcPolicy;
use super::key::generate_key;
use super::stats::{ViewCacheCounters, ViewCacheStats};
use super::{CacheError, Storage};
use crate::view::ViewData;

/// Per-render cache instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheOverride {
    /// Follow the cache's own enabled flag
    #[default]
    Inherit,
    /// Use the cache even when it is disabled
    Force,
    /// Never read or write the cache
    Bypass,
}

impl From<Option<bool>> for CacheOverride {
    fn from(value: Option<bool>) -> Self {
        match value {
            None => CacheOverride::Inherit,
            Some(true) => CacheOverride::Force,
            Some(false) => CacheOverride::Bypass,
        }
    }
}

pub struct ViewCache {
    storage: Arc<dyn Storage>,
    enabled: AtomicBool,
    default_ttl: i64,
    gc_policy: GcPolicy,
    counters: ViewCacheCounters,
}

impl ViewCache {
    /// Wrap an existing backend using the flags and GC settings of `config`
    pub fn new(storage: Arc<dyn Storage>, config: &CacheConfig) -> Self {
        Self::with_policy(
            storage,
            config.is_enabled(),
            config.default_ttl(),
            GcPolicy::new(config.gc_probability(), config.gc_divisor()),
        )
    }

    pub fn with_policy(
        storage: Arc<dyn Storage>,
        enabled: bool,
        default_ttl: i64,
        gc_policy: GcPolicy,
    ) -> Self {
        Self {
            storage,
            enabled: AtomicBool::new(enabled),
            default_ttl,
            gc_policy,
            counters: ViewCacheCounters::new(),
        }
    }

    /// Build the configured backend and wrap it
    pub async fn from_config(config: &CacheConfig) -> Result<Self, CacheError> {
        let backend = factory::create(config).await?;
        Ok(Self::new(Arc::new(backend), config))
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn default_ttl(&self) -> i64 {
        self.default_ttl
    }

    pub fn gc_policy(&self) -> GcPolicy {
        self.gc_policy
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
        tracing::debug!(enabled, "View cache toggled");
    }

    fn is_active(&self, cache_override: CacheOverride) -> bool {
        match cache_override {
            CacheOverride::Force => true,
            CacheOverride::Bypass => false,
            CacheOverride::Inherit => self.is_enabled(),
        }
    }

    /// Key for one render: `"{controller}:{page}:{fingerprint}"`
    pub fn generate_key(&self, controller: &str, page: &str, data: &ViewData) -> String {
        generate_key(controller, page, data)
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.get_with(key, CacheOverride::Inherit).await
    }

    /// Look up `key`; storage read errors are reported as a miss
    pub async fn get_with(&self, key: &str, cache_override: CacheOverride) -> Option<String> {
        if !self.is_active(cache_override) {
            return None;
        }

        let found = match self.storage.read(key).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "View cache read failed, treating as miss");
                None
            }
        };

        if found.is_some() {
            self.counters.record_hit();
            tracing::debug!(key = %key, "View cache hit");
        } else {
            self.counters.record_miss();
            tracing::debug!(key = %key, "View cache miss");
        }
        found
    }

    /// Store `content` under `key`; `ttl` of `None` uses the configured default
    pub async fn set(&self, key: &str, content: &str, ttl: Option<i64>) -> Result<(), CacheError> {
        self.set_with(key, content, ttl, CacheOverride::Inherit).await
    }

    /// Store `content` and maybe run GC
    ///
    /// # Errors
    ///
    /// `CacheError::Disabled` when the cache is inactive for this call, or the
    /// backend's write error.
    pub async fn set_with(
        &self,
        key: &str,
        content: &str,
        ttl: Option<i64>,
        cache_override: CacheOverride,
    ) -> Result<(), CacheError> {
        if !self.is_active(cache_override) {
            return Err(CacheError::Disabled);
        }

        let ttl = ttl.unwrap_or(self.default_ttl);
        if let Err(e) = self.storage.write(key, content, ttl).await {
            self.counters.record_write_failure();
            return Err(e);
        }
        self.counters.record_write();

        if self.gc_policy.should_run() {
            self.run_gc().await;
        }
        Ok(())
    }

    async fn run_gc(&self) {
        match self.storage.gc().await {
            Ok(collected) => {
                self.counters.record_gc(collected);
                tracing::debug!(backend = self.storage.name(), collected, "View cache GC completed");
            }
            Err(e) => {
                tracing::warn!(backend = self.storage.name(), error = %e, "View cache GC failed");
            }
        }
    }

    pub async fn exists(&self, key: &str) -> bool {
        self.is_enabled() && self.storage.exists(key).await
    }

    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        if !self.is_enabled() {
            return Err(CacheError::Disabled);
        }
        self.storage.delete(key).await
    }

    /// Remove every entry, regardless of the enabled flag
    pub async fn clear(&self) -> Result<(), CacheError> {
        self.storage.clear().await?;
        tracing::info!(backend = self.storage.name(), "View cache cleared");
        Ok(())
    }

    /// Run a GC sweep now, regardless of the enabled flag and sampling policy
    pub async fn gc(&self) -> Result<usize, CacheError> {
        let collected = self.storage.gc().await?;
        self.counters.record_gc(collected);
        Ok(collected)
    }

    pub fn stats(&self) -> ViewCacheStats {
        self.counters.snapshot()
    }
}
