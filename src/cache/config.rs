//! Cache configuration
//!
//! [`CacheConfig`] is an immutable view over the flat `cache.*` option map.
//! It is built once at bootstrap, either from raw key/value pairs or from a
//! [`Settings`](crate::config::Settings) source, and only read afterwards.
//!
//! Recognised keys: `enabled`, `storage`, `path`, `ttl`, `html`, `markdown`,
//! `json`, `xml`, `gc_probability`, `gc_divisor`, `redis_host`, `redis_port`,
//! `redis_database`, `redis_prefix`, `redis_timeout`, `redis_auth`,
//! `redis_persistent`. Anything else is ignored.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use super::error::CacheError;
use super::redis::RedisConfig;
use crate::config::Settings;
use crate::constants::{
    CACHE_ENV_PREFIX, CACHE_NAMESPACE, DEFAULT_CACHE_SUBDIR, DEFAULT_GC_DIVISOR,
    DEFAULT_GC_PROBABILITY, DEFAULT_TTL_SECONDS,
};
use crate::view::ViewKind;

/// Every option name understood under the `cache` namespace
pub const RECOGNIZED_KEYS: &[&str] = &[
    "enabled",
    "storage",
    "path",
    "ttl",
    "html",
    "markdown",
    "json",
    "xml",
    "gc_probability",
    "gc_divisor",
    "redis_host",
    "redis_port",
    "redis_database",
    "redis_prefix",
    "redis_timeout",
    "redis_auth",
    "redis_persistent",
];

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    #[default]
    File,
    Redis,
    /// Probe Redis, fall back to a file store in the temp dir
    Auto,
}

impl StorageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKind::File => "file",
            StorageKind::Redis => "redis",
            StorageKind::Auto => "auto",
        }
    }
}

impl FromStr for StorageKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" | "filesystem" => Ok(StorageKind::File),
            "redis" | "remote" => Ok(StorageKind::Redis),
            "auto" => Ok(StorageKind::Auto),
            other => Err(CacheError::Configuration(format!(
                "Unknown cache storage '{}', expected file, redis or auto",
                other
            ))),
        }
    }
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-view-type cache toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ViewTypeFlags {
    pub html: bool,
    pub markdown: bool,
    pub json: bool,
    pub xml: bool,
}

impl Default for ViewTypeFlags {
    fn default() -> Self {
        Self {
            html: true,
            markdown: true,
            json: true,
            xml: true,
        }
    }
}

/// Main cache configuration structure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheConfig {
    enabled: bool,
    storage: StorageKind,
    path: PathBuf,
    ttl: i64,
    view_types: ViewTypeFlags,
    gc_probability: f64,
    gc_divisor: u32,
    redis: RedisConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            storage: StorageKind::File,
            path: default_cache_path(),
            ttl: DEFAULT_TTL_SECONDS,
            view_types: ViewTypeFlags::default(),
            gc_probability: DEFAULT_GC_PROBABILITY,
            gc_divisor: DEFAULT_GC_DIVISOR,
            redis: RedisConfig::default(),
        }
    }
}

/// `<system temp dir>/trellis/cache/views`
pub fn default_cache_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_CACHE_SUBDIR)
}

/// Coerce a settings string into a bool (`true/1/yes/on`, `false/0/no/off/""`)
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

fn parse_or<T: FromStr>(key: &str, raw: &str, default: T) -> T {
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(key = key, value = raw, "Invalid cache option value, using default");
            default
        }
    }
}

fn bool_or(key: &str, raw: &str, default: bool) -> bool {
    parse_bool(raw).unwrap_or_else(|| {
        tracing::warn!(key = key, value = raw, "Invalid boolean cache option, using default");
        default
    })
}

impl CacheConfig {
    /// Build a configuration from raw option pairs (keys without the `cache.` prefix)
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let map: BTreeMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.as_ref().to_string()))
            .collect();
        Self::from_map(&map)
    }

    /// Build a configuration from an option map (keys without the `cache.` prefix)
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let mut config = CacheConfig::default();

        for (key, raw) in map {
            config.apply(&key.to_ascii_lowercase(), raw);
        }

        config
    }

    /// Build a configuration from the `cache` namespace of a settings source,
    /// applying `CACHE_<KEY>` environment overrides on top
    pub fn from_settings(settings: &Settings) -> Self {
        Self::from_settings_with_env(settings, |name| std::env::var(name).ok())
    }

    /// Same as [`from_settings`](Self::from_settings) with an injectable
    /// environment lookup
    pub fn from_settings_with_env<F>(settings: &Settings, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut map: BTreeMap<String, String> = settings
            .section(CACHE_NAMESPACE)
            .into_iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), v))
            .collect();
        for key in RECOGNIZED_KEYS {
            let var = format!("{}{}", CACHE_ENV_PREFIX, key.to_ascii_uppercase());
            if let Some(value) = env(&var) {
                tracing::debug!(variable = %var, "Cache option overridden from environment");
                map.insert((*key).to_string(), value);
            }
        }
        Self::from_map(&map)
    }

    fn apply(&mut self, key: &str, raw: &str) {
        match key {
            "enabled" => self.enabled = bool_or(key, raw, self.enabled),
            "storage" => match raw.parse::<StorageKind>() {
                Ok(kind) => self.storage = kind,
                Err(e) => tracing::warn!(error = %e, "Falling back to file storage"),
            },
            "path" => {
                if !raw.trim().is_empty() {
                    self.path = PathBuf::from(raw.trim());
                }
            }
            "ttl" => self.ttl = parse_or(key, raw, self.ttl),
            "html" => self.view_types.html = bool_or(key, raw, true),
            "markdown" => self.view_types.markdown = bool_or(key, raw, true),
            "json" => self.view_types.json = bool_or(key, raw, true),
            "xml" => self.view_types.xml = bool_or(key, raw, true),
            "gc_probability" => {
                self.gc_probability = parse_or(key, raw, DEFAULT_GC_PROBABILITY);
            }
            "gc_divisor" => {
                let divisor = parse_or(key, raw, DEFAULT_GC_DIVISOR);
                self.gc_divisor = if divisor == 0 {
                    DEFAULT_GC_DIVISOR
                } else {
                    divisor
                };
            }
            "redis_host" => self.redis.host = raw.trim().to_string(),
            "redis_port" => self.redis.port = parse_or(key, raw, self.redis.port),
            "redis_database" => self.redis.database = parse_or(key, raw, self.redis.database),
            "redis_prefix" => self.redis.prefix = raw.to_string(),
            "redis_timeout" => {
                let secs: f64 = parse_or(key, raw, self.redis.timeout.as_secs_f64());
                match Duration::try_from_secs_f64(secs) {
                    Ok(timeout) if !timeout.is_zero() => self.redis.timeout = timeout,
                    _ => tracing::warn!(
                        key = key,
                        value = raw,
                        "Invalid Redis timeout, using default"
                    ),
                }
            }
            "redis_auth" => {
                let secret = raw.trim();
                self.redis.auth = if secret.is_empty() || secret.eq_ignore_ascii_case("null") {
                    None
                } else {
                    Some(secret.to_string())
                };
            }
            "redis_persistent" => {
                self.redis.persistent = bool_or(key, raw, self.redis.persistent);
            }
            other => tracing::debug!(key = other, "Ignoring unrecognized cache option"),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn storage_type(&self) -> StorageKind {
        self.storage
    }

    pub fn cache_path(&self) -> &Path {
        &self.path
    }

    pub fn default_ttl(&self) -> i64 {
        self.ttl
    }

    /// Per-type toggle; every type is cached unless configured otherwise
    pub fn is_view_type_enabled(&self, kind: ViewKind) -> bool {
        match kind {
            ViewKind::Html => self.view_types.html,
            ViewKind::Markdown => self.view_types.markdown,
            ViewKind::Json => self.view_types.json,
            ViewKind::Xml => self.view_types.xml,
        }
    }

    pub fn view_types(&self) -> ViewTypeFlags {
        self.view_types
    }

    /// GC probability clamped to `[0, 1]`; NaN counts as disabled
    pub fn gc_probability(&self) -> f64 {
        if self.gc_probability.is_nan() || self.gc_probability <= 0.0 {
            0.0
        } else if self.gc_probability >= 1.0 {
            1.0
        } else {
            self.gc_probability
        }
    }

    pub fn gc_divisor(&self) -> u32 {
        self.gc_divisor
    }

    pub fn redis(&self) -> &RedisConfig {
        &self.redis
    }

    pub fn redis_host(&self) -> &str {
        &self.redis.host
    }

    pub fn redis_port(&self) -> u16 {
        self.redis.port
    }

    pub fn redis_database(&self) -> u32 {
        self.redis.database
    }

    pub fn redis_prefix(&self) -> &str {
        &self.redis.prefix
    }

    pub fn redis_timeout(&self) -> Duration {
        self.redis.timeout
    }

    pub fn redis_auth(&self) -> Option<&str> {
        self.redis.auth.as_deref()
    }

    pub fn redis_persistent(&self) -> bool {
        self.redis.persistent
    }

    /// Copy of this configuration with a different enabled flag
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Copy of this configuration targeting a different backend
    pub fn with_storage(mut self, storage: StorageKind) -> Self {
        self.storage = storage;
        self
    }

    /// Copy of this configuration rooted at a different file path
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Copy of this configuration with different Redis connection parameters
    pub fn with_redis(mut self, redis: RedisConfig) -> Self {
        self.redis = redis;
        self
    }

    /// Validate backend parameters for the selected storage kind
    pub fn validate(&self) -> Result<(), CacheError> {
        if self.gc_divisor == 0 {
            return Err(CacheError::Configuration(
                "gc_divisor must be greater than zero".to_string(),
            ));
        }
        match self.storage {
            StorageKind::File => {
                if self.path.as_os_str().is_empty() {
                    return Err(CacheError::Configuration(
                        "path cannot be empty when storage is file".to_string(),
                    ));
                }
                Ok(())
            }
            StorageKind::Redis => self.redis.validate(),
            StorageKind::Auto => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CacheConfig::default();
        assert!(!config.is_enabled());
        assert_eq!(config.storage_type(), StorageKind::File);
        assert_eq!(config.default_ttl(), 3600);
        assert_eq!(config.gc_probability(), 0.01);
        assert_eq!(config.gc_divisor(), 100);
        assert!(config.cache_path().ends_with("trellis/cache/views"));
        for kind in ViewKind::ALL {
            assert!(config.is_view_type_enabled(kind));
        }
    }

    #[test]
    fn test_from_pairs_coerces_types() {
        let config = CacheConfig::from_pairs([
            ("enabled", "1"),
            ("storage", "redis"),
            ("ttl", "120"),
            ("markdown", "false"),
            ("gc_probability", "0.5"),
            ("gc_divisor", "1000"),
            ("redis_port", "6390"),
            ("redis_timeout", "0.75"),
            ("redis_persistent", "true"),
        ]);
        assert!(config.is_enabled());
        assert_eq!(config.storage_type(), StorageKind::Redis);
        assert_eq!(config.default_ttl(), 120);
        assert!(!config.is_view_type_enabled(ViewKind::Markdown));
        assert!(config.is_view_type_enabled(ViewKind::Html));
        assert_eq!(config.gc_probability(), 0.5);
        assert_eq!(config.gc_divisor(), 1000);
        assert_eq!(config.redis_port(), 6390);
        assert_eq!(config.redis_timeout(), Duration::from_millis(750));
        assert!(config.redis_persistent());
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = CacheConfig::from_pairs([
            ("enabled", "maybe"),
            ("ttl", "forever"),
            ("gc_divisor", "0"),
            ("redis_port", "99999"),
            ("storage", "memcached"),
            ("redis_timeout", "1e20"),
        ]);
        assert!(!config.is_enabled());
        assert_eq!(config.default_ttl(), 3600);
        assert_eq!(config.gc_divisor(), 100);
        assert_eq!(config.redis_port(), 6379);
        assert_eq!(config.storage_type(), StorageKind::File);
        assert_eq!(config.redis_timeout(), RedisConfig::default().timeout);
    }

    #[test]
    fn test_out_of_range_timeouts_keep_default() {
        for raw in ["-1", "0", "inf", "NaN", "1e300"] {
            let config = CacheConfig::from_pairs([("redis_timeout", raw)]);
            assert_eq!(config.redis_timeout(), RedisConfig::default().timeout, "{raw}");
        }
    }

    #[test]
    fn test_gc_probability_is_clamped() {
        let low = CacheConfig::from_pairs([("gc_probability", "-0.3")]);
        assert_eq!(low.gc_probability(), 0.0);

        let high = CacheConfig::from_pairs([("gc_probability", "4")]);
        assert_eq!(high.gc_probability(), 1.0);

        let nan = CacheConfig::from_pairs([("gc_probability", "NaN")]);
        assert_eq!(nan.gc_probability(), 0.0);
    }

    #[test]
    fn test_redis_auth_null_means_none() {
        let config = CacheConfig::from_pairs([("redis_auth", "null")]);
        assert_eq!(config.redis_auth(), None);

        let config = CacheConfig::from_pairs([("redis_auth", "hunter2")]);
        assert_eq!(config.redis_auth(), Some("hunter2"));
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let config = CacheConfig::from_pairs([("ENABLED", "true"), ("Ttl", "5")]);
        assert!(config.is_enabled());
        assert_eq!(config.default_ttl(), 5);
    }

    #[test]
    fn test_map_keys_are_case_insensitive() {
        let settings = Settings::from_pairs([("cache.Enabled", "true"), ("cache.TTL", "9")]);
        let config = CacheConfig::from_settings_with_env(&settings, |_| None);
        assert!(config.is_enabled());
        assert_eq!(config.default_ttl(), 9);
    }

    #[test]
    fn test_storage_kind_parsing() {
        assert_eq!("file".parse::<StorageKind>().unwrap(), StorageKind::File);
        assert_eq!("Remote".parse::<StorageKind>().unwrap(), StorageKind::Redis);
        assert_eq!(" auto ".parse::<StorageKind>().unwrap(), StorageKind::Auto);
        assert!("s3".parse::<StorageKind>().is_err());
    }

    #[test]
    fn test_validate() {
        let config = CacheConfig::default().with_path("");
        assert!(matches!(
            config.validate(),
            Err(CacheError::Configuration(_))
        ));

        let config = CacheConfig::from_pairs([("storage", "redis"), ("redis_host", "")]);
        assert!(config.validate().is_err());

        assert!(CacheConfig::default().validate().is_ok());
    }

    #[test]
    fn test_env_overrides_win_over_settings() {
        let settings = Settings::from_pairs([("cache.enabled", "false"), ("cache.ttl", "60")]);
        let config = CacheConfig::from_settings_with_env(&settings, |name| match name {
            "CACHE_ENABLED" => Some("true".to_string()),
            "CACHE_REDIS_PREFIX" => Some("app:".to_string()),
            _ => None,
        });
        assert!(config.is_enabled());
        assert_eq!(config.default_ttl(), 60);
        assert_eq!(config.redis_prefix(), "app:");
    }
}
