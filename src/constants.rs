// Constants module - centralized default values for configuration
//
// Every documented default for the view cache lives here so that the config
// layer, the storage factory and the CLI agree on the same values.

// =============================================================================
// Cache defaults
// =============================================================================

/// Configuration namespace holding all cache options
pub const CACHE_NAMESPACE: &str = "cache";

/// Prefix of environment variables overriding cache options (`CACHE_TTL`, ...)
pub const CACHE_ENV_PREFIX: &str = "CACHE_";

/// Default TTL in seconds
pub const DEFAULT_TTL_SECONDS: i64 = 3600;

/// Directory (below the system temp dir) used when no cache path is configured
pub const DEFAULT_CACHE_SUBDIR: &str = "trellis/cache/views";

/// Default probability that a successful write triggers garbage collection
pub const DEFAULT_GC_PROBABILITY: f64 = 0.01;

/// Default sampling divisor for the garbage collection draw
pub const DEFAULT_GC_DIVISOR: u32 = 100;

// =============================================================================
// File backend layout
// =============================================================================

/// Extension of the content file of an entry
pub const CONTENT_EXTENSION: &str = "cache";

/// Extension of the metadata sidecar of an entry
pub const META_EXTENSION: &str = "meta";

/// Number of leading hash characters used as the shard directory name
pub const SHARD_PREFIX_LEN: usize = 2;

/// Extension appended to in-flight atomic write files
pub const TEMP_EXTENSION: &str = "tmp";

/// Minimum age before GC removes a content file without metadata or a stray
/// temp file, leaving in-flight writers alone
pub const ORPHAN_GRACE_SECS: u64 = 60;

// =============================================================================
// Redis defaults
// =============================================================================

/// Default Redis host
pub const DEFAULT_REDIS_HOST: &str = "127.0.0.1";

/// Default Redis port
pub const DEFAULT_REDIS_PORT: u16 = 6379;

/// Default Redis logical database
pub const DEFAULT_REDIS_DATABASE: u32 = 0;

/// Default namespace prepended to every Redis key
pub const DEFAULT_REDIS_PREFIX: &str = "trellis:view:";

/// Default connect/operation timeout in seconds
pub const DEFAULT_REDIS_TIMEOUT_SECS: f64 = 2.5;

/// Number of keys requested per SCAN round trip
pub const REDIS_SCAN_COUNT: usize = 500;

// =============================================================================
// Views
// =============================================================================

/// Default directory holding `<controller>/<page>.<ext>` templates
pub const DEFAULT_VIEWS_DIR: &str = "views";
