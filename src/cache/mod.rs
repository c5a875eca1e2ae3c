// View output cache module
//
// Caches rendered view output keyed by (controller, page, data fingerprint)
// over a file or Redis storage backend.

pub mod config;
pub mod disk;
pub mod entry;
pub mod error;
pub mod factory;
pub mod gc;
pub mod key;
pub mod redis;
pub mod stats;
pub mod traits;
pub mod view_cache;

pub use config::{CacheConfig, StorageKind, ViewTypeFlags};
pub use disk::FileStorage;
pub use error::CacheError;
pub use factory::StorageBackend;
pub use gc::GcPolicy;
pub use redis::{RedisConfig, RedisStorage};
pub use stats::{StorageStats, ViewCacheStats};
pub use traits::Storage;
pub use view_cache::{CacheOverride, ViewCache};
