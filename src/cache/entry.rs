//! Cache entry metadata
//!
//! `EntryMetadata` is the `{created, ttl, expires}` record the file backend
//! stores next to each content file. The Redis backend carries the same
//! information implicitly in the server-side key expiry.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as whole seconds since the Unix epoch
pub fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Metadata sidecar for a cached entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// Creation time (epoch seconds)
    pub created: u64,
    /// Requested TTL in seconds; `<= 0` stores the entry without expiry
    pub ttl: i64,
    /// Expiry time (epoch seconds); `0` means the entry never expires
    pub expires: u64,
}

impl EntryMetadata {
    pub fn new(created: u64, ttl: i64) -> Self {
        let expires = if ttl > 0 { created + ttl as u64 } else { 0 };
        Self {
            created,
            ttl,
            expires,
        }
    }

    /// Build metadata for an entry written right now
    pub fn now(ttl: i64) -> Self {
        Self::new(now_secs(), ttl)
    }

    pub fn never_expires(&self) -> bool {
        self.expires == 0
    }

    /// An entry is expired once `now` is strictly past its expiry time
    pub fn is_expired(&self, now: u64) -> bool {
        self.expires > 0 && now > self.expires
    }

    /// Seconds left before expiry, `None` for entries without expiry
    pub fn remaining(&self, now: u64) -> Option<u64> {
        if self.never_expires() {
            None
        } else {
            Some(self.expires.saturating_sub(now))
        }
    }
}
