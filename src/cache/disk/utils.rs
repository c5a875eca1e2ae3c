//! Utility functions for the file storage layout

use std::path::{Path, PathBuf};

use crate::cache::key::hash_hex;
use crate::constants::{CONTENT_EXTENSION, META_EXTENSION, SHARD_PREFIX_LEN, TEMP_EXTENSION};

/// Filesystem locations of one entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPaths {
    /// Shard directory holding both files
    pub dir: PathBuf,
    pub content: PathBuf,
    pub meta: PathBuf,
}

/// Convert a cache key to the 128-bit hex hash used as its file name
pub fn key_to_hash(key: &str) -> String {
    hash_hex(key.as_bytes())
}

/// Generate shard directory, content and metadata paths for a key
///
/// Layout: `{root}/{hash[..2]}/{hash}.cache` and `{root}/{hash[..2]}/{hash}.meta`
pub fn entry_paths(root: &Path, key: &str) -> EntryPaths {
    let hash = key_to_hash(key);
    let dir = root.join(&hash[..SHARD_PREFIX_LEN]);
    let content = dir.join(format!("{}.{}", hash, CONTENT_EXTENSION));
    let meta = dir.join(format!("{}.{}", hash, META_EXTENSION));
    EntryPaths { dir, content, meta }
}

/// Content file belonging to a metadata sidecar
pub fn content_path_for_meta(meta: &Path) -> PathBuf {
    meta.with_extension(CONTENT_EXTENSION)
}

/// Metadata sidecar belonging to a content file
pub fn meta_path_for_content(content: &Path) -> PathBuf {
    content.with_extension(META_EXTENSION)
}

pub fn is_meta_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(META_EXTENSION)
}

pub fn is_content_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(CONTENT_EXTENSION)
}

/// Leftover of an atomic write that never got renamed into place
pub fn is_temp_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(TEMP_EXTENSION)
}
