//! File-based view cache storage
//!
//! Each entry is two sibling files sharing a hash-derived name:
//! - `{root}/{hash[..2]}/{hash}.cache`: raw rendered content
//! - `{root}/{hash[..2]}/{hash}.meta`: JSON `{created, ttl, expires}`
//!
//! Filesystem access goes through the [`DiskBackend`] trait so tests can
//! inject failures.

pub use self::backend::{DiskBackend, DiskEntry};
pub use self::storage::FileStorage;
pub use self::tokio_backend::TokioFsBackend;

pub mod backend;
mod storage;
pub mod tokio_backend;
pub mod utils;

#[cfg(test)]
mod mock_backend;
