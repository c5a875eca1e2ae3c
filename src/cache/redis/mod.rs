// Redis view cache storage module
//
// Shares one Redis instance safely with unrelated data by namespacing every
// key under a configurable prefix.

pub mod config;
pub mod key;
mod storage;

pub use config::RedisConfig;
pub use storage::RedisStorage;
