// Trellis MVC view layer with a rendered-output cache

pub mod cache;
pub mod commands;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod logging;
pub mod view;

pub use cache::{CacheConfig, CacheError, CacheOverride, Storage, StorageBackend, ViewCache};
pub use controller::Controller;
pub use error::{Error, Result};
pub use view::{ViewData, ViewEngine, ViewError, ViewKind};
