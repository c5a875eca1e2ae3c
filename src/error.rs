// Error types module

use thiserror::Error;

use crate::cache::CacheError;
use crate::config::ConfigError;
use crate::view::ViewError;

/// Crate-wide error
///
/// Groups the module errors for callers that want a single type at their
/// boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// Settings could not be loaded (unreadable file, invalid YAML, missing env var)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Cache backend construction or operation failed
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Template lookup or rendering failed
    #[error("View error: {0}")]
    View(#[from] ViewError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_the_category() {
        let err = Error::from(CacheError::Configuration("path cannot be empty".to_string()));
        assert_eq!(
            err.to_string(),
            "Cache error: Configuration error: path cannot be empty"
        );

        let err = Error::from(ConfigError::MissingEnvVar("HOME_DIR".to_string()));
        assert!(err.to_string().starts_with("Configuration error:"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<Error>();
    }
}
