// Redis cache configuration module

use serde::Serialize;
use std::time::Duration;

use crate::cache::CacheError;
use crate::constants::{
    DEFAULT_REDIS_DATABASE, DEFAULT_REDIS_HOST, DEFAULT_REDIS_PORT, DEFAULT_REDIS_PREFIX,
    DEFAULT_REDIS_TIMEOUT_SECS,
};

/// Redis-specific cache configuration
///
/// Populated from the `redis_*` keys of the `cache` namespace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    /// Logical database selected after connecting
    pub database: u32,
    /// Namespace prepended to every key this backend touches
    pub prefix: String,
    /// Applied to the initial connect and to every command
    #[serde(serialize_with = "serialize_secs")]
    pub timeout: Duration,
    #[serde(skip_serializing)]
    pub auth: Option<String>,
    /// Keep one managed connection for the backend lifetime instead of
    /// connecting per call
    pub persistent: bool,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_REDIS_HOST.to_string(),
            port: DEFAULT_REDIS_PORT,
            database: DEFAULT_REDIS_DATABASE,
            prefix: DEFAULT_REDIS_PREFIX.to_string(),
            timeout: Duration::from_secs_f64(DEFAULT_REDIS_TIMEOUT_SECS),
            auth: None,
            persistent: false,
        }
    }
}

impl RedisConfig {
    /// Connection URL in the form `redis://[:auth@]host:port/db`
    ///
    /// The auth secret is percent-encoded so that passwords containing `@`
    /// or `/` survive URL parsing.
    pub fn connection_url(&self) -> String {
        match &self.auth {
            Some(secret) if !secret.is_empty() => format!(
                "redis://:{}@{}:{}/{}",
                urlencoding::encode(secret),
                self.host,
                self.port,
                self.database
            ),
            _ => format!("redis://{}:{}/{}", self.host, self.port, self.database),
        }
    }

    pub fn validate(&self) -> Result<(), CacheError> {
        if self.host.trim().is_empty() {
            return Err(CacheError::Configuration(
                "redis_host cannot be empty".to_string(),
            ));
        }
        if self.port == 0 {
            return Err(CacheError::Configuration(
                "redis_port must be between 1 and 65535".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(CacheError::Configuration(
                "redis_timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RedisConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 6379);
        assert_eq!(config.database, 0);
        assert_eq!(config.prefix, "trellis:view:");
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert!(config.auth.is_none());
        assert!(!config.persistent);
    }

    #[test]
    fn test_connection_url_without_auth() {
        let config = RedisConfig {
            host: "cache.internal".to_string(),
            port: 6380,
            database: 3,
            ..Default::default()
        };
        assert_eq!(config.connection_url(), "redis://cache.internal:6380/3");
    }

    #[test]
    fn test_connection_url_encodes_auth_secret() {
        let config = RedisConfig {
            auth: Some("p@ss/word".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.connection_url(),
            "redis://:p%40ss%2Fword@127.0.0.1:6379/0"
        );
    }

    #[test]
    fn test_empty_auth_is_ignored() {
        let config = RedisConfig {
            auth: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(config.connection_url(), "redis://127.0.0.1:6379/0");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let empty_host = RedisConfig {
            host: " ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            empty_host.validate(),
            Err(CacheError::Configuration(_))
        ));

        let zero_port = RedisConfig {
            port: 0,
            ..Default::default()
        };
        assert!(zero_port.validate().is_err());

        let zero_timeout = RedisConfig {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(zero_timeout.validate().is_err());

        assert!(RedisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_auth_is_not_serialized() {
        let config = RedisConfig {
            auth: Some("secret".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"timeout\":2.5"));
    }
}
