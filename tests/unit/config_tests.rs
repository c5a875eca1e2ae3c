// Cache configuration unit tests

use rstest::rstest;
use std::time::Duration;
use trellis::cache::config::parse_bool;
use trellis::cache::{CacheConfig, StorageKind};
use trellis::config::Settings;
use trellis::ViewKind;

#[rstest]
#[case("true", Some(true))]
#[case("1", Some(true))]
#[case("Yes", Some(true))]
#[case("on", Some(true))]
#[case("false", Some(false))]
#[case("0", Some(false))]
#[case("off", Some(false))]
#[case("", Some(false))]
#[case("enabled", None)]
fn test_bool_coercion(#[case] raw: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool(raw), expected);
}

#[rstest]
#[case("file", StorageKind::File)]
#[case("filesystem", StorageKind::File)]
#[case("redis", StorageKind::Redis)]
#[case("remote", StorageKind::Redis)]
#[case("auto", StorageKind::Auto)]
fn test_storage_names(#[case] raw: &str, #[case] expected: StorageKind) {
    let config = CacheConfig::from_pairs([("storage", raw)]);
    assert_eq!(config.storage_type(), expected);
}

#[test]
fn test_full_yaml_settings() {
    let yaml = r#"
cache:
  enabled: "1"
  storage: redis
  path: /var/cache/trellis
  ttl: 600
  html: true
  json: "0"
  gc_probability: 0.2
  gc_divisor: 50
  redis_host: cache.internal
  redis_port: 6380
  redis_database: 3
  redis_prefix: "shop:"
  redis_timeout: 1.5
  redis_auth: s3cret
  redis_persistent: yes
"#;
    let settings = Settings::from_yaml_with(yaml, |_| None).unwrap();
    let config = CacheConfig::from_settings_with_env(&settings, |_| None);

    assert!(config.is_enabled());
    assert_eq!(config.storage_type(), StorageKind::Redis);
    assert_eq!(config.cache_path().to_str(), Some("/var/cache/trellis"));
    assert_eq!(config.default_ttl(), 600);
    assert!(config.is_view_type_enabled(ViewKind::Html));
    assert!(!config.is_view_type_enabled(ViewKind::Json));
    assert!(config.is_view_type_enabled(ViewKind::Xml));
    assert_eq!(config.gc_probability(), 0.2);
    assert_eq!(config.gc_divisor(), 50);
    assert_eq!(config.redis_host(), "cache.internal");
    assert_eq!(config.redis_port(), 6380);
    assert_eq!(config.redis_database(), 3);
    assert_eq!(config.redis_prefix(), "shop:");
    assert_eq!(config.redis_timeout(), Duration::from_millis(1500));
    assert_eq!(config.redis_auth(), Some("s3cret"));
    assert!(config.redis_persistent());
    assert_eq!(
        config.redis().connection_url(),
        "redis://:s3cret@cache.internal:6380/3"
    );
}

#[test]
fn test_absent_namespace_uses_defaults() {
    let settings = Settings::from_pairs([("app.name", "demo")]);
    let config = CacheConfig::from_settings_with_env(&settings, |_| None);
    assert_eq!(config, CacheConfig::default());
}

#[test]
fn test_environment_variable_names() {
    let settings = Settings::default();
    let config = CacheConfig::from_settings_with_env(&settings, |name| match name {
        "CACHE_STORAGE" => Some("auto".to_string()),
        "CACHE_GC_PROBABILITY" => Some("1".to_string()),
        "CACHE_REDIS_PERSISTENT" => Some("on".to_string()),
        _ => None,
    });
    assert_eq!(config.storage_type(), StorageKind::Auto);
    assert_eq!(config.gc_probability(), 1.0);
    assert!(config.redis_persistent());
}
