// Settings source
//
// Application settings are loaded from YAML, with `${VAR}` references
// substituted from the environment, then flattened into dotted keys holding
// scalar strings (`cache.enabled`, `cache.redis_host`, ...). Typed views such
// as `CacheConfig` are built on top of a namespace of this map.

use regex::Regex;
use serde_yaml::Value;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Environment variable '{0}' is referenced but not set")]
    MissingEnvVar(String),

    #[error("Invalid substitution pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Settings root must be a mapping")]
    NotAMapping,
}

/// Flat, read-only settings map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    values: BTreeMap<String, String>,
}

/// Replace every `${VAR}` with the value returned by `lookup`
pub fn substitute_env<F>(yaml: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")?;

    for caps in re.captures_iter(yaml) {
        let var_name = &caps[1];
        if lookup(var_name).is_none() {
            return Err(ConfigError::MissingEnvVar(var_name.to_string()));
        }
    }

    let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
        lookup(&caps[1]).unwrap_or_default()
    });
    Ok(substituted.into_owned())
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn flatten_into(prefix: &str, value: &Value, out: &mut BTreeMap<String, String>) {
    let join = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        }
    };

    match value {
        Value::Mapping(map) => {
            for (k, v) in map {
                if let Some(key) = scalar_to_string(k) {
                    flatten_into(&join(&key), v, out);
                }
            }
        }
        Value::Sequence(items) => {
            for (i, v) in items.iter().enumerate() {
                flatten_into(&join(&i.to_string()), v, out);
            }
        }
        Value::Tagged(tagged) => flatten_into(prefix, &tagged.value, out),
        scalar => {
            if let Some(s) = scalar_to_string(scalar) {
                out.insert(prefix.to_string(), s);
            }
        }
    }
}

impl Settings {
    /// Build settings directly from dotted key/value pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, ConfigError> {
        Self::from_yaml_with(yaml, |name| std::env::var(name).ok())
    }

    /// Parse YAML using `lookup` to resolve `${VAR}` references
    pub fn from_yaml_with<F>(yaml: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let substituted = substitute_env(yaml, lookup)?;
        let root: Value = serde_yaml::from_str(&substituted)?;

        let mut values = BTreeMap::new();
        match &root {
            Value::Mapping(_) => flatten_into("", &root, &mut values),
            Value::Null => {}
            _ => return Err(ConfigError::NotAMapping),
        }
        Ok(Self { values })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every key under `namespace.`, with the namespace stripped
    pub fn section(&self, namespace: &str) -> BTreeMap<String, String> {
        let prefix = format!("{}.", namespace);
        self.values
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(&prefix)
                    .map(|rest| (rest.to_string(), v.clone()))
            })
            .collect()
    }
}
