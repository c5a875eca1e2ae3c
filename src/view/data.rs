//! Render data passed from controllers to views
//!
//! Entries are either plain JSON data or helpers. Helpers are callables
//! exposed to templates; they carry no serializable state and are therefore
//! left out of cache fingerprints and of JSON/XML output.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Template helper: receives its argument text and returns markup
pub type HelperFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

#[derive(Clone)]
pub enum ViewValue {
    Data(Value),
    Helper(HelperFn),
}

impl fmt::Debug for ViewValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewValue::Data(value) => f.debug_tuple("Data").field(value).finish(),
            ViewValue::Helper(_) => f.write_str("Helper(<fn>)"),
        }
    }
}

/// Name-sorted map of render data
#[derive(Debug, Clone, Default)]
pub struct ViewData {
    entries: BTreeMap<String, ViewValue>,
}

impl ViewData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object; any other value yields empty data
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Object(map) => map.into_iter().collect(),
            _ => Self::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.entries.insert(name.into(), ViewValue::Data(value));
        self
    }

    pub fn insert_helper(&mut self, name: impl Into<String>, helper: HelperFn) -> &mut Self {
        self.entries.insert(name.into(), ViewValue::Helper(helper));
        self
    }

    pub fn get(&self, name: &str) -> Option<&ViewValue> {
        self.entries.get(name)
    }

    /// Resolve a dotted path (`user.name`, `items.0`) against the data entries
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let head = segments.next()?;
        let mut current = match self.entries.get(head)? {
            ViewValue::Data(value) => value,
            ViewValue::Helper(_) => return None,
        };
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn helper(&self, name: &str) -> Option<&HelperFn> {
        match self.entries.get(name)? {
            ViewValue::Helper(helper) => Some(helper),
            ViewValue::Data(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ViewValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Data entries as a JSON object, helpers omitted
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .filter_map(|(name, value)| match value {
                    ViewValue::Data(v) => Some((name.clone(), v.clone())),
                    ViewValue::Helper(_) => None,
                })
                .collect(),
        )
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ViewData {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut data = ViewData::new();
        for (name, value) in iter {
            data.insert(name, value);
        }
        data
    }
}
