use std::collections::BTreeMap;

use super::Value;

/// Named item values read by the built-in expression evaluator.
///
/// Keys are dotted paths such as `"Rarity"` or `"Sockets.Count"`. Lookups are
/// exact first, then ASCII case-insensitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: BTreeMap<String, Value>,
}

impl Properties {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value at `path`, replacing any previous value.
    #[must_use]
    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Self {
        self.insert(path, value.into());
        self
    }

    pub fn insert(&mut self, path: &str, value: Value) {
        self.values.insert(path.to_owned(), value);
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        self.values.get(path).or_else(|| {
            self.values
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(path))
                .map(|(_, value)| value)
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}
