//! Parameter store accumulated from the command stream.

use hashbrown::HashMap;

use crate::error::LaunchError;

/// Ordered multi-map from key to values.
///
/// Keys are case-sensitive. Values are only ever appended, and the order in
/// which they were added is preserved per key. A key that was never added is
/// distinct from a key whose list is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    map: HashMap<String, Vec<String>>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the list for `key`, creating the list if absent.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.map.entry(key.into()).or_default().push(value.into());
    }

    /// All values for `key`, or `KeyNotFound` if it was never added.
    pub fn all(&self, key: &str) -> Result<&[String], LaunchError> {
        self.map
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| LaunchError::KeyNotFound(key.to_string()))
    }

    /// All values for `key`, or `default` if the key is absent or empty.
    pub fn all_or_default(&self, key: &str, default: Vec<String>) -> Vec<String> {
        match self.map.get(key) {
            Some(values) if !values.is_empty() => values.clone(),
            _ => default,
        }
    }

    /// First value for `key`, or `KeyNotFound` if absent or empty.
    pub fn first(&self, key: &str) -> Result<&str, LaunchError> {
        self.map
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
            .ok_or_else(|| LaunchError::KeyNotFound(key.to_string()))
    }

    /// First value for `key`, or `default` if absent or empty.
    pub fn first_or_default<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.first_opt(key).unwrap_or(default)
    }

    /// First value for `key`, if any.
    pub fn first_opt(&self, key: &str) -> Option<&str> {
        self.map
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
