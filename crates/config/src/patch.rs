//! Sparse theme patches
//!
//! A `ThemePatch` is both the argument of a layer update and the storage
//! shape of the merchant override layer. Keys map to `Setting<ThemeValue>`:
//! an explicit `Inherit` is a real entry, distinct from the key being absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::setting::Setting;
use crate::theme::ThemeValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemePatch {
    entries: BTreeMap<String, Setting<ThemeValue>>,
}

impl ThemePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set `key` to a defined value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ThemeValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Builder: mark `key` as explicitly deferring to the parent layer
    pub fn inherit(mut self, key: impl Into<String>) -> Self {
        self.clear(key);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ThemeValue>) {
        self.entries.insert(key.into(), Setting::Value(value.into()));
    }

    /// Store an explicit `Inherit` for `key` (the entry stays in the map)
    pub fn clear(&mut self, key: impl Into<String>) {
        self.entries.insert(key.into(), Setting::Inherit);
    }

    pub fn insert(&mut self, key: impl Into<String>, setting: Setting<ThemeValue>) {
        self.entries.insert(key.into(), setting);
    }

    /// Drop the entry entirely, as if the key had never been touched
    pub fn remove(&mut self, key: &str) -> Option<Setting<ThemeValue>> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Setting<ThemeValue>> {
        self.entries.get(key)
    }

    /// The defined value for `key`, if any
    pub fn value(&self, key: &str) -> Option<&ThemeValue> {
        self.entries.get(key).and_then(Setting::value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Setting<ThemeValue>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries with a defined value
    pub fn defined(&self) -> impl Iterator<Item = (&str, &ThemeValue)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| v.value().map(|v| (k.as_str(), v)))
    }

    /// Shallow-merge `other` over this patch.
    ///
    /// Every entry of `other` overwrites, including explicit `Inherit`
    /// entries, which is how an override is reset to "no override".
    pub fn merge(&mut self, other: &ThemePatch) {
        for (key, setting) in &other.entries {
            self.entries.insert(key.clone(), setting.clone());
        }
    }

    /// A patch with the same keys, each set to `Inherit`
    pub fn clearing(&self) -> ThemePatch {
        let entries = self
            .entries
            .keys()
            .map(|k| (k.clone(), Setting::Inherit))
            .collect();
        ThemePatch { entries }
    }
}

impl FromIterator<(String, Setting<ThemeValue>)> for ThemePatch {
    fn from_iter<I: IntoIterator<Item = (String, Setting<ThemeValue>)>>(iter: I) -> Self {
        ThemePatch { entries: iter.into_iter().collect() }
    }
}
