//! Per-key slot of the merchant override.
//!
//! An override key is in one of three states. Absent means never touched,
//! `Inherit` means deliberately handed back to master, and `Value` wins over
//! master. Absent and `Inherit` resolve the same way; only the override map
//! can tell them apart.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// `Inherit` is written as JSON `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting<T> {
    Inherit,
    Value(T),
}

impl<T> Setting<T> {
    pub fn is_inherit(&self) -> bool {
        matches!(self, Setting::Inherit)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Setting::Value(v) => Some(v),
            Setting::Inherit => None,
        }
    }
}

impl<T> Default for Setting<T> {
    fn default() -> Self {
        Setting::Inherit
    }
}

impl<T> From<Option<T>> for Setting<T> {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Setting::Inherit, Setting::Value)
    }
}

impl<T: Serialize> Serialize for Setting<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Setting<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Setting::from)
    }
}
