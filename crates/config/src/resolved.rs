//! Resolved theme (runtime truth)
//!
//! ComputedTheme = MerchantOverride + MasterConfig
//!
//! Merge rule: Override.Value > Master. An override entry that is absent or
//! `Inherit` defers to master.

use crate::patch::ThemePatch;
use crate::theme::{ThemeField, ThemeState, ThemeValue};

/// Build the effective theme from scratch.
///
/// Always a full recomputation: start from a copy of `master` and overwrite
/// every key the override defines.
pub fn resolve(master: &ThemeState, overrides: &ThemePatch) -> ThemeState {
    let mut computed = master.clone();
    for (key, value) in overrides.defined() {
        computed.insert(key, value.clone());
    }
    computed
}

/// Resolve a single known field without building the whole theme
pub fn resolve_field(master: &ThemeState, overrides: &ThemePatch, field: ThemeField) -> ThemeValue {
    overrides
        .value(field.key())
        .or_else(|| master.field(field))
        .cloned()
        .unwrap_or_else(|| field.default_value())
}
