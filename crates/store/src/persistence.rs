//! Persisted state blob (encode/decode)
//!
//! The store writes one JSON object per storage entry:
//! `{ role, masterConfig, merchantOverride, projectConfig, docPages,
//!    isSetupComplete, isAuthenticated, authData, customerDetail, devTermMode }`
//!
//! Decoding never fails. A missing or unparseable blob yields defaults, and
//! each field is recovered on its own so one bad field doesn't cost the rest.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use tessera_config::{ThemePatch, ThemeState};

use crate::error::StoreError;
use crate::role::Role;
use crate::session::{AuthData, CustomerDetail, DocPage, ProjectConfig};

/// Everything the store persists. `computedTheme` is deliberately absent:
/// it is always rebuilt from the two layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedState {
    pub role: Role,
    pub master_config: ThemeState,
    pub merchant_override: ThemePatch,
    pub project_config: ProjectConfig,
    pub doc_pages: Vec<DocPage>,
    pub is_setup_complete: bool,
    pub is_authenticated: bool,
    pub auth_data: Option<AuthData>,
    pub customer_detail: Option<CustomerDetail>,
    pub dev_term_mode: bool,
}

pub fn encode_blob(state: &PersistedState) -> Result<String, StoreError> {
    Ok(serde_json::to_string(state)?)
}

/// Decode a stored blob, substituting defaults for anything unusable
pub fn decode_blob(blob: &str) -> PersistedState {
    let root: Value = match serde_json::from_str(blob) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("Persisted theme state is not valid JSON ({e}); using defaults");
            return PersistedState::default();
        }
    };

    let mut map = match root {
        Value::Object(map) => map,
        other => {
            log::warn!("Persisted theme state is a JSON {}, not an object; using defaults", json_kind(&other));
            return PersistedState::default();
        }
    };

    // Blobs written by the browser persist middleware are wrapped as
    // { "state": {...}, "version": n }
    if map.contains_key("version") && map.get("state").is_some_and(Value::is_object) {
        if let Some(Value::Object(inner)) = map.remove("state") {
            map = inner;
        }
    }

    let mut state = PersistedState::default();
    take_field(&mut map, "role", &mut state.role);
    take_field(&mut map, "masterConfig", &mut state.master_config);
    take_field(&mut map, "merchantOverride", &mut state.merchant_override);
    take_field(&mut map, "projectConfig", &mut state.project_config);
    take_field(&mut map, "docPages", &mut state.doc_pages);
    take_field(&mut map, "isSetupComplete", &mut state.is_setup_complete);
    take_field(&mut map, "isAuthenticated", &mut state.is_authenticated);
    take_field(&mut map, "authData", &mut state.auth_data);
    take_field(&mut map, "customerDetail", &mut state.customer_detail);
    take_field(&mut map, "devTermMode", &mut state.dev_term_mode);
    state
}

/// Overwrite `slot` with the decoded field, leaving the default on failure
fn take_field<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str, slot: &mut T) {
    let Some(value) = map.remove(key) else {
        return;
    };
    match serde_json::from_value(value) {
        Ok(v) => *slot = v,
        Err(e) => log::warn!("Ignoring malformed '{key}' in persisted theme state: {e}"),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
