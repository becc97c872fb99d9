use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tessera_config::{ThemePatch, ThemeState};

use crate::error::StoreError;
use crate::role::Role;

pub const EXPORT_VERSION: u32 = 1;

/// Snapshot of both layers plus the theme they resolve to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeExport {
    pub version: u32,
    pub exported_at: DateTime<Utc>,
    pub role: Role,
    pub master: ThemeState,
    #[serde(rename = "override")]
    pub merchant_override: ThemePatch,
    pub computed: ThemeState,
}

impl ThemeExport {
    pub fn to_json_pretty(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        Ok(serde_json::from_str(json)?)
    }
}
