// Tool settings
// Loaded from ~/.config/tessera/settings.json (or $TESSERA_CONFIG_DIR/settings.json)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the persisted store entry when nothing else is configured
pub const DEFAULT_STORAGE_KEY: &str = "tessera-theme-store";

/// Selector the style projection is rendered under by default
pub const DEFAULT_CSS_SELECTOR: &str = ":root";

/// Environment variable that relocates the config directory
pub const CONFIG_DIR_ENV: &str = "TESSERA_CONFIG_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Directory holding the persisted store (None = config dir)
    #[serde(rename = "store.dir")]
    pub store_dir: Option<PathBuf>,

    /// Entry name of the persisted state blob
    #[serde(rename = "store.key")]
    pub storage_key: String,

    #[serde(rename = "css.selector")]
    pub css_selector: String,

    /// Reject (instead of warn about) values that don't match the schema
    #[serde(rename = "validation.strict")]
    pub strict_validation: bool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            store_dir: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            css_selector: DEFAULT_CSS_SELECTOR.to_string(),
            strict_validation: false,
        }
    }
}

impl ToolSettings {
    /// Directory for tessera's own files
    pub fn config_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
            return PathBuf::from(dir);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tessera")
    }

    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(&path);
            return settings;
        }

        Self::load_from(&path)
    }

    /// Load from an explicit path. Never fails: unreadable or unparseable
    /// files produce defaults.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => {
                // Strip comments (lines starting with //)
                let cleaned: String = contents
                    .lines()
                    .filter(|line| !line.trim().starts_with("//"))
                    .collect::<Vec<_>>()
                    .join("\n");

                match serde_json::from_str(&cleaned) {
                    Ok(settings) => settings,
                    Err(e) => {
                        log::warn!("Error parsing {}: {}; using default settings", path.display(), e);
                        Self::default()
                    }
                }
            }
            Err(e) => {
                log::warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Directory the store lives in: explicit setting, else the config dir
    pub fn resolved_store_dir(&self) -> PathBuf {
        self.store_dir.clone().unwrap_or_else(Self::config_dir)
    }

    /// Create default settings file with comments
    fn create_default_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Error creating config directory: {}", e);
                return;
            }
        }

        let default_config = r#"{
    // Where the theme store is persisted (null = this directory)
    "store.dir": null,
    "store.key": "tessera-theme-store",

    // Selector used by `tessera css`
    "css.selector": ":root",

    // Reject values that don't match the theme schema instead of warning
    "validation.strict": false
}
"#;

        if let Err(e) = fs::write(path, default_config) {
            log::warn!("Error writing default settings.json: {}", e);
        }
    }
}
