//! Storage backends for the persisted blob
//!
//! A backend is a string-keyed blob store. Reads never fail: a missing or
//! unreadable entry is simply `None` and the store falls back to defaults.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub trait StateStorage {
    /// The blob stored under `key`, if there is one
    fn load(&self, key: &str) -> Option<String>;

    /// Replace the blob stored under `key`
    fn save(&mut self, key: &str, blob: &str) -> io::Result<()>;
}

/// One `<key>.json` file per entry inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Platform data location: `~/.config/tessera` on Linux
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tessera")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing `key`. Keys name a file inside `dir`, so path
    /// separators and `..` are rejected.
    pub fn path_for(&self, key: &str) -> io::Result<PathBuf> {
        Self::check_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    pub fn check_key(key: &str) -> io::Result<()> {
        if key.is_empty() || key.contains(['/', '\\']) || key.contains("..") {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid storage key '{key}'"),
            ));
        }
        Ok(())
    }
}

impl Default for FileStorage {
    fn default() -> Self {
        Self::new(Self::default_dir())
    }
}

impl StateStorage for FileStorage {
    fn load(&self, key: &str) -> Option<String> {
        let path = match self.path_for(key) {
            Ok(path) => path,
            Err(e) => {
                log::warn!("{e}");
                return None;
            }
        };
        match fs::read_to_string(&path) {
            Ok(blob) => Some(blob),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("Failed to read {}: {e}", path.display());
                None
            }
        }
    }

    fn save(&mut self, key: &str, blob: &str) -> io::Result<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let temp = path.with_extension("json.tmp");

        fs::write(&temp, blob)?;
        // Atomic rename
        fs::rename(&temp, &path)?;
        log::debug!("Saved theme state to {}", path.display());
        Ok(())
    }
}

/// In-process storage, for tests and embedders that persist elsewhere
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with one entry
    pub fn with_entry(key: impl Into<String>, blob: impl Into<String>) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.into(), blob.into());
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &str, blob: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), blob.to_string());
        Ok(())
    }
}
