//! Layered theme store with persistence
//!
//! Holds a master theme config and a sparse merchant override, keeps the
//! computed theme in sync after every write, and persists both layers (plus
//! session data) as a single JSON blob.

pub mod error;
pub mod export;
pub mod persistence;
pub mod role;
pub mod session;
pub mod shared;
pub mod storage;
pub mod store;

pub use error::StoreError;
pub use export::ThemeExport;
pub use persistence::PersistedState;
pub use role::Role;
pub use session::{AuthData, CustomerDetail, DocPage, ProjectConfig};
pub use shared::SharedThemeStore;
pub use storage::{FileStorage, MemoryStorage, StateStorage};
pub use store::{Layer, ThemeStore};
pub use tessera_config::settings::DEFAULT_STORAGE_KEY;
