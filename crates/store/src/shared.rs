//! Thread-safe handle to a `ThemeStore`
//!
//! Each call holds the lock for the whole mutate, recompute, persist
//! sequence, so readers never observe a computed theme that disagrees with
//! the layers.

use std::sync::Arc;

use parking_lot::Mutex;

use tessera_config::{ThemePatch, ThemeState};

use crate::role::Role;
use crate::storage::StateStorage;
use crate::store::ThemeStore;

pub struct SharedThemeStore<S: StateStorage> {
    inner: Arc<Mutex<ThemeStore<S>>>,
}

impl<S: StateStorage> Clone for SharedThemeStore<S> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S: StateStorage> SharedThemeStore<S> {
    pub fn new(store: ThemeStore<S>) -> Self {
        Self { inner: Arc::new(Mutex::new(store)) }
    }

    /// Read under the lock
    pub fn with<R>(&self, f: impl FnOnce(&ThemeStore<S>) -> R) -> R {
        let store = self.inner.lock();
        f(&store)
    }

    /// Mutate under the lock. Several operations in one closure are atomic
    /// together.
    pub fn update<R>(&self, f: impl FnOnce(&mut ThemeStore<S>) -> R) -> R {
        let mut store = self.inner.lock();
        f(&mut store)
    }

    pub fn computed_theme(&self) -> ThemeState {
        self.with(|s| s.computed_theme().clone())
    }

    pub fn role(&self) -> Role {
        self.with(|s| s.role())
    }

    pub fn set_role(&self, role: Role) {
        self.update(|s| s.set_role(role));
    }

    pub fn set_master_config(&self, patch: ThemePatch) {
        self.update(|s| s.set_master_config(patch));
    }

    pub fn set_merchant_override(&self, patch: ThemePatch) {
        self.update(|s| s.set_merchant_override(patch));
    }

    pub fn update_theme_as(&self, role: Role, patch: ThemePatch) {
        self.update(|s| s.update_theme_as(role, patch));
    }
}

impl<S: StateStorage> From<ThemeStore<S>> for SharedThemeStore<S> {
    fn from(store: ThemeStore<S>) -> Self {
        Self::new(store)
    }
}
