//! Layered theme store
//!
//! `ThemeStore` owns the two theme layers (master config and merchant
//! override), the session data that travels with them, and the derived
//! computed theme. Every mutation runs to completion before returning:
//! merge, recompute, project to style variables, notify sinks, persist.
//!
//! There is no process-wide instance. Whoever owns the UI owns the store;
//! wrap it in [`SharedThemeStore`](crate::SharedThemeStore) to share it
//! across threads.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde_json::{Map, Value};

use tessera_config::settings::DEFAULT_STORAGE_KEY;
use tessera_config::{resolve, CssVariables, StyleSink, ThemePatch, ThemePreset, ThemeState};

use crate::error::StoreError;
use crate::export::{ThemeExport, EXPORT_VERSION};
use crate::persistence::{decode_blob, encode_blob, PersistedState};
use crate::role::Role;
use crate::session::{AuthData, CustomerDetail, DocPage, ProjectConfig};
use crate::storage::{MemoryStorage, StateStorage};

/// One of the two writable theme layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Master,
    Override,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::Master => "master",
            Layer::Override => "override",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "master" => Ok(Layer::Master),
            "override" | "merchant" => Ok(Layer::Override),
            other => Err(format!("unknown layer '{other}' (expected master or override)")),
        }
    }
}

pub struct ThemeStore<S: StateStorage> {
    storage: S,
    storage_key: String,
    state: PersistedState,
    computed: ThemeState,
    projection: CssVariables,
    sinks: Vec<Box<dyn StyleSink + Send>>,
}

impl ThemeStore<MemoryStorage> {
    /// Fresh store backed by in-process storage
    pub fn in_memory() -> Self {
        Self::hydrate(MemoryStorage::new())
    }
}

impl<S: StateStorage> ThemeStore<S> {
    /// Load persisted state under the default key, or start from defaults
    pub fn hydrate(storage: S) -> Self {
        Self::hydrate_with_key(storage, DEFAULT_STORAGE_KEY)
    }

    pub fn hydrate_with_key(storage: S, key: impl Into<String>) -> Self {
        let storage_key = key.into();
        let state = match storage.load(&storage_key) {
            Some(blob) => decode_blob(&blob),
            None => {
                log::debug!("No persisted theme state under '{storage_key}'; using defaults");
                PersistedState::default()
            }
        };

        let computed = resolve(&state.master_config, &state.merchant_override);
        let projection = CssVariables::from_theme(&computed);
        Self {
            storage,
            storage_key,
            state,
            computed,
            projection,
            sinks: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn role(&self) -> Role {
        self.state.role
    }

    pub fn master_config(&self) -> &ThemeState {
        &self.state.master_config
    }

    pub fn merchant_override(&self) -> &ThemePatch {
        &self.state.merchant_override
    }

    /// Master with every defined override value applied
    pub fn computed_theme(&self) -> &ThemeState {
        &self.computed
    }

    /// Style variables for the current computed theme
    pub fn style_variables(&self) -> &CssVariables {
        &self.projection
    }

    pub fn project_config(&self) -> &ProjectConfig {
        &self.state.project_config
    }

    pub fn doc_pages(&self) -> &[DocPage] {
        &self.state.doc_pages
    }

    pub fn doc_page(&self, id: &str) -> Option<&DocPage> {
        self.state.doc_pages.iter().find(|p| p.id == id)
    }

    pub fn is_setup_complete(&self) -> bool {
        self.state.is_setup_complete
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    pub fn auth_data(&self) -> Option<&AuthData> {
        self.state.auth_data.as_ref()
    }

    pub fn customer_detail(&self) -> Option<&CustomerDetail> {
        self.state.customer_detail.as_ref()
    }

    pub fn dev_term_mode(&self) -> bool {
        self.state.dev_term_mode
    }

    pub fn persisted_state(&self) -> &PersistedState {
        &self.state
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    // ------------------------------------------------------------------
    // Theme layers
    // ------------------------------------------------------------------

    /// Shallow-merge `patch` into the master config
    pub fn set_master_config(&mut self, patch: ThemePatch) {
        self.state.master_config.apply_patch(&patch);
        log::debug!("Merged {} key(s) into master config", patch.len());
        self.commit_theme();
    }

    /// Merge the patch built from the current master config
    pub fn update_master_config<F>(&mut self, f: F)
    where
        F: FnOnce(&ThemeState) -> ThemePatch,
    {
        let patch = f(&self.state.master_config);
        self.set_master_config(patch);
    }

    /// Merge `patch` into the merchant override, keeping explicit `Inherit`
    /// entries
    pub fn set_merchant_override(&mut self, patch: ThemePatch) {
        self.state.merchant_override.merge(&patch);
        log::debug!("Merged {} key(s) into merchant override", patch.len());
        self.commit_theme();
    }

    /// Merge the patch built from the current merchant override
    pub fn update_merchant_override<F>(&mut self, f: F)
    where
        F: FnOnce(&ThemePatch) -> ThemePatch,
    {
        let patch = f(&self.state.merchant_override);
        self.set_merchant_override(patch);
    }

    pub fn set_role(&mut self, role: Role) {
        if self.state.role != role {
            log::debug!("Role changed: {} -> {role}", self.state.role);
        }
        self.state.role = role;
        self.persist();
    }

    /// Route a theme edit by the current role
    pub fn update_theme(&mut self, patch: ThemePatch) {
        self.update_theme_as(self.state.role, patch);
    }

    /// Route a theme edit as `role`.
    ///
    /// Admin edits write the master config and mark every touched key as
    /// `Inherit` in the override, so the admin's value shows through.
    /// Merchant edits only write the override.
    pub fn update_theme_as(&mut self, role: Role, patch: ThemePatch) {
        match role {
            Role::Admin => {
                self.state.master_config.apply_patch(&patch);
                self.state.merchant_override.merge(&patch.clearing());
            }
            Role::Merchant => {
                self.state.merchant_override.merge(&patch);
            }
        }
        log::debug!("Routed {} key(s) as {role}", patch.len());
        self.commit_theme();
    }

    /// Master back to schema defaults, override emptied
    pub fn reset_theme(&mut self) {
        self.state.master_config = ThemeState::default();
        self.state.merchant_override = ThemePatch::new();
        self.commit_theme();
    }

    pub fn clear_merchant_override(&mut self) {
        self.state.merchant_override = ThemePatch::new();
        self.commit_theme();
    }

    pub fn apply_preset(&mut self, preset: ThemePreset) {
        log::info!("Applying preset '{preset}' as {}", self.state.role);
        self.update_theme(preset.patch());
    }

    /// Merge a theme JSON document into `layer`.
    ///
    /// Accepts a flat `{ key: value }` object, or a document that parses as a
    /// complete `ThemeExport`, in
    /// which case the section matching `layer` is used. On a parse error the
    /// store is left untouched.
    pub fn import_layer(&mut self, layer: Layer, json: &str) -> Result<(), StoreError> {
        let doc: Value = serde_json::from_str(json)?;
        let doc = match doc {
            Value::Object(mut map) if is_export(&map) => map
                .remove(layer.as_str())
                .unwrap_or_else(|| Value::Object(Map::new())),
            other => other,
        };
        let patch: ThemePatch = serde_json::from_value(doc)?;

        match layer {
            Layer::Master => self.set_master_config(patch),
            Layer::Override => self.set_merchant_override(patch),
        }
        Ok(())
    }

    pub fn export_config(&self) -> ThemeExport {
        ThemeExport {
            version: EXPORT_VERSION,
            exported_at: Utc::now(),
            role: self.state.role,
            master: self.state.master_config.clone(),
            merchant_override: self.state.merchant_override.clone(),
            computed: self.computed.clone(),
        }
    }

    /// Register a sink. It receives the current projection immediately and
    /// again after every recomputation.
    pub fn subscribe(&mut self, mut sink: impl StyleSink + Send + 'static) {
        sink.apply(&self.projection);
        self.sinks.push(Box::new(sink));
    }

    // ------------------------------------------------------------------
    // Session data
    // ------------------------------------------------------------------

    pub fn set_project_config(&mut self, config: ProjectConfig) {
        self.state.project_config = config;
        self.persist();
    }

    /// Replace the page with the same id, or append it
    pub fn upsert_doc_page(&mut self, mut page: DocPage) {
        page.updated_at = Some(Utc::now());
        match self.state.doc_pages.iter_mut().find(|p| p.id == page.id) {
            Some(existing) => *existing = page,
            None => self.state.doc_pages.push(page),
        }
        self.persist();
    }

    pub fn remove_doc_page(&mut self, id: &str) -> bool {
        let before = self.state.doc_pages.len();
        self.state.doc_pages.retain(|p| p.id != id);
        let removed = self.state.doc_pages.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    pub fn set_setup_complete(&mut self, complete: bool) {
        self.state.is_setup_complete = complete;
        self.persist();
    }

    pub fn login(&mut self, auth: AuthData) {
        self.state.is_authenticated = true;
        self.state.auth_data = Some(auth);
        self.persist();
    }

    /// Drop credentials and the customer record
    pub fn logout(&mut self) {
        self.state.is_authenticated = false;
        self.state.auth_data = None;
        self.state.customer_detail = None;
        self.persist();
    }

    pub fn set_customer_detail(&mut self, detail: CustomerDetail) {
        self.state.customer_detail = Some(detail);
        self.persist();
    }

    pub fn set_dev_term_mode(&mut self, enabled: bool) {
        self.state.dev_term_mode = enabled;
        self.persist();
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Write the current state now, surfacing any failure
    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.write_blob()
    }

    fn commit_theme(&mut self) {
        self.recompute_effective_theme();
        self.persist();
    }

    /// Full rebuild of the computed theme from both layers
    fn recompute_effective_theme(&mut self) {
        self.computed = resolve(&self.state.master_config, &self.state.merchant_override);
        self.projection = CssVariables::from_theme(&self.computed);
        for sink in &mut self.sinks {
            sink.apply(&self.projection);
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.write_blob() {
            log::warn!("Failed to persist theme state under '{}': {e}", self.storage_key);
        }
    }

    fn write_blob(&mut self) -> Result<(), StoreError> {
        let blob = encode_blob(&self.state)?;
        self.storage.save(&self.storage_key, &blob)?;
        Ok(())
    }
}

/// Whether `doc` is a whole export document rather than a flat theme that
/// happens to carry an extra key such as `computed`
fn is_export(doc: &Map<String, Value>) -> bool {
    serde_json::from_value::<ThemeExport>(Value::Object(doc.clone())).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tessera_config::{Setting, ThemeField, ThemeValue};

    /// Storage whose writes always fail
    struct ReadOnlyStorage;

    impl StateStorage for ReadOnlyStorage {
        fn load(&self, _key: &str) -> Option<String> {
            None
        }

        fn save(&mut self, _key: &str, _blob: &str) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        }
    }

    #[test]
    fn fresh_store_computes_defaults() {
        let store = ThemeStore::in_memory();
        assert_eq!(store.computed_theme(), &ThemeState::default());
        assert_eq!(store.role(), Role::Admin);
        assert!(store.merchant_override().is_empty());
    }

    #[test]
    fn every_mutation_persists() {
        let mut store = ThemeStore::in_memory();
        store.set_master_config(ThemePatch::new().with(ThemeField::Primary, "#000000"));

        let blob = store.storage().get(DEFAULT_STORAGE_KEY).unwrap();
        assert!(blob.contains(r##""primary":"#000000""##), "{blob}");
        assert!(!blob.contains("computedTheme"));
    }

    #[test]
    fn functional_updaters_see_previous_layer() {
        let mut store = ThemeStore::in_memory();
        store.update_master_config(|prev| {
            let radius = prev.number(ThemeField::BorderRadius);
            ThemePatch::new().with(ThemeField::BorderRadius, radius * 2.0)
        });
        assert_eq!(store.master_config().number(ThemeField::BorderRadius), 16.0);

        store.set_merchant_override(ThemePatch::new().with(ThemeField::Accent, "#111111"));
        store.update_merchant_override(|prev| {
            assert!(prev.contains_key("accent"));
            prev.clearing()
        });
        assert_eq!(store.merchant_override().get("accent"), Some(&Setting::Inherit));
        assert_eq!(store.computed_theme().text(ThemeField::Accent), "#F59E0B");
    }

    #[test]
    fn role_routes_updates() {
        let mut store = ThemeStore::in_memory();
        store.set_role(Role::Merchant);
        store.update_theme(ThemePatch::new().with(ThemeField::Primary, "#FF0000"));

        assert_eq!(store.master_config().text(ThemeField::Primary), "#2563EB");
        assert_eq!(store.computed_theme().text(ThemeField::Primary), "#FF0000");

        store.set_role(Role::Admin);
        store.update_theme(ThemePatch::new().with(ThemeField::Primary, "#00FF00"));

        assert_eq!(store.merchant_override().get("primary"), Some(&Setting::Inherit));
        assert_eq!(store.computed_theme().text(ThemeField::Primary), "#00FF00");
    }

    #[test]
    fn reset_and_clear() {
        let mut store = ThemeStore::in_memory();
        store.set_master_config(ThemePatch::new().with(ThemeField::DarkMode, true));
        store.set_merchant_override(ThemePatch::new().with(ThemeField::Primary, "#FF0000"));

        store.clear_merchant_override();
        assert!(store.merchant_override().is_empty());
        assert!(store.computed_theme().dark_mode());

        store.reset_theme();
        assert_eq!(store.computed_theme(), &ThemeState::default());
    }

    #[test]
    fn preset_goes_through_routing() {
        let mut store = ThemeStore::in_memory();
        store.set_role(Role::Merchant);
        store.apply_preset(ThemePreset::Midnight);

        assert!(store.computed_theme().dark_mode());
        assert!(!store.master_config().dark_mode());
    }

    #[test]
    fn import_flat_object_into_override() {
        let mut store = ThemeStore::in_memory();
        store
            .import_layer(Layer::Override, r##"{"primary": "#123456", "accent": null}"##)
            .unwrap();

        assert_eq!(store.computed_theme().text(ThemeField::Primary), "#123456");
        assert_eq!(store.merchant_override().get("accent"), Some(&Setting::Inherit));
    }

    #[test]
    fn import_export_document_takes_matching_section() {
        let mut source = ThemeStore::in_memory();
        source.set_master_config(ThemePatch::new().with(ThemeField::SpacingUnit, 6));
        source.set_merchant_override(ThemePatch::new().with(ThemeField::Primary, "#ABCDEF"));
        let json = source.export_config().to_json_pretty().unwrap();

        let mut target = ThemeStore::in_memory();
        target.import_layer(Layer::Master, &json).unwrap();
        target.import_layer(Layer::Override, &json).unwrap();

        assert_eq!(target.computed_theme(), source.computed_theme());
    }

    #[test]
    fn flat_object_with_computed_key_is_not_an_export() {
        let mut store = ThemeStore::in_memory();
        store
            .import_layer(Layer::Master, r##"{"primary": "#000000", "computed": true}"##)
            .unwrap();

        assert_eq!(store.master_config().text(ThemeField::Primary), "#000000");
        assert_eq!(store.master_config().get("computed"), Some(&ThemeValue::Flag(true)));
    }

    #[test]
    fn import_parse_error_leaves_store_unchanged() {
        let mut store = ThemeStore::in_memory();
        let before = store.persisted_state().clone();

        let err = store.import_layer(Layer::Master, "[not, json").unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));
        let err = store.import_layer(Layer::Master, "[1, 2]").unwrap_err();
        assert!(matches!(err, StoreError::Parse(_)));

        assert_eq!(store.persisted_state(), &before);
    }

    #[test]
    fn subscribers_see_every_recompute() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut store = ThemeStore::in_memory();

        let log = Arc::clone(&seen);
        store.subscribe(move |vars: &CssVariables| {
            log.lock().unwrap().push(vars.get("--border-radius-px").map(str::to_string));
        });
        store.set_merchant_override(ThemePatch::new().with(ThemeField::BorderRadius, 20));

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![Some("8px".to_string()), Some("20px".to_string())]
        );
    }

    #[test]
    fn session_operations() {
        let mut store = ThemeStore::in_memory();

        store.upsert_doc_page(DocPage::new("p1", "Colors", "v1"));
        store.upsert_doc_page(DocPage::new("p2", "Type", ""));
        store.upsert_doc_page(DocPage::new("p1", "Colors", "v2"));
        assert_eq!(store.doc_pages().len(), 2);
        assert_eq!(store.doc_page("p1").map(|p| p.content.as_str()), Some("v2"));
        assert!(store.doc_page("p1").and_then(|p| p.updated_at).is_some());

        assert!(store.remove_doc_page("p2"));
        assert!(!store.remove_doc_page("p2"));

        store.login(AuthData {
            token: "t".into(),
            user_id: "u1".into(),
            email: None,
            expires_at: None,
        });
        store.set_customer_detail(CustomerDetail { id: "c1".into(), ..CustomerDetail::default() });
        assert!(store.is_authenticated());

        store.logout();
        assert!(!store.is_authenticated());
        assert!(store.auth_data().is_none());
        assert!(store.customer_detail().is_none());
    }

    #[test]
    fn persistence_failure_is_not_raised() {
        let mut store = ThemeStore::hydrate(ReadOnlyStorage);
        store.set_master_config(ThemePatch::new().with(ThemeField::Primary, "#000000"));

        // In-memory state still moved
        assert_eq!(
            store.computed_theme().field(ThemeField::Primary),
            Some(&ThemeValue::from("#000000"))
        );
        assert!(matches!(store.flush(), Err(StoreError::Io(_))));
    }

    #[test]
    fn layer_from_str() {
        assert_eq!("master".parse::<Layer>(), Ok(Layer::Master));
        assert_eq!("Override".parse::<Layer>(), Ok(Layer::Override));
        assert!("computed".parse::<Layer>().is_err());
    }
}
