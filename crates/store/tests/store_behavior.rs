// Integration tests for ThemeStore: layer semantics, role routing, and
// persistence through real storage backends.

use tempfile::TempDir;
use tessera_store::{
    DocPage, FileStorage, MemoryStorage, Role, StateStorage, ThemeStore, DEFAULT_STORAGE_KEY,
};
use tessera_config::{Setting, ThemeField, ThemePatch, ThemeState, ThemeValue};

fn text(value: &str) -> ThemeValue {
    ThemeValue::from(value)
}

// ---------------------------------------------------------------------------
// Layer semantics
// ---------------------------------------------------------------------------

#[test]
fn master_write_propagates_when_override_is_silent() {
    let mut store = ThemeStore::in_memory();
    store.set_master_config(ThemePatch::new().with(ThemeField::Primary, "#000000"));

    assert_eq!(store.computed_theme().field(ThemeField::Primary), Some(&text("#000000")));
}

#[test]
fn override_takes_precedence() {
    let mut store = ThemeStore::in_memory();
    store.set_merchant_override(ThemePatch::new().with(ThemeField::Primary, "#FF0000"));
    store.set_master_config(ThemePatch::new().with(ThemeField::Primary, "#000000"));

    assert_eq!(store.computed_theme().text(ThemeField::Primary), "#FF0000");
    assert_eq!(store.master_config().text(ThemeField::Primary), "#000000");
}

#[test]
fn admin_edit_clears_the_override_key() {
    let mut store = ThemeStore::in_memory();
    store.update_theme_as(Role::Merchant, ThemePatch::new().with(ThemeField::Primary, "#FF0000"));
    store.update_theme_as(Role::Admin, ThemePatch::new().with(ThemeField::Primary, "#00FF00"));

    assert_eq!(store.merchant_override().get("primary"), Some(&Setting::Inherit));
    assert_eq!(store.computed_theme().text(ThemeField::Primary), "#00FF00");
}

#[test]
fn admin_edit_leaves_other_override_keys_alone() {
    let mut store = ThemeStore::in_memory();
    store.update_theme_as(
        Role::Merchant,
        ThemePatch::new()
            .with(ThemeField::Primary, "#FF0000")
            .with(ThemeField::BorderRadius, 20),
    );
    store.update_theme_as(Role::Admin, ThemePatch::new().with(ThemeField::Primary, "#00FF00"));

    assert_eq!(store.computed_theme().number(ThemeField::BorderRadius), 20.0);
}

#[test]
fn master_write_then_override_inherit_shows_master() {
    let mut store = ThemeStore::in_memory();
    store.set_merchant_override(ThemePatch::new().with(ThemeField::Primary, "#FF0000"));
    store.set_master_config(ThemePatch::new().with(ThemeField::Primary, "#0000FF"));
    assert_eq!(store.computed_theme().text(ThemeField::Primary), "#FF0000");

    store.update_merchant_override(|prev| {
        let mut next = prev.clone();
        next.clear(ThemeField::Primary);
        next
    });

    assert_eq!(store.computed_theme().text(ThemeField::Primary), "#0000FF");
    assert_eq!(store.merchant_override().get("primary"), Some(&Setting::Inherit));
}

#[test]
fn override_survives_overlapping_master_updates() {
    let mut store = ThemeStore::in_memory();
    store.set_merchant_override(ThemePatch::new().with(ThemeField::BorderRadius, 20));

    for radius in [2, 4, 12] {
        store.set_master_config(ThemePatch::new().with(ThemeField::BorderRadius, radius));
        assert_eq!(store.computed_theme().number(ThemeField::BorderRadius), 20.0);
    }
    assert_eq!(store.master_config().number(ThemeField::BorderRadius), 12.0);
}

#[test]
fn merges_do_not_touch_unpatched_keys() {
    let mut store = ThemeStore::in_memory();
    store.set_merchant_override(ThemePatch::new().with(ThemeField::Accent, "#111111"));
    let before_master = store.master_config().clone();

    store.set_master_config(ThemePatch::new().with(ThemeField::Primary, "#000000"));
    store.set_merchant_override(ThemePatch::new().with(ThemeField::Surface, "#222222"));

    for field in ThemeField::ALL {
        if field != ThemeField::Primary {
            assert_eq!(store.master_config().field(field), before_master.field(field), "{field}");
        }
    }
    assert_eq!(store.merchant_override().value("accent"), Some(&text("#111111")));
}

#[test]
fn repeated_patch_is_idempotent() {
    let patch = ThemePatch::new()
        .with(ThemeField::Primary, "#000000")
        .inherit(ThemeField::Accent);

    let mut once = ThemeStore::in_memory();
    once.set_merchant_override(patch.clone());
    once.set_master_config(patch.clone());

    let mut twice = ThemeStore::in_memory();
    twice.set_merchant_override(patch.clone());
    twice.set_merchant_override(patch.clone());
    twice.set_master_config(patch.clone());
    twice.set_master_config(patch);

    assert_eq!(once.persisted_state(), twice.persisted_state());
    assert_eq!(once.computed_theme(), twice.computed_theme());
}

#[test]
fn unknown_keys_are_stored() {
    let mut store = ThemeStore::in_memory();
    store.set_master_config(ThemePatch::new().with("logoScale", 2));

    assert_eq!(store.computed_theme().get("logoScale"), Some(&ThemeValue::Number(2.0)));
    assert_eq!(store.style_variables().get("--logo-scale-px"), Some("2px"));
}

#[test]
fn mismatched_value_is_stored_and_typed_read_falls_back() {
    let mut store = ThemeStore::in_memory();
    store.set_master_config(ThemePatch::new().with(ThemeField::BorderRadius, "large"));

    assert_eq!(store.computed_theme().get("borderRadius"), Some(&text("large")));
    assert_eq!(store.computed_theme().number(ThemeField::BorderRadius), 8.0);
}

#[test]
fn projection_names_and_px_variants() {
    let store = ThemeStore::in_memory();
    let vars = store.style_variables();

    assert_eq!(vars.get("--text-color"), Some("#0F172A"));
    assert_eq!(vars.get("--border-radius"), Some("8"));
    assert_eq!(vars.get("--border-radius-px"), Some("8px"));
    assert_eq!(vars.get("--primary-px"), None);
}

// ---------------------------------------------------------------------------
// Hydrate / persist
// ---------------------------------------------------------------------------

#[test]
fn hydrate_absent_blob_uses_defaults() {
    let store = ThemeStore::hydrate(MemoryStorage::new());

    assert_eq!(store.master_config(), &ThemeState::default());
    assert!(store.merchant_override().is_empty());
    assert_eq!(store.role(), Role::Admin);
}

#[test]
fn hydrate_garbage_blob_uses_defaults() {
    let storage = MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, "\u{0}\u{1} not json");
    let store = ThemeStore::hydrate(storage);

    assert_eq!(store.computed_theme(), &ThemeState::default());
}

#[test]
fn hydrate_partial_master_fills_missing_keys() {
    let storage = MemoryStorage::with_entry(
        DEFAULT_STORAGE_KEY,
        r##"{"masterConfig": {"primary": "#123456"}, "merchantOverride": {"accent": null}}"##,
    );
    let store = ThemeStore::hydrate(storage);

    assert_eq!(store.master_config().text(ThemeField::Primary), "#123456");
    for field in ThemeField::ALL {
        assert!(store.master_config().field(field).is_some(), "{field}");
    }
    assert_eq!(store.merchant_override().get("accent"), Some(&Setting::Inherit));
}

#[test]
fn persist_then_hydrate_restores_everything() {
    let mut store = ThemeStore::in_memory();
    store.set_role(Role::Merchant);
    store.set_master_config(ThemePatch::new().with(ThemeField::SpacingUnit, 6));
    store.set_merchant_override(
        ThemePatch::new()
            .with(ThemeField::Primary, "#FF0000")
            .inherit(ThemeField::Accent),
    );
    store.upsert_doc_page(DocPage::new("intro", "Getting Started", "hello"));
    store.set_dev_term_mode(true);

    let blob = store.storage().get(DEFAULT_STORAGE_KEY).unwrap().to_string();
    let restored = ThemeStore::hydrate(MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, blob));

    assert_eq!(restored.persisted_state(), store.persisted_state());
    assert_eq!(restored.computed_theme(), store.computed_theme());
    assert_eq!(restored.merchant_override().get("accent"), Some(&Setting::Inherit));
}

#[test]
fn non_finite_override_stays_defined_after_hydrate() {
    let mut store = ThemeStore::in_memory();
    store.set_merchant_override(ThemePatch::new().with(ThemeField::BorderRadius, f64::INFINITY));
    store.set_master_config(ThemePatch::new().with(ThemeField::LineHeight, f64::NAN));

    assert_eq!(store.merchant_override().value("borderRadius"), Some(&text("inf")));
    assert_eq!(store.style_variables().get("--border-radius-px"), None);

    let blob = store.storage().get(DEFAULT_STORAGE_KEY).unwrap().to_string();
    let raw: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(raw["merchantOverride"]["borderRadius"], "inf");

    let restored = ThemeStore::hydrate(MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, blob));
    assert_eq!(restored.merchant_override(), store.merchant_override());
    assert_eq!(restored.master_config().field(ThemeField::LineHeight), Some(&text("NaN")));
    assert_eq!(restored.computed_theme(), store.computed_theme());
}

#[test]
fn custom_storage_key() {
    let mut store = ThemeStore::hydrate_with_key(MemoryStorage::new(), "brand-a");
    store.set_role(Role::Merchant);

    assert!(store.storage().get("brand-a").is_some());
    assert!(store.storage().get(DEFAULT_STORAGE_KEY).is_none());
}

#[test]
fn file_storage_round_trip() {
    let temp = TempDir::new().unwrap();

    let mut store = ThemeStore::hydrate(FileStorage::new(temp.path()));
    store.update_theme_as(Role::Merchant, ThemePatch::new().with(ThemeField::DarkMode, true));
    store.flush().unwrap();

    let path = temp.path().join(format!("{DEFAULT_STORAGE_KEY}.json"));
    assert!(path.exists());

    let restored = ThemeStore::hydrate(FileStorage::new(temp.path()));
    assert!(restored.computed_theme().dark_mode());
    assert!(!restored.master_config().dark_mode());
}

#[test]
fn file_storage_corrupt_file_falls_back() {
    let temp = TempDir::new().unwrap();
    let mut storage = FileStorage::new(temp.path());
    storage.save(DEFAULT_STORAGE_KEY, "{ truncated").unwrap();

    let store = ThemeStore::hydrate(storage);
    assert_eq!(store.computed_theme(), &ThemeState::default());
}
