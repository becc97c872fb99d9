// Property-based tests for ThemeStore: arbitrary interleavings of layer
// writes and routed updates.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use proptest::prelude::*;
use tessera_config::{resolve, Setting, ThemeField, ThemePatch, ThemeValue};
use tessera_store::{MemoryStorage, Role, ThemeStore, DEFAULT_STORAGE_KEY};

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

#[derive(Debug, Clone)]
enum Op {
    Master(ThemePatch),
    Override(ThemePatch),
    Routed(Role, ThemePatch),
}

fn arb_field() -> impl Strategy<Value = ThemeField> {
    (0..ThemeField::ALL.len()).prop_map(|i| ThemeField::ALL[i])
}

fn arb_setting() -> impl Strategy<Value = Setting<ThemeValue>> {
    prop_oneof![
        3 => "#[0-9A-F]{6}".prop_map(|s| Setting::Value(ThemeValue::Text(s))),
        2 => (0i32..64).prop_map(|n| Setting::Value(ThemeValue::from(n))),
        1 => Just(Setting::Inherit),
    ]
}

fn arb_patch() -> impl Strategy<Value = ThemePatch> {
    prop::collection::vec((arb_field(), arb_setting()), 1..6).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(f, s)| (f.key().to_string(), s))
            .collect()
    })
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        arb_patch().prop_map(Op::Master),
        arb_patch().prop_map(Op::Override),
        (any::<bool>(), arb_patch()).prop_map(|(admin, p)| {
            Op::Routed(if admin { Role::Admin } else { Role::Merchant }, p)
        }),
    ]
}

fn run(store: &mut ThemeStore<MemoryStorage>, op: Op) {
    match op {
        Op::Master(p) => store.set_master_config(p),
        Op::Override(p) => store.set_merchant_override(p),
        Op::Routed(role, p) => store.update_theme_as(role, p),
    }
}

proptest! {
    #![proptest_config(config_256())]

    /// The computed theme always equals master overlaid with defined
    /// override values
    #[test]
    fn computed_follows_layers(ops in prop::collection::vec(arb_op(), 0..12)) {
        let mut store = ThemeStore::in_memory();
        for op in ops {
            run(&mut store, op);
            prop_assert_eq!(
                store.computed_theme(),
                &resolve(store.master_config(), store.merchant_override())
            );
            for field in ThemeField::ALL {
                let expected = store
                    .merchant_override()
                    .value(field.key())
                    .or_else(|| store.master_config().field(field));
                prop_assert_eq!(store.computed_theme().field(field), expected);
            }
        }
    }

    /// After an admin edit, every touched key shows the master value
    #[test]
    fn admin_edit_wins(ops in prop::collection::vec(arb_op(), 0..8), patch in arb_patch()) {
        let mut store = ThemeStore::in_memory();
        for op in ops {
            run(&mut store, op);
        }
        store.update_theme_as(Role::Admin, patch.clone());

        for key in patch.keys() {
            prop_assert_eq!(store.merchant_override().get(key), Some(&Setting::Inherit));
            prop_assert_eq!(store.computed_theme().get(key), store.master_config().get(key));
        }
    }

    /// Whatever was written, hydrating the persisted blob gives the same store
    #[test]
    fn persistence_round_trips(ops in prop::collection::vec(arb_op(), 0..8)) {
        let mut store = ThemeStore::in_memory();
        for op in ops {
            run(&mut store, op);
        }
        let blob = store.storage().get(DEFAULT_STORAGE_KEY).unwrap_or("").to_string();
        let restored = ThemeStore::hydrate(MemoryStorage::with_entry(DEFAULT_STORAGE_KEY, blob));

        prop_assert_eq!(restored.master_config(), store.master_config());
        prop_assert_eq!(restored.merchant_override(), store.merchant_override());
        prop_assert_eq!(restored.computed_theme(), store.computed_theme());
    }
}
