// KEY=VALUE parsing and caller-side schema checks for `tessera set` / `import`.
// The store accepts anything; these checks only decide what to warn about.

use tessera_config::{FieldKind, ThemeField, ThemePatch, ThemeState, ThemeValue};

/// Parse one `key=value` argument.
///
/// Values for known text-like fields (colors, fonts, variants) are kept as
/// text so `#000` or `000000` are not mistaken for numbers. Everything else is
/// parsed loosely: `true`/`false`, numerals, then text.
pub fn parse_assignment(raw: &str) -> Result<(String, ThemeValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }

    let value = match ThemeField::from_key(key).map(ThemeField::kind) {
        Some(FieldKind::Color | FieldKind::Text | FieldKind::Variant(_)) => {
            ThemeValue::Text(value.trim().to_string())
        }
        _ => ThemeValue::parse_literal(value),
    };
    Ok((key.to_string(), value))
}

/// Build a patch from `key=value` arguments. Later assignments win.
pub fn parse_assignments(args: &[String]) -> Result<ThemePatch, String> {
    let mut patch = ThemePatch::new();
    for arg in args {
        let (key, value) = parse_assignment(arg)?;
        patch.set(key, value);
    }
    Ok(patch)
}

/// Schema warnings for the defined values of a patch
pub fn check_patch(patch: &ThemePatch) -> Vec<String> {
    let mut warnings = Vec::new();
    for (key, value) in patch.defined() {
        match ThemeField::from_key(key) {
            Some(field) => {
                if let Some(msg) = ThemeState::mismatch(field, value) {
                    warnings.push(msg);
                }
            }
            None => match suggest_key(key) {
                Some(known) => warnings.push(format!("{key} is not a theme field (did you mean {known}?)")),
                None => log::info!("'{key}' is not a theme field; storing as-is"),
            },
        }
    }
    warnings
}

/// Closest known key, for "did you mean" hints
pub fn suggest_key(key: &str) -> Option<&'static str> {
    let lower = key.to_ascii_lowercase().replace(['-', '_'], "");
    ThemeField::ALL
        .into_iter()
        .map(ThemeField::key)
        .find(|k| k.to_ascii_lowercase() == lower)
}
