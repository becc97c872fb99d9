//! Style projection
//!
//! Mirrors a resolved theme into CSS custom properties. Each scalar entry
//! becomes `--<kebab-case-key>`; numbers also get a `--<key>-px` variant.
//! The projection is one-way: nothing reads it back into a theme.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use heck::ToKebabCase;
use serde::Serialize;

use crate::theme::{ThemeState, ThemeValue};

/// Custom property name for a camelCase theme key (`textColor` → `--text-color`)
pub fn css_var_name(key: &str) -> String {
    format!("--{}", key.to_kebab_case())
}

/// A named set of CSS custom properties
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CssVariables {
    vars: BTreeMap<String, String>,
}

impl CssVariables {
    pub fn from_theme(theme: &ThemeState) -> Self {
        let mut vars = BTreeMap::new();
        for (key, value) in theme.iter() {
            if !value.is_scalar() {
                continue;
            }
            let name = css_var_name(key);
            if let Some(n) = value.as_number().filter(|n| n.is_finite()) {
                vars.insert(format!("{name}-px"), format!("{n}px"));
            }
            vars.insert(name, value.to_string());
        }
        Self { vars }
    }

    /// Look up a property by its full name, including the leading `--`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Render as a single CSS rule, e.g. `:root { --primary: #2563EB; }`
    pub fn to_css(&self, selector: &str) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{selector} {{");
        for (name, value) in &self.vars {
            let _ = writeln!(out, "  {name}: {value};");
        }
        out.push_str("}\n");
        out
    }
}

/// Receives the style projection after every recomputation
pub trait StyleSink {
    fn apply(&mut self, vars: &CssVariables);
}

impl<F: FnMut(&CssVariables)> StyleSink for F {
    fn apply(&mut self, vars: &CssVariables) {
        self(vars)
    }
}
