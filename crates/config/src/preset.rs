// Built-in theme presets
// A preset is just a patch; applying one goes through the normal layer update.

use std::fmt;
use std::str::FromStr;

use crate::patch::ThemePatch;
use crate::theme::{ButtonShape, ButtonStyle, CardShadow, FormDensity, InputStyle, ThemeField, ThemeState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemePreset {
    /// Schema defaults for every field
    Default,
    /// Dark surfaces, indigo primary
    Midnight,
    /// Warm palette with pill buttons
    Sunset,
    /// Monochrome, square corners, no shadows
    Mono,
}

impl ThemePreset {
    pub fn all() -> &'static [ThemePreset] {
        &[ThemePreset::Default, ThemePreset::Midnight, ThemePreset::Sunset, ThemePreset::Mono]
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThemePreset::Default => "default",
            ThemePreset::Midnight => "midnight",
            ThemePreset::Sunset => "sunset",
            ThemePreset::Mono => "mono",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ThemePreset::Default => "Schema defaults",
            ThemePreset::Midnight => "Dark surfaces with an indigo primary",
            ThemePreset::Sunset => "Warm oranges, pill buttons, generous radius",
            ThemePreset::Mono => "Monochrome, square corners, flat cards",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }

    /// The fields this preset sets
    pub fn patch(&self) -> ThemePatch {
        match self {
            ThemePreset::Default => ThemeState::default().to_patch(),
            ThemePreset::Midnight => ThemePatch::new()
                .with(ThemeField::Primary, "#6366F1")
                .with(ThemeField::Secondary, "#94A3B8")
                .with(ThemeField::Accent, "#22D3EE")
                .with(ThemeField::Background, "#0B1120")
                .with(ThemeField::Surface, "#111827")
                .with(ThemeField::TextColor, "#E5E7EB")
                .with(ThemeField::MutedText, "#9CA3AF")
                .with(ThemeField::BorderColor, "#1F2937")
                .with(ThemeField::CardShadow, CardShadow::Strong)
                .with(ThemeField::DarkMode, true),
            ThemePreset::Sunset => ThemePatch::new()
                .with(ThemeField::Primary, "#EA580C")
                .with(ThemeField::Secondary, "#9D174D")
                .with(ThemeField::Accent, "#FACC15")
                .with(ThemeField::Background, "#FFF7ED")
                .with(ThemeField::Surface, "#FFEDD5")
                .with(ThemeField::HeadingFontFamily, "Poppins, sans-serif")
                .with(ThemeField::BorderRadius, 16)
                .with(ThemeField::ButtonShape, ButtonShape::Pill)
                .with(ThemeField::FormDensity, FormDensity::Spacious),
            ThemePreset::Mono => ThemePatch::new()
                .with(ThemeField::Primary, "#111111")
                .with(ThemeField::Secondary, "#555555")
                .with(ThemeField::Accent, "#111111")
                .with(ThemeField::FontFamily, "IBM Plex Mono, monospace")
                .with(ThemeField::HeadingFontFamily, "IBM Plex Mono, monospace")
                .with(ThemeField::BorderRadius, 0)
                .with(ThemeField::ButtonShape, ButtonShape::Square)
                .with(ThemeField::ButtonStyle, ButtonStyle::Outline)
                .with(ThemeField::InputStyle, InputStyle::Underlined)
                .with(ThemeField::CardShadow, CardShadow::None),
        }
    }
}

impl fmt::Display for ThemePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ThemePreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            let names: Vec<_> = Self::all().iter().map(|p| p.name()).collect();
            format!("unknown preset '{}' (available: {})", s, names.join(", "))
        })
    }
}
