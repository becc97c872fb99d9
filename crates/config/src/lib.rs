// Theme configuration: schema, layers, resolution, projection

pub mod css;
pub mod patch;
pub mod preset;
pub mod resolved;
pub mod setting;
pub mod settings;
pub mod theme;

pub use css::{css_var_name, CssVariables, StyleSink};
pub use patch::ThemePatch;
pub use preset::ThemePreset;
pub use resolved::resolve;
pub use setting::Setting;
pub use settings::ToolSettings;
pub use theme::{
    ButtonShape, ButtonStyle, CardShadow, FieldKind, FormDensity, InputStyle, ThemeField,
    ThemeState, ThemeValue,
};

/// Opaque sRGB color parsed from a CSS hex literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Convert from hex u32 (0xRRGGBB)
    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as u8;
        let g = ((hex >> 8) & 0xFF) as u8;
        let b = (hex & 0xFF) as u8;
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or the `#RGB` shorthand. The leading `#` is optional.
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        match hex.len() {
            6 => u32::from_str_radix(hex, 16).ok().map(Self::from_hex),
            3 => {
                let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
                u32::from_str_radix(&expanded, 16).ok().map(Self::from_hex)
            }
            _ => None,
        }
    }

    /// Uppercase `#RRGGBB`
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}
