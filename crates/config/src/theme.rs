// Theme schema
// A theme is a flat record of style attributes keyed by camelCase name.
// The set of known keys is closed (ThemeField); unknown keys are carried
// through untouched so callers can stash extra attributes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::patch::ThemePatch;
use crate::setting::Setting;
use crate::Color;

/// A single theme attribute value.
///
/// Deserialization tries the scalar shapes first; anything else (arrays,
/// objects) is kept verbatim in `Other`.
///
/// JSON has no infinity or NaN. `From<f64>` turns those into text, and a
/// non-finite `Number` built directly is written as text too, never `null`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ThemeValue {
    Flag(bool),
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

impl ThemeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ThemeValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ThemeValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            ThemeValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    /// Scalars are the values that get mirrored into style variables
    pub fn is_scalar(&self) -> bool {
        !matches!(self, ThemeValue::Other(_))
    }

    /// Parse a loosely-typed literal (as typed on a command line).
    /// `true`/`false` become flags, numerals become numbers, the rest is text.
    pub fn parse_literal(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed {
            "true" => return ThemeValue::Flag(true),
            "false" => return ThemeValue::Flag(false),
            _ => {}
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => ThemeValue::Number(n),
            _ => ThemeValue::Text(raw.to_string()),
        }
    }

    fn kind_name(&self) -> &'static str {
        match self {
            ThemeValue::Flag(_) => "flag",
            ThemeValue::Number(_) => "number",
            ThemeValue::Text(_) => "text",
            ThemeValue::Other(_) => "json",
        }
    }
}

impl Serialize for ThemeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ThemeValue::Flag(b) => serializer.serialize_bool(*b),
            ThemeValue::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            ThemeValue::Number(n) => serializer.collect_str(n),
            ThemeValue::Text(s) => serializer.serialize_str(s),
            ThemeValue::Other(v) => v.serialize(serializer),
        }
    }
}

impl fmt::Display for ThemeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeValue::Flag(b) => write!(f, "{b}"),
            ThemeValue::Number(n) => write!(f, "{n}"),
            ThemeValue::Text(s) => f.write_str(s),
            ThemeValue::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for ThemeValue {
    fn from(s: &str) -> Self {
        ThemeValue::Text(s.to_string())
    }
}

impl From<String> for ThemeValue {
    fn from(s: String) -> Self {
        ThemeValue::Text(s)
    }
}

impl From<f64> for ThemeValue {
    fn from(n: f64) -> Self {
        if n.is_finite() {
            ThemeValue::Number(n)
        } else {
            ThemeValue::Text(n.to_string())
        }
    }
}

impl From<i32> for ThemeValue {
    fn from(n: i32) -> Self {
        ThemeValue::Number(f64::from(n))
    }
}

impl From<bool> for ThemeValue {
    fn from(b: bool) -> Self {
        ThemeValue::Flag(b)
    }
}

// ============================================================================
// Schema
// ============================================================================

/// What kind of value a known field holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Hex color text (`#RRGGBB`)
    Color,
    /// Free text (font stacks)
    Text,
    Number,
    Flag,
    /// One of a fixed set of lowercase names
    Variant(&'static [&'static str]),
}

impl FieldKind {
    /// Whether `value` has the shape this kind expects.
    ///
    /// The store never calls this; it is for callers that want to validate
    /// input before writing it.
    pub fn accepts(&self, value: &ThemeValue) -> bool {
        match (self, value) {
            (FieldKind::Color, ThemeValue::Text(s)) => Color::parse_hex(s).is_some(),
            (FieldKind::Text, ThemeValue::Text(_)) => true,
            (FieldKind::Number, ThemeValue::Number(_)) => true,
            (FieldKind::Flag, ThemeValue::Flag(_)) => true,
            (FieldKind::Variant(names), ThemeValue::Text(s)) => names.contains(&s.as_str()),
            _ => false,
        }
    }

    /// Short human description used in validation messages
    pub fn describe(&self) -> String {
        match self {
            FieldKind::Color => "a hex color like #2563EB".to_string(),
            FieldKind::Text => "text".to_string(),
            FieldKind::Number => "a number".to_string(),
            FieldKind::Flag => "true or false".to_string(),
            FieldKind::Variant(names) => format!("one of {}", names.join(", ")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum FieldDefault {
    Text(&'static str),
    Number(f64),
    Flag(bool),
}

/// The closed set of known theme attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ThemeField {
    // Colors
    Primary,
    Secondary,
    Accent,
    Background,
    Surface,
    TextColor,
    MutedText,
    BorderColor,
    Success,
    Warning,
    Danger,
    // Typography
    FontFamily,
    HeadingFontFamily,
    BaseFontSize,
    HeadingWeight,
    LineHeight,
    // Shape and spacing
    BorderRadius,
    BorderWidth,
    SpacingUnit,
    // Component variants
    ButtonShape,
    ButtonStyle,
    FormDensity,
    InputStyle,
    CardShadow,
    DarkMode,
}

impl ThemeField {
    pub const ALL: [ThemeField; 25] = [
        ThemeField::Primary,
        ThemeField::Secondary,
        ThemeField::Accent,
        ThemeField::Background,
        ThemeField::Surface,
        ThemeField::TextColor,
        ThemeField::MutedText,
        ThemeField::BorderColor,
        ThemeField::Success,
        ThemeField::Warning,
        ThemeField::Danger,
        ThemeField::FontFamily,
        ThemeField::HeadingFontFamily,
        ThemeField::BaseFontSize,
        ThemeField::HeadingWeight,
        ThemeField::LineHeight,
        ThemeField::BorderRadius,
        ThemeField::BorderWidth,
        ThemeField::SpacingUnit,
        ThemeField::ButtonShape,
        ThemeField::ButtonStyle,
        ThemeField::FormDensity,
        ThemeField::InputStyle,
        ThemeField::CardShadow,
        ThemeField::DarkMode,
    ];

    fn descriptor(self) -> (&'static str, FieldKind, FieldDefault) {
        use FieldDefault as D;
        use FieldKind as K;
        match self {
            ThemeField::Primary => ("primary", K::Color, D::Text("#2563EB")),
            ThemeField::Secondary => ("secondary", K::Color, D::Text("#64748B")),
            ThemeField::Accent => ("accent", K::Color, D::Text("#F59E0B")),
            ThemeField::Background => ("background", K::Color, D::Text("#FFFFFF")),
            ThemeField::Surface => ("surface", K::Color, D::Text("#F8FAFC")),
            ThemeField::TextColor => ("textColor", K::Color, D::Text("#0F172A")),
            ThemeField::MutedText => ("mutedText", K::Color, D::Text("#64748B")),
            ThemeField::BorderColor => ("borderColor", K::Color, D::Text("#E2E8F0")),
            ThemeField::Success => ("success", K::Color, D::Text("#16A34A")),
            ThemeField::Warning => ("warning", K::Color, D::Text("#D97706")),
            ThemeField::Danger => ("danger", K::Color, D::Text("#DC2626")),
            ThemeField::FontFamily => ("fontFamily", K::Text, D::Text("Inter, sans-serif")),
            ThemeField::HeadingFontFamily => {
                ("headingFontFamily", K::Text, D::Text("Inter, sans-serif"))
            }
            ThemeField::BaseFontSize => ("baseFontSize", K::Number, D::Number(16.0)),
            ThemeField::HeadingWeight => ("headingWeight", K::Number, D::Number(700.0)),
            ThemeField::LineHeight => ("lineHeight", K::Number, D::Number(1.5)),
            ThemeField::BorderRadius => ("borderRadius", K::Number, D::Number(8.0)),
            ThemeField::BorderWidth => ("borderWidth", K::Number, D::Number(1.0)),
            ThemeField::SpacingUnit => ("spacingUnit", K::Number, D::Number(4.0)),
            ThemeField::ButtonShape => {
                ("buttonShape", K::Variant(ButtonShape::NAMES), D::Text("rounded"))
            }
            ThemeField::ButtonStyle => {
                ("buttonStyle", K::Variant(ButtonStyle::NAMES), D::Text("solid"))
            }
            ThemeField::FormDensity => {
                ("formDensity", K::Variant(FormDensity::NAMES), D::Text("comfortable"))
            }
            ThemeField::InputStyle => {
                ("inputStyle", K::Variant(InputStyle::NAMES), D::Text("outlined"))
            }
            ThemeField::CardShadow => {
                ("cardShadow", K::Variant(CardShadow::NAMES), D::Text("soft"))
            }
            ThemeField::DarkMode => ("darkMode", K::Flag, D::Flag(false)),
        }
    }

    /// camelCase key used in the persisted blob and in patches
    pub fn key(self) -> &'static str {
        self.descriptor().0
    }

    pub fn kind(self) -> FieldKind {
        self.descriptor().1
    }

    pub fn default_value(self) -> ThemeValue {
        match self.descriptor().2 {
            FieldDefault::Text(s) => ThemeValue::Text(s.to_string()),
            FieldDefault::Number(n) => ThemeValue::Number(n),
            FieldDefault::Flag(b) => ThemeValue::Flag(b),
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }

    fn default_text(self) -> &'static str {
        match self.descriptor().2 {
            FieldDefault::Text(s) => s,
            _ => "",
        }
    }

    fn default_number(self) -> f64 {
        match self.descriptor().2 {
            FieldDefault::Number(n) => n,
            _ => 0.0,
        }
    }

    fn default_flag(self) -> bool {
        matches!(self.descriptor().2, FieldDefault::Flag(true))
    }
}

impl fmt::Display for ThemeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl From<ThemeField> for String {
    fn from(field: ThemeField) -> Self {
        field.key().to_string()
    }
}

// ============================================================================
// Component variants
// ============================================================================

/// Error for a variant name that is not part of the enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// Button corner treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonShape {
    Square,
    #[default]
    Rounded,
    Pill,
}

impl ButtonShape {
    pub const NAMES: &'static [&'static str] = &["square", "rounded", "pill"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonShape::Square => "square",
            ButtonShape::Rounded => "rounded",
            ButtonShape::Pill => "pill",
        }
    }
}

impl FromStr for ButtonShape {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(ButtonShape::Square),
            "rounded" => Ok(ButtonShape::Rounded),
            "pill" => Ok(ButtonShape::Pill),
            _ => Err(UnknownVariant { kind: "button shape", value: s.to_string() }),
        }
    }
}

/// Button fill treatment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    #[default]
    Solid,
    Outline,
    Ghost,
}

impl ButtonStyle {
    pub const NAMES: &'static [&'static str] = &["solid", "outline", "ghost"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonStyle::Solid => "solid",
            ButtonStyle::Outline => "outline",
            ButtonStyle::Ghost => "ghost",
        }
    }
}

impl FromStr for ButtonStyle {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "solid" => Ok(ButtonStyle::Solid),
            "outline" => Ok(ButtonStyle::Outline),
            "ghost" => Ok(ButtonStyle::Ghost),
            _ => Err(UnknownVariant { kind: "button style", value: s.to_string() }),
        }
    }
}

/// Vertical rhythm of form controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormDensity {
    Compact,
    #[default]
    Comfortable,
    Spacious,
}

impl FormDensity {
    pub const NAMES: &'static [&'static str] = &["compact", "comfortable", "spacious"];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormDensity::Compact => "compact",
            FormDensity::Comfortable => "comfortable",
            FormDensity::Spacious => "spacious",
        }
    }

    /// Multiplier applied to the spacing unit inside form controls
    pub fn spacing_scale(&self) -> f64 {
        match self {
            FormDensity::Compact => 0.75,
            FormDensity::Comfortable => 1.0,
            FormDensity::Spacious => 1.5,
        }
    }
}

impl FromStr for FormDensity {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(FormDensity::Compact),
            "comfortable" => Ok(FormDensity::Comfortable),
            "spacious" => Ok(FormDensity::Spacious),
            _ => Err(UnknownVariant { kind: "form density", value: s.to_string() }),
        }
    }
}

/// Text input chrome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputStyle {
    #[default]
    Outlined,
    Filled,
    Underlined,
}

impl InputStyle {
    pub const NAMES: &'static [&'static str] = &["outlined", "filled", "underlined"];

    pub fn as_str(&self) -> &'static str {
        match self {
            InputStyle::Outlined => "outlined",
            InputStyle::Filled => "filled",
            InputStyle::Underlined => "underlined",
        }
    }
}

impl FromStr for InputStyle {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "outlined" => Ok(InputStyle::Outlined),
            "filled" => Ok(InputStyle::Filled),
            "underlined" => Ok(InputStyle::Underlined),
            _ => Err(UnknownVariant { kind: "input style", value: s.to_string() }),
        }
    }
}

/// Elevation of card widgets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardShadow {
    None,
    #[default]
    Soft,
    Strong,
}

impl CardShadow {
    pub const NAMES: &'static [&'static str] = &["none", "soft", "strong"];

    pub fn as_str(&self) -> &'static str {
        match self {
            CardShadow::None => "none",
            CardShadow::Soft => "soft",
            CardShadow::Strong => "strong",
        }
    }
}

impl FromStr for CardShadow {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(CardShadow::None),
            "soft" => Ok(CardShadow::Soft),
            "strong" => Ok(CardShadow::Strong),
            _ => Err(UnknownVariant { kind: "card shadow", value: s.to_string() }),
        }
    }
}

impl From<ButtonShape> for ThemeValue {
    fn from(v: ButtonShape) -> Self {
        ThemeValue::Text(v.as_str().to_string())
    }
}

impl From<ButtonStyle> for ThemeValue {
    fn from(v: ButtonStyle) -> Self {
        ThemeValue::Text(v.as_str().to_string())
    }
}

impl From<FormDensity> for ThemeValue {
    fn from(v: FormDensity) -> Self {
        ThemeValue::Text(v.as_str().to_string())
    }
}

impl From<InputStyle> for ThemeValue {
    fn from(v: InputStyle) -> Self {
        ThemeValue::Text(v.as_str().to_string())
    }
}

impl From<CardShadow> for ThemeValue {
    fn from(v: CardShadow) -> Self {
        ThemeValue::Text(v.as_str().to_string())
    }
}

// ============================================================================
// ThemeState
// ============================================================================

/// A fully populated theme.
///
/// Every `ThemeField` always has an entry. Values are not type-checked:
/// a caller may store a number under a color key, and the typed accessors
/// then fall back to the field default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ThemeState {
    values: BTreeMap<String, ThemeValue>,
}

impl Default for ThemeState {
    fn default() -> Self {
        let values = ThemeField::ALL
            .into_iter()
            .map(|f| (f.key().to_string(), f.default_value()))
            .collect();
        Self { values }
    }
}

// Missing schema keys are filled from defaults, nulls are treated as missing.
impl<'de> Deserialize<'de> for ThemeState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Option<ThemeValue>>::deserialize(deserializer)?;
        let mut state = ThemeState::default();
        for (key, value) in raw {
            if let Some(value) = value {
                state.values.insert(key, value);
            }
        }
        Ok(state)
    }
}

impl ThemeState {
    pub fn get(&self, key: &str) -> Option<&ThemeValue> {
        self.values.get(key)
    }

    pub fn field(&self, field: ThemeField) -> Option<&ThemeValue> {
        self.values.get(field.key())
    }

    /// Text of a field, or the field default when the stored value is not text
    pub fn text(&self, field: ThemeField) -> &str {
        match self.field(field) {
            Some(ThemeValue::Text(s)) => s.as_str(),
            _ => field.default_text(),
        }
    }

    pub fn number(&self, field: ThemeField) -> f64 {
        self.field(field)
            .and_then(ThemeValue::as_number)
            .unwrap_or_else(|| field.default_number())
    }

    pub fn flag(&self, field: ThemeField) -> bool {
        self.field(field)
            .and_then(ThemeValue::as_flag)
            .unwrap_or_else(|| field.default_flag())
    }

    pub fn color(&self, field: ThemeField) -> Option<Color> {
        Color::parse_hex(self.text(field))
    }

    pub fn button_shape(&self) -> ButtonShape {
        self.text(ThemeField::ButtonShape).parse().unwrap_or_default()
    }

    pub fn button_style(&self) -> ButtonStyle {
        self.text(ThemeField::ButtonStyle).parse().unwrap_or_default()
    }

    pub fn form_density(&self) -> FormDensity {
        self.text(ThemeField::FormDensity).parse().unwrap_or_default()
    }

    pub fn input_style(&self) -> InputStyle {
        self.text(ThemeField::InputStyle).parse().unwrap_or_default()
    }

    pub fn card_shadow(&self) -> CardShadow {
        self.text(ThemeField::CardShadow).parse().unwrap_or_default()
    }

    pub fn dark_mode(&self) -> bool {
        self.flag(ThemeField::DarkMode)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ThemeValue>) -> Option<ThemeValue> {
        self.values.insert(key.into(), value.into())
    }

    /// Shallow-merge a patch into this theme.
    ///
    /// Defined values overwrite. An explicit `Inherit` has no parent layer to
    /// defer to here, so it leaves known fields untouched and drops unknown
    /// keys.
    pub fn apply_patch(&mut self, patch: &ThemePatch) {
        for (key, setting) in patch.iter() {
            match setting {
                Setting::Value(v) => {
                    self.values.insert(key.to_string(), v.clone());
                }
                Setting::Inherit => {
                    if ThemeField::from_key(key).is_none() {
                        self.values.remove(key);
                    }
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ThemeValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries whose key is not part of the schema
    pub fn extras(&self) -> impl Iterator<Item = (&str, &ThemeValue)> {
        self.iter().filter(|(k, _)| ThemeField::from_key(k).is_none())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Every entry as a defined patch value
    pub fn to_patch(&self) -> ThemePatch {
        let mut patch = ThemePatch::new();
        for (key, value) in self.iter() {
            patch.set(key, value.clone());
        }
        patch
    }

    /// Human-readable shape mismatch for a known field, if any
    pub fn mismatch(field: ThemeField, value: &ThemeValue) -> Option<String> {
        let kind = field.kind();
        if kind.accepts(value) {
            None
        } else {
            Some(format!(
                "{} expects {}, got {} '{}'",
                field.key(),
                kind.describe(),
                value.kind_name(),
                value
            ))
        }
    }
}
