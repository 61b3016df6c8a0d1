use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorDef {
    /// RGB color as [r, g, b]
    Rgb(u8, u8, u8),
    /// Named color, or a `#rrggbb` hex string
    Named(String),
}

impl ColorDef {
    pub fn hex(value: u32) -> Self {
        ColorDef::Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

fn parse_hex(s: &str) -> Option<Color> {
    let digits = s.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let value = u32::from_str_radix(digits, 16).ok()?;
    Some(Color::Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8))
}

impl From<&ColorDef> for Color {
    fn from(def: &ColorDef) -> Self {
        match def {
            ColorDef::Rgb(r, g, b) => Color::Rgb(*r, *g, *b),
            ColorDef::Named(name) => match name.as_str() {
                "Black" => Color::Black,
                "Red" => Color::Red,
                "Green" => Color::Green,
                "Yellow" => Color::Yellow,
                "Blue" => Color::Blue,
                "Magenta" => Color::Magenta,
                "Cyan" => Color::Cyan,
                "Gray" => Color::Gray,
                "DarkGray" => Color::DarkGray,
                "LightRed" => Color::LightRed,
                "LightGreen" => Color::LightGreen,
                "LightYellow" => Color::LightYellow,
                "LightBlue" => Color::LightBlue,
                "LightMagenta" => Color::LightMagenta,
                "LightCyan" => Color::LightCyan,
                "White" => Color::White,
                // Default/Reset uses the terminal's default color (preserves transparency)
                "Default" | "Reset" => Color::Reset,
                other => parse_hex(other).unwrap_or(Color::White),
            },
        }
    }
}

/// Theme colors as they appear in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeColors {
    pub sidebar_bg: ColorDef,
    pub sidebar_lines: ColorDef,
    pub content_bg: ColorDef,
    pub border: ColorDef,
    pub topbar_border: ColorDef,
    pub directory_fg: ColorDef,
    pub file_fg: ColorDef,
    pub selection_bg: ColorDef,
    pub error_fg: ColorDef,
    pub muted_fg: ColorDef,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            sidebar_bg: ColorDef::hex(0x21252b),
            sidebar_lines: ColorDef::hex(0x5c6370),
            content_bg: ColorDef::hex(0x282c34),
            border: ColorDef::hex(0x5c6370),
            topbar_border: ColorDef::hex(0x5c6370),
            directory_fg: ColorDef::Named("Blue".to_string()),
            file_fg: ColorDef::Named("Default".to_string()),
            selection_bg: ColorDef::hex(0x3e4451),
            error_fg: ColorDef::Named("Red".to_string()),
            muted_fg: ColorDef::hex(0x5c6370),
        }
    }
}

/// Resolved theme used by the renderers
#[derive(Debug, Clone)]
pub struct Theme {
    pub sidebar_bg: Color,
    pub sidebar_lines: Color,
    pub content_bg: Color,
    pub border: Color,
    pub topbar_border: Color,
    pub directory_fg: Color,
    pub file_fg: Color,
    pub selection_bg: Color,
    pub error_fg: Color,
    pub muted_fg: Color,
}

impl From<&ThemeColors> for Theme {
    fn from(colors: &ThemeColors) -> Self {
        Self {
            sidebar_bg: (&colors.sidebar_bg).into(),
            sidebar_lines: (&colors.sidebar_lines).into(),
            content_bg: (&colors.content_bg).into(),
            border: (&colors.border).into(),
            topbar_border: (&colors.topbar_border).into(),
            directory_fg: (&colors.directory_fg).into(),
            file_fg: (&colors.file_fg).into(),
            selection_bg: (&colors.selection_bg).into(),
            error_fg: (&colors.error_fg).into(),
            muted_fg: (&colors.muted_fg).into(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from(&ThemeColors::default())
    }
}
