// Highlight theme configuration
// Supports: built-in dark/light palettes and custom JSON themes

use crate::{Color, ConfigError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Theme source - where to load theme from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ThemeSource {
    /// Built-in dark theme (Dracula palette)
    Dark,
    /// Built-in light theme (GitHub palette)
    Light,
    /// Custom theme from file path
    Custom(String),
}

impl Default for ThemeSource {
    fn default() -> Self {
        ThemeSource::Dark
    }
}

/// JSON-serializable theme colors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub name: String,
    #[serde(default)]
    pub is_dark: bool,
    pub colors: ThemeColorsConfig,
}

/// JSON color definitions (hex strings). Missing entries fall back to `foreground`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeColorsConfig {
    pub foreground: String,
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub builtin: Option<String>,
    #[serde(default)]
    pub string: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub punctuation: Option<String>,
}

/// Runtime highlight colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighlightTheme {
    pub text: Color,
    pub keyword: Color,
    pub builtin: Color,
    pub string: Color,
    pub comment: Color,
    pub number: Color,
    pub function: Color,
    pub operator: Color,
    pub punctuation: Color,
}

impl HighlightTheme {
    /// Built-in dark theme
    pub fn dark() -> Self {
        HighlightTheme {
            text: Color::from_hex(0xf8f8f2),
            keyword: Color::from_hex(0xff79c6),
            builtin: Color::from_hex(0x8be9fd),
            string: Color::from_hex(0xf1fa8c),
            comment: Color::from_hex(0x6272a4),
            number: Color::from_hex(0xbd93f9),
            function: Color::from_hex(0x50fa7b),
            operator: Color::from_hex(0xff79c6),
            punctuation: Color::from_hex(0xf8f8f2),
        }
    }

    /// Built-in light theme
    pub fn light() -> Self {
        HighlightTheme {
            text: Color::from_hex(0x393a34),
            keyword: Color::from_hex(0x00009f),
            builtin: Color::from_hex(0x2b91af),
            string: Color::from_hex(0xe3116c),
            comment: Color::from_hex(0x999988),
            number: Color::from_hex(0x36acaa),
            function: Color::from_hex(0xd73a49),
            operator: Color::from_hex(0x393a34),
            punctuation: Color::from_hex(0x393a34),
        }
    }

    /// Parse hex color
    pub fn hex_to_color(hex: &str) -> Option<Color> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        u32::from_str_radix(hex, 16).ok().map(Color::from_hex)
    }

    /// Create a theme from a ThemeConfig (JSON theme)
    pub fn from_config(config: &ThemeColorsConfig, is_dark: bool) -> Self {
        let base = if is_dark { Self::dark() } else { Self::light() };
        let fg = Self::hex_to_color(&config.foreground).unwrap_or(base.text);
        let pick = |hex: &Option<String>| {
            hex.as_deref().and_then(Self::hex_to_color).unwrap_or(fg)
        };

        HighlightTheme {
            text: fg,
            keyword: pick(&config.keyword),
            builtin: pick(&config.builtin),
            string: pick(&config.string),
            comment: pick(&config.comment),
            number: pick(&config.number),
            function: pick(&config.function),
            operator: pick(&config.operator),
            punctuation: pick(&config.punctuation),
        }
    }

    /// Resolve a theme source. Custom themes that fail to load fall back to dark.
    pub fn load(source: &ThemeSource) -> (Self, String) {
        match source {
            ThemeSource::Dark => (Self::dark(), "Dark".into()),
            ThemeSource::Light => (Self::light(), "Light".into()),
            ThemeSource::Custom(path) => match Self::load_custom(path) {
                Ok(loaded) => loaded,
                Err(e) => {
                    log::warn!("Failed to load custom theme: {}", e);
                    (Self::dark(), "Dark (fallback)".into())
                }
            },
        }
    }

    /// Load a custom theme from JSON file
    fn load_custom(path: &str) -> Result<(Self, String), ConfigError> {
        let expanded = expand_home(path);
        let content = fs::read_to_string(&expanded).map_err(|source| ConfigError::Io {
            path: expanded.display().to_string(),
            source,
        })?;
        let config: ThemeConfig = serde_json::from_str(&content).map_err(|e| ConfigError::Json {
            path: expanded.display().to_string(),
            message: e.to_string(),
        })?;
        Ok((Self::from_config(&config.colors, config.is_dark), config.name))
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}
