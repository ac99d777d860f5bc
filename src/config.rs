//! Application configuration: config directory management, the TOML config
//! file, and the color theme.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use supports_color::Stream;

/// Manages config directory and config file operations
#[derive(Clone)]
pub struct ConfigManager {
    pub(crate) config_dir: PathBuf,
}

impl ConfigManager {
    /// Create a ConfigManager with a custom config directory (primarily for testing)
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Create a new ConfigManager for the given app name
    pub fn new(app_name: &str) -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| eyre!("Could not determine config directory"))?
            .join(app_name);

        Ok(Self { config_dir })
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get path to a specific config file or subdirectory
    pub fn config_path(&self, path: &str) -> PathBuf {
        self.config_dir.join(path)
    }

    pub fn ensure_config_dir(&self) -> Result<()> {
        if !self.config_dir.exists() {
            std::fs::create_dir_all(&self.config_dir)?;
        }
        Ok(())
    }

    /// Write the default configuration template to config.toml
    pub fn write_default_config(&self, force: bool) -> Result<PathBuf> {
        let config_path = self.config_path("config.toml");

        if config_path.exists() && !force {
            return Err(eyre!(
                "Config file already exists at {}. Use --force to overwrite.",
                config_path.display()
            ));
        }

        self.ensure_config_dir()?;
        std::fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;

        Ok(config_path)
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration format version (for future compatibility)
    pub version: String,
    pub graph: GraphDefaultsConfig,
    pub ui: UiConfig,
    pub theme: ThemeConfig,
    pub debug: DebugConfig,
}

/// Initial graph setup applied when a project activity file is opened.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GraphDefaultsConfig {
    /// Metric keys plotted on startup (CLI --metric flags take precedence).
    pub metrics: Vec<String>,
    /// Metric types offered by the add-metric dialog; empty = no restriction.
    pub type_filter: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub show_legend: bool,
    /// chrono format string for x-axis date labels.
    pub date_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub color_mode: String,
    pub colors: ColorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub primary: String,
    pub error: String,
    pub dimmed: String,
    pub background: String,
    pub controls_bg: String,
    pub text_primary: String,
    pub text_secondary: String,
    pub title_bar: String,
    pub modal_border: String,
    pub modal_border_active: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DebugConfig {
    pub enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            graph: GraphDefaultsConfig::default(),
            ui: UiConfig::default(),
            theme: ThemeConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_legend: true,
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            color_mode: "auto".to_string(),
            colors: ColorConfig::default(),
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            primary: "cyan".to_string(),
            error: "red".to_string(),
            dimmed: "dark_gray".to_string(),
            background: "black".to_string(),
            controls_bg: "indexed(236)".to_string(),
            text_primary: "white".to_string(),
            text_secondary: "dark_gray".to_string(),
            title_bar: "white".to_string(),
            modal_border: "cyan".to_string(),
            modal_border_active: "yellow".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults overlaid with the user config.toml, if any.
    pub fn load(app_name: &str) -> Result<Self> {
        let config_manager = ConfigManager::new(app_name)?;
        Self::load_from(&config_manager)
    }

    /// Load configuration from the given config directory.
    pub fn load_from(config_manager: &ConfigManager) -> Result<Self> {
        let config_path = config_manager.config_path("config.toml");

        let config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path).map_err(|e| {
                eyre!(
                    "Failed to read config file at {}: {}",
                    config_path.display(),
                    e
                )
            })?;
            toml::from_str(&content).map_err(|e| {
                eyre!(
                    "Failed to parse config file at {}: {}",
                    config_path.display(),
                    e
                )
            })?
        } else {
            AppConfig::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !self.version.starts_with("0.1") {
            return Err(eyre!(
                "Unsupported config version: {}. Expected 0.1.x",
                self.version
            ));
        }

        match self.theme.color_mode.as_str() {
            "light" | "dark" | "auto" => {}
            _ => {
                return Err(eyre!(
                    "Invalid color_mode: {}. Must be 'light', 'dark', or 'auto'",
                    self.theme.color_mode
                ))
            }
        }

        if self.ui.date_format.is_empty() {
            return Err(eyre!("date_format must not be empty"));
        }

        let parser = ColorParser::new();
        self.theme.colors.validate(&parser)?;

        Ok(())
    }
}

impl ColorConfig {
    fn entries(&self) -> [(&'static str, &str); 10] {
        [
            ("primary", self.primary.as_str()),
            ("error", self.error.as_str()),
            ("dimmed", self.dimmed.as_str()),
            ("background", self.background.as_str()),
            ("controls_bg", self.controls_bg.as_str()),
            ("text_primary", self.text_primary.as_str()),
            ("text_secondary", self.text_secondary.as_str()),
            ("title_bar", self.title_bar.as_str()),
            ("modal_border", self.modal_border.as_str()),
            ("modal_border_active", self.modal_border_active.as_str()),
        ]
    }

    /// Validate all color strings can be parsed
    fn validate(&self, parser: &ColorParser) -> Result<()> {
        for (name, value) in self.entries() {
            parser
                .parse(value)
                .map_err(|e| eyre!("Invalid color value for '{}': {}", name, e))?;
        }
        Ok(())
    }
}

/// Color parser with terminal capability detection
pub struct ColorParser {
    supports_true_color: bool,
    supports_256: bool,
    no_color: bool,
}

impl ColorParser {
    pub fn new() -> Self {
        let no_color = std::env::var("NO_COLOR").is_ok();
        let support = supports_color::on(Stream::Stdout);

        Self {
            supports_true_color: support.as_ref().map(|s| s.has_16m).unwrap_or(false),
            supports_256: support.as_ref().map(|s| s.has_256).unwrap_or(false),
            no_color,
        }
    }

    /// Parse a color string (named, #rrggbb hex, or indexed(n)) into the
    /// best color the terminal supports.
    pub fn parse(&self, s: &str) -> Result<Color> {
        if self.no_color {
            return Ok(Color::Reset);
        }

        let trimmed = s.trim();

        if let Some(hex) = trimmed.strip_prefix('#') {
            let (r, g, b) = parse_hex(hex)
                .ok_or_else(|| eyre!("Invalid hex color: '{}'. Expected #rrggbb", trimmed))?;
            return Ok(self.downgrade_rgb(r, g, b));
        }

        let lower = trimmed.to_lowercase();
        if let Some(num_str) = lower.strip_prefix("indexed(").and_then(|r| r.strip_suffix(')')) {
            let num = num_str.parse::<u8>().map_err(|_| {
                eyre!(
                    "Invalid indexed color: '{}'. Expected format: indexed(0-255)",
                    trimmed
                )
            })?;
            return Ok(Color::Indexed(num));
        }

        match lower.as_str() {
            "black" => Ok(Color::Black),
            "red" => Ok(Color::Red),
            "green" => Ok(Color::Green),
            "yellow" => Ok(Color::Yellow),
            "blue" => Ok(Color::Blue),
            "magenta" => Ok(Color::Magenta),
            "cyan" => Ok(Color::Cyan),
            "white" => Ok(Color::White),
            "gray" | "grey" | "dark_gray" | "dark_grey" => Ok(Color::Indexed(8)),
            "light_gray" | "light_grey" => Ok(Color::Indexed(7)),
            "reset" => Ok(Color::Reset),
            _ => Err(eyre!(
                "Unknown color name: '{}'. Supported: basic ANSI names, \
                 indexed(0-255), or hex colors (#ff0000)",
                trimmed
            )),
        }
    }

    /// Map RGB to the richest representation the terminal can show.
    fn downgrade_rgb(&self, r: u8, g: u8, b: u8) -> Color {
        if self.supports_true_color {
            Color::Rgb(r, g, b)
        } else if self.supports_256 {
            Color::Indexed(rgb_to_256_color(r, g, b))
        } else {
            rgb_to_basic_ansi(r, g, b)
        }
    }
}

impl Default for ColorParser {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Convert RGB to the nearest xterm 256-color palette index.
pub fn rgb_to_256_color(r: u8, g: u8, b: u8) -> u8 {
    let max_diff = r.max(g).max(b) as i16 - r.min(g).min(b) as i16;
    if max_diff < 10 {
        // Grayscale ramp (232-255), cube corners for the extremes.
        let gray = (r as u16 + g as u16 + b as u16) / 3;
        return match gray {
            0..=7 => 16,
            248.. => 231,
            _ => 232 + ((gray - 8) * 24 / 240) as u8,
        };
    }

    let r_idx = (r as u16 * 5 / 255) as u8;
    let g_idx = (g as u16 * 5 / 255) as u8;
    let b_idx = (b as u16 * 5 / 255) as u8;
    16 + 36 * r_idx + 6 * g_idx + b_idx
}

/// Convert RGB to the nearest basic ANSI color (8 colors).
pub fn rgb_to_basic_ansi(r: u8, g: u8, b: u8) -> Color {
    let max_diff = r.max(g).max(b) as i16 - r.min(g).min(b) as i16;
    if max_diff < 30 {
        let avg = (r as u16 + g as u16 + b as u16) / 3;
        return if avg < 64 { Color::Black } else { Color::White };
    }

    match (r > 128, g > 128, b > 128) {
        (false, false, false) => Color::Black,
        (true, false, false) => Color::Red,
        (false, true, false) => Color::Green,
        (true, true, false) => Color::Yellow,
        (false, false, true) => Color::Blue,
        (true, false, true) => Color::Magenta,
        (false, true, true) => Color::Cyan,
        (true, true, true) => Color::White,
    }
}

/// Theme containing parsed colors ready for use during rendering.
#[derive(Debug, Clone, Default)]
pub struct Theme {
    pub colors: HashMap<String, Color>,
}

impl Theme {
    /// Create a Theme from a ThemeConfig by parsing all color strings
    pub fn from_config(config: &ThemeConfig) -> Result<Self> {
        let parser = ColorParser::new();
        let mut colors = HashMap::new();
        for (name, value) in config.colors.entries() {
            colors.insert(name.to_string(), parser.parse(value)?);
        }
        Ok(Self { colors })
    }

    /// Get a color by name, Color::Reset if not found
    pub fn get(&self, name: &str) -> Color {
        self.colors.get(name).copied().unwrap_or(Color::Reset)
    }
}

/// Default configuration template written by --write-config.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r##"# metrui configuration file
#
# All settings are optional; anything omitted falls back to the built-in
# default shown here.

version = "0.1"

[graph]
# Metric keys plotted when a project activity file is opened.
# Repeatable --metric flags on the command line take precedence.
metrics = []
# Metric types offered by the add-metric dialog, e.g. ["INT", "PERCENT"].
# An empty list applies no restriction.
type_filter = []

[ui]
show_legend = true
date_format = "%Y-%m-%d"

[theme]
# Color handling: "auto" detects terminal capabilities.
color_mode = "auto"

[theme.colors]
# Colors accept ANSI names ("cyan"), hex ("#00afaf"), or indexed(0-255).
primary = "cyan"
error = "red"
dimmed = "dark_gray"
background = "black"
controls_bg = "indexed(236)"
text_primary = "white"
text_secondary = "dark_gray"
title_bar = "white"
modal_border = "cyan"
modal_border_active = "yellow"

[debug]
enabled = false
"##;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        AppConfig::default().validate().unwrap();
    }

    #[test]
    fn default_template_parses_to_defaults() {
        let config: AppConfig = toml::from_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        config.validate().unwrap();
        assert!(config.graph.metrics.is_empty());
        assert!(config.graph.type_filter.is_empty());
        assert!(config.ui.show_legend);
    }

    #[test]
    fn unknown_version_rejected() {
        let mut config = AppConfig::default();
        config.version = "9.9".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn bad_color_mode_rejected() {
        let mut config = AppConfig::default();
        config.theme.color_mode = "sepia".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(parse_hex("ff0000"), Some((255, 0, 0)));
        assert_eq!(parse_hex("00Afaf"), Some((0, 0xaf, 0xaf)));
        assert_eq!(parse_hex("xyzzyx"), None);
        assert_eq!(parse_hex("fff"), None);
    }

    #[test]
    fn rgb_256_grayscale_and_cube() {
        assert_eq!(rgb_to_256_color(0, 0, 0), 16);
        assert_eq!(rgb_to_256_color(255, 255, 255), 231);
        // Pure red lands in the color cube.
        assert_eq!(rgb_to_256_color(255, 0, 0), 16 + 36 * 5);
    }

    #[test]
    fn rgb_basic_ansi_thresholds() {
        assert_eq!(rgb_to_basic_ansi(255, 0, 0), Color::Red);
        assert_eq!(rgb_to_basic_ansi(0, 200, 200), Color::Cyan);
        assert_eq!(rgb_to_basic_ansi(20, 20, 20), Color::Black);
    }

    #[test]
    fn theme_lookup_falls_back_to_reset() {
        let theme = Theme::from_config(&ThemeConfig::default()).unwrap();
        assert_eq!(theme.get("no_such_color"), Color::Reset);
    }
}
