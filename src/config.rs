//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root next to the avatar image:
//!
//! ```text
//! content/
//! ├── config.toml              # Site metadata, social handles, colors
//! └── images/
//!     └── profile-pic.png      # Avatar source (matched by pattern)
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! [site]
//! homepage = "https://example.com"   # Required
//! author = "Jane Doe"                # Required
//! banner = "Jane Doe"                # Heading text (defaults to author)
//! tagline = "Software for operations and the web."
//! bio = "a software engineer living in *Berlin*."
//! blog = "/blog/"
//!
//! [site.avatar]
//! pattern = "profile-pic.png"        # File name, or path suffix if it contains '/'
//! quality = 90                       # AVIF quality (0-100)
//!
//! [social]
//! email = "jane@example.com"         # Plain address or a pre-encoded string
//! github = "janedoe"
//! twitter = "janedoe"
//! stack_overflow = "janedoe"
//!
//! [theme]
//! icon_size = "2em"
//! social_gap = "1rem"
//!
//! [theme.sidebar_width]
//! size = "30vw"
//! min = "14rem"
//! max = "24rem"
//!
//! [colors.light]
//! background = "#ffffff"
//! sidebar = "#1d1f21"
//! ...
//! ```
//!
//! Stock defaults are serialized to a TOML table and the user file is merged
//! on top, so config files only carry what they override. Unknown keys are
//! rejected to catch typos early. Required metadata fields are not checked
//! here; [`crate::metadata`] owns that, so `config.toml` without `[site]`
//! still parses.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Author and page metadata.
    pub site: SiteSection,
    /// Social profile handles and the contact address.
    pub social: SocialConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Layout settings.
    pub theme: ThemeConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.avatar.quality > 100 {
            return Err(ConfigError::Validation(
                "site.avatar.quality must be 0-100".into(),
            ));
        }
        if self.site.avatar.pattern.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.avatar.pattern must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// The `[site]` table.
///
/// Everything is optional at this layer. `homepage` and `author` are
/// enforced when metadata is resolved.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Heading text. Falls back to `author`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    /// Inline markdown appended to "Written by {author}, ".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// Blog index link, relative path or absolute URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog: Option<String>,
    pub avatar: AvatarConfig,
}

/// Where to find the avatar and how to encode its derived images.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AvatarConfig {
    /// File name to match, or a path suffix when it contains `/`.
    pub pattern: String,
    /// AVIF encoding quality (0 = worst, 100 = best).
    pub quality: u32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            pattern: "profile-pic.png".to_string(),
            quality: 90,
        }
    }
}

/// The `[social]` table. Absent handles produce no link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SocialConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_overflow: Option<String>,
}

/// A responsive CSS size expressed as `clamp(min, size, max)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClampSize {
    /// Preferred/fluid value, typically viewport-relative (e.g. `"30vw"`).
    pub size: String,
    pub min: String,
    pub max: String,
}

impl ClampSize {
    /// Render as a CSS `clamp()` expression.
    pub fn to_css(&self) -> String {
        format!("clamp({}, {}, {})", self.min, self.size, self.max)
    }
}

/// Layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Width of the name banner column.
    pub sidebar_width: ClampSize,
    /// Font size of the social link icons (CSS value).
    pub icon_size: String,
    /// Gap between social links (CSS value).
    pub social_gap: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            sidebar_width: ClampSize {
                size: "30vw".to_string(),
                min: "14rem".to_string(),
                max: "24rem".to_string(),
            },
            icon_size: "2em".to_string(),
            social_gap: "1rem".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    /// Banner column background.
    pub sidebar: String,
    /// Banner text.
    pub sidebar_text: String,
    pub text: String,
    /// Middle initial in the banner.
    pub accent: String,
    pub link: String,
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            sidebar: "#1d1f21".to_string(),
            sidebar_text: "#f5f5f5".to_string(),
            text: "#222222".to_string(),
            accent: "#e06c75".to_string(),
            link: "#333333".to_string(),
            link_hover: "#000000".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#121212".to_string(),
            sidebar: "#000000".to_string(),
            sidebar_text: "#eeeeee".to_string(),
            text: "#dddddd".to_string(),
            accent: "#e06c75".to_string(),
            link: "#cccccc".to_string(),
            link_hover: "#ffffff".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command. Required keys are commented out so
/// the file parses to the stock defaults.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Folio Configuration
# ===========================
# Place this file at content/config.toml.
# Everything except site.homepage and site.author is optional.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site metadata
# ---------------------------------------------------------------------------
[site]
# Required. Absolute URL the avatar and author name link to.
# homepage = "https://example.com"

# Required. Author display name, used in the bio line and image alt text.
# author = "Jane Doe"

# Heading text. Defaults to the author name. Spaces and punctuation are
# dropped and the middle character is highlighted: "Jim J Kelly" -> jim[j]kelly
# banner = "Jane Doe"

# Paragraph under the heading.
# tagline = "Software development for operations and the web."

# Continues "Written by <author>, ". Inline markdown (links, emphasis) allowed.
# bio = "a software engineer living in Berlin."

# Blog index link, relative path or absolute URL.
# blog = "/blog/"

[site.avatar]
# File name to look for anywhere under the content directory.
# A value containing '/' matches the end of the path instead.
pattern = "profile-pic.png"

# AVIF encoding quality for the derived 50x50 and 100x100 images.
quality = 90

# ---------------------------------------------------------------------------
# Social links (each one is omitted when absent)
# ---------------------------------------------------------------------------
[social]
# Plain address, or an already character-encoded mailto: string.
# email = "jane@example.com"
# github = "janedoe"
# twitter = "janedoe"
# stack_overflow = "janedoe"

# ---------------------------------------------------------------------------
# Theme / layout
# ---------------------------------------------------------------------------
[theme]
# Font size of the social link icons (CSS value).
icon_size = "2em"

# Gap between social links (CSS value).
social_gap = "1rem"

# Width of the banner column, as CSS clamp(min, size, max).
[theme.sidebar_width]
size = "30vw"
min = "14rem"
max = "24rem"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
sidebar = "#1d1f21"
sidebar_text = "#f5f5f5"
text = "#222222"
accent = "#e06c75"        # Middle initial
link = "#333333"
link_hover = "#000000"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#121212"
sidebar = "#000000"
sidebar_text = "#eeeeee"
text = "#dddddd"
accent = "#e06c75"
link = "#cccccc"
link_hover = "#ffffff"
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    fn vars(scheme: &ColorScheme, indent: &str) -> String {
        [
            ("--color-bg", &scheme.background),
            ("--color-sidebar", &scheme.sidebar),
            ("--color-sidebar-text", &scheme.sidebar_text),
            ("--color-text", &scheme.text),
            ("--color-accent", &scheme.accent),
            ("--color-link", &scheme.link),
            ("--color-link-hover", &scheme.link_hover),
        ]
        .iter()
        .map(|(name, value)| format!("{indent}{name}: {value};"))
        .collect::<Vec<_>>()
        .join("\n")
    }

    format!(
        ":root {{\n{light}\n}}\n\n@media (prefers-color-scheme: dark) {{\n    :root {{\n{dark}\n    }}\n}}",
        light = vars(&colors.light, "    "),
        dark = vars(&colors.dark, "        "),
    )
}

/// Generate CSS custom properties from theme config.
pub fn generate_theme_css(theme: &ThemeConfig) -> String {
    format!(
        r#":root {{
    --sidebar-width: {sidebar_width};
    --icon-size: {icon_size};
    --social-gap: {social_gap};
}}"#,
        sidebar_width = theme.sidebar_width.to_css(),
        icon_size = theme.icon_size,
        social_gap = theme.social_gap,
    )
}
