//! Configuration management for the application.
//!
//! Settings live in a TOML file in the platform config directory. A missing
//! file means defaults; saves go through a temp file and a rename.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::constants::{APP_NAME, CONFIG_FILE_NAME};
use crate::models::theme::AUTO_THEME;
use crate::models::Theme;
use crate::render::{BoundsPolicy, RenderOptions};

/// Render settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Theme name, or "auto" to follow the OS dark/light preference
    pub theme: String,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Share of the limiting canvas dimension the layout fills, in (0, 1]
    pub fit_ratio: f64,
    /// Bounding box policy ("unrotated" or "rotated")
    pub bounds: BoundsPolicy,
    /// Label font size floor
    pub min_font_size: f64,
    /// Key corner radius in pixels
    pub corner_radius: f64,
    /// Key outline width in pixels
    pub stroke_width: f64,
    /// Draw key drop shadows
    pub key_shadow: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let options = RenderOptions::default();
        Self {
            theme: AUTO_THEME.to_string(),
            width: 1200,
            height: 500,
            fit_ratio: options.fit_ratio,
            bounds: options.bounds,
            min_font_size: options.min_font_size,
            corner_radius: options.corner_radius,
            stroke_width: options.stroke_width,
            key_shadow: options.key_shadow,
        }
    }
}

/// Device query settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Response timeout in milliseconds
    pub timeout_ms: u64,
    /// Report size in bytes
    pub report_size: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 1000,
            report_size: 32,
        }
    }
}

impl DeviceConfig {
    /// Response timeout as a duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Application configuration.
///
/// # File Location
///
/// - Linux: `~/.config/KeyViz/config.toml`
/// - macOS: `~/Library/Application Support/KeyViz/config.toml`
/// - Windows: `%APPDATA%\KeyViz\config.toml`
///
/// # Validation
///
/// - `render.theme` must be "auto" or a registered theme
/// - `render.width` and `render.height` must be non-zero
/// - `render.fit_ratio` must be in (0, 1]
/// - `render.min_font_size`, `render.corner_radius` and `render.stroke_width`
///   must not be negative
/// - `device.timeout_ms` must be positive and `device.report_size` at least 8
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Render settings
    #[serde(default)]
    pub render: RenderConfig,
    /// Device query settings
    #[serde(default)]
    pub device: DeviceConfig,
}

impl Config {
    /// Creates a new Config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Loads configuration from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from `path`, returning defaults if it is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to `path` using temp file + rename.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create config directory: {}", dir.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = path.with_extension("toml.tmp");

        fs::write(&temp_path, content).with_context(|| {
            format!("Failed to write temp config file: {}", temp_path.display())
        })?;

        fs::rename(&temp_path, path).with_context(|| {
            format!("Failed to rename temp config file to: {}", path.display())
        })?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        let render = &self.render;

        if !render.theme.trim().eq_ignore_ascii_case(AUTO_THEME)
            && Theme::by_name(&render.theme).is_none()
        {
            anyhow::bail!(
                "Unknown theme '{}'. Available: {}, {}",
                render.theme,
                AUTO_THEME,
                Theme::names().collect::<Vec<_>>().join(", ")
            );
        }

        if render.width == 0 || render.height == 0 {
            anyhow::bail!(
                "Canvas size must be non-zero, got {}x{}",
                render.width,
                render.height
            );
        }

        if render.fit_ratio.is_nan() || render.fit_ratio <= 0.0 || render.fit_ratio > 1.0 {
            anyhow::bail!("fit_ratio must be in (0, 1], got {}", render.fit_ratio);
        }

        for (name, value) in [
            ("min_font_size", render.min_font_size),
            ("corner_radius", render.corner_radius),
            ("stroke_width", render.stroke_width),
        ] {
            if value.is_nan() || value < 0.0 {
                anyhow::bail!("{} must not be negative, got {}", name, value);
            }
        }

        if self.device.timeout_ms == 0 {
            anyhow::bail!("device.timeout_ms must be positive");
        }

        if self.device.report_size < 8 {
            anyhow::bail!(
                "device.report_size must be at least 8, got {}",
                self.device.report_size
            );
        }

        Ok(())
    }

    /// Resolves the configured theme.
    #[must_use]
    pub fn theme(&self) -> &'static Theme {
        Theme::resolve(&self.render.theme).unwrap_or_else(Theme::dark)
    }

    /// Canvas size in pixels.
    #[must_use]
    pub fn canvas_size(&self) -> (f64, f64) {
        (f64::from(self.render.width), f64::from(self.render.height))
    }

    /// Engine options built from the render section.
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            fit_ratio: self.render.fit_ratio,
            bounds: self.render.bounds,
            min_font_size: self.render.min_font_size,
            corner_radius: self.render.corner_radius,
            stroke_width: self.render.stroke_width,
            key_shadow: self.render.key_shadow,
        }
    }
}
