//! Configuration persistence for sensesketch settings

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::SurfaceSize;

/// Environment variable that overrides the analysis service URL
pub const API_URL_ENV: &str = "SENSESKETCH_API_URL";

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for StrokeColor {
    fn default() -> Self {
        // Dark slate, matches the text color of the app theme (#2C3E50)
        Self {
            r: 0x2C as f32 / 255.0,
            g: 0x3E as f32 / 255.0,
            b: 0x50 as f32 / 255.0,
        }
    }
}

impl StrokeColor {
    pub const WHITE: StrokeColor = StrokeColor {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Parse `#RRGGBB` or `RRGGBB`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self {
            r: channel(0)? as f32 / 255.0,
            g: channel(2)? as f32 / 255.0,
            b: channel(4)? as f32 / 255.0,
        })
    }

    /// Convert to RGBA bytes (0-255), always opaque
    pub fn to_rgba_u8(self) -> [u8; 4] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (self.b.clamp(0.0, 1.0) * 255.0).round() as u8,
            255,
        ]
    }
}

/// Raster format of exported images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExportFormat {
    #[default]
    Png,
}

impl ExportFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
        }
    }

    /// Get MIME type for this format
    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
        }
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Color of new strokes
    #[serde(default)]
    pub brush_color: StrokeColor,
    /// Width of new strokes in logical pixels
    #[serde(default = "default_brush_width")]
    pub brush_width: f32,
    /// Drawing surface width in pixels
    #[serde(default = "default_surface_width")]
    pub surface_width: u32,
    /// Drawing surface height in pixels
    #[serde(default = "default_surface_height")]
    pub surface_height: u32,
    /// Surface background, used when flattening an export
    #[serde(default = "default_background")]
    pub background_color: StrokeColor,
    /// Export quality factor in (0, 1]
    #[serde(default = "default_export_quality")]
    pub export_quality: f32,
    /// Whether to composite exports onto the background color
    #[serde(default = "default_export_flatten")]
    pub export_flatten: bool,
    /// Base URL of the analysis service
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Total request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Connect timeout in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_brush_width() -> f32 {
    4.0
}

fn default_surface_width() -> u32 {
    360
}

fn default_surface_height() -> u32 {
    400
}

fn default_background() -> StrokeColor {
    StrokeColor::WHITE
}

fn default_export_quality() -> f32 {
    0.9
}

fn default_export_flatten() -> bool {
    true
}

fn default_api_base_url() -> String {
    "https://p-inno.sonktx.online".to_string()
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl AppConfig {
    /// Application directory name under the user config dir
    pub const ID: &'static str = "sensesketch";

    /// Default location of the config file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(Self::ID).join("config.json"))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => match Self::load_from(&path) {
                Ok(config) => config,
                Err(err) => {
                    log::warn!("Error loading config, using defaults: {:#}", err);
                    Self::default()
                }
            },
            Some(_) => Self::default(),
            None => {
                log::warn!("Could not determine config directory, using defaults");
                Self::default()
            }
        };
        config.apply_env_overrides();
        config
    }

    /// Read configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::config_path() else {
            log::error!("Could not determine config directory for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:#}", err);
        }
    }

    /// Write configuration to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config dir: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV)
            && !url.trim().is_empty()
        {
            log::info!("Using analysis service from {}: {}", API_URL_ENV, url);
            self.api_base_url = url.trim().to_string();
        }
    }

    pub fn surface_size(&self) -> SurfaceSize {
        SurfaceSize::new(self.surface_width, self.surface_height)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            brush_color: StrokeColor::default(),
            brush_width: default_brush_width(),
            surface_width: default_surface_width(),
            surface_height: default_surface_height(),
            background_color: default_background(),
            export_quality: default_export_quality(),
            export_flatten: default_export_flatten(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}
