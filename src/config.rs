// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::CameraBackendType;
use crate::constants::{self, timing};
use crate::effects::FilterPreset;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Timings of the shutter/eject/develop sequence, in milliseconds
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub flash_ms: u64,
    pub eject_ms: u64,
    pub develop_ms: u64,
    pub caption_delay_ms: u64,
}

impl TimingSettings {
    pub fn flash(&self) -> Duration {
        Duration::from_millis(self.flash_ms)
    }

    pub fn eject(&self) -> Duration {
        Duration::from_millis(self.eject_ms)
    }

    pub fn develop(&self) -> Duration {
        Duration::from_millis(self.develop_ms)
    }

    pub fn caption_delay(&self) -> Duration {
        Duration::from_millis(self.caption_delay_ms)
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            flash_ms: timing::FLASH.as_millis() as u64,
            eject_ms: timing::EJECT.as_millis() as u64,
            develop_ms: timing::DEVELOP.as_millis() as u64,
            caption_delay_ms: timing::CAPTION_DELAY.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Camera backend to use
    pub backend: CameraBackendType,
    /// Device path for the V4L2 backend
    pub device_path: String,
    /// Image served by the still-image backend
    pub still_image_path: Option<PathBuf>,
    /// Preferred capture width
    pub ideal_width: u32,
    /// Preferred capture height
    pub ideal_height: u32,
    /// Filter selected at startup
    pub default_filter: FilterPreset,
    /// JPEG quality of captured photos (0-100)
    pub jpeg_quality: u8,
    /// Font size of burned-in stickers
    pub sticker_size_px: u32,
    /// Font family used to render sticker glyphs
    pub sticker_font_family: String,
    /// Caption used when the caption service fails
    pub fallback_caption: String,
    /// Viewport height of the photo wall
    pub wall_height: f64,
    /// Shutter/eject/develop timings
    pub timings: TimingSettings,
    /// Where exported photos are written (default: pictures dir)
    pub photo_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: CameraBackendType::default(),
            device_path: "/dev/video0".to_string(),
            still_image_path: None,
            ideal_width: constants::camera::IDEAL_WIDTH,
            ideal_height: constants::camera::IDEAL_HEIGHT,
            default_filter: FilterPreset::default(),
            jpeg_quality: constants::capture::JPEG_QUALITY,
            sticker_size_px: constants::capture::STICKER_SIZE_PX,
            sticker_font_family: constants::capture::STICKER_FONT_FAMILY.to_string(),
            fallback_caption: constants::FALLBACK_CAPTION.to_string(),
            wall_height: constants::wall::DEFAULT_VIEWPORT_HEIGHT,
            timings: TimingSettings::default(),
            photo_dir: None,
        }
    }
}

impl Config {
    /// Default location: `$XDG_CONFIG_HOME/retro-cam/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(constants::APP_NAME).join("config.json"))
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        let mut config: Config = serde_json::from_str(&text)?;
        config.sanitize();
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load from `path` (or the default location); a missing file yields defaults
    pub fn load_or_default(path: Option<&Path>) -> AppResult<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }

        Self::load(&path)
    }

    /// Write configuration as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Directory exported photos are written to
    pub fn photo_dir(&self) -> PathBuf {
        self.photo_dir
            .clone()
            .unwrap_or_else(crate::storage::default_photo_dir)
    }

    fn sanitize(&mut self) {
        self.jpeg_quality = self.jpeg_quality.clamp(1, 100);
        if self.ideal_width == 0 || self.ideal_height == 0 {
            self.ideal_width = constants::camera::IDEAL_WIDTH;
            self.ideal_height = constants::camera::IDEAL_HEIGHT;
        }
        if self.fallback_caption.trim().is_empty() {
            self.fallback_caption = constants::FALLBACK_CAPTION.to_string();
        }
    }
}
