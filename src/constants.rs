// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Application name used for config, cache and picture directories
pub const APP_NAME: &str = "retro-cam";

/// Camera request defaults
pub mod camera {
    /// Preferred capture width (negotiable)
    pub const IDEAL_WIDTH: u32 = 1280;
    /// Preferred capture height (negotiable)
    pub const IDEAL_HEIGHT: u32 = 720;
    /// Frames buffered between a capture thread and the booth
    pub const FRAME_CHANNEL_CAPACITY: usize = 4;
    /// Frame interval of the synthetic test pattern
    pub const TEST_PATTERN_FPS: u32 = 30;
}

/// Capture and compositing defaults
pub mod capture {
    /// JPEG quality of captured photos (0-100)
    pub const JPEG_QUALITY: u8 = 90;
    /// Font size of a burned-in sticker, in pixels
    pub const STICKER_SIZE_PX: u32 = 150;
    /// Font family used for sticker glyphs
    pub const STICKER_FONT_FAMILY: &str = "serif";
    /// MIME type of captured photos
    pub const MIME_TYPE: &str = "image/jpeg";
}

/// Timings that pace the shutter, ejection and developing animations
pub mod timing {
    use super::Duration;

    /// How long the full-screen flash stays visible
    pub const FLASH: Duration = Duration::from_millis(200);
    /// Delay before a fresh photo slides out of the camera
    pub const EJECT: Duration = Duration::from_millis(100);
    /// How long a photo stays in the "developing" state.
    /// The processing window (shutter disabled) closes at the same time.
    pub const DEVELOP: Duration = Duration::from_millis(3000);
    /// Simulated latency of the caption service
    pub const CAPTION_DELAY: Duration = Duration::from_millis(1500);
}

/// Photo wall layout
pub mod wall {
    /// Horizontal position of the ejection slot
    pub const EJECT_ORIGIN_X: f64 = 100.0;
    /// Distance of the ejection slot above the bottom of the viewport
    pub const EJECT_ORIGIN_FROM_BOTTOM: f64 = 500.0;
    /// Distance a photo travels upward when ejected
    pub const EJECT_RISE: f64 = 250.0;
    /// Maximum random horizontal drift when ejected
    pub const EJECT_MAX_DRIFT: f64 = 80.0;
    /// Maximum tilt either way, in degrees
    pub const MAX_TILT_DEGREES: f64 = 5.0;
    /// Viewport height used when the frontend does not report one
    pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 900.0;
}

/// Caption substituted when the caption service fails
pub const FALLBACK_CAPTION: &str = "Start of something new";

/// Highest beauty level
pub const MAX_BEAUTY_LEVEL: u8 = 100;

/// Step used by frontends to nudge the beauty slider
pub const BEAUTY_STEP: u8 = 10;

/// Sticker glyphs offered by the booth
pub const STICKERS: [&str; 8] = ["✨", "💖", "🌈", "🕶️", "🐱", "🌸", "🔥", "👑"];
