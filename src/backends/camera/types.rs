// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use crate::constants;
use crate::errors::AcquisitionError;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, AcquisitionError>;

/// Camera backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CameraBackendType {
    /// Synthetic colour bars, always available
    #[default]
    TestPattern,
    /// A still image file served as a live stream
    StillImage,
    /// Linux webcam via V4L2
    V4l2,
}

impl std::fmt::Display for CameraBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CameraBackendType::TestPattern => write!(f, "test pattern"),
            CameraBackendType::StillImage => write!(f, "still image"),
            CameraBackendType::V4l2 => write!(f, "V4L2"),
        }
    }
}

/// Which way the requested camera should face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    /// Front camera, facing the person at the booth
    #[default]
    User,
    /// Rear camera
    Environment,
}

/// Parameters of a stream request.
///
/// Width and height are preferences; backends pick the closest mode they
/// support and report it through [`CameraFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    pub ideal_width: u32,
    pub ideal_height: u32,
    pub facing: FacingMode,
    /// Always false for the booth; kept so backends can reject audio requests
    pub audio: bool,
}

impl StreamConstraints {
    pub fn new(ideal_width: u32, ideal_height: u32) -> Self {
        Self {
            ideal_width,
            ideal_height,
            ..Self::default()
        }
    }
}

impl Default for StreamConstraints {
    fn default() -> Self {
        Self {
            ideal_width: constants::camera::IDEAL_WIDTH,
            ideal_height: constants::camera::IDEAL_HEIGHT,
            facing: FacingMode::User,
            audio: false,
        }
    }
}

/// Represents a camera device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub name: String,
    /// Backend-specific location (device node, file path, ...)
    pub path: String,
}

/// Negotiated stream format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraFormat {
    pub width: u32,
    pub height: u32,
    pub framerate: Option<u32>,
    /// FourCC code (e.g., "YUYV", "MJPG") or "RGBA" for synthetic sources
    pub pixel_format: String,
}

impl std::fmt::Display for CameraFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(fps) = self.framerate {
            write!(f, "{}x{} @ {}fps {}", self.width, self.height, fps, self.pixel_format)
        } else {
            write!(f, "{}x{} {}", self.width, self.height, self.pixel_format)
        }
    }
}

/// A single RGBA frame from a camera stream
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Bytes per row, at least `width * 4`
    pub stride: u32,
    pub data: Arc<[u8]>,
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Wrap a tightly packed RGBA image
    pub fn from_rgba_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            stride: width * 4,
            data: Arc::from(image.into_raw()),
            captured_at: Instant::now(),
        }
    }

    /// Copy the frame into a tightly packed RGBA image.
    ///
    /// Returns `None` when the frame is empty or its buffer is shorter than
    /// its dimensions claim.
    pub fn to_rgba_image(&self) -> Option<RgbaImage> {
        if self.width == 0 || self.height == 0 || self.stride < self.width * 4 {
            return None;
        }

        let row_bytes = self.width as usize * 4;
        let stride = self.stride as usize;
        let needed = stride * (self.height as usize - 1) + row_bytes;
        if self.data.len() < needed {
            return None;
        }

        if stride == row_bytes {
            return RgbaImage::from_raw(
                self.width,
                self.height,
                self.data[..row_bytes * self.height as usize].to_vec(),
            );
        }

        let mut packed = Vec::with_capacity(row_bytes * self.height as usize);
        for row in self.data.chunks(stride).take(self.height as usize) {
            packed.extend_from_slice(&row[..row_bytes]);
        }
        RgbaImage::from_raw(self.width, self.height, packed)
    }
}
