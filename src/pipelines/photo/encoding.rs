// SPDX-License-Identifier: GPL-3.0-only

//! JPEG encoding of composited photos
//!
//! Photos leave the pipeline as JPEG bytes; frontends that need a URI get a
//! `data:image/jpeg;base64,...` string.

use crate::constants;
use crate::errors::CaptureError;
use base64::{Engine as _, engine::general_purpose};
use image::RgbaImage;
use std::sync::Arc;
use tracing::debug;

/// A finished, immutable photo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub width: u32,
    pub height: u32,
    /// JPEG bytes; shared, never mutated after encoding
    pub jpeg: Arc<[u8]>,
}

impl CapturedImage {
    pub fn mime_type(&self) -> &'static str {
        constants::capture::MIME_TYPE
    }

    /// `data:image/jpeg;base64,...`
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type(),
            general_purpose::STANDARD.encode(&self.jpeg)
        )
    }

    /// Decode back to pixels (for previews)
    pub fn decode(&self) -> Result<RgbaImage, CaptureError> {
        let image = image::load_from_memory_with_format(&self.jpeg, image::ImageFormat::Jpeg)?;
        Ok(image.to_rgba8())
    }

    pub fn len(&self) -> usize {
        self.jpeg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jpeg.is_empty()
    }
}

/// Photo encoder
#[derive(Debug, Clone, Copy)]
pub struct PhotoEncoder {
    quality: u8,
}

impl PhotoEncoder {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode as JPEG. Alpha is dropped.
    pub fn encode(&self, image: &RgbaImage) -> Result<CapturedImage, CaptureError> {
        let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();

        let mut buffer = Vec::new();
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, self.quality);
        encoder.encode(
            rgb.as_raw(),
            rgb.width(),
            rgb.height(),
            image::ExtendedColorType::Rgb8,
        )?;

        debug!(
            width = rgb.width(),
            height = rgb.height(),
            quality = self.quality,
            size = buffer.len(),
            "JPEG encoding complete"
        );

        Ok(CapturedImage {
            width: rgb.width(),
            height: rgb.height(),
            jpeg: Arc::from(buffer),
        })
    }
}

impl Default for PhotoEncoder {
    fn default() -> Self {
        Self::new(constants::capture::JPEG_QUALITY)
    }
}
