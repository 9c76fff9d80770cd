// SPDX-License-Identifier: MPL-2.0

//! Offscreen compositing surface
//!
//! A capture draws the current frame mirrored through the effect directive,
//! then burns the sticker in on top without mirroring or filtering it.

use crate::backends::camera::CameraFrame;
use crate::effects::{EffectDirective, apply_directive};
use crate::errors::CaptureError;
use image::{RgbaImage, imageops};
use tracing::debug;

/// Raster surface at the frame's native resolution
pub struct CaptureSurface {
    canvas: RgbaImage,
}

impl CaptureSurface {
    /// Create the surface and draw `frame` onto it mirrored, through
    /// `directive`. Filter and mirroring apply to this draw only.
    pub fn from_frame(
        frame: &CameraFrame,
        directive: &EffectDirective,
    ) -> Result<Self, CaptureError> {
        let mut canvas = frame.to_rgba_image().ok_or_else(|| {
            CaptureError::SurfaceUnavailable(format!(
                "frame {}x{} (stride {}, {} bytes) cannot back a surface",
                frame.width,
                frame.height,
                frame.stride,
                frame.data.len()
            ))
        })?;

        imageops::flip_horizontal_in_place(&mut canvas);
        apply_directive(&mut canvas, directive);

        debug!(
            width = canvas.width(),
            height = canvas.height(),
            directive = %directive,
            "Frame drawn onto capture surface"
        );
        Ok(Self { canvas })
    }

    /// Draw a rasterized glyph centred on the surface
    pub fn draw_centered(&mut self, glyph: &RgbaImage) {
        let x = (self.canvas.width() as i64 - glyph.width() as i64) / 2;
        let y = (self.canvas.height() as i64 - glyph.height() as i64) / 2;
        imageops::overlay(&mut self.canvas, glyph, x, y);
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::sync::Arc;
    use std::time::Instant;

    #[test]
    fn test_frame_is_mirrored() {
        let mut image = RgbaImage::from_pixel(4, 2, Rgba([0, 0, 0, 255]));
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        let frame = CameraFrame::from_rgba_image(image);

        let surface = CaptureSurface::from_frame(&frame, &EffectDirective::none()).unwrap();
        let out = surface.into_image();
        assert_eq!(out.get_pixel(3, 0)[0], 255);
        assert_eq!(out.get_pixel(0, 0)[0], 0);
    }

    #[test]
    fn test_unusable_frame_has_no_surface() {
        let frame = CameraFrame {
            width: 0,
            height: 0,
            stride: 0,
            data: Arc::from(Vec::new()),
            captured_at: Instant::now(),
        };
        assert!(matches!(
            CaptureSurface::from_frame(&frame, &EffectDirective::none()),
            Err(CaptureError::SurfaceUnavailable(_))
        ));
    }

    #[test]
    fn test_glyph_is_centred_and_clipped() {
        let frame = CameraFrame::from_rgba_image(RgbaImage::from_pixel(
            10,
            10,
            Rgba([0, 0, 0, 255]),
        ));
        let mut surface = CaptureSurface::from_frame(&frame, &EffectDirective::none()).unwrap();
        // Larger than the surface: overlay must clip, not panic
        let glyph = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255]));
        surface.draw_centered(&glyph);
        let out = surface.into_image();
        assert_eq!(out.get_pixel(0, 0)[0], 255);
        assert_eq!(out.get_pixel(9, 9)[0], 255);
    }
}
