// SPDX-License-Identifier: MPL-2.0

//! Photo capture pipeline
//!
//! ```text
//! CameraFrame → CaptureSurface (mirror + directive) → sticker → JPEG → CapturedImage
//! ```
//!
//! # Pipeline Stages
//!
//! 1. **Surface**: copy the frame at native size, mirrored, through the
//!    effect directive of the shutter press
//! 2. **Sticker**: burn in the selected glyph, centred, unmirrored and
//!    unfiltered
//! 3. **Encoding**: JPEG at the configured quality
//!
//! A failure at any stage aborts the capture; nothing partial is produced.

pub mod capture;
pub mod encoding;
pub mod sticker;

pub use capture::CaptureSurface;
pub use encoding::{CapturedImage, PhotoEncoder};
pub use sticker::{GlyphRasterizer, SvgGlyphRasterizer};

use crate::backends::camera::CameraFrame;
use crate::config::Config;
use crate::constants;
use crate::effects::{CaptureRequest, EffectDirective, Sticker};
use crate::errors::CaptureError;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Complete photo capture pipeline
#[derive(Clone)]
pub struct PhotoPipeline {
    encoder: PhotoEncoder,
    rasterizer: Arc<dyn GlyphRasterizer>,
    sticker_size_px: u32,
}

impl PhotoPipeline {
    /// Pipeline with the default JPEG quality and serif sticker font
    pub fn new() -> Self {
        Self::with_rasterizer(
            PhotoEncoder::default(),
            Arc::new(SvgGlyphRasterizer::new(
                constants::capture::STICKER_FONT_FAMILY,
            )),
            constants::capture::STICKER_SIZE_PX,
        )
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_rasterizer(
            PhotoEncoder::new(config.jpeg_quality),
            Arc::new(SvgGlyphRasterizer::new(config.sticker_font_family.clone())),
            config.sticker_size_px,
        )
    }

    pub fn with_rasterizer(
        encoder: PhotoEncoder,
        rasterizer: Arc<dyn GlyphRasterizer>,
        sticker_size_px: u32,
    ) -> Self {
        Self {
            encoder,
            rasterizer,
            sticker_size_px,
        }
    }

    /// Composite one frame into a finished photo
    pub fn composite(
        &self,
        frame: &CameraFrame,
        request: &CaptureRequest,
    ) -> Result<CapturedImage, CaptureError> {
        let photo = self.composite_with(frame, &request.directive(), request.sticker.as_ref())?;
        info!(
            filter = %request.filter,
            beauty = request.beauty.get(),
            "Photo composited"
        );
        Ok(photo)
    }

    /// Composite with an explicit directive instead of one derived from
    /// the booth controls
    pub fn composite_with(
        &self,
        frame: &CameraFrame,
        directive: &EffectDirective,
        sticker: Option<&Sticker>,
    ) -> Result<CapturedImage, CaptureError> {
        let mut surface = CaptureSurface::from_frame(frame, directive)?;

        if let Some(sticker) = sticker {
            match self.rasterizer.rasterize(sticker.glyph(), self.sticker_size_px) {
                Some(glyph) => surface.draw_centered(&glyph),
                None => warn!(sticker = %sticker, "Sticker could not be drawn, skipping"),
            }
        }

        let photo = self.encoder.encode(&surface.into_image())?;
        debug!(
            width = photo.width,
            height = photo.height,
            size = photo.len(),
            directive = %directive,
            "Photo encoded"
        );
        Ok(photo)
    }

    /// Load the sticker fonts ahead of the first shutter press.
    ///
    /// Blocking; frontends run it off their event loop.
    pub fn warm_up(&self) {
        self.rasterizer.warm_up();
    }

    /// [`PhotoPipeline::composite`] on the blocking thread pool
    pub async fn composite_async(
        &self,
        frame: CameraFrame,
        request: CaptureRequest,
    ) -> Result<CapturedImage, CaptureError> {
        let pipeline = self.clone();
        tokio::task::spawn_blocking(move || pipeline.composite(&frame, &request))
            .await
            .map_err(|e| CaptureError::EncodingFailed(format!("capture task error: {}", e)))?
    }
}

impl Default for PhotoPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{BeautyLevel, FilterPreset, Sticker};
    use image::{Rgba, RgbaImage};

    /// Draws every glyph as an opaque white square
    struct SquareRasterizer;

    impl GlyphRasterizer for SquareRasterizer {
        fn rasterize(&self, _glyph: &str, size_px: u32) -> Option<RgbaImage> {
            Some(RgbaImage::from_pixel(size_px, size_px, Rgba([255, 255, 255, 255])))
        }
    }

    struct BlankRasterizer;

    impl GlyphRasterizer for BlankRasterizer {
        fn rasterize(&self, _glyph: &str, _size_px: u32) -> Option<RgbaImage> {
            None
        }
    }

    #[derive(Default)]
    struct WarmUpCounter(std::sync::atomic::AtomicUsize);

    impl GlyphRasterizer for WarmUpCounter {
        fn rasterize(&self, _glyph: &str, _size_px: u32) -> Option<RgbaImage> {
            None
        }

        fn warm_up(&self) {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
    }

    fn pipeline(rasterizer: Arc<dyn GlyphRasterizer>) -> PhotoPipeline {
        PhotoPipeline::with_rasterizer(PhotoEncoder::new(100), rasterizer, 8)
    }

    fn black_frame() -> CameraFrame {
        CameraFrame::from_rgba_image(RgbaImage::from_pixel(32, 16, Rgba([0, 0, 0, 255])))
    }

    #[test]
    fn test_sticker_is_burned_in_unfiltered() {
        let request = CaptureRequest {
            filter: FilterPreset::Bw,
            beauty: BeautyLevel::MIN,
            sticker: Some(Sticker::new("🔥").unwrap()),
        };
        let photo = pipeline(Arc::new(SquareRasterizer))
            .composite(&black_frame(), &request)
            .unwrap();
        let pixels = photo.decode().unwrap();
        assert_eq!(pixels.dimensions(), (32, 16));
        // White centre survives even though mono+contrast would not brighten black
        assert!(pixels.get_pixel(16, 8)[0] > 240);
        assert!(pixels.get_pixel(1, 1)[0] < 16);
    }

    #[test]
    fn test_missing_glyph_still_produces_photo() {
        let request = CaptureRequest {
            sticker: Some(Sticker::new("?").unwrap()),
            ..Default::default()
        };
        let photo = pipeline(Arc::new(BlankRasterizer))
            .composite(&black_frame(), &request)
            .unwrap();
        assert!(photo.decode().unwrap().get_pixel(16, 8)[0] < 16);
    }

    #[test]
    fn test_explicit_directive_overrides_controls() {
        let frame =
            CameraFrame::from_rgba_image(RgbaImage::from_pixel(8, 8, Rgba([200, 40, 40, 255])));
        let directive: EffectDirective = "grayscale(1)".parse().unwrap();
        let photo = pipeline(Arc::new(BlankRasterizer))
            .composite_with(&frame, &directive, None)
            .unwrap();
        let pixel = *photo.decode().unwrap().get_pixel(4, 4);
        assert!(pixel[0].abs_diff(pixel[1]) < 6 && pixel[1].abs_diff(pixel[2]) < 6);
    }

    #[test]
    fn test_warm_up_reaches_rasterizer() {
        let counter = Arc::new(WarmUpCounter::default());
        let pipeline = pipeline(counter.clone());
        pipeline.clone().warm_up();
        assert_eq!(counter.0.load(std::sync::atomic::Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_composite_async_matches_frame_size() {
        let photo = pipeline(Arc::new(BlankRasterizer))
            .composite_async(black_frame(), CaptureRequest::default())
            .await
            .unwrap();
        assert_eq!((photo.width, photo.height), (32, 16));
    }
}
