// SPDX-License-Identifier: MPL-2.0

//! Integration tests for acquisition and the photo pipeline

use image::{Rgba, RgbaImage};
use retro_cam::backends::camera::{
    CameraFrame, MediaAcquisition, SourceSpec, StreamConstraints,
};
use retro_cam::pipelines::photo::{GlyphRasterizer, PhotoEncoder, PhotoPipeline};
use retro_cam::{BeautyLevel, CaptureRequest, FilterPreset, Sticker};
use std::sync::Arc;

/// Draws every glyph as an opaque red square
struct RedSquare;

impl GlyphRasterizer for RedSquare {
    fn rasterize(&self, _glyph: &str, size_px: u32) -> Option<RgbaImage> {
        Some(RgbaImage::from_pixel(size_px, size_px, Rgba([255, 0, 0, 255])))
    }
}

fn pipeline() -> PhotoPipeline {
    PhotoPipeline::with_rasterizer(PhotoEncoder::new(95), Arc::new(RedSquare), 16)
}

fn grab_frame(source: SourceSpec, width: u32, height: u32) -> CameraFrame {
    let mut acquisition =
        MediaAcquisition::new(source.into_backend(), StreamConstraints::new(width, height));
    acquisition.start().unwrap();
    acquisition.current_frame().cloned().unwrap()
}

fn luma(pixel: &Rgba<u8>) -> u32 {
    (u32::from(pixel[0]) + u32::from(pixel[1]) + u32::from(pixel[2])) / 3
}

#[test]
fn test_pattern_capture_is_mirrored() {
    let frame = grab_frame(SourceSpec::Pattern, 128, 64);
    let photo = pipeline()
        .composite(&frame, &CaptureRequest::default())
        .unwrap();
    assert_eq!((photo.width, photo.height), (128, 64));

    // The grey ramp runs dark to light; mirrored it runs light to dark
    let pixels = photo.decode().unwrap();
    let left = luma(pixels.get_pixel(4, 62));
    let right = luma(pixels.get_pixel(123, 62));
    assert!(left > right, "left {} right {}", left, right);
}

#[test]
fn test_still_image_capture_with_filter_and_sticker() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scene.png");
    RgbaImage::from_pixel(96, 64, Rgba([30, 160, 60, 255]))
        .save(&path)
        .unwrap();

    let frame = grab_frame(SourceSpec::Image(path), 1280, 720);
    let request = CaptureRequest {
        filter: FilterPreset::Bw,
        beauty: BeautyLevel::new(40),
        sticker: Some(Sticker::new("👑").unwrap()),
    };
    let photo = pipeline().composite(&frame, &request).unwrap();

    // Native image size wins over the requested resolution
    assert_eq!((photo.width, photo.height), (96, 64));

    let pixels = photo.decode().unwrap();
    // Filtered background is grey
    let corner = pixels.get_pixel(2, 2);
    assert!(corner[0].abs_diff(corner[1]) < 8);
    assert!(corner[1].abs_diff(corner[2]) < 8);
    // Sticker keeps its own colour
    let centre = pixels.get_pixel(48, 32);
    assert!(centre[0] > 200 && centre[1] < 60, "centre {:?}", centre);
}

#[test]
fn test_captured_image_data_url() {
    let frame = CameraFrame::from_rgba_image(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255])));
    let photo = pipeline()
        .composite(&frame, &CaptureRequest::default())
        .unwrap();

    assert_eq!(photo.mime_type(), "image/jpeg");
    assert!(photo.data_url().starts_with("data:image/jpeg;base64,/9j/"));
}

#[tokio::test]
async fn test_composite_async_on_pattern() {
    let frame = grab_frame(SourceSpec::Pattern, 64, 48);
    let photo = pipeline()
        .composite_async(frame, CaptureRequest::default())
        .await
        .unwrap();
    assert_eq!((photo.width, photo.height), (64, 48));
    assert!(!photo.is_empty());
}

#[test]
fn test_missing_image_source_reports_no_camera() {
    let mut acquisition = MediaAcquisition::new(
        SourceSpec::Image("/nonexistent/retro-cam/scene.png".into()).into_backend(),
        StreamConstraints::default(),
    );
    assert!(acquisition.start().is_err());
    assert!(!acquisition.is_bound());
    assert_eq!(acquisition.error_message(), Some("No camera found"));
    assert!(acquisition.current_frame().is_none());
}
