// SPDX-License-Identifier: MPL-2.0

//! CPU implementation of effect directives on RGBA surfaces
//!
//! Colour adjustments follow the filter-effects definitions: brightness and
//! contrast are linear transfer functions, saturate/hue-rotate/grayscale/sepia
//! are 3x3 colour matrices. Every adjustment clamps to [0, 1] before the next
//! one runs, so order matters. Runs of colour adjustments share one pixel
//! pass; a blur splits the run.

use super::filters::{Adjustment, EffectDirective};
use image::{RgbaImage, imageops};

/// Apply a directive in place
pub fn apply_directive(image: &mut RgbaImage, directive: &EffectDirective) {
    apply_directive_scaled(image, directive, 1.0);
}

/// Apply a directive with blur radii multiplied by `blur_scale`.
///
/// Used for downscaled previews so the soft focus looks the same as on the
/// full-resolution capture.
pub fn apply_directive_scaled(image: &mut RgbaImage, directive: &EffectDirective, blur_scale: f32) {
    let mut run: Vec<ColorOp> = Vec::new();

    for adjustment in directive.adjustments() {
        match *adjustment {
            Adjustment::Blur(radius) => {
                apply_color_run(image, &run);
                run.clear();
                let sigma = radius as f32 * blur_scale;
                if sigma > 0.0 {
                    *image = imageops::blur(image, sigma);
                }
            }
            other => run.extend(ColorOp::from_adjustment(other)),
        }
    }

    apply_color_run(image, &run);
}

/// A colour adjustment resolved to its per-pixel form
#[derive(Debug, Clone, Copy)]
enum ColorOp {
    /// c' = c * slope + intercept
    Linear { slope: f32, intercept: f32 },
    /// c' = M * c
    Matrix([[f32; 3]; 3]),
}

impl ColorOp {
    /// `None` for spatial adjustments
    fn from_adjustment(adjustment: Adjustment) -> Option<Self> {
        let op = match adjustment {
            Adjustment::Brightness(amount) => ColorOp::Linear {
                slope: amount.max(0.0) as f32,
                intercept: 0.0,
            },
            Adjustment::Contrast(amount) => {
                let amount = amount.max(0.0) as f32;
                ColorOp::Linear {
                    slope: amount,
                    intercept: 0.5 - 0.5 * amount,
                }
            }
            Adjustment::Saturate(amount) => ColorOp::Matrix(saturate_matrix(amount.max(0.0) as f32)),
            Adjustment::HueRotate(degrees) => ColorOp::Matrix(hue_rotate_matrix(degrees as f32)),
            Adjustment::Grayscale(amount) => {
                ColorOp::Matrix(grayscale_matrix(amount.clamp(0.0, 1.0) as f32))
            }
            Adjustment::Sepia(amount) => ColorOp::Matrix(sepia_matrix(amount.clamp(0.0, 1.0) as f32)),
            Adjustment::Blur(_) => return None,
        };
        Some(op)
    }

    #[inline]
    fn apply(&self, rgb: [f32; 3]) -> [f32; 3] {
        match self {
            ColorOp::Linear { slope, intercept } => {
                rgb.map(|c| (c * slope + intercept).clamp(0.0, 1.0))
            }
            ColorOp::Matrix(m) => {
                let [r, g, b] = rgb;
                [
                    (m[0][0] * r + m[0][1] * g + m[0][2] * b).clamp(0.0, 1.0),
                    (m[1][0] * r + m[1][1] * g + m[1][2] * b).clamp(0.0, 1.0),
                    (m[2][0] * r + m[2][1] * g + m[2][2] * b).clamp(0.0, 1.0),
                ]
            }
        }
    }
}

fn apply_color_run(image: &mut RgbaImage, ops: &[ColorOp]) {
    if ops.is_empty() {
        return;
    }

    for pixel in image.pixels_mut() {
        let mut rgb = [
            pixel[0] as f32 / 255.0,
            pixel[1] as f32 / 255.0,
            pixel[2] as f32 / 255.0,
        ];
        for op in ops {
            rgb = op.apply(rgb);
        }
        pixel[0] = (rgb[0] * 255.0).round() as u8;
        pixel[1] = (rgb[1] * 255.0).round() as u8;
        pixel[2] = (rgb[2] * 255.0).round() as u8;
    }
}

fn saturate_matrix(s: f32) -> [[f32; 3]; 3] {
    [
        [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
        [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
    ]
}

fn hue_rotate_matrix(degrees: f32) -> [[f32; 3]; 3] {
    let (sin, cos) = degrees.to_radians().sin_cos();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

fn grayscale_matrix(amount: f32) -> [[f32; 3]; 3] {
    let g = 1.0 - amount;
    [
        [0.2126 + 0.7874 * g, 0.7152 - 0.7152 * g, 0.0722 - 0.0722 * g],
        [0.2126 - 0.2126 * g, 0.7152 + 0.2848 * g, 0.0722 - 0.0722 * g],
        [0.2126 - 0.2126 * g, 0.7152 - 0.7152 * g, 0.0722 + 0.9278 * g],
    ]
}

fn sepia_matrix(amount: f32) -> [[f32; 3]; 3] {
    let s = 1.0 - amount;
    [
        [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
        [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
        [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
    ]
}

/// Render a preview: fit inside `max_width` x `max_height`, mirror
/// horizontally and apply the directive with blur scaled to the new size.
pub fn render_preview(
    source: &RgbaImage,
    directive: &EffectDirective,
    max_width: u32,
    max_height: u32,
) -> RgbaImage {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 || max_width == 0 || max_height == 0 {
        return RgbaImage::new(0, 0);
    }

    let scale = (max_width as f32 / width as f32)
        .min(max_height as f32 / height as f32)
        .min(1.0);
    let target_w = ((width as f32 * scale).round() as u32).max(1);
    let target_h = ((height as f32 * scale).round() as u32).max(1);

    let mut preview = if (target_w, target_h) == (width, height) {
        source.clone()
    } else {
        imageops::thumbnail(source, target_w, target_h)
    };
    imageops::flip_horizontal_in_place(&mut preview);
    apply_directive_scaled(&mut preview, directive, scale);
    preview
}
