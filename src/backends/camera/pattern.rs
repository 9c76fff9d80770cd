// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic test-pattern camera
//!
//! Produces scrolling colour bars at the requested resolution. Used when no
//! webcam is configured and by the tests.

use super::types::*;
use super::{CameraBackend, MediaStream};
use crate::constants;
use crate::errors::AcquisitionError;
use image::{Rgba, RgbaImage};
use std::time::{Duration, Instant};
use tracing::{debug, info};

const BARS: [[u8; 3]; 7] = [
    [235, 235, 235],
    [235, 235, 16],
    [16, 235, 235],
    [16, 235, 16],
    [235, 16, 235],
    [235, 16, 16],
    [16, 16, 235],
];

/// Backend serving the synthetic pattern
#[derive(Debug, Default)]
pub struct TestPatternBackend;

impl TestPatternBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CameraBackend for TestPatternBackend {
    fn backend_type(&self) -> CameraBackendType {
        CameraBackendType::TestPattern
    }

    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        vec![CameraDevice {
            name: "Test pattern".to_string(),
            path: "pattern".to_string(),
        }]
    }

    fn open(&mut self, constraints: &StreamConstraints) -> BackendResult<Box<dyn MediaStream>> {
        if constraints.ideal_width == 0 || constraints.ideal_height == 0 {
            return Err(AcquisitionError::Unsupported(format!(
                "cannot generate a {}x{} pattern",
                constraints.ideal_width, constraints.ideal_height
            )));
        }

        let format = CameraFormat {
            width: constraints.ideal_width,
            height: constraints.ideal_height,
            framerate: Some(constants::camera::TEST_PATTERN_FPS),
            pixel_format: "RGBA".to_string(),
        };
        info!(format = %format, "Opened test pattern stream");

        Ok(Box::new(TestPatternStream {
            format,
            started: Instant::now(),
            last_frame: None,
            live: true,
        }))
    }
}

struct TestPatternStream {
    format: CameraFormat,
    started: Instant,
    last_frame: Option<Instant>,
    live: bool,
}

impl TestPatternStream {
    fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.format.framerate.unwrap_or(30).max(1)
    }

    fn render(&self, now: Instant) -> RgbaImage {
        let width = self.format.width;
        let height = self.format.height;
        let bar_width = (width / BARS.len() as u32).max(1);
        // Scroll one bar width every two seconds
        let elapsed = now.duration_since(self.started).as_secs_f32();
        let offset = (elapsed * bar_width as f32 / 2.0) as u32;

        RgbaImage::from_fn(width, height, |x, y| {
            // Bottom quarter is a grey ramp so mirroring is visible
            if y >= height - height / 4 {
                let v = (x * 255 / width.max(1)) as u8;
                return Rgba([v, v, v, 255]);
            }
            let bar = ((x + offset) / bar_width) as usize % BARS.len();
            let [r, g, b] = BARS[bar];
            Rgba([r, g, b, 255])
        })
    }
}

impl MediaStream for TestPatternStream {
    fn format(&self) -> &CameraFormat {
        &self.format
    }

    fn poll_frame(&mut self) -> Option<CameraFrame> {
        if !self.live {
            return None;
        }

        let now = Instant::now();
        if let Some(last) = self.last_frame
            && now.duration_since(last) < self.frame_interval()
        {
            return None;
        }
        self.last_frame = Some(now);

        Some(CameraFrame::from_rgba_image(self.render(now)))
    }

    fn stop(&mut self) {
        if self.live {
            debug!("Stopping test pattern stream");
            self.live = false;
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }
}
