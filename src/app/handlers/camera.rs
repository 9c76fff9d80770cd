// SPDX-License-Identifier: GPL-3.0-only

//! Camera operations handlers
//!
//! Handles camera requests, retries, restarts and the live preview.

use crate::app::AppModel;
use crate::backends::camera::CameraBackend;
use crate::effects::render_preview;
use image::RgbaImage;
use tracing::info;

impl AppModel {
    // =========================================================================
    // Camera Operations Handlers
    // =========================================================================

    /// Request the camera; returns whether a stream is bound
    pub fn start_camera(&mut self) -> bool {
        self.acquisition.start().is_ok()
    }

    /// User-triggered retry after an acquisition error
    pub fn retry_camera(&mut self) -> bool {
        self.acquisition.retry().is_ok()
    }

    /// Clear the wall and restart the camera
    pub fn restart(&mut self) -> bool {
        info!("Restarting booth");
        self.clear_wall();
        self.acquisition.restart().is_ok()
    }

    /// Switch to another camera source
    pub fn switch_camera(&mut self, backend: Box<dyn CameraBackend>) -> bool {
        self.acquisition.change_backend(backend).is_ok()
    }

    /// Inline message shown in place of the preview, if acquisition failed
    pub fn camera_error(&self) -> Option<&'static str> {
        self.acquisition.error_message()
    }

    /// Mirrored, filtered preview of the current frame fitting the box
    pub fn preview(&mut self, max_width: u32, max_height: u32) -> Option<RgbaImage> {
        let directive = self.controls.directive();
        let frame = self.acquisition.current_frame()?.to_rgba_image()?;
        Some(render_preview(&frame, &directive, max_width, max_height))
    }
}
