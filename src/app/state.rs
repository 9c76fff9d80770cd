// SPDX-License-Identifier: GPL-3.0-only

//! Booth state

use crate::backends::camera::MediaAcquisition;
use crate::caption::CaptionService;
use crate::config::Config;
use crate::constants::BEAUTY_STEP;
use crate::effects::{BeautyLevel, CaptureRequest, EffectDirective, FilterPreset, Sticker};
use crate::flash::ScreenFlash;
use crate::pipelines::photo::PhotoPipeline;
use crate::wall::SharedWall;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// User-facing capture controls
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraControls {
    pub filter: FilterPreset,
    pub beauty: BeautyLevel,
    pub sticker: Option<Sticker>,
}

impl CameraControls {
    pub fn new(filter: FilterPreset) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Move to the next (or previous) filter, wrapping around
    pub fn cycle_filter(&mut self, forward: bool) -> FilterPreset {
        self.filter = if forward {
            self.filter.next()
        } else {
            self.filter.previous()
        };
        self.filter
    }

    pub fn increase_beauty(&mut self) -> BeautyLevel {
        self.beauty = self.beauty.saturating_add(BEAUTY_STEP);
        self.beauty
    }

    pub fn decrease_beauty(&mut self) -> BeautyLevel {
        self.beauty = self.beauty.saturating_sub(BEAUTY_STEP);
        self.beauty
    }

    /// No sticker → each catalog sticker → no sticker
    pub fn cycle_sticker(&mut self) -> Option<&Sticker> {
        self.sticker = Sticker::cycle(self.sticker.as_ref());
        self.sticker.as_ref()
    }

    /// Snapshot of the controls for one shutter press
    pub fn request(&self) -> CaptureRequest {
        CaptureRequest {
            filter: self.filter,
            beauty: self.beauty,
            sticker: self.sticker.clone(),
        }
    }

    /// Directive for the live preview
    pub fn directive(&self) -> EffectDirective {
        EffectDirective::compose(self.filter, self.beauty)
    }
}

/// The photo booth session
pub struct AppModel {
    /// Configuration loaded at startup
    pub config: Config,
    /// Filter, beauty and sticker selection
    pub controls: CameraControls,
    /// Exclusive owner of the camera stream
    pub acquisition: MediaAcquisition,
    pub pipeline: PhotoPipeline,
    pub flash: ScreenFlash,
    /// Cards on the wall, shared with timer tasks
    pub wall: SharedWall,
    /// True from a capture until its develop timer fires; the shutter is
    /// disabled meanwhile
    pub processing: Arc<AtomicBool>,
    pub caption_service: Arc<dyn CaptionService>,
    /// Runtime the timers and caption requests are spawned on
    pub runtime: tokio::runtime::Handle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_cycle_wraps() {
        let mut controls = CameraControls::new(FilterPreset::Film);
        assert_eq!(controls.cycle_filter(true), FilterPreset::Normal);
        assert_eq!(controls.cycle_filter(false), FilterPreset::Film);
    }

    #[test]
    fn test_beauty_steps_are_clamped() {
        let mut controls = CameraControls::default();
        assert_eq!(controls.decrease_beauty().get(), 0);
        for _ in 0..15 {
            controls.increase_beauty();
        }
        assert_eq!(controls.beauty.get(), 100);
    }

    #[test]
    fn test_sticker_cycle_returns_to_none() {
        let mut controls = CameraControls::default();
        let mut seen = 0;
        while controls.cycle_sticker().is_some() {
            seen += 1;
            assert!(seen <= 8);
        }
        assert_eq!(seen, 8);
        assert!(controls.sticker.is_none());
    }

    #[test]
    fn test_request_ignores_sticker_in_directive() {
        let mut controls = CameraControls::new(FilterPreset::Bw);
        controls.beauty = BeautyLevel::new(50);
        controls.cycle_sticker();
        let request = controls.request();
        assert!(request.sticker.is_some());
        assert_eq!(request.directive(), controls.directive());
        assert_eq!(
            controls.directive().to_string(),
            "grayscale(1) contrast(1.2) brightness(1.25) contrast(0.875) saturate(0.9) blur(0.5px)"
        );
    }
}
