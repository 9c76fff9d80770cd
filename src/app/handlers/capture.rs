// SPDX-License-Identifier: GPL-3.0-only

//! Capture operations handlers
//!
//! Handles the shutter, and the eject/develop/caption tasks that follow a
//! capture.

use crate::app::AppModel;
use crate::caption::caption_or_fallback;
use crate::pipelines::photo::CapturedImage;
use crate::wall::PhotoWall;
use std::sync::atomic::Ordering;
use std::sync::{Arc, MutexGuard, PoisonError};
use tracing::{debug, error, info};
use uuid::Uuid;

impl AppModel {
    // =========================================================================
    // Capture Operations Handlers
    // =========================================================================

    /// True while a capture is being processed (shutter disabled)
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::SeqCst)
    }

    /// Press the shutter.
    ///
    /// No-op (returns `None`) while a capture is processing, while no stream
    /// is bound, or before the first frame has arrived. Otherwise fires the
    /// flash, composites the current frame with the current controls and
    /// hands the photo to [`AppModel::handle_capture`].
    pub fn take_picture(&mut self) -> Option<Uuid> {
        if self.is_processing() {
            debug!("Shutter ignored, capture still processing");
            return None;
        }

        let Some(frame) = self.acquisition.current_frame().cloned() else {
            debug!("Shutter ignored, no camera frame available");
            return None;
        };

        let request = self.controls.request();
        self.flash.fire();

        match self.pipeline.composite(&frame, &request) {
            Ok(image) => self.handle_capture(image),
            Err(e) => {
                error!(error = %e, "Capture failed");
                None
            }
        }
    }

    /// Put a finished photo on the wall and start its timers.
    ///
    /// The processing window opens here and closes when the develop timer
    /// fires; while it is open further photos are dropped (`None`). The eject
    /// timer, develop timer and caption request are independent tasks keyed
    /// by photo id; each touches only its own fields and does nothing if the
    /// photo has been removed.
    pub fn handle_capture(&mut self, image: CapturedImage) -> Option<Uuid> {
        if self
            .processing
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Capture dropped, previous photo still developing");
            return None;
        }

        let image = Arc::new(image);
        let id = self.lock_wall().add(image.clone());
        info!(%id, width = image.width, height = image.height, "Photo captured");

        let timings = self.config.timings;

        let wall = self.wall.clone();
        self.runtime.spawn(async move {
            tokio::time::sleep(timings.eject()).await;
            lock(&wall).eject(id);
        });

        let wall = self.wall.clone();
        let processing = self.processing.clone();
        self.runtime.spawn(async move {
            tokio::time::sleep(timings.develop()).await;
            lock(&wall).finish_developing(id);
            processing.store(false, Ordering::SeqCst);
            debug!(%id, "Photo developed");
        });

        let wall = self.wall.clone();
        let service = self.caption_service.clone();
        let fallback = self.config.fallback_caption.clone();
        self.runtime.spawn(async move {
            let caption = caption_or_fallback(service.as_ref(), image, &fallback).await;
            debug!(%id, caption = %caption, "Caption ready");
            lock(&wall).set_caption(id, caption);
        });

        Some(id)
    }

    pub(crate) fn lock_wall(&self) -> MutexGuard<'_, PhotoWall> {
        lock(&self.wall)
    }
}

fn lock(wall: &std::sync::Mutex<PhotoWall>) -> MutexGuard<'_, PhotoWall> {
    wall.lock().unwrap_or_else(PoisonError::into_inner)
}
