// SPDX-License-Identifier: GPL-3.0-only

//! Photo wall operations handlers

use crate::app::AppModel;
use crate::errors::{AppError, AppResult};
use crate::storage;
use crate::wall::PolaroidPhoto;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

impl AppModel {
    // =========================================================================
    // Photo Wall Operations Handlers
    // =========================================================================

    pub fn clear_wall(&mut self) {
        let mut wall = self.lock_wall();
        info!(count = wall.len(), "Clearing photo wall");
        wall.clear();
    }

    pub fn delete_photo(&mut self, id: Uuid) -> bool {
        self.lock_wall().remove(id)
    }

    /// Drag end: drop the card at `(x, y)`
    pub fn drag_photo(&mut self, id: Uuid, x: f64, y: f64) -> bool {
        self.lock_wall().move_to(id, x, y)
    }

    /// Snapshot of the wall, oldest first
    pub fn photos(&self) -> Vec<PolaroidPhoto> {
        self.lock_wall().photos().to_vec()
    }

    /// Write a photo to the photo directory in the background
    pub fn export_photo(&self, id: Uuid) -> AppResult<tokio::task::JoinHandle<AppResult<PathBuf>>> {
        let photo = self
            .lock_wall()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::Other(format!("No photo with id {}", id)))?;

        let dir = self.config.photo_dir();
        let file_name = storage::photo_file_name(&photo.taken_at, photo.id);
        Ok(self
            .runtime
            .spawn(async move { storage::save_photo(photo.image, &dir, file_name).await }))
    }
}
