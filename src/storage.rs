// SPDX-License-Identifier: MPL-2.0

//! Storage utilities for exported photos

use crate::constants;
use crate::errors::{AppError, AppResult};
use crate::pipelines::photo::CapturedImage;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// `$XDG_PICTURES_DIR/retro-cam`, falling back to the home directory and
/// then the working directory
pub fn default_photo_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(constants::APP_NAME)
}

/// `IMG_<yyyymmdd_hhmmss>_<first 8 id chars>.jpg`
pub fn photo_file_name(taken_at: &DateTime<Local>, id: Uuid) -> String {
    let id = id.simple().to_string();
    format!("IMG_{}_{}.jpg", taken_at.format("%Y%m%d_%H%M%S"), &id[..8])
}

/// Write a photo's JPEG bytes into `dir`, creating it if needed
pub async fn save_photo(
    image: Arc<CapturedImage>,
    dir: &Path,
    file_name: String,
) -> AppResult<PathBuf> {
    let path = dir.join(file_name);
    let dir = dir.to_path_buf();
    let target = path.clone();

    // Write to disk in background task (I/O-bound)
    tokio::task::spawn_blocking(move || {
        std::fs::create_dir_all(&dir)?;
        std::fs::write(&target, &image.jpeg)
    })
    .await
    .map_err(|e| AppError::Storage(format!("Save task error: {}", e)))?
    .map_err(|e| AppError::Storage(format!("{}: {}", path.display(), e)))?;

    info!(path = %path.display(), "Photo saved");
    Ok(path)
}
