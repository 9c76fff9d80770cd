// SPDX-License-Identifier: GPL-3.0-only

//! Caption service
//!
//! Stand-in for a vision model: waits a little and picks one of a fixed set
//! of captions. The booth shows the photo immediately and patches the caption
//! in when the request resolves.

use crate::errors::CaptionError;
use crate::pipelines::photo::CapturedImage;
use futures::future::BoxFuture;
use rand::prelude::IndexedRandom;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Canned captions
pub const PRESET_CAPTIONS: [&str; 30] = [
    "Good vibes only ✌️",
    "Living the dream",
    "Sunday kind of love",
    "Chasing sunsets 🌅",
    "Coffee & Contemplation",
    "Messy hair, don't care",
    "Creating memories",
    "Just be you",
    "Escape the ordinary",
    "Radiate positivity ✨",
    "Sweater weather",
    "Sunkissed",
    "Start somewhere",
    "Enjoy the little things",
    "Life is beautiful",
    "Keep it simple",
    "Stay curious",
    "Better together",
    "Wild heart",
    "Peace of mind",
    "Forever young",
    "Magic moments",
    "Pure joy",
    "Time flies ⏳",
    "Focus on good",
    "Hello sunshine",
    "Adventure awaits",
    "Perfectly imperfect",
    "Snapshot 📸",
    "So aesthetic",
];

/// Something that can caption a photo
pub trait CaptionService: Send + Sync {
    fn request_caption(
        &self,
        image: Arc<CapturedImage>,
    ) -> BoxFuture<'static, Result<String, CaptionError>>;
}

/// Picks a random caption from a fixed pool after a simulated delay
#[derive(Debug, Clone)]
pub struct PresetCaptions {
    pool: Arc<[String]>,
    delay: Duration,
}

impl PresetCaptions {
    pub fn new(delay: Duration) -> Self {
        Self::with_pool(PRESET_CAPTIONS.iter().map(|c| c.to_string()), delay)
    }

    pub fn with_pool(pool: impl IntoIterator<Item = String>, delay: Duration) -> Self {
        Self {
            pool: pool.into_iter().collect(),
            delay,
        }
    }
}

impl Default for PresetCaptions {
    fn default() -> Self {
        Self::new(crate::constants::timing::CAPTION_DELAY)
    }
}

impl CaptionService for PresetCaptions {
    fn request_caption(
        &self,
        image: Arc<CapturedImage>,
    ) -> BoxFuture<'static, Result<String, CaptionError>> {
        let pool = self.pool.clone();
        let delay = self.delay;
        Box::pin(async move {
            debug!(width = image.width, height = image.height, "Caption requested");
            tokio::time::sleep(delay).await;
            pool.choose(&mut rand::rng())
                .cloned()
                .ok_or(CaptionError::EmptyPool)
        })
    }
}

/// Await a caption, substituting `fallback` on failure
pub async fn caption_or_fallback(
    service: &dyn CaptionService,
    image: Arc<CapturedImage>,
    fallback: &str,
) -> String {
    let caption = service.request_caption(image).await.and_then(|caption| {
        if caption.trim().is_empty() {
            Err(CaptionError::Failed("empty caption".to_string()))
        } else {
            Ok(caption)
        }
    });
    match caption {
        Ok(caption) => caption,
        Err(e) => {
            warn!(error = %e, "Caption request failed, using fallback");
            fallback.to_string()
        }
    }
}
