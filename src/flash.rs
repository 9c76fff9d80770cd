// SPDX-License-Identifier: GPL-3.0-only

//! Screen flash
//!
//! A white overlay shown for a moment when the shutter fires. Purely
//! cosmetic; nothing waits on it.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Full-screen flash indicator
#[derive(Debug, Clone)]
pub struct ScreenFlash {
    duration: Duration,
    /// When the current flash ends
    until: Arc<Mutex<Option<Instant>>>,
}

impl ScreenFlash {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            until: Arc::new(Mutex::new(None)),
        }
    }

    /// Show the flash, restarting it if already visible
    pub fn fire(&self) {
        debug!(duration_ms = self.duration.as_millis() as u64, "Flash");
        *self.until.lock().unwrap_or_else(PoisonError::into_inner) =
            Some(Instant::now() + self.duration);
    }

    pub fn is_visible(&self) -> bool {
        self.until
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some_and(|until| Instant::now() < until)
    }
}

impl Default for ScreenFlash {
    fn default() -> Self {
        Self::new(crate::constants::timing::FLASH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_flash_is_visible_for_its_duration() {
        let flash = ScreenFlash::default();
        assert!(!flash.is_visible());

        flash.fire();
        assert!(flash.is_visible());

        tokio::time::advance(Duration::from_millis(199)).await;
        assert!(flash.is_visible());
        tokio::time::advance(Duration::from_millis(2)).await;
        assert!(!flash.is_visible());
    }
}
