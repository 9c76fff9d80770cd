// SPDX-License-Identifier: GPL-3.0-only

//! Photo wall
//!
//! Captured photos as polaroid cards scattered on a wall. Each card is added
//! at the ejection slot, slides out, develops and gets its caption patched in
//! by independent timers keyed by photo id.

use crate::constants::wall;
use crate::pipelines::photo::CapturedImage;
use chrono::{DateTime, Local};
use rand::Rng;
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// Wall shared between the booth and its timer tasks
pub type SharedWall = Arc<Mutex<PhotoWall>>;

/// One card on the wall
#[derive(Debug, Clone, PartialEq)]
pub struct PolaroidPhoto {
    pub id: Uuid,
    pub image: Arc<CapturedImage>,
    pub taken_at: DateTime<Local>,
    /// Empty until the caption service answers
    pub caption: String,
    pub x: f64,
    pub y: f64,
    /// Tilt in degrees
    pub rotation: f64,
    pub is_developing: bool,
}

impl PolaroidPhoto {
    pub fn has_caption(&self) -> bool {
        !self.caption.is_empty()
    }
}

/// Ordered collection of cards, oldest first
#[derive(Debug, Clone)]
pub struct PhotoWall {
    photos: Vec<PolaroidPhoto>,
    viewport_height: f64,
}

impl PhotoWall {
    pub fn new(viewport_height: f64) -> Self {
        Self {
            photos: Vec::new(),
            viewport_height,
        }
    }

    pub fn shared(viewport_height: f64) -> SharedWall {
        Arc::new(Mutex::new(Self::new(viewport_height)))
    }

    /// Add a fresh card at the ejection slot with a random tilt
    pub fn add(&mut self, image: Arc<CapturedImage>) -> Uuid {
        let tilt = wall::MAX_TILT_DEGREES;
        let rotation = rand::rng().random_range(-tilt..tilt);
        self.add_with_rotation(image, rotation)
    }

    pub fn add_with_rotation(&mut self, image: Arc<CapturedImage>, rotation: f64) -> Uuid {
        let photo = PolaroidPhoto {
            id: Uuid::new_v4(),
            image,
            taken_at: Local::now(),
            caption: String::new(),
            x: wall::EJECT_ORIGIN_X,
            y: self.viewport_height - wall::EJECT_ORIGIN_FROM_BOTTOM,
            rotation,
            is_developing: true,
        };
        let id = photo.id;
        debug!(%id, x = photo.x, y = photo.y, rotation, "Photo added to wall");
        self.photos.push(photo);
        id
    }

    /// Slide a card out of the camera by a random drift
    pub fn eject(&mut self, id: Uuid) -> bool {
        let drift = rand::rng().random_range(0.0..wall::EJECT_MAX_DRIFT);
        self.eject_by(id, drift)
    }

    pub fn eject_by(&mut self, id: Uuid, dx: f64) -> bool {
        self.update(id, |photo| {
            photo.y -= wall::EJECT_RISE;
            photo.x += dx;
        })
    }

    pub fn finish_developing(&mut self, id: Uuid) -> bool {
        self.update(id, |photo| photo.is_developing = false)
    }

    pub fn set_caption(&mut self, id: Uuid, caption: impl Into<String>) -> bool {
        let caption = caption.into();
        self.update(id, move |photo| photo.caption = caption)
    }

    /// Drop a dragged card at its new position
    pub fn move_to(&mut self, id: Uuid, x: f64, y: f64) -> bool {
        self.update(id, |photo| {
            photo.x = x;
            photo.y = y;
        })
    }

    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.photos.len();
        self.photos.retain(|p| p.id != id);
        self.photos.len() != before
    }

    pub fn clear(&mut self) {
        self.photos.clear();
    }

    pub fn get(&self, id: Uuid) -> Option<&PolaroidPhoto> {
        self.photos.iter().find(|p| p.id == id)
    }

    pub fn photos(&self) -> &[PolaroidPhoto] {
        &self.photos
    }

    pub fn latest(&self) -> Option<&PolaroidPhoto> {
        self.photos.last()
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    /// Apply `f` to the card with `id`; a missing card is a no-op
    fn update(&mut self, id: Uuid, f: impl FnOnce(&mut PolaroidPhoto)) -> bool {
        match self.photos.iter_mut().find(|p| p.id == id) {
            Some(photo) => {
                f(photo);
                true
            }
            None => false,
        }
    }
}

impl Default for PhotoWall {
    fn default() -> Self {
        Self::new(wall::DEFAULT_VIEWPORT_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> Arc<CapturedImage> {
        Arc::new(CapturedImage {
            width: 4,
            height: 3,
            jpeg: Arc::from(vec![0xFF, 0xD8]),
        })
    }

    #[test]
    fn test_new_card_starts_at_ejection_slot() {
        let mut wall = PhotoWall::new(900.0);
        let id = wall.add(image());
        let photo = wall.get(id).unwrap();
        assert_eq!((photo.x, photo.y), (100.0, 400.0));
        assert!(photo.is_developing);
        assert!(photo.caption.is_empty());
        assert!((-5.0..5.0).contains(&photo.rotation));
    }

    #[test]
    fn test_eject_slides_card_up() {
        let mut wall = PhotoWall::new(900.0);
        let id = wall.add(image());
        assert!(wall.eject_by(id, 30.0));
        let photo = wall.get(id).unwrap();
        assert_eq!((photo.x, photo.y), (130.0, 150.0));

        let id = wall.add(image());
        wall.eject(id);
        let photo = wall.get(id).unwrap();
        assert!((100.0..180.0).contains(&photo.x));
    }

    #[test]
    fn test_keyed_updates_on_missing_card_are_noops() {
        let mut wall = PhotoWall::default();
        let id = wall.add(image());
        assert!(wall.remove(id));
        assert!(!wall.remove(id));
        assert!(!wall.eject(id));
        assert!(!wall.finish_developing(id));
        assert!(!wall.set_caption(id, "late"));
        assert!(!wall.move_to(id, 1.0, 2.0));
        assert!(wall.is_empty());
    }

    #[test]
    fn test_develop_caption_and_drag() {
        let mut wall = PhotoWall::default();
        let id = wall.add_with_rotation(image(), 2.5);
        wall.finish_developing(id);
        wall.set_caption(id, "Pure joy");
        wall.move_to(id, 12.0, 34.0);
        let photo = wall.get(id).unwrap();
        assert!(!photo.is_developing);
        assert!(photo.has_caption());
        assert_eq!((photo.x, photo.y, photo.rotation), (12.0, 34.0, 2.5));
    }

    #[test]
    fn test_clear_and_order() {
        let mut wall = PhotoWall::default();
        let first = wall.add(image());
        let second = wall.add(image());
        assert_eq!(wall.photos()[0].id, first);
        assert_eq!(wall.latest().map(|p| p.id), Some(second));
        wall.clear();
        assert_eq!(wall.len(), 0);
    }
}
