// SPDX-License-Identifier: MPL-2.0

//! Retro Cam - an instant-camera photo booth
//!
//! This library provides the core functionality of the booth: camera
//! acquisition, cosmetic filters, compositing captured photos with stickers,
//! captioning, and the photo wall the photos develop on.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: The booth session tying everything together
//! - [`backends`]: Camera backend abstraction and media acquisition
//! - [`effects`]: Filter presets, beauty levels and their application
//! - [`pipelines`]: Photo compositing and encoding
//! - [`caption`]: Caption service
//! - [`wall`]: Photo wall
//! - [`config`]: User configuration handling
//! - [`storage`]: Exporting photos to disk
//! - [`terminal`]: Interactive terminal frontend
//!
//! # Example
//!
//! ```ignore
//! let config = retro_cam::Config::load_or_default(None)?;
//! retro_cam::terminal::run(config, None)?;
//! ```

pub mod app;
pub mod backends;
pub mod caption;
pub mod config;
pub mod constants;
pub mod effects;
pub mod errors;
pub mod flash;
pub mod pipelines;
pub mod storage;
pub mod terminal;
pub mod wall;

// Re-export commonly used types
pub use app::{AppModel, CameraControls};
pub use config::Config;
pub use effects::{BeautyLevel, CaptureRequest, EffectDirective, FilterPreset, Sticker};
pub use errors::{AppError, AppResult};
pub use pipelines::photo::CapturedImage;
