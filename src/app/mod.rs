// SPDX-License-Identifier: MPL-2.0

//! Photo booth session
//!
//! This module ties acquisition, the photo pipeline, the caption service and
//! the photo wall together. Frontends (the terminal booth, the CLI) drive an
//! [`AppModel`] and render its state.
//!
//! # Architecture
//!
//! - `state`: session types (`AppModel`, `CameraControls`)
//! - `handlers`: operations grouped by domain (capture, camera, wall)
//!
//! # Shutter sequence
//!
//! ```text
//! take_picture ─▶ flash ─▶ composite ─▶ handle_capture
//!                                          ├─ wall.add (developing, no caption)
//!                                          ├─ +100ms  eject
//!                                          ├─ +3000ms develop, shutter re-enabled
//!                                          └─ caption request → patch or fallback
//! ```

pub mod handlers;
mod state;

pub use state::{AppModel, CameraControls};

use crate::backends::camera::{CameraBackend, MediaAcquisition, SourceSpec, StreamConstraints};
use crate::caption::{CaptionService, PresetCaptions};
use crate::config::Config;
use crate::flash::ScreenFlash;
use crate::pipelines::photo::PhotoPipeline;
use crate::wall::PhotoWall;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use tracing::info;

impl AppModel {
    /// Build a session from configuration and request the camera.
    ///
    /// A failed camera request leaves the session running with the error
    /// state set; see [`AppModel::retry_camera`].
    pub fn new(config: Config, runtime: tokio::runtime::Handle) -> Self {
        let backend = SourceSpec::from_config(&config).into_backend();
        let pipeline = PhotoPipeline::from_config(&config);
        let captions = Arc::new(PresetCaptions::new(config.timings.caption_delay()));
        Self::with_parts(config, backend, pipeline, captions, runtime)
    }

    /// Build a session from explicit parts and request the camera
    pub fn with_parts(
        config: Config,
        backend: Box<dyn CameraBackend>,
        pipeline: PhotoPipeline,
        caption_service: Arc<dyn CaptionService>,
        runtime: tokio::runtime::Handle,
    ) -> Self {
        info!(
            backend = %backend.backend_type(),
            filter = %config.default_filter,
            "Starting photo booth session"
        );

        let constraints = StreamConstraints::new(config.ideal_width, config.ideal_height);
        let mut model = Self {
            controls: CameraControls::new(config.default_filter),
            acquisition: MediaAcquisition::new(backend, constraints),
            pipeline,
            flash: ScreenFlash::new(config.timings.flash()),
            wall: PhotoWall::shared(config.wall_height),
            processing: Arc::new(AtomicBool::new(false)),
            caption_service,
            runtime,
            config,
        };
        model.start_camera();
        model
    }
}
