// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │   Booth (AppModel)  │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  MediaAcquisition   │  ← Owns the stream, error state, retry/restart
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  CameraBackend Trait│  ← open() → Box<dyn MediaStream>
//! └──────────┬──────────┘
//!            │
//!     ┌──────┼─────────┐
//!     ▼      ▼         ▼
//! Pattern  Still     V4L2
//! ```

pub mod file_source;
pub mod manager;
pub mod pattern;
pub mod types;
#[cfg(feature = "v4l2")]
pub mod v4l2;

pub use manager::MediaAcquisition;
pub use types::*;

use crate::config::Config;
use crate::errors::AcquisitionError;
use std::path::PathBuf;
use std::str::FromStr;

/// A camera backend: enumerates devices and opens streams
pub trait CameraBackend: Send {
    /// Get the backend type identifier
    fn backend_type(&self) -> CameraBackendType;

    /// Enumerate cameras this backend can open
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// Request a video-only stream matching `constraints` as closely as
    /// the device allows.
    fn open(&mut self, constraints: &StreamConstraints) -> BackendResult<Box<dyn MediaStream>>;
}

/// A live stream holding the camera hardware.
///
/// The holder must call [`MediaStream::stop`] to release the device; dropping
/// without stopping is treated as a leak by backends that log it.
pub trait MediaStream: Send {
    /// Negotiated format
    fn format(&self) -> &CameraFormat;

    /// Newest frame produced since the last call, without blocking
    fn poll_frame(&mut self) -> Option<CameraFrame>;

    /// Stop every track and release the device. Idempotent.
    fn stop(&mut self);

    /// True until [`MediaStream::stop`] has been called
    fn is_live(&self) -> bool;
}

/// Where frames come from, as written on the command line:
/// `pattern`, `image:<path>` or `v4l2:<device>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    Pattern,
    Image(PathBuf),
    V4l2(String),
}

impl SourceSpec {
    /// Source selected by the configuration file
    pub fn from_config(config: &Config) -> Self {
        match config.backend {
            CameraBackendType::TestPattern => SourceSpec::Pattern,
            CameraBackendType::StillImage => SourceSpec::Image(
                config.still_image_path.clone().unwrap_or_default(),
            ),
            CameraBackendType::V4l2 => SourceSpec::V4l2(config.device_path.clone()),
        }
    }

    /// Build the backend serving this source
    pub fn into_backend(self) -> Box<dyn CameraBackend> {
        match self {
            SourceSpec::Pattern => Box::new(pattern::TestPatternBackend::new()),
            SourceSpec::Image(path) => Box::new(file_source::StillImageBackend::new(path)),
            SourceSpec::V4l2(device) => v4l2_backend(device),
        }
    }
}

impl FromStr for SourceSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "pattern" {
            return Ok(SourceSpec::Pattern);
        }
        if let Some(path) = s.strip_prefix("image:") {
            if path.is_empty() {
                return Err("image source needs a path: image:<path>".to_string());
            }
            return Ok(SourceSpec::Image(PathBuf::from(path)));
        }
        if let Some(device) = s.strip_prefix("v4l2:") {
            let device = if device.is_empty() { "/dev/video0" } else { device };
            return Ok(SourceSpec::V4l2(device.to_string()));
        }
        Err(format!(
            "unknown source '{}' (expected pattern, image:<path> or v4l2:<device>)",
            s
        ))
    }
}

#[cfg(feature = "v4l2")]
fn v4l2_backend(device: String) -> Box<dyn CameraBackend> {
    Box::new(v4l2::V4l2Backend::new(device))
}

#[cfg(not(feature = "v4l2"))]
fn v4l2_backend(device: String) -> Box<dyn CameraBackend> {
    Box::new(UnavailableBackend {
        backend_type: CameraBackendType::V4l2,
        reason: format!("{}: built without the v4l2 feature", device),
    })
}

/// Backend that refuses every request; keeps the booth usable when a
/// configured backend is not compiled in.
#[cfg_attr(feature = "v4l2", allow(dead_code))]
struct UnavailableBackend {
    backend_type: CameraBackendType,
    reason: String,
}

impl CameraBackend for UnavailableBackend {
    fn backend_type(&self) -> CameraBackendType {
        self.backend_type
    }

    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        Vec::new()
    }

    fn open(&mut self, _constraints: &StreamConstraints) -> BackendResult<Box<dyn MediaStream>> {
        Err(AcquisitionError::Unsupported(self.reason.clone()))
    }
}

/// List cameras across every compiled-in backend
pub fn list_cameras() -> Vec<(CameraBackendType, CameraDevice)> {
    #[cfg_attr(not(feature = "v4l2"), allow(unused_mut))]
    let mut backends: Vec<Box<dyn CameraBackend>> =
        vec![Box::new(pattern::TestPatternBackend::new())];
    #[cfg(feature = "v4l2")]
    backends.push(Box::new(v4l2::V4l2Backend::new("/dev/video0".to_string())));

    backends
        .iter()
        .flat_map(|backend| {
            let kind = backend.backend_type();
            backend
                .enumerate_cameras()
                .into_iter()
                .map(move |device| (kind, device))
        })
        .collect()
}
