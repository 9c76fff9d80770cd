// SPDX-License-Identifier: GPL-3.0-only

//! Still-image camera source
//!
//! Serves a single image file as a live stream at the image's native
//! resolution. Useful for demos and for running the booth without a webcam.

use super::types::*;
use super::{CameraBackend, MediaStream};
use crate::errors::AcquisitionError;
use std::path::PathBuf;
use tracing::{debug, info};

/// Backend serving one image file
#[derive(Debug, Clone)]
pub struct StillImageBackend {
    path: PathBuf,
}

impl StillImageBackend {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn load_frame(&self) -> BackendResult<CameraFrame> {
        if !self.path.is_file() {
            return Err(AcquisitionError::DeviceNotFound(format!(
                "{} is not a file",
                self.path.display()
            )));
        }

        let image = image::open(&self.path).map_err(|e| match e {
            image::ImageError::IoError(io) => {
                AcquisitionError::from_io(&self.path.display().to_string(), &io)
            }
            other => AcquisitionError::Unsupported(format!(
                "{}: {}",
                self.path.display(),
                other
            )),
        })?;

        Ok(CameraFrame::from_rgba_image(image.to_rgba8()))
    }
}

impl CameraBackend for StillImageBackend {
    fn backend_type(&self) -> CameraBackendType {
        CameraBackendType::StillImage
    }

    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        if !self.path.is_file() {
            return Vec::new();
        }
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Still image".to_string());
        vec![CameraDevice {
            name,
            path: self.path.display().to_string(),
        }]
    }

    /// The constraints are ignored: a still image has exactly one resolution
    fn open(&mut self, _constraints: &StreamConstraints) -> BackendResult<Box<dyn MediaStream>> {
        let frame = self.load_frame()?;
        let format = CameraFormat {
            width: frame.width,
            height: frame.height,
            framerate: None,
            pixel_format: "RGBA".to_string(),
        };
        info!(path = %self.path.display(), format = %format, "Opened still image source");

        Ok(Box::new(StillImageStream {
            format,
            pending: Some(frame),
            live: true,
        }))
    }
}

struct StillImageStream {
    format: CameraFormat,
    /// Delivered once; the acquisition layer keeps the latest frame
    pending: Option<CameraFrame>,
    live: bool,
}

impl MediaStream for StillImageStream {
    fn format(&self) -> &CameraFormat {
        &self.format
    }

    fn poll_frame(&mut self) -> Option<CameraFrame> {
        if !self.live {
            return None;
        }
        self.pending.take()
    }

    fn stop(&mut self) {
        if self.live {
            debug!("Stopping still image stream");
            self.live = false;
            self.pending = None;
        }
    }

    fn is_live(&self) -> bool {
        self.live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_missing_file_reports_device_not_found() {
        let mut backend = StillImageBackend::new(PathBuf::from("/nonexistent/me.png"));
        let err = backend
            .open(&StreamConstraints::default())
            .err()
            .expect("missing file must fail");
        assert!(matches!(err, AcquisitionError::DeviceNotFound(_)));
        assert!(backend.enumerate_cameras().is_empty());
    }

    #[test]
    fn test_image_is_served_at_native_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("still.png");
        RgbaImage::from_pixel(30, 20, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let mut backend = StillImageBackend::new(path);
        let mut stream = backend.open(&StreamConstraints::default()).unwrap();
        assert_eq!((stream.format().width, stream.format().height), (30, 20));

        let frame = stream.poll_frame().unwrap();
        assert_eq!(frame.to_rgba_image().unwrap().get_pixel(0, 0)[2], 30);
        assert!(stream.poll_frame().is_none());
    }

    #[test]
    fn test_garbage_file_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image").unwrap();

        let mut backend = StillImageBackend::new(path);
        let err = backend
            .open(&StreamConstraints::default())
            .err()
            .expect("garbage must fail");
        assert!(matches!(err, AcquisitionError::Unsupported(_)));
    }
}
