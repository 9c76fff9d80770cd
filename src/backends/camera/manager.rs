// SPDX-License-Identifier: GPL-3.0-only

//! Media acquisition
//!
//! Owns the camera stream for the lifetime of the booth:
//! - requests a stream from the configured backend
//! - keeps the error state shown in place of the preview
//! - releases the hardware on retry, restart and drop

use super::types::*;
use super::{CameraBackend, MediaStream};
use crate::errors::AcquisitionError;
use tracing::{debug, info, warn};

/// Exclusive owner of the camera stream
pub struct MediaAcquisition {
    backend: Box<dyn CameraBackend>,
    constraints: StreamConstraints,
    stream: Option<Box<dyn MediaStream>>,
    /// Newest frame seen; stays valid between producer frames
    last_frame: Option<CameraFrame>,
    error: Option<AcquisitionError>,
}

impl MediaAcquisition {
    /// Create an unbound acquisition. Call [`MediaAcquisition::start`] to
    /// request the stream.
    pub fn new(backend: Box<dyn CameraBackend>, constraints: StreamConstraints) -> Self {
        info!(backend = %backend.backend_type(), "Creating media acquisition");
        Self {
            backend,
            constraints,
            stream: None,
            last_frame: None,
            error: None,
        }
    }

    /// Request the stream.
    ///
    /// Any stream still bound is released first. On failure the error is
    /// stored for display and returned; the booth keeps running.
    pub fn start(&mut self) -> Result<(), AcquisitionError> {
        self.release();

        match self.backend.open(&self.constraints) {
            Ok(stream) => {
                info!(format = %stream.format(), "Camera stream bound");
                self.stream = Some(stream);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Camera request failed");
                self.error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// User-triggered retry; repeats the original request
    pub fn retry(&mut self) -> Result<(), AcquisitionError> {
        info!("Retrying camera request");
        self.start()
    }

    /// Release the stream and request it again
    pub fn restart(&mut self) -> Result<(), AcquisitionError> {
        info!("Restarting camera");
        self.start()
    }

    /// Release the stream without requesting a new one
    pub fn stop(&mut self) {
        self.release();
    }

    /// Swap to another backend and request a stream from it
    pub fn change_backend(
        &mut self,
        backend: Box<dyn CameraBackend>,
    ) -> Result<(), AcquisitionError> {
        self.release();
        info!(
            from = %self.backend.backend_type(),
            to = %backend.backend_type(),
            "Switching camera backend"
        );
        self.backend = backend;
        self.start()
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            debug!("Stopping camera tracks");
            stream.stop();
        }
        self.last_frame = None;
    }

    /// True while a live stream is bound
    pub fn is_bound(&self) -> bool {
        self.stream.as_ref().is_some_and(|s| s.is_live())
    }

    pub fn error(&self) -> Option<&AcquisitionError> {
        self.error.as_ref()
    }

    /// Inline message replacing the preview, if acquisition failed
    pub fn error_message(&self) -> Option<&'static str> {
        self.error.as_ref().map(AcquisitionError::user_message)
    }

    pub fn backend_type(&self) -> CameraBackendType {
        self.backend.backend_type()
    }

    /// Negotiated format of the bound stream
    pub fn format(&self) -> Option<&CameraFormat> {
        self.stream.as_deref().map(|s| s.format())
    }

    /// Latest frame, or `None` when no stream is bound or nothing has arrived yet.
    ///
    /// A stream that ended without being stopped is released and turned into
    /// an error, so the booth offers a retry instead of waiting forever.
    pub fn current_frame(&mut self) -> Option<&CameraFrame> {
        let stream = self.stream.as_mut()?;
        if !stream.is_live() {
            warn!(backend = %self.backend.backend_type(), "Camera stream ended unexpectedly");
            self.release();
            self.error = Some(AcquisitionError::Backend(
                "camera stream ended".to_string(),
            ));
            return None;
        }
        if let Some(frame) = stream.poll_frame() {
            self.last_frame = Some(frame);
        }
        self.last_frame.as_ref()
    }
}

impl Drop for MediaAcquisition {
    fn drop(&mut self) {
        if self.stream.is_some() {
            info!("Dropping media acquisition, releasing camera");
        }
        self.release();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Backend counting opens and stops; fails while `fail_with` is set
    #[derive(Clone, Default)]
    pub(crate) struct CountingBackend {
        pub opens: Arc<AtomicUsize>,
        pub stops: Arc<AtomicUsize>,
        pub fail_with: Option<AcquisitionError>,
        /// Set to make open streams die without being stopped
        pub ended: Arc<AtomicBool>,
    }

    struct CountingStream {
        format: CameraFormat,
        stops: Arc<AtomicUsize>,
        ended: Arc<AtomicBool>,
        live: bool,
    }

    impl CameraBackend for CountingBackend {
        fn backend_type(&self) -> CameraBackendType {
            CameraBackendType::TestPattern
        }

        fn enumerate_cameras(&self) -> Vec<CameraDevice> {
            Vec::new()
        }

        fn open(&mut self, c: &StreamConstraints) -> BackendResult<Box<dyn MediaStream>> {
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            self.opens.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(CountingStream {
                format: CameraFormat {
                    width: c.ideal_width,
                    height: c.ideal_height,
                    framerate: None,
                    pixel_format: "RGBA".to_string(),
                },
                stops: self.stops.clone(),
                ended: self.ended.clone(),
                live: true,
            }))
        }
    }

    impl MediaStream for CountingStream {
        fn format(&self) -> &CameraFormat {
            &self.format
        }

        fn poll_frame(&mut self) -> Option<CameraFrame> {
            self.live.then(|| {
                CameraFrame::from_rgba_image(RgbaImage::from_pixel(
                    self.format.width,
                    self.format.height,
                    Rgba([1, 2, 3, 255]),
                ))
            })
        }

        fn stop(&mut self) {
            if self.live {
                self.live = false;
                self.stops.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn is_live(&self) -> bool {
            self.live && !self.ended.load(Ordering::SeqCst)
        }
    }

    fn acquisition(backend: CountingBackend) -> MediaAcquisition {
        MediaAcquisition::new(Box::new(backend), StreamConstraints::new(8, 6))
    }

    #[test]
    fn test_start_binds_stream_and_clears_error() {
        let backend = CountingBackend::default();
        let mut acq = acquisition(backend.clone());
        assert!(!acq.is_bound());
        assert!(acq.current_frame().is_none());

        acq.start().unwrap();
        assert!(acq.is_bound());
        assert!(acq.error().is_none());
        assert_eq!(acq.current_frame().map(|f| f.width), Some(8));
    }

    #[test]
    fn test_failure_sets_error_message() {
        let backend = CountingBackend {
            fail_with: Some(AcquisitionError::PermissionDenied("denied".into())),
            ..Default::default()
        };
        let mut acq = acquisition(backend);
        assert!(acq.start().is_err());
        assert!(!acq.is_bound());
        assert_eq!(acq.error_message(), Some("Permissions needed"));
    }

    #[test]
    fn test_retry_releases_previous_stream() {
        let backend = CountingBackend::default();
        let mut acq = acquisition(backend.clone());
        acq.start().unwrap();
        acq.retry().unwrap();
        assert_eq!(backend.opens.load(Ordering::SeqCst), 2);
        assert_eq!(backend.stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_restart_and_drop_stop_tracks() {
        let backend = CountingBackend::default();
        {
            let mut acq = acquisition(backend.clone());
            acq.start().unwrap();
            acq.restart().unwrap();
            assert_eq!(backend.stops.load(Ordering::SeqCst), 1);
        }
        assert_eq!(backend.stops.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_stop_unbinds() {
        let backend = CountingBackend::default();
        let mut acq = acquisition(backend.clone());
        acq.start().unwrap();
        acq.stop();
        assert!(!acq.is_bound());
        assert!(acq.current_frame().is_none());
        assert_eq!(backend.stops.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stream_ending_on_its_own_sets_error() {
        let backend = CountingBackend::default();
        let mut acq = acquisition(backend.clone());
        acq.start().unwrap();
        assert!(acq.current_frame().is_some());

        backend.ended.store(true, Ordering::SeqCst);
        assert!(acq.current_frame().is_none());
        assert!(!acq.is_bound());
        assert_eq!(acq.error_message(), Some("Camera unavailable"));
        assert_eq!(backend.stops.load(Ordering::SeqCst), 1);

        backend.ended.store(false, Ordering::SeqCst);
        acq.retry().unwrap();
        assert!(acq.error().is_none());
        assert!(acq.current_frame().is_some());
    }
}
