// SPDX-License-Identifier: GPL-3.0-only

//! Direct V4L2 webcam capture
//!
//! Opens the device with the v4l crate, negotiates YUYV (or MJPG) close to
//! the requested size and converts frames to RGBA on a capture thread.

use super::types::*;
use super::{CameraBackend, MediaStream};
use crate::constants;
use crate::errors::AcquisitionError;
use futures::channel::mpsc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use v4l::buffer::Type;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;

const YUYV: &[u8; 4] = b"YUYV";
const MJPG: &[u8; 4] = b"MJPG";

/// Webcam backend for one V4L2 device node
#[derive(Debug, Clone)]
pub struct V4l2Backend {
    device_path: String,
}

impl V4l2Backend {
    pub fn new(device_path: String) -> Self {
        Self { device_path }
    }
}

impl CameraBackend for V4l2Backend {
    fn backend_type(&self) -> CameraBackendType {
        CameraBackendType::V4l2
    }

    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        let mut cameras = Vec::new();
        for entry in std::fs::read_dir("/dev").into_iter().flatten().flatten() {
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.starts_with("video") {
                continue;
            }
            let Ok(dev) = Device::with_path(&path) else {
                continue;
            };
            let Ok(caps) = dev.query_caps() else {
                continue;
            };
            if !caps
                .capabilities
                .contains(v4l::capability::Flags::VIDEO_CAPTURE)
            {
                continue;
            }
            debug!(card = %caps.card, path = %path.display(), "Found V4L2 camera");
            cameras.push(CameraDevice {
                name: caps.card.clone(),
                path: path.to_string_lossy().into_owned(),
            });
        }
        cameras.sort_by(|a, b| a.path.cmp(&b.path));
        cameras
    }

    fn open(&mut self, constraints: &StreamConstraints) -> BackendResult<Box<dyn MediaStream>> {
        if constraints.audio {
            return Err(AcquisitionError::Unsupported(
                "V4L2 backend captures video only".to_string(),
            ));
        }

        info!(
            device_path = %self.device_path,
            width = constraints.ideal_width,
            height = constraints.ideal_height,
            "Opening V4L2 device"
        );

        let dev = Device::with_path(&self.device_path)
            .map_err(|e| AcquisitionError::from_io(&self.device_path, &e))?;
        let format = negotiate_format(&dev, constraints)
            .map_err(|e| AcquisitionError::from_io(&self.device_path, &e))?;
        if !is_supported_fourcc(format.fourcc) {
            return Err(AcquisitionError::Unsupported(format!(
                "{}: pixel format {} is neither YUYV nor MJPG",
                self.device_path,
                format.fourcc.str().unwrap_or("????")
            )));
        }

        let camera_format = CameraFormat {
            width: format.width,
            height: format.height,
            framerate: None,
            pixel_format: format.fourcc.str().unwrap_or("????").to_string(),
        };

        let (sender, receiver) = mpsc::channel(constants::camera::FRAME_CHANNEL_CAPACITY);
        let (ready_tx, ready_rx) = std::sync::mpsc::sync_channel(1);
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let device_path = self.device_path.clone();

        let thread_handle = std::thread::spawn(move || {
            if let Err(e) = capture_loop(dev, format, sender, running_clone.clone(), ready_tx) {
                error!(device_path = %device_path, error = %e, "V4L2 capture loop failed");
            }
            // Stream is dead once the loop exits, for whatever reason
            running_clone.store(false, Ordering::SeqCst);
        });

        // The buffer stream is created on the capture thread; wait for it so
        // busy devices are reported to the caller
        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = thread_handle.join();
                return Err(AcquisitionError::from_io(&self.device_path, &e));
            }
            Err(_) => {
                let _ = thread_handle.join();
                return Err(AcquisitionError::Backend(format!(
                    "{}: capture thread exited",
                    self.device_path
                )));
            }
        }

        info!(format = %camera_format, "V4L2 stream started");
        Ok(Box::new(V4l2Stream {
            format: camera_format,
            receiver,
            running,
            thread_handle: Some(thread_handle),
        }))
    }
}

/// Pixel formats the capture loop can convert to RGBA
fn is_supported_fourcc(fourcc: v4l::FourCC) -> bool {
    fourcc == v4l::FourCC::new(YUYV) || fourcc == v4l::FourCC::new(MJPG)
}

/// Ask for YUYV at the ideal size, fall back to MJPG, then to whatever
/// the device is already set to
fn negotiate_format(dev: &Device, constraints: &StreamConstraints) -> std::io::Result<v4l::Format> {
    for fourcc in [YUYV, MJPG] {
        let mut format = dev.format()?;
        format.width = constraints.ideal_width;
        format.height = constraints.ideal_height;
        format.fourcc = v4l::FourCC::new(fourcc);

        match dev.set_format(&format) {
            Ok(f) if f.fourcc == v4l::FourCC::new(fourcc) => {
                info!(
                    width = f.width,
                    height = f.height,
                    fourcc = ?f.fourcc,
                    "Set V4L2 format"
                );
                return Ok(f);
            }
            Ok(f) => debug!(requested = ?format.fourcc, got = ?f.fourcc, "Format not accepted"),
            Err(e) => warn!(error = %e, fourcc = ?format.fourcc, "Could not set format"),
        }
    }

    let current = dev.format()?;
    warn!(fourcc = ?current.fourcc, "Using current device format");
    Ok(current)
}

struct V4l2Stream {
    format: CameraFormat,
    receiver: mpsc::Receiver<CameraFrame>,
    running: Arc<AtomicBool>,
    thread_handle: Option<std::thread::JoinHandle<()>>,
}

impl MediaStream for V4l2Stream {
    fn format(&self) -> &CameraFormat {
        &self.format
    }

    fn poll_frame(&mut self) -> Option<CameraFrame> {
        // Drain to the newest frame
        let mut latest = None;
        while let Ok(frame) = self.receiver.try_recv() {
            latest = Some(frame);
        }
        latest
    }

    fn stop(&mut self) {
        if self.running.swap(false, Ordering::SeqCst) {
            info!("Stopping V4L2 stream");
        }
        self.receiver.close();
        // Join even when the loop already ended on its own
        if let Some(handle) = self.thread_handle.take() {
            match handle.join() {
                Ok(_) => info!("V4L2 capture thread stopped"),
                Err(_) => warn!("V4L2 capture thread panicked"),
            }
        }
    }

    fn is_live(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for V4l2Stream {
    fn drop(&mut self) {
        if self.running.load(Ordering::SeqCst) {
            warn!("V4L2 stream dropped without stop");
            self.running.store(false, Ordering::SeqCst);
        }
    }
}

/// Capture loop running on its own thread
fn capture_loop(
    mut dev: Device,
    format: v4l::Format,
    mut sender: mpsc::Sender<CameraFrame>,
    running: Arc<AtomicBool>,
    ready: std::sync::mpsc::SyncSender<std::io::Result<()>>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    static FRAME_COUNTER: AtomicU64 = AtomicU64::new(0);

    let mut stream = match MmapStream::with_buffers(&mut dev, Type::VideoCapture, 4) {
        Ok(stream) => {
            let _ = ready.send(Ok(()));
            stream
        }
        Err(e) => {
            let message = e.to_string();
            let _ = ready.send(Err(e));
            return Err(format!("Failed to create buffer stream: {}", message).into());
        }
    };

    let width = format.width;
    let height = format.height;
    let fourcc = format.fourcc;

    while running.load(Ordering::SeqCst) {
        let frame_start = Instant::now();

        let (buf, meta) = match stream.next() {
            Ok(next) => next,
            Err(e) => {
                warn!(error = %e, "Failed to capture frame");
                std::thread::sleep(std::time::Duration::from_millis(10));
                continue;
            }
        };
        let frame_num = FRAME_COUNTER.fetch_add(1, Ordering::Relaxed);

        let rgba = if fourcc == v4l::FourCC::new(YUYV) {
            yuyv_to_rgba(buf, width, height)
        } else if fourcc == v4l::FourCC::new(MJPG) {
            match image::load_from_memory(buf) {
                Ok(img) => img.to_rgba8().into_raw(),
                Err(e) => {
                    debug!(frame = frame_num, error = %e, "Dropping undecodable MJPG frame");
                    continue;
                }
            }
        } else {
            return Err(format!("unsupported pixel format {:?}", fourcc).into());
        };

        if rgba.len() < (width * height * 4) as usize {
            if frame_num % 30 == 0 {
                warn!(
                    frame = frame_num,
                    got = rgba.len(),
                    width,
                    height,
                    "Short frame"
                );
            }
            continue;
        }

        let frame = CameraFrame {
            width,
            height,
            stride: width * 4,
            data: Arc::from(rgba),
            captured_at: frame_start,
        };

        match sender.try_send(frame) {
            Ok(_) => {
                if frame_num % 60 == 0 {
                    debug!(
                        frame = frame_num,
                        sequence = meta.sequence,
                        elapsed_us = frame_start.elapsed().as_micros(),
                        "Frame captured"
                    );
                }
            }
            Err(e) if e.is_disconnected() => break,
            Err(_) => {
                if frame_num % 30 == 0 {
                    debug!(frame = frame_num, "Frame dropped (channel full)");
                }
            }
        }
    }

    info!("V4L2 capture loop ended");
    Ok(())
}

/// Convert YUYV (YUV 4:2:2) to RGBA with BT.601 coefficients.
///
/// YUYV: Y0 U0 Y1 V0, each 4-byte group encodes 2 pixels.
pub fn yuyv_to_rgba(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let pixel_count = (width * height) as usize;
    let mut rgba = Vec::with_capacity(pixel_count * 4);

    for chunk in data.chunks_exact(4) {
        let y0 = chunk[0] as f32;
        let u = chunk[1] as f32 - 128.0;
        let y1 = chunk[2] as f32;
        let v = chunk[3] as f32 - 128.0;

        for y in [y0, y1] {
            if rgba.len() >= pixel_count * 4 {
                return rgba;
            }
            rgba.push((y + 1.402 * v).clamp(0.0, 255.0) as u8);
            rgba.push((y - 0.344 * u - 0.714 * v).clamp(0.0, 255.0) as u8);
            rgba.push((y + 1.772 * u).clamp(0.0, 255.0) as u8);
            rgba.push(255);
        }
    }

    rgba
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yuyv_white_and_black() {
        let yuyv = vec![255u8, 128, 0, 128];
        let rgba = yuyv_to_rgba(&yuyv, 2, 1);
        assert_eq!(rgba.len(), 8);
        assert!(rgba[0] > 250 && rgba[1] > 250 && rgba[2] > 250);
        assert_eq!(&rgba[4..8], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_yuyv_truncates_to_dimensions() {
        let yuyv = vec![16u8; 16];
        assert_eq!(yuyv_to_rgba(&yuyv, 3, 1).len(), 12);
    }

    #[test]
    fn test_only_convertible_formats_are_accepted() {
        assert!(is_supported_fourcc(v4l::FourCC::new(b"YUYV")));
        assert!(is_supported_fourcc(v4l::FourCC::new(b"MJPG")));
        assert!(!is_supported_fourcc(v4l::FourCC::new(b"NV12")));
        assert!(!is_supported_fourcc(v4l::FourCC::new(b"GREY")));
    }

    #[test]
    fn test_missing_device_is_not_found() {
        let mut backend = V4l2Backend::new("/dev/does-not-exist".to_string());
        let err = backend
            .open(&StreamConstraints::default())
            .err()
            .expect("missing device must fail");
        assert!(matches!(err, AcquisitionError::DeviceNotFound(_)));
    }
}
