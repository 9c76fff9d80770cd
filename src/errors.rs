// SPDX-License-Identifier: MPL-2.0

//! Error types for the photo booth

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera acquisition errors
    Camera(AcquisitionError),
    /// Capture/composite errors
    Photo(CaptureError),
    /// Caption service errors
    Caption(CaptionError),
    /// Configuration errors
    Config(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Camera acquisition errors
///
/// All of these are recoverable: the booth keeps running and the user can
/// retry the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionError {
    /// Access to the camera was refused
    PermissionDenied(String),
    /// No matching camera device exists
    DeviceNotFound(String),
    /// The device is held by another process
    Busy(String),
    /// The device exists but cannot produce frames we understand
    Unsupported(String),
    /// Any other backend failure
    Backend(String),
}

impl AcquisitionError {
    /// Short message shown inline in place of the live preview
    pub fn user_message(&self) -> &'static str {
        match self {
            AcquisitionError::PermissionDenied(_) => "Permissions needed",
            AcquisitionError::DeviceNotFound(_) => "No camera found",
            AcquisitionError::Busy(_) => "Camera is busy",
            AcquisitionError::Unsupported(_) => "Camera not supported",
            AcquisitionError::Backend(_) => "Camera unavailable",
        }
    }

    /// Map an I/O error from opening a device to the matching kind
    pub fn from_io(context: &str, err: &std::io::Error) -> Self {
        let msg = format!("{}: {}", context, err);
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => AcquisitionError::PermissionDenied(msg),
            std::io::ErrorKind::NotFound => AcquisitionError::DeviceNotFound(msg),
            std::io::ErrorKind::ResourceBusy => AcquisitionError::Busy(msg),
            _ => AcquisitionError::Backend(msg),
        }
    }
}

/// Capture/composite errors
///
/// A capture that fails produces nothing; the shutter press is simply lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// The raster surface could not be created from the frame
    SurfaceUnavailable(String),
    /// JPEG encoding failed
    EncodingFailed(String),
}

/// Caption service errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptionError {
    /// The caption pool has no entries
    EmptyPool,
    /// The service failed to produce a caption
    Failed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Caption(e) => write!(f, "Caption error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for AcquisitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquisitionError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            AcquisitionError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            AcquisitionError::Busy(msg) => write!(f, "Device busy: {}", msg),
            AcquisitionError::Unsupported(msg) => write!(f, "Unsupported device: {}", msg),
            AcquisitionError::Backend(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureError::SurfaceUnavailable(msg) => write!(f, "Surface unavailable: {}", msg),
            CaptureError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
        }
    }
}

impl fmt::Display for CaptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptionError::EmptyPool => write!(f, "Caption pool is empty"),
            CaptionError::Failed(msg) => write!(f, "Caption request failed: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for AcquisitionError {}
impl std::error::Error for CaptureError {}
impl std::error::Error for CaptionError {}

impl From<AcquisitionError> for AppError {
    fn from(err: AcquisitionError) -> Self {
        AppError::Camera(err)
    }
}

impl From<CaptureError> for AppError {
    fn from(err: CaptureError) -> Self {
        AppError::Photo(err)
    }
}

impl From<CaptionError> for AppError {
    fn from(err: CaptionError) -> Self {
        AppError::Caption(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<image::ImageError> for CaptureError {
    fn from(err: image::ImageError) -> Self {
        CaptureError::EncodingFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_mapping() {
        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        let err = AcquisitionError::from_io("/dev/video0", &denied);
        assert!(matches!(err, AcquisitionError::PermissionDenied(_)));
        assert_eq!(err.user_message(), "Permissions needed");

        let busy = std::io::Error::from(std::io::ErrorKind::ResourceBusy);
        assert!(matches!(
            AcquisitionError::from_io("/dev/video0", &busy),
            AcquisitionError::Busy(_)
        ));

        let missing = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert!(matches!(
            AcquisitionError::from_io("/dev/video9", &missing),
            AcquisitionError::DeviceNotFound(_)
        ));
    }

    #[test]
    fn test_app_error_display_wraps_source() {
        let err: AppError = CaptionError::EmptyPool.into();
        assert_eq!(err.to_string(), "Caption error: Caption pool is empty");
    }
}
