// SPDX-License-Identifier: MPL-2.0

//! Shared types for the camera backend

use crate::errors::ClassifyError;
use image::RgbaImage;
use std::sync::Arc;
use std::time::Instant;

/// How a device is opened as a GStreamer source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceApi {
    /// PipeWire node, `path` holds the `object.serial`
    PipeWire,
    /// V4L2 node, `path` holds `/dev/videoN`
    V4l2,
}

impl std::fmt::Display for DeviceApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceApi::PipeWire => write!(f, "PipeWire"),
            DeviceApi::V4l2 => write!(f, "V4L2"),
        }
    }
}

/// A camera that can be attached to the capture session
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CameraDevice {
    pub name: String,
    /// Backend specific identifier, persisted as `last_camera_path`
    pub path: String,
    pub api: DeviceApi,
}

/// One decoded RGBA frame
///
/// Frames are immutable once produced. The pixel buffer is shared so the
/// preview, the captured still and the classifier can all hold it cheaply.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// RGBA pixels, `stride` bytes per row
    pub data: Arc<[u8]>,
    /// Row stride in bytes (may include padding)
    pub stride: u32,
    /// When the appsink received the buffer
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Build a frame from tightly packed RGBA pixels
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data: Arc::from(pixels),
            stride: width * 4,
            captured_at: Instant::now(),
        }
    }

    /// Copy the frame into a tightly packed image, dropping row padding
    pub fn to_rgba_image(&self) -> Result<RgbaImage, ClassifyError> {
        let row_bytes = self.width as usize * 4;
        let stride = self.stride as usize;
        let height = self.height as usize;

        if self.width == 0 || self.height == 0 {
            return Err(ClassifyError::ImageDecodeFailed("empty frame".to_string()));
        }
        if stride < row_bytes || self.data.len() < stride * (height - 1) + row_bytes {
            return Err(ClassifyError::ImageDecodeFailed(format!(
                "buffer of {} bytes too small for {}x{} (stride {})",
                self.data.len(),
                self.width,
                self.height,
                self.stride
            )));
        }

        let pixels = if stride == row_bytes {
            self.data[..row_bytes * height].to_vec()
        } else {
            let mut packed = Vec::with_capacity(row_bytes * height);
            for row in self.data.chunks(stride).take(height) {
                packed.extend_from_slice(&row[..row_bytes]);
            }
            packed
        };

        RgbaImage::from_raw(self.width, self.height, pixels).ok_or_else(|| {
            ClassifyError::ImageDecodeFailed("pixel buffer does not match dimensions".to_string())
        })
    }
}

/// Preview frame channel (appsink -> UI subscription)
pub type FrameReceiver = futures::channel::mpsc::Receiver<CameraFrame>;
pub type FrameSender = futures::channel::mpsc::Sender<CameraFrame>;

/// Receives exactly one still frame or one error
pub type PhotoReceiver = tokio::sync::oneshot::Receiver<BackendResult<CameraFrame>>;
pub type PhotoSender = tokio::sync::oneshot::Sender<BackendResult<CameraFrame>>;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Backend errors
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// The source element could not be created for the device
    InputFailed(String),
    /// The output branch could not be created or linked
    OutputFailed(String),
    /// Pipeline could not reach the requested state
    InitializationFailed(String),
    /// Operation needs a running session
    NotRunning,
    /// A still capture is already pending
    CaptureBusy,
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InputFailed(msg) => write!(f, "Input failed: {}", msg),
            BackendError::OutputFailed(msg) => write!(f, "Output failed: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::NotRunning => write!(f, "Session is not running"),
            BackendError::CaptureBusy => write!(f, "Capture already pending"),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}
