// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │   UI Layer (App)    │
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  CaptureController  │  ← Authorization, session lifecycle, capture timeout
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  CameraBackend Trait│  ← Common interface
//! └──────────┬──────────┘
//!            │
//!            ▼
//!       ┌────────┐
//!       │PipeWire│  ← GStreamer implementation
//!       └────────┘
//! ```

pub mod controller;
pub mod pipewire;
pub mod types;

pub use controller::{CaptureController, SessionState};
pub use types::*;

/// Platform camera session
///
/// A session goes through attach input, attach output, then start/stop.
/// Implementations are driven only by [`CaptureController`], which holds them
/// behind a mutex.
pub trait CameraBackend: Send {
    // ===== Enumeration =====

    /// List video sources currently present
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    // ===== Lifecycle =====

    /// Create the source for `device`, replacing any previous session
    fn attach_input(&mut self, device: &CameraDevice) -> BackendResult<()>;

    /// Link the photo-capable RGBA output. Preview frames go to `preview` when given.
    fn attach_output(&mut self, preview: Option<FrameSender>) -> BackendResult<()>;

    /// Run or pause the session
    fn set_running(&mut self, running: bool) -> BackendResult<()>;

    /// Release the device
    fn shutdown(&mut self) -> BackendResult<()>;

    // ===== Capture =====

    /// Arm the one-shot photo slot; the next frame fulfils the receiver
    fn capture_photo(&mut self) -> BackendResult<PhotoReceiver>;

    // ===== Metadata =====

    fn current_device(&self) -> Option<&CameraDevice>;
}

/// Get the platform backend
pub fn get_backend() -> Box<dyn CameraBackend> {
    Box::new(pipewire::PipeWireBackend::new())
}
