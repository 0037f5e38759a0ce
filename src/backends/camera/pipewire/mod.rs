// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer camera backend
//!
//! Sources are opened through PipeWire when it exposes the camera, falling back
//! to V4L2 or `autovideosrc`. PipeWire handles format negotiation and device
//! sharing; `videoconvert` turns whatever it delivers into RGBA.

mod enumeration;
mod pipeline;

pub use enumeration::enumerate_cameras;
pub use pipeline::CapturePipeline;

use super::CameraBackend;
use super::types::*;
use tracing::info;

/// Backend owning at most one capture pipeline
#[derive(Default)]
pub struct PipeWireBackend {
    pipeline: Option<CapturePipeline>,
    device: Option<CameraDevice>,
}

impl PipeWireBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn pipeline_mut(&mut self) -> BackendResult<&mut CapturePipeline> {
        self.pipeline.as_mut().ok_or_else(|| {
            BackendError::InitializationFailed("no camera input attached".to_string())
        })
    }
}

impl CameraBackend for PipeWireBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        enumerate_cameras()
    }

    fn attach_input(&mut self, device: &CameraDevice) -> BackendResult<()> {
        // Release the previous device before opening the next one
        self.shutdown()?;
        self.pipeline = Some(CapturePipeline::new(device)?);
        self.device = Some(device.clone());
        Ok(())
    }

    fn attach_output(&mut self, preview: Option<FrameSender>) -> BackendResult<()> {
        self.pipeline
            .as_mut()
            .ok_or_else(|| BackendError::OutputFailed("no camera input attached".to_string()))?
            .attach_output(preview)
    }

    fn set_running(&mut self, running: bool) -> BackendResult<()> {
        self.pipeline_mut()?.set_running(running)
    }

    fn shutdown(&mut self) -> BackendResult<()> {
        self.device = None;
        match self.pipeline.take() {
            Some(pipeline) => {
                info!("Releasing camera");
                pipeline.stop()
            }
            None => Ok(()),
        }
    }

    fn capture_photo(&mut self) -> BackendResult<PhotoReceiver> {
        match self.pipeline.as_ref() {
            Some(pipeline) => pipeline.capture_photo(),
            None => Err(BackendError::NotRunning),
        }
    }

    fn current_device(&self) -> Option<&CameraDevice> {
        self.device.as_ref()
    }
}
