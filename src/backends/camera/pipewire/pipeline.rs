// SPDX-License-Identifier: MPL-2.0

//! GStreamer capture pipeline
//!
//! `source ! videoconvert ! video/x-raw,format=RGBA ! appsink`
//!
//! The appsink callback feeds the preview channel and fulfils the armed
//! photo slot with the next frame.

use super::super::types::*;
use crate::constants::{pipeline, timing};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// One pending still capture
type PhotoSlot = Arc<Mutex<Option<PhotoSender>>>;

/// Capture pipeline for one device
pub struct CapturePipeline {
    pipeline: gstreamer::Pipeline,
    source: gstreamer::Element,
    appsink: Option<AppSink>,
    photo_slot: PhotoSlot,
    running: bool,
}

impl CapturePipeline {
    /// Create the pipeline with the device's source element
    pub fn new(device: &CameraDevice) -> BackendResult<Self> {
        info!(device = %device.name, api = %device.api, "Creating capture pipeline");

        gstreamer::init().map_err(|e| BackendError::NotAvailable(e.to_string()))?;

        let source = make_source(device)?;
        let pipeline = gstreamer::Pipeline::with_name("emotrack-capture");
        pipeline
            .add(&source)
            .map_err(|e| BackendError::InputFailed(e.to_string()))?;

        Ok(Self {
            pipeline,
            source,
            appsink: None,
            photo_slot: Arc::new(Mutex::new(None)),
            running: false,
        })
    }

    /// Link the RGBA appsink behind the source
    pub fn attach_output(&mut self, preview: Option<FrameSender>) -> BackendResult<()> {
        if self.appsink.is_some() {
            return Err(BackendError::OutputFailed(
                "output already attached".to_string(),
            ));
        }

        let convert = gstreamer::ElementFactory::make("videoconvert")
            .build()
            .map_err(|e| BackendError::OutputFailed(e.to_string()))?;
        let caps = gstreamer::Caps::builder("video/x-raw")
            .field("format", pipeline::OUTPUT_FORMAT)
            .build();
        let appsink = AppSink::builder()
            .caps(&caps)
            .max_buffers(pipeline::MAX_BUFFERS)
            .drop(true)
            .build();
        appsink.set_property("sync", false);
        appsink.set_property("enable-last-sample", false);

        self.pipeline
            .add_many([&convert, appsink.upcast_ref()])
            .map_err(|e| BackendError::OutputFailed(e.to_string()))?;
        gstreamer::Element::link_many([&self.source, &convert, appsink.upcast_ref()])
            .map_err(|e| BackendError::OutputFailed(e.to_string()))?;

        let slot = Arc::clone(&self.photo_slot);
        let frame_counter = AtomicU64::new(0);
        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_num = frame_counter.fetch_add(1, Ordering::Relaxed);
                    let frame = pull_frame(appsink).inspect_err(|e| {
                        if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                            error!(frame = frame_num, error = ?e, "Failed to read sample");
                        }
                    })?;

                    if let Some(photo) = take_slot(&slot)
                        && photo.send(Ok(frame.clone())).is_err()
                    {
                        debug!("Photo receiver dropped before delivery");
                    }

                    if let Some(sender) = preview.as_ref() {
                        let mut sender = sender.clone();
                        if sender.try_send(frame).is_err()
                            && frame_num % timing::FRAME_LOG_INTERVAL == 0
                        {
                            debug!(frame = frame_num, "Preview frame dropped (channel full)");
                        }
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        self.appsink = Some(appsink);
        debug!("Photo output attached");
        Ok(())
    }

    /// Move between PLAYING and NULL
    pub fn set_running(&mut self, running: bool) -> BackendResult<()> {
        if self.appsink.is_none() {
            return Err(BackendError::InitializationFailed(
                "no output attached".to_string(),
            ));
        }

        if running {
            self.pipeline
                .set_state(gstreamer::State::Playing)
                .map_err(|e| {
                    BackendError::InitializationFailed(format!("Failed to start pipeline: {}", e))
                })?;
            let (result, state, pending) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
                timing::START_TIMEOUT_SECS,
            ));
            debug!(result = ?result, state = ?state, pending = ?pending, "Pipeline state");
            if let Some(message) = self.pending_error() {
                let _ = self.pipeline.set_state(gstreamer::State::Null);
                return Err(BackendError::InitializationFailed(message));
            }
            if state != gstreamer::State::Playing {
                warn!("Pipeline is not in PLAYING state yet");
            }
        } else {
            self.fail_pending_capture();
            self.pipeline
                .set_state(gstreamer::State::Null)
                .map_err(|e| BackendError::Other(format!("Failed to stop pipeline: {}", e)))?;
            let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
                timing::STOP_TIMEOUT_SECS,
            ));
            if let Err(e) = result {
                debug!(error = ?e, state = ?state, "Pipeline state change had issues");
            }
        }

        self.running = running;
        info!(running, "Capture pipeline state changed");
        Ok(())
    }

    /// Arm the photo slot
    pub fn capture_photo(&self) -> BackendResult<PhotoReceiver> {
        if !self.running {
            return Err(BackendError::NotRunning);
        }

        let mut slot = self.photo_slot.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|pending| !pending.is_closed()) {
            return Err(BackendError::CaptureBusy);
        }
        let (tx, rx) = tokio::sync::oneshot::channel();
        *slot = Some(tx);
        Ok(rx)
    }

    /// Stop and release the device
    pub fn stop(mut self) -> BackendResult<()> {
        self.set_running(false).or_else(|e| match e {
            // Never had an output, nothing was started
            BackendError::InitializationFailed(_) => Ok(()),
            other => Err(other),
        })
    }

    fn fail_pending_capture(&self) {
        if let Some(photo) = take_slot(&self.photo_slot) {
            let _ = photo.send(Err(BackendError::NotRunning));
        }
    }

    /// First error posted on the bus, if any
    fn pending_error(&self) -> Option<String> {
        let bus = self.pipeline.bus()?;
        let message =
            bus.timed_pop_filtered(gstreamer::ClockTime::ZERO, &[gstreamer::MessageType::Error])?;
        match message.view() {
            gstreamer::MessageView::Error(err) => Some(err.error().to_string()),
            _ => None,
        }
    }
}

impl Drop for CapturePipeline {
    fn drop(&mut self) {
        if let Some(appsink) = self.appsink.as_ref() {
            appsink.set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());
        }
        self.fail_pending_capture();
        let _ = self.pipeline.set_state(gstreamer::State::Null);
        debug!("Capture pipeline dropped");
    }
}

fn take_slot(slot: &PhotoSlot) -> Option<PhotoSender> {
    slot.lock().unwrap_or_else(PoisonError::into_inner).take()
}

/// Copy the appsink's current sample into a frame
fn pull_frame(appsink: &AppSink) -> Result<CameraFrame, gstreamer::FlowError> {
    let sample = appsink
        .pull_sample()
        .map_err(|_| gstreamer::FlowError::Eos)?;
    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
    if buffer.flags().contains(gstreamer::BufferFlags::CORRUPTED) {
        return Err(gstreamer::FlowError::Error);
    }
    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
    let video_info = VideoInfo::from_caps(caps).map_err(|_| gstreamer::FlowError::Error)?;
    let map = buffer
        .map_readable()
        .map_err(|_| gstreamer::FlowError::Error)?;

    Ok(CameraFrame {
        width: video_info.width(),
        height: video_info.height(),
        data: Arc::from(map.as_slice()),
        stride: video_info.stride()[0] as u32,
        captured_at: Instant::now(),
    })
}

/// Source element for the device
fn make_source(device: &CameraDevice) -> BackendResult<gstreamer::Element> {
    let built = match device.api {
        DeviceApi::PipeWire => gstreamer::ElementFactory::make("pipewiresrc")
            .property("target-object", device.path.as_str())
            .build(),
        DeviceApi::V4l2 => gstreamer::ElementFactory::make("v4l2src")
            .property("device", device.path.as_str())
            .build(),
    };

    built.map_err(|e| BackendError::InputFailed(e.to_string()))
}
