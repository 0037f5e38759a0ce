// SPDX-License-Identifier: GPL-3.0-only

//! Capture operation handlers
//!
//! Handles photo capture, classification results and clearing the held frame.

use crate::app::camera_preview;
use crate::app::frame_processor::Classification;
use crate::app::state::{AppModel, Message};
use crate::backends::camera::CameraFrame;
use crate::errors::CameraError;
use cosmic::Task;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

impl AppModel {
    pub(crate) fn handle_capture(&mut self) -> Task<cosmic::Action<Message>> {
        let capture_id = match self.mood.begin_capture() {
            Ok(id) => id,
            Err(CameraError::CaptureInProgress) => {
                debug!("Capture already in flight, ignoring");
                return Task::none();
            }
            Err(e) => {
                warn!(error = %e, "Capture rejected");
                self.mood.set_error(e.to_string());
                return Task::none();
            }
        };

        info!(capture_id, "Capturing photo");
        let controller = self.controller.clone();
        Task::perform(
            async move { controller.capture_photo().await.map(Arc::new) },
            move |result| cosmic::Action::App(Message::PhotoCaptured(capture_id, result)),
        )
    }

    pub(crate) fn handle_photo_captured(
        &mut self,
        capture_id: u64,
        result: Result<Arc<CameraFrame>, CameraError>,
    ) -> Task<cosmic::Action<Message>> {
        let frame = match result {
            Ok(frame) => frame,
            Err(e) => {
                error!(capture_id, error = %e, "Photo capture failed");
                self.mood.on_capture_failed(capture_id, e);
                return Task::none();
            }
        };

        if !self.mood.on_frame_captured(capture_id, Arc::clone(&frame)) {
            return Task::none();
        }

        info!(
            capture_id,
            width = frame.width,
            height = frame.height,
            "Photo captured, classifying"
        );
        match camera_preview::frame_handle(&frame, self.config.mirror_preview) {
            Ok(handle) => self.captured_handle = Some(handle),
            Err(e) => warn!(error = %e, "Captured frame cannot be displayed"),
        }

        let classifier = self.classifier.clone();
        Task::perform(
            async move { classifier.classify(capture_id, frame).await },
            |classification| cosmic::Action::App(Message::Classified(classification)),
        )
    }

    pub(crate) fn handle_classified(
        &mut self,
        classification: Classification,
    ) -> Task<cosmic::Action<Message>> {
        let capture_id = classification.capture_id;
        let label = classification.label.clone();
        let error = classification.error.clone();

        if !self.mood.on_classified(classification.clone()) {
            return Task::none();
        }

        match error {
            None => info!(
                capture_id,
                label = %label,
                confidence = ?classification.confidence,
                "Emotion classified"
            ),
            Some(e) => warn!(capture_id, error = %e, "Classification failed"),
        }
        self.last_classification = Some(classification);
        Task::none()
    }

    /// Drop the held frame and resume the live preview
    pub(crate) fn handle_clear(&mut self) -> Task<cosmic::Action<Message>> {
        info!("Clearing mood result");
        self.mood.clear();
        self.captured_handle = None;

        if !self.mood.is_authorized() || !self.session.is_active() {
            return Task::none();
        }

        let controller = self.controller.clone();
        Task::perform(async move { controller.start().await }, |result| {
            cosmic::Action::App(Message::SessionResumed(result))
        })
    }
}
