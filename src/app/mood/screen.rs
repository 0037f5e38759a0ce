// SPDX-License-Identifier: GPL-3.0-only

//! State machine behind the mood page
//!
//! ```text
//! Idle ─▶ Authorizing ─▶ Previewing ─▶ Capturing ─▶ Classifying ─▶ ShowingResult
//!   ▲          │              ▲            │                             │
//!   └──denied──┘              └──failure───┘◀──────────── clear ─────────┘
//! ```
//!
//! Only the `update` loop mutates the screen. Async work reports back through
//! messages that land in the `on_*` methods.

use super::palette::MoodColor;
use super::store::MoodStore;
use crate::app::frame_processor::Classification;
use crate::backends::camera::{CameraDevice, CameraFrame};
use crate::errors::CameraError;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoodPhase {
    /// No camera access yet
    #[default]
    Idle,
    /// Waiting for the permission answer and session setup
    Authorizing,
    /// Live preview running, ready to capture
    Previewing,
    /// Photo requested
    Capturing,
    /// Frame held, model running
    Classifying,
    /// Label updated from the last capture
    ShowingResult,
}

/// What the preview area says while it has no frame to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewStatus {
    WaitingForAccess,
    NoAccess,
    SetupFailed,
    Starting,
}

#[derive(Debug)]
pub struct MoodScreen {
    phase: MoodPhase,
    authorized: bool,
    error_message: Option<String>,
    captured: Option<Arc<CameraFrame>>,
    device: Option<CameraDevice>,
    pending_capture: Option<u64>,
    next_capture_id: u64,
    store: MoodStore,
}

impl MoodScreen {
    pub fn new(default_label: impl Into<String>) -> Self {
        Self {
            phase: MoodPhase::Idle,
            authorized: false,
            error_message: None,
            captured: None,
            device: None,
            pending_capture: None,
            next_capture_id: 1,
            store: MoodStore::new(default_label),
        }
    }

    pub fn phase(&self) -> MoodPhase {
        self.phase
    }

    pub fn is_authorized(&self) -> bool {
        self.authorized
    }

    pub fn preview_status(&self) -> PreviewStatus {
        match self.phase {
            MoodPhase::Authorizing => PreviewStatus::WaitingForAccess,
            MoodPhase::Idle if !self.authorized => PreviewStatus::NoAccess,
            // Granted but the session never came up
            MoodPhase::Idle => PreviewStatus::SetupFailed,
            _ => PreviewStatus::Starting,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn captured_frame(&self) -> Option<&Arc<CameraFrame>> {
        self.captured.as_ref()
    }

    pub fn device(&self) -> Option<&CameraDevice> {
        self.device.as_ref()
    }

    pub fn store(&self) -> &MoodStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MoodStore {
        &mut self.store
    }

    pub fn label(&self) -> String {
        self.store.label()
    }

    pub fn color(&self) -> MoodColor {
        self.store.color()
    }

    /// Whether the capture button should be enabled
    pub fn can_capture(&self) -> bool {
        self.authorized && self.phase == MoodPhase::Previewing
    }

    pub fn begin_authorization(&mut self) {
        self.phase = MoodPhase::Authorizing;
        self.error_message = None;
    }

    /// Returns whether session setup should follow
    pub fn on_authorization(&mut self, granted: bool) -> bool {
        self.authorized = granted;
        if !granted {
            self.phase = MoodPhase::Idle;
            self.error_message = Some(CameraError::PermissionDenied.to_string());
        }
        granted
    }

    /// Session configured and started (or failed to)
    pub fn on_session_ready(&mut self, result: Result<CameraDevice, CameraError>) {
        match result {
            Ok(device) => {
                self.device = Some(device);
                self.phase = MoodPhase::Previewing;
                self.error_message = None;
            }
            Err(e) => {
                self.device = None;
                self.phase = MoodPhase::Idle;
                self.error_message = Some(e.to_string());
            }
        }
    }

    /// Reserve a capture id; only one capture may be in flight
    pub fn begin_capture(&mut self) -> Result<u64, CameraError> {
        match self.phase {
            MoodPhase::Capturing | MoodPhase::Classifying => {
                return Err(CameraError::CaptureInProgress);
            }
            MoodPhase::Previewing if self.authorized => {}
            _ => {
                return Err(CameraError::CaptureFailed(
                    "camera is not ready".to_string(),
                ));
            }
        }

        let id = self.next_capture_id;
        self.next_capture_id += 1;
        self.pending_capture = Some(id);
        self.phase = MoodPhase::Capturing;
        self.error_message = None;
        Ok(id)
    }

    /// Returns whether the frame should be classified
    pub fn on_frame_captured(&mut self, capture_id: u64, frame: Arc<CameraFrame>) -> bool {
        if self.pending_capture != Some(capture_id) {
            debug!(capture_id, "Dropping frame for stale capture");
            return false;
        }
        self.captured = Some(frame);
        self.phase = MoodPhase::Classifying;
        true
    }

    pub fn on_capture_failed(&mut self, capture_id: u64, error: CameraError) {
        if self.pending_capture != Some(capture_id) {
            return;
        }
        self.pending_capture = None;
        self.phase = MoodPhase::Previewing;
        self.error_message = Some(error.to_string());
    }

    /// Apply a result; stale results are ignored. Returns whether the label changed.
    pub fn on_classified(&mut self, classification: Classification) -> bool {
        if self.pending_capture != Some(classification.capture_id) {
            debug!(
                capture_id = classification.capture_id,
                "Dropping stale classification"
            );
            return false;
        }

        self.pending_capture = None;
        self.store.publish(classification.label);
        self.error_message = classification.error;
        self.phase = MoodPhase::ShowingResult;
        true
    }

    /// Drop the held frame and go back to the live preview
    pub fn clear(&mut self) {
        self.store.reset();
        self.captured = None;
        self.pending_capture = None;
        self.error_message = None;
        self.phase = MoodPhase::Previewing;
    }

    /// Leaving the page; the label survives
    pub fn teardown(&mut self) {
        self.phase = MoodPhase::Idle;
        self.authorized = false;
        self.captured = None;
        self.device = None;
        self.pending_capture = None;
    }

    /// Show an error without changing phase
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
    }

    pub fn override_label(&self, label: impl Into<String>) {
        self.store.override_label(label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::frame_processor::Prediction;
    use crate::backends::camera::DeviceApi;

    fn device() -> CameraDevice {
        CameraDevice {
            name: "Webcam".to_string(),
            path: "/dev/video0".to_string(),
            api: DeviceApi::V4l2,
        }
    }

    fn frame() -> Arc<CameraFrame> {
        Arc::new(CameraFrame::from_rgba(1, 1, vec![0, 0, 0, 255]))
    }

    fn previewing() -> MoodScreen {
        let mut screen = MoodScreen::new("Confused");
        screen.begin_authorization();
        assert!(screen.on_authorization(true));
        screen.on_session_ready(Ok(device()));
        screen
    }

    #[test]
    fn test_preview_status_follows_setup() {
        let mut screen = MoodScreen::new("Confused");
        screen.begin_authorization();
        assert_eq!(screen.preview_status(), PreviewStatus::WaitingForAccess);

        assert!(screen.on_authorization(true));
        screen.on_session_ready(Err(CameraError::NoCameraDevice));
        assert_eq!(screen.preview_status(), PreviewStatus::SetupFailed);

        screen.begin_authorization();
        assert!(!screen.on_authorization(false));
        assert_eq!(screen.preview_status(), PreviewStatus::NoAccess);

        let screen = previewing();
        assert_eq!(screen.preview_status(), PreviewStatus::Starting);
    }

    #[test]
    fn test_denied_permission_sets_error() {
        let mut screen = MoodScreen::new("Confused");
        screen.begin_authorization();
        assert!(!screen.on_authorization(false));
        assert!(!screen.is_authorized());
        assert_eq!(screen.phase(), MoodPhase::Idle);
        assert!(!screen.error_message().unwrap_or_default().is_empty());
    }

    #[test]
    fn test_full_capture_flow() {
        let mut screen = previewing();
        assert!(screen.can_capture());

        let id = screen.begin_capture().unwrap();
        assert_eq!(screen.phase(), MoodPhase::Capturing);
        assert!(screen.on_frame_captured(id, frame()));
        assert_eq!(screen.phase(), MoodPhase::Classifying);

        let classification = Classification::from_ranked(
            id,
            Ok(vec![
                Prediction::new("happy", 0.91),
                Prediction::new("neutral", 0.05),
            ]),
        );
        assert!(screen.on_classified(classification));
        assert_eq!(screen.phase(), MoodPhase::ShowingResult);
        assert_eq!(screen.label(), "happy");
        assert_eq!(screen.color(), MoodColor::Yellow);
        assert!(screen.error_message().is_none());
    }

    #[test]
    fn test_second_capture_is_rejected_while_in_flight() {
        let mut screen = previewing();
        let id = screen.begin_capture().unwrap();
        assert_eq!(screen.begin_capture(), Err(CameraError::CaptureInProgress));

        screen.on_frame_captured(id, frame());
        assert_eq!(screen.begin_capture(), Err(CameraError::CaptureInProgress));
    }

    #[test]
    fn test_capture_needs_preview() {
        let mut screen = MoodScreen::new("Confused");
        assert!(matches!(
            screen.begin_capture(),
            Err(CameraError::CaptureFailed(_))
        ));
    }

    #[test]
    fn test_failed_classification_shows_unknown() {
        let mut screen = previewing();
        let id = screen.begin_capture().unwrap();
        screen.on_frame_captured(id, frame());

        let classification = Classification::from_ranked(
            id,
            Err(crate::errors::ClassifyError::InferenceFailed(
                "model crashed".to_string(),
            )),
        );
        assert!(screen.on_classified(classification));
        assert_eq!(screen.label(), "Unknown");
        assert!(screen.error_message().is_some());
    }

    #[test]
    fn test_stale_result_after_clear_is_dropped() {
        let mut screen = previewing();
        let id = screen.begin_capture().unwrap();
        screen.on_frame_captured(id, frame());
        screen.clear();

        let late = Classification::from_ranked(id, Ok(vec![Prediction::new("angry", 0.8)]));
        assert!(!screen.on_classified(late));
        assert_eq!(screen.label(), "Confused");
    }

    #[test]
    fn test_clear_from_any_phase() {
        let mut idle = MoodScreen::new("Confused");
        idle.override_label("Sad");
        idle.clear();
        assert_eq!(idle.phase(), MoodPhase::Previewing);
        assert_eq!(idle.label(), "Confused");

        let mut capturing = previewing();
        capturing.begin_capture().unwrap();
        capturing.clear();
        assert_eq!(capturing.phase(), MoodPhase::Previewing);
        assert!(capturing.captured_frame().is_none());
    }

    #[test]
    fn test_capture_failure_returns_to_preview() {
        let mut screen = previewing();
        let id = screen.begin_capture().unwrap();
        screen.on_capture_failed(id, CameraError::CaptureFailed("timed out".to_string()));
        assert_eq!(screen.phase(), MoodPhase::Previewing);
        assert!(screen.error_message().unwrap().contains("timed out"));
        assert!(screen.can_capture());
    }

    #[test]
    fn test_teardown_keeps_label() {
        let mut screen = previewing();
        screen.override_label("Happy");
        screen.teardown();
        assert_eq!(screen.phase(), MoodPhase::Idle);
        assert!(!screen.is_authorized());
        assert_eq!(screen.label(), "Happy");
    }
}
