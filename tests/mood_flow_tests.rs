// SPDX-License-Identifier: GPL-3.0-only

//! End to end mood flow: permission, session, capture, classification, clear

use emotrack::app::frame_processor::{EmotionClassifier, EmotionModel, Prediction};
use emotrack::app::mood::{MoodColor, MoodPhase, MoodScreen};
use emotrack::backends::camera::{
    BackendError, BackendResult, CameraBackend, CameraDevice, CameraFrame, CaptureController,
    DeviceApi, FrameSender, PhotoReceiver, SessionState,
};
use emotrack::backends::permission::{AuthorizationStatus, CameraAuthorizer, GrantedAuthorizer};
use emotrack::errors::{CameraError, ClassifyError};
use futures::FutureExt;
use futures::future::BoxFuture;
use image::GrayImage;
use std::sync::{Arc, Mutex};

struct StillBackend {
    device: Option<CameraDevice>,
    running: bool,
}

impl StillBackend {
    fn new() -> Self {
        Self {
            device: None,
            running: false,
        }
    }
}

impl CameraBackend for StillBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        vec![CameraDevice {
            name: "Integrated Webcam".to_string(),
            path: "/dev/video0".to_string(),
            api: DeviceApi::V4l2,
        }]
    }

    fn attach_input(&mut self, device: &CameraDevice) -> BackendResult<()> {
        self.device = Some(device.clone());
        Ok(())
    }

    fn attach_output(&mut self, _preview: Option<FrameSender>) -> BackendResult<()> {
        Ok(())
    }

    fn set_running(&mut self, running: bool) -> BackendResult<()> {
        self.running = running;
        Ok(())
    }

    fn shutdown(&mut self) -> BackendResult<()> {
        self.running = false;
        self.device = None;
        Ok(())
    }

    fn capture_photo(&mut self) -> BackendResult<PhotoReceiver> {
        if !self.running {
            return Err(BackendError::NotRunning);
        }
        let (tx, rx) = tokio::sync::oneshot::channel();
        let _ = tx.send(Ok(CameraFrame::from_rgba(64, 48, vec![200; 64 * 48 * 4])));
        Ok(rx)
    }

    fn current_device(&self) -> Option<&CameraDevice> {
        self.device.as_ref()
    }
}

struct DeniedAuthorizer;

impl CameraAuthorizer for DeniedAuthorizer {
    fn status(&self) -> BoxFuture<'static, AuthorizationStatus> {
        futures::future::ready(AuthorizationStatus::Denied).boxed()
    }

    fn request(&self) -> BoxFuture<'static, bool> {
        futures::future::ready(false).boxed()
    }
}

/// Returns a fixed ranking and records the input size it was given
#[derive(Default)]
struct FixedModel {
    seen: Mutex<Vec<(u32, u32)>>,
    fail: bool,
}

impl EmotionModel for FixedModel {
    fn predict(&self, input: &GrayImage) -> Result<Vec<Prediction>, ClassifyError> {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(input.dimensions());
        }
        if self.fail {
            return Err(ClassifyError::InferenceFailed("model crashed".to_string()));
        }
        Ok(vec![
            Prediction::new("Happy", 0.91),
            Prediction::new("Neutral", 0.05),
            Prediction::new("Sad", 0.04),
        ])
    }
}

fn controller() -> CaptureController {
    CaptureController::with_backend(Box::new(StillBackend::new()), Arc::new(GrantedAuthorizer))
}

async fn bring_up(screen: &mut MoodScreen, controller: &CaptureController) {
    screen.begin_authorization();
    let granted = controller.request_authorization().await;
    assert!(screen.on_authorization(granted));

    let result = match controller.configure_session(None).await {
        Ok(device) => controller.start().await.map(|_| device),
        Err(e) => Err(e),
    };
    screen.on_session_ready(result);
}

#[tokio::test]
async fn test_capture_and_classify_updates_label() {
    let controller = controller();
    let model = Arc::new(FixedModel::default());
    let classifier = EmotionClassifier::with_model(model.clone());
    let mut screen = MoodScreen::new("Confused");
    let mut labels = screen.store().subscribe();

    bring_up(&mut screen, &controller).await;
    assert_eq!(screen.phase(), MoodPhase::Previewing);
    assert_eq!(screen.device().map(|d| d.path.as_str()), Some("/dev/video0"));
    assert_eq!(screen.label(), "Confused");

    let capture_id = screen.begin_capture().unwrap();
    let frame = Arc::new(controller.capture_photo().await.unwrap());
    assert_eq!(controller.session_state(), SessionState::Stopped);
    assert!(screen.on_frame_captured(capture_id, Arc::clone(&frame)));

    let classification = classifier.classify(capture_id, frame).await;
    assert!(screen.on_classified(classification));

    assert_eq!(screen.phase(), MoodPhase::ShowingResult);
    assert_eq!(screen.label(), "Happy");
    assert_eq!(screen.color(), MoodColor::Yellow);
    assert!(labels.has_changed().unwrap());
    assert_eq!(*labels.borrow_and_update(), "Happy");

    // Frames are cropped and scaled to the model's square input
    assert_eq!(model.seen.lock().unwrap().as_slice(), &[(48, 48)]);
}

#[tokio::test]
async fn test_clear_resets_label_and_resumes_preview() {
    let controller = controller();
    let classifier = EmotionClassifier::with_model(Arc::new(FixedModel::default()));
    let mut screen = MoodScreen::new("Confused");
    bring_up(&mut screen, &controller).await;

    let capture_id = screen.begin_capture().unwrap();
    let frame = Arc::new(controller.capture_photo().await.unwrap());
    screen.on_frame_captured(capture_id, Arc::clone(&frame));
    screen.on_classified(classifier.classify(capture_id, frame).await);
    assert_eq!(screen.label(), "Happy");

    screen.clear();
    controller.start().await.unwrap();

    assert_eq!(screen.label(), "Confused");
    assert_eq!(screen.color(), MoodColor::Gray);
    assert!(screen.captured_frame().is_none());
    assert!(screen.can_capture());
    assert_eq!(controller.session_state(), SessionState::Running);
}

#[tokio::test]
async fn test_model_failure_shows_unknown() {
    let controller = controller();
    let classifier = EmotionClassifier::with_model(Arc::new(FixedModel {
        fail: true,
        ..Default::default()
    }));
    let mut screen = MoodScreen::new("Confused");
    bring_up(&mut screen, &controller).await;

    let capture_id = screen.begin_capture().unwrap();
    let frame = Arc::new(controller.capture_photo().await.unwrap());
    screen.on_frame_captured(capture_id, Arc::clone(&frame));
    let classification = classifier.classify(capture_id, frame).await;
    assert!(!classification.is_success());
    screen.on_classified(classification);

    assert_eq!(screen.label(), "Unknown");
    assert_eq!(screen.color(), MoodColor::Gray);
    assert!(screen.error_message().unwrap().contains("model crashed"));
}

#[tokio::test]
async fn test_permission_denied_keeps_default_label() {
    let controller = CaptureController::with_backend(
        Box::new(StillBackend::new()),
        Arc::new(DeniedAuthorizer),
    );
    let mut screen = MoodScreen::new("Confused");

    screen.begin_authorization();
    let granted = controller.request_authorization().await;
    assert!(!screen.on_authorization(granted));

    assert_eq!(screen.phase(), MoodPhase::Idle);
    assert!(!screen.can_capture());
    assert_eq!(screen.label(), "Confused");
    assert_eq!(
        controller.configure_session(None).await,
        Err(CameraError::PermissionDenied)
    );
}

#[tokio::test]
async fn test_missing_model_file_reports_load_failure() {
    use emotrack::app::frame_processor::ModelSettings;
    use emotrack::constants::InputLayout;

    let classifier = EmotionClassifier::new(ModelSettings {
        path: "/nonexistent/emotion.onnx".into(),
        labels: vec!["Happy".to_string()],
        layout: InputLayout::Nchw,
    });
    let frame = Arc::new(CameraFrame::from_rgba(4, 4, vec![0; 64]));

    let classification = classifier.classify(7, frame).await;
    assert_eq!(classification.capture_id, 7);
    assert_eq!(classification.label, "Unknown");
    assert!(classification.error.is_some());
}
