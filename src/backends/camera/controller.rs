// SPDX-License-Identifier: GPL-3.0-only

//! Capture session controller
//!
//! The controller provides:
//! - Camera authorization (query, then prompt when undetermined)
//! - Session lifecycle (configure, start, stop, teardown)
//! - One-shot photo capture bounded by a timeout
//!
//! Backend calls can block on GStreamer state changes, so every async entry
//! point moves them onto a blocking worker.

use super::types::*;
use super::{CameraBackend, get_backend};
use crate::backends::permission::{AuthorizationStatus, CameraAuthorizer};
use crate::constants::timing;
use crate::errors::CameraError;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// Lifecycle of the capture session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No permission yet, or the session was torn down
    #[default]
    Uninitialized,
    /// Permission granted, device may be attached but not running
    Authorized,
    /// Frames are flowing
    Running,
    /// Paused after a capture or an explicit stop
    Stopped,
}

/// Internal controller state
struct ControllerState {
    backend: Box<dyn CameraBackend>,
    session: SessionState,
    /// Device path to prefer when configuring
    preferred_path: Option<String>,
    configured: bool,
}

/// Capture controller
///
/// Cheap to clone; all clones drive the same session.
#[derive(Clone)]
pub struct CaptureController {
    state: Arc<Mutex<ControllerState>>,
    authorizer: Arc<dyn CameraAuthorizer>,
}

impl std::fmt::Debug for CaptureController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureController")
            .field("session", &self.session_state())
            .finish()
    }
}

impl CaptureController {
    /// Controller over the platform backend
    pub fn new(authorizer: Arc<dyn CameraAuthorizer>) -> Self {
        Self::with_backend(get_backend(), authorizer)
    }

    pub fn with_backend(
        backend: Box<dyn CameraBackend>,
        authorizer: Arc<dyn CameraAuthorizer>,
    ) -> Self {
        let state = ControllerState {
            backend,
            session: SessionState::Uninitialized,
            preferred_path: None,
            configured: false,
        };

        Self {
            state: Arc::new(Mutex::new(state)),
            authorizer,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn session_state(&self) -> SessionState {
        self.lock().session
    }

    /// Prefer this device path on the next `configure_session`
    pub fn set_preferred_device(&self, path: Option<String>) {
        self.lock().preferred_path = path.filter(|p| !p.is_empty());
    }

    pub fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        self.lock().backend.enumerate_cameras()
    }

    pub fn current_device(&self) -> Option<CameraDevice> {
        self.lock().backend.current_device().cloned()
    }

    /// Check camera permission, prompting the user when it is undetermined
    pub async fn request_authorization(&self) -> bool {
        let granted = match self.authorizer.status().await {
            AuthorizationStatus::Authorized => true,
            AuthorizationStatus::Denied => false,
            AuthorizationStatus::NotDetermined => self.authorizer.request().await,
        };

        let mut state = self.lock();
        if granted {
            if state.session == SessionState::Uninitialized {
                state.session = SessionState::Authorized;
            }
        } else {
            state.session = SessionState::Uninitialized;
        }
        info!(granted, session = ?state.session, "Camera authorization resolved");
        granted
    }

    /// Attach the preferred (or first) camera and the photo output
    pub async fn configure_session(
        &self,
        preview: Option<FrameSender>,
    ) -> Result<CameraDevice, CameraError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.configure_blocking(preview))
            .await
            .map_err(|e| CameraError::SessionSetupFailed(e.to_string()))?
    }

    fn configure_blocking(
        &self,
        preview: Option<FrameSender>,
    ) -> Result<CameraDevice, CameraError> {
        let mut state = self.lock();
        if state.session == SessionState::Uninitialized {
            return Err(CameraError::PermissionDenied);
        }

        let cameras = state.backend.enumerate_cameras();
        let device = select_device(&cameras, state.preferred_path.as_deref())
            .ok_or(CameraError::NoCameraDevice)?;
        info!(device = %device.name, path = %device.path, "Configuring capture session");

        state.configured = false;
        state
            .backend
            .attach_input(&device)
            .map_err(|e| CameraError::InputAttachFailed(e.to_string()))?;
        state
            .backend
            .attach_output(preview)
            .map_err(|e| CameraError::OutputAttachFailed(e.to_string()))?;

        state.configured = true;
        state.session = SessionState::Authorized;
        Ok(device)
    }

    /// Run the session; no-op when already running
    pub async fn start(&self) -> Result<(), CameraError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.set_running_blocking(true))
            .await
            .map_err(|e| CameraError::SessionSetupFailed(e.to_string()))?
    }

    /// Pause the session; no-op when not running
    pub async fn stop(&self) -> Result<(), CameraError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.set_running_blocking(false))
            .await
            .map_err(|e| CameraError::SessionSetupFailed(e.to_string()))?
    }

    fn set_running_blocking(&self, running: bool) -> Result<(), CameraError> {
        let mut state = self.lock();

        if running {
            if state.session == SessionState::Running {
                return Ok(());
            }
            if !state.configured {
                return Err(CameraError::SessionSetupFailed(
                    "session is not configured".to_string(),
                ));
            }
            state
                .backend
                .set_running(true)
                .map_err(|e| CameraError::SessionSetupFailed(e.to_string()))?;
            state.session = SessionState::Running;
            debug!("Capture session running");
        } else {
            if state.session != SessionState::Running {
                return Ok(());
            }
            state
                .backend
                .set_running(false)
                .map_err(|e| CameraError::SessionSetupFailed(e.to_string()))?;
            state.session = SessionState::Stopped;
            debug!("Capture session stopped");
        }
        Ok(())
    }

    /// Capture one still frame, then stop the live session
    pub async fn capture_photo(&self) -> Result<CameraFrame, CameraError> {
        let receiver = {
            let mut state = self.lock();
            if state.session != SessionState::Running {
                return Err(CameraError::CaptureFailed(
                    "session is not running".to_string(),
                ));
            }
            state.backend.capture_photo().map_err(|e| match e {
                BackendError::CaptureBusy => CameraError::CaptureInProgress,
                other => CameraError::CaptureFailed(other.to_string()),
            })?
        };

        let frame = match tokio::time::timeout(timing::CAPTURE_TIMEOUT, receiver).await {
            Ok(Ok(Ok(frame))) => frame,
            Ok(Ok(Err(e))) => return Err(CameraError::CaptureFailed(e.to_string())),
            Ok(Err(_)) => {
                return Err(CameraError::CaptureFailed(
                    "session closed before a frame arrived".to_string(),
                ));
            }
            Err(_) => {
                warn!(timeout = ?timing::CAPTURE_TIMEOUT, "Capture timed out");
                return Err(CameraError::CaptureFailed("timed out".to_string()));
            }
        };
        info!(width = frame.width, height = frame.height, "Photo captured");

        if let Err(e) = self.stop().await {
            warn!(error = %e, "Failed to stop session after capture");
        }
        Ok(frame)
    }

    /// Stop the session and release the device
    pub async fn teardown(&self) {
        let this = self.clone();
        let result = tokio::task::spawn_blocking(move || {
            let mut state = this.lock();
            state.configured = false;
            state.session = SessionState::Uninitialized;
            state.backend.shutdown()
        })
        .await;

        match result {
            Ok(Ok(())) => info!("Capture session torn down"),
            Ok(Err(e)) => warn!(error = %e, "Backend shutdown failed"),
            Err(e) => warn!(error = %e, "Teardown task failed"),
        }
    }
}

/// Preferred device when present, otherwise the first one
fn select_device(cameras: &[CameraDevice], preferred: Option<&str>) -> Option<CameraDevice> {
    preferred
        .and_then(|path| cameras.iter().find(|camera| camera.path == path))
        .or_else(|| cameras.first())
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::permission::GrantedAuthorizer;
    use futures::FutureExt;
    use futures::future::BoxFuture;

    struct DeniedAuthorizer;

    impl CameraAuthorizer for DeniedAuthorizer {
        fn status(&self) -> BoxFuture<'static, AuthorizationStatus> {
            futures::future::ready(AuthorizationStatus::NotDetermined).boxed()
        }

        fn request(&self) -> BoxFuture<'static, bool> {
            futures::future::ready(false).boxed()
        }
    }

    #[derive(Default)]
    struct FakeBackend {
        cameras: Vec<CameraDevice>,
        device: Option<CameraDevice>,
        running: bool,
        pending: Option<PhotoSender>,
        fail_output: bool,
        deliver: bool,
    }

    impl FakeBackend {
        fn with_cameras(paths: &[&str]) -> Self {
            Self {
                cameras: paths
                    .iter()
                    .map(|path| CameraDevice {
                        name: format!("Camera {}", path),
                        path: path.to_string(),
                        api: DeviceApi::V4l2,
                    })
                    .collect(),
                deliver: true,
                ..Default::default()
            }
        }
    }

    impl CameraBackend for FakeBackend {
        fn enumerate_cameras(&self) -> Vec<CameraDevice> {
            self.cameras.clone()
        }

        fn attach_input(&mut self, device: &CameraDevice) -> BackendResult<()> {
            self.device = Some(device.clone());
            Ok(())
        }

        fn attach_output(&mut self, _preview: Option<FrameSender>) -> BackendResult<()> {
            if self.fail_output {
                Err(BackendError::OutputFailed("caps".to_string()))
            } else {
                Ok(())
            }
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
            if self.pending.as_ref().is_some_and(|tx| !tx.is_closed()) {
                return Err(BackendError::CaptureBusy);
            }
            let (tx, rx) = tokio::sync::oneshot::channel();
            if self.deliver {
                let _ = tx.send(Ok(CameraFrame::from_rgba(2, 2, vec![128; 16])));
            } else {
                self.pending = Some(tx);
            }
            Ok(rx)
        }

        fn current_device(&self) -> Option<&CameraDevice> {
            self.device.as_ref()
        }
    }

    fn controller(backend: FakeBackend) -> CaptureController {
        CaptureController::with_backend(Box::new(backend), Arc::new(GrantedAuthorizer))
    }

    #[tokio::test]
    async fn test_denied_authorization_blocks_configuration() {
        let controller = CaptureController::with_backend(
            Box::new(FakeBackend::with_cameras(&["/dev/video0"])),
            Arc::new(DeniedAuthorizer),
        );

        assert!(!controller.request_authorization().await);
        assert_eq!(
            controller.configure_session(None).await,
            Err(CameraError::PermissionDenied)
        );
    }

    #[tokio::test]
    async fn test_no_camera_device() {
        let controller = controller(FakeBackend::with_cameras(&[]));
        assert!(controller.request_authorization().await);
        assert_eq!(
            controller.configure_session(None).await,
            Err(CameraError::NoCameraDevice)
        );
    }

    #[tokio::test]
    async fn test_output_attach_failure_is_reported() {
        let mut backend = FakeBackend::with_cameras(&["/dev/video0"]);
        backend.fail_output = true;
        let controller = controller(backend);
        controller.request_authorization().await;

        assert!(matches!(
            controller.configure_session(None).await,
            Err(CameraError::OutputAttachFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_preferred_device_is_used_when_present() {
        let controller = controller(FakeBackend::with_cameras(&["/dev/video0", "/dev/video2"]));
        controller.set_preferred_device(Some("/dev/video2".to_string()));
        controller.request_authorization().await;

        let device = controller.configure_session(None).await.unwrap();
        assert_eq!(device.path, "/dev/video2");

        controller.set_preferred_device(Some("/dev/video9".to_string()));
        let device = controller.configure_session(None).await.unwrap();
        assert_eq!(device.path, "/dev/video0");
    }

    #[tokio::test]
    async fn test_start_and_stop_are_idempotent() {
        let controller = controller(FakeBackend::with_cameras(&["/dev/video0"]));
        controller.request_authorization().await;
        controller.configure_session(None).await.unwrap();

        controller.start().await.unwrap();
        controller.start().await.unwrap();
        assert_eq!(controller.session_state(), SessionState::Running);

        controller.stop().await.unwrap();
        controller.stop().await.unwrap();
        assert_eq!(controller.session_state(), SessionState::Stopped);
    }

    #[tokio::test]
    async fn test_capture_stops_session() {
        let controller = controller(FakeBackend::with_cameras(&["/dev/video0"]));
        controller.request_authorization().await;
        controller.configure_session(None).await.unwrap();
        controller.start().await.unwrap();

        let frame = controller.capture_photo().await.unwrap();
        assert_eq!((frame.width, frame.height), (2, 2));
        assert_eq!(controller.session_state(), SessionState::Stopped);
    }

    #[tokio::test]
    async fn test_capture_requires_running_session() {
        let controller = controller(FakeBackend::with_cameras(&["/dev/video0"]));
        controller.request_authorization().await;
        controller.configure_session(None).await.unwrap();

        assert!(matches!(
            controller.capture_photo().await,
            Err(CameraError::CaptureFailed(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_capture_is_rejected() {
        let mut backend = FakeBackend::with_cameras(&["/dev/video0"]);
        backend.deliver = false;
        let controller = controller(backend);
        controller.request_authorization().await;
        controller.configure_session(None).await.unwrap();
        controller.start().await.unwrap();

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.capture_photo().await })
        };
        for _ in 0..4 {
            tokio::task::yield_now().await;
        }

        assert!(matches!(
            controller.capture_photo().await,
            Err(CameraError::CaptureInProgress)
        ));

        // The armed capture never yields a frame and runs into the timeout
        let first = first.await.unwrap();
        assert!(matches!(first, Err(CameraError::CaptureFailed(_))));
    }

    #[tokio::test]
    async fn test_teardown_resets_session() {
        let controller = controller(FakeBackend::with_cameras(&["/dev/video0"]));
        controller.request_authorization().await;
        controller.configure_session(None).await.unwrap();
        controller.start().await.unwrap();

        controller.teardown().await;
        assert_eq!(controller.session_state(), SessionState::Uninitialized);
        assert!(controller.current_device().is_none());
        assert!(controller.start().await.is_err());
    }
}
