// SPDX-License-Identifier: GPL-3.0-only

//! Application state types

use crate::app::frame_processor::{Classification, EmotionClassifier};
use crate::app::mood::MoodScreen;
use crate::backends::camera::{CameraDevice, CameraFrame, CaptureController, FrameSender};
use crate::config::Config;
use crate::errors::CameraError;
use cosmic::cosmic_config;
use cosmic::widget::{self, about::About, nav_bar};
use std::path::PathBuf;
use std::sync::Arc;

/// Navigation destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    /// Live camera, capture and mood result
    #[default]
    Mood,
    Journal,
    History,
    Settings,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Mood, Page::Journal, Page::History, Page::Settings];

    pub fn icon_name(&self) -> &'static str {
        match self {
            Page::Mood => "face-smile-symbolic",
            Page::Journal => "accessories-text-editor-symbolic",
            Page::History => "document-open-recent-symbolic",
            Page::Settings => "preferences-system-symbolic",
        }
    }
}

/// The context page to display in the context drawer
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
}

/// What to do with a session setup answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionReadyAction {
    /// Belongs to the running activation
    Apply,
    /// From an earlier activation while a newer one is live
    Ignore,
    /// Came up after the page was left; release the camera
    Teardown,
}

/// Mood page activations
///
/// Every activation gets a new generation. Async answers carry the generation
/// they were started under and are dropped once it is no longer current.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionTracker {
    generation: u64,
    active: bool,
}

impl SessionTracker {
    /// Start a new activation and return its generation
    pub fn activate(&mut self) -> u64 {
        self.generation += 1;
        self.active = true;
        self.generation
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.active && generation == self.generation
    }

    pub fn on_session_ready(&self, generation: u64, came_up: bool) -> SessionReadyAction {
        if self.is_current(generation) {
            SessionReadyAction::Apply
        } else if came_up && !self.active {
            SessionReadyAction::Teardown
        } else {
            SessionReadyAction::Ignore
        }
    }
}

/// Main application state
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined
    pub context_page: ContextPage,
    /// About page information
    pub about: About,
    /// Sidebar navigation
    pub nav: nav_bar::Model,
    /// Configuration data that persists between application runs
    pub config: Config,
    /// Config handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,

    /// Camera session owner
    pub controller: CaptureController,
    /// Emotion model wrapper
    pub classifier: EmotionClassifier,
    /// Mood page state machine and label store
    pub mood: MoodScreen,

    /// Page activation; its generation keys the preview subscription
    pub session: SessionTracker,
    /// Sender handed to the session's appsink
    pub preview_sender: Option<FrameSender>,
    /// Configure once both the permission answer and the preview channel are in
    pub session_setup_pending: bool,
    /// Latest preview frame ready for display (already mirrored if enabled)
    pub preview_handle: Option<widget::image::Handle>,
    /// Held still frame for display
    pub captured_handle: Option<widget::image::Handle>,
    /// When the last successful classification finished
    pub last_classification: Option<Classification>,

    // ===== Dropdown options =====
    pub theme_dropdown_options: Vec<String>,
    pub layout_dropdown_options: Vec<String>,
    pub emotion_dropdown_options: Vec<String>,
}

/// Messages emitted by the application and its widgets
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    LaunchUrl(String),
    ToggleContextPage(ContextPage),

    // ===== Session =====
    /// Preview subscription created its channel
    PreviewChannel(u64, FrameSender),
    PreviewFrame(u64, Arc<CameraFrame>),
    AuthorizationResolved(u64, bool),
    /// Session configured and started
    SessionReady(u64, Result<CameraDevice, CameraError>),
    /// Session resumed after clear
    SessionResumed(Result<(), CameraError>),

    // ===== Capture =====
    Capture,
    PhotoCaptured(u64, Result<Arc<CameraFrame>, CameraError>),
    Classified(Classification),
    Clear,

    // ===== Settings =====
    UpdateConfig(Config),
    SetAppTheme(usize),
    ToggleMirrorPreview,
    SetInputLayout(usize),
    PickModelFile,
    ModelFilePicked(Option<PathBuf>),
    ResetModelPath,
    /// Debug builds only: set the label without classification
    OverrideEmotion(usize),

    Noop,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_authorization_is_dropped() {
        let mut session = SessionTracker::default();
        let first = session.activate();
        let second = session.activate();

        assert!(!session.is_current(first));
        assert!(session.is_current(second));

        session.deactivate();
        assert!(!session.is_current(second));
    }

    #[test]
    fn test_session_ready_after_leaving_is_torn_down() {
        let mut session = SessionTracker::default();
        let generation = session.activate();
        session.deactivate();

        assert_eq!(
            session.on_session_ready(generation, true),
            SessionReadyAction::Teardown
        );
        // A failed setup has nothing to release
        assert_eq!(
            session.on_session_ready(generation, false),
            SessionReadyAction::Ignore
        );
    }

    #[test]
    fn test_session_ready_after_reactivation_is_ignored() {
        let mut session = SessionTracker::default();
        let first = session.activate();
        session.deactivate();
        let second = session.activate();

        assert_eq!(
            session.on_session_ready(first, true),
            SessionReadyAction::Ignore
        );
        assert_eq!(
            session.on_session_ready(second, true),
            SessionReadyAction::Apply
        );
    }
}
