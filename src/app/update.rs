// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! This module handles all application messages by routing them to focused handler methods.
//! The main `update()` function acts as a dispatcher, while specific handlers are implemented
//! in the `handlers` submodules organized by functional domain.
//!
//! # Handler Modules
//!
//! - `handlers::session`: Navigation, authorization, session setup, preview frames
//! - `handlers::capture`: Photo capture, classification results, clear
//! - `handlers::system`: URLs, context drawer, settings

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),

            // ===== Session =====
            Message::PreviewChannel(generation, sender) => {
                self.handle_preview_channel(generation, sender)
            }
            Message::PreviewFrame(generation, frame) => {
                self.handle_preview_frame(generation, frame)
            }
            Message::AuthorizationResolved(generation, granted) => {
                self.handle_authorization_resolved(generation, granted)
            }
            Message::SessionReady(generation, result) => {
                self.handle_session_ready(generation, result)
            }
            Message::SessionResumed(result) => self.handle_session_resumed(result),

            // ===== Capture =====
            Message::Capture => self.handle_capture(),
            Message::PhotoCaptured(capture_id, result) => {
                self.handle_photo_captured(capture_id, result)
            }
            Message::Classified(classification) => self.handle_classified(classification),
            Message::Clear => self.handle_clear(),

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::SetAppTheme(index) => self.handle_set_app_theme(index),
            Message::ToggleMirrorPreview => self.handle_toggle_mirror_preview(),
            Message::SetInputLayout(index) => self.handle_set_input_layout(index),
            Message::PickModelFile => self.handle_pick_model_file(),
            Message::ModelFilePicked(path) => self.handle_model_file_picked(path),
            Message::ResetModelPath => self.handle_reset_model_path(),
            Message::OverrideEmotion(index) => self.handle_override_emotion(index),

            Message::Noop => Task::none(),
        }
    }
}
