// SPDX-License-Identifier: GPL-3.0-only

//! System handlers
//!
//! Handles URLs, the context drawer and settings changes.

use crate::app::frame_processor::{EmotionClassifier, ModelSettings};
use crate::app::mood::Emotion;
use crate::app::state::{AppModel, ContextPage, Message};
use crate::config::{AppTheme, Config};
use crate::constants::{InputLayout, model};
use crate::fl;
use cosmic::Task;
use cosmic::cosmic_config::CosmicConfigEntry;
use std::path::PathBuf;
use tracing::{error, info};

impl AppModel {
    // =========================================================================
    // UI Handlers
    // =========================================================================

    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(err) = open::that_detached(&url) {
            error!(url = %url, error = %err, "Failed to open URL");
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    // =========================================================================
    // Settings Handlers
    // =========================================================================

    pub(crate) fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        info!("UpdateConfig received");
        let model_changed = ModelSettings::from(&config) != ModelSettings::from(&self.config);
        let theme_changed = config.app_theme != self.config.app_theme;

        self.config = config;
        self.mood
            .store_mut()
            .set_default(self.config.default_emotion().to_string());
        if model_changed {
            self.reload_classifier();
        }

        if theme_changed {
            cosmic::command::set_theme(self.config.app_theme.theme())
        } else {
            Task::none()
        }
    }

    pub(crate) fn handle_set_app_theme(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let Some(&app_theme) = AppTheme::ALL.get(index) else {
            return Task::none();
        };

        info!(?app_theme, "Setting application theme");
        self.config.app_theme = app_theme;
        self.save_config("app theme");

        cosmic::command::set_theme(app_theme.theme())
    }

    pub(crate) fn handle_toggle_mirror_preview(&mut self) -> Task<cosmic::Action<Message>> {
        self.config.mirror_preview = !self.config.mirror_preview;
        info!(enabled = self.config.mirror_preview, "Toggled mirror preview");
        self.save_config("mirror preview");
        Task::none()
    }

    pub(crate) fn handle_set_input_layout(
        &mut self,
        index: usize,
    ) -> Task<cosmic::Action<Message>> {
        let Some(&layout) = InputLayout::ALL.get(index) else {
            return Task::none();
        };
        if layout == self.config.model_input_layout {
            return Task::none();
        }

        info!(layout = layout.display_name(), "Setting model input layout");
        self.config.model_input_layout = layout;
        self.save_config("model input layout");
        self.reload_classifier();
        Task::none()
    }

    pub(crate) fn handle_pick_model_file(&self) -> Task<cosmic::Action<Message>> {
        let title = fl!("settings-model-pick-title");
        Task::perform(
            async move {
                rfd::AsyncFileDialog::new()
                    .set_title(title)
                    .add_filter("ONNX", &["onnx"])
                    .pick_file()
                    .await
                    .map(|handle| handle.path().to_path_buf())
            },
            |path| cosmic::Action::App(Message::ModelFilePicked(path)),
        )
    }

    pub(crate) fn handle_model_file_picked(
        &mut self,
        path: Option<PathBuf>,
    ) -> Task<cosmic::Action<Message>> {
        let Some(path) = path else {
            return Task::none();
        };

        info!(path = %path.display(), "Emotion model selected");
        self.config.model_path = path.to_string_lossy().into_owned();
        self.save_config("model path");
        self.reload_classifier();
        Task::none()
    }

    pub(crate) fn handle_reset_model_path(&mut self) -> Task<cosmic::Action<Message>> {
        self.config.model_path = model::default_model_path();
        info!(path = %self.config.model_path, "Reset model path");
        self.save_config("model path");
        self.reload_classifier();
        Task::none()
    }

    /// Debug builds only
    pub(crate) fn handle_override_emotion(
        &mut self,
        index: usize,
    ) -> Task<cosmic::Action<Message>> {
        if !cfg!(debug_assertions) {
            return Task::none();
        }
        if let Some(emotion) = Emotion::ALL.get(index) {
            info!(label = emotion.label(), "Overriding emotion label");
            self.mood.override_label(emotion.label());
        }
        Task::none()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn save_config(&self, what: &str) {
        if let Some(handler) = self.config_handler.as_ref()
            && let Err(err) = self.config.write_entry(handler)
        {
            error!(?err, setting = what, "Failed to save setting");
        }
    }

    /// Swap in a classifier for the current model settings; the model loads on next use
    fn reload_classifier(&mut self) {
        self.classifier = EmotionClassifier::new(ModelSettings::from(&self.config));
    }
}
