// SPDX-License-Identifier: GPL-3.0-only

use crate::app::mood::Emotion;
use crate::constants::{InputLayout, app_info, model, mood};
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow system theme (dark or light based on system setting)
    #[default]
    System,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl AppTheme {
    pub const ALL: [AppTheme; 3] = [AppTheme::System, AppTheme::Dark, AppTheme::Light];

    /// Get the COSMIC theme for this app theme preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }
}

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// Last used camera device path
    pub last_camera_path: Option<String>,
    /// Mirror camera preview horizontally (selfie mode)
    pub mirror_preview: bool,
    /// Path to the ONNX emotion model
    pub model_path: String,
    /// Class labels in the order of the model's output scores
    pub model_labels: Vec<String>,
    /// Input tensor layout of the model
    pub model_input_layout: InputLayout,
    /// Label shown before a capture and after "clear"
    pub default_emotion: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            last_camera_path: None,
            mirror_preview: true,
            model_path: model::default_model_path(),
            model_labels: model::FER2013_LABELS
                .iter()
                .map(|label| label.to_string())
                .collect(),
            model_input_layout: InputLayout::default(),
            default_emotion: mood::DEFAULT_EMOTION.to_string(),
        }
    }
}

impl Config {
    /// Load the persisted config, falling back to defaults for missing or invalid entries
    pub fn load() -> (Option<cosmic_config::Config>, Self) {
        match cosmic_config::Config::new(app_info::APP_ID, Self::VERSION) {
            Ok(handler) => {
                let config = match Self::get_entry(&handler) {
                    Ok(config) => config,
                    Err((errors, config)) => {
                        for why in errors {
                            tracing::warn!(error = %why, "Config entry invalid, using default");
                        }
                        config
                    }
                };
                (Some(handler), config)
            }
            Err(why) => {
                tracing::error!(error = %why, "Failed to open config");
                (None, Self::default())
            }
        }
    }

    /// Label shown before the first result and after a clear
    ///
    /// The label always comes from the emotion vocabulary, so an empty
    /// default is not allowed: blank or unrecognized values fall back to
    /// "Confused".
    pub fn default_emotion(&self) -> &'static str {
        Emotion::from_label(&self.default_emotion)
            .map_or(mood::DEFAULT_EMOTION, |emotion| emotion.label())
    }
}
