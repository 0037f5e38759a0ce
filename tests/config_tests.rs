// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use emotrack::Config;
use emotrack::app::frame_processor::ModelSettings;
use emotrack::config::AppTheme;
use emotrack::constants::InputLayout;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert!(
        config.mirror_preview,
        "Mirror preview should be enabled by default"
    );
    assert_eq!(config.app_theme, AppTheme::System);
    assert!(config.last_camera_path.is_none());
}

#[test]
fn test_default_model_settings() {
    let config = Config::default();

    assert!(config.model_path.ends_with("emotion.onnx"));
    assert_eq!(config.model_labels.len(), 7);
    assert_eq!(config.model_input_layout, InputLayout::Nchw);

    let settings = ModelSettings::from(&config);
    assert_eq!(settings.labels, config.model_labels);
    assert_eq!(settings.layout, InputLayout::Nchw);
}

#[test]
fn test_default_emotion_is_confused() {
    let config = Config::default();
    assert_eq!(config.default_emotion(), "Confused");
}

#[test]
fn test_blank_default_emotion_falls_back() {
    let config = Config {
        default_emotion: "   ".to_string(),
        ..Default::default()
    };
    assert_eq!(config.default_emotion(), "Confused");

    let config = Config {
        default_emotion: " Neutral ".to_string(),
        ..Default::default()
    };
    assert_eq!(config.default_emotion(), "Neutral");
}

#[test]
fn test_default_emotion_outside_vocabulary_falls_back() {
    let config = Config {
        default_emotion: "bored".to_string(),
        ..Default::default()
    };
    assert_eq!(config.default_emotion(), "Confused");

    let config = Config {
        default_emotion: "sad".to_string(),
        ..Default::default()
    };
    assert_eq!(config.default_emotion(), "Sad");
}

#[test]
fn test_config_serde_round_trip() {
    let config = Config {
        app_theme: AppTheme::Dark,
        last_camera_path: Some("/dev/video2".to_string()),
        model_input_layout: InputLayout::Nhwc,
        ..Default::default()
    };

    let json = serde_json::to_string(&config).unwrap();
    let restored: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, config);
}
