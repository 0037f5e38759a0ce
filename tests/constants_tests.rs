// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use emotrack::constants::{InputLayout, model, mood, timing};

#[test]
fn test_fer2013_label_order() {
    assert_eq!(
        model::FER2013_LABELS,
        &["Angry", "Disgust", "Fear", "Happy", "Sad", "Surprise", "Neutral"]
    );
}

#[test]
fn test_input_layouts() {
    assert_eq!(InputLayout::ALL.len(), 2);
    for layout in InputLayout::ALL {
        assert!(!layout.display_name().is_empty());
        let shape = layout.shape(model::INPUT_SIZE as usize, model::INPUT_SIZE as usize);
        assert_eq!(shape.iter().product::<usize>(), 48 * 48);
    }
}

#[test]
fn test_mood_defaults() {
    assert_eq!(mood::DEFAULT_EMOTION, "Confused");
    assert_eq!(mood::UNKNOWN_EMOTION, "Unknown");
}

#[test]
fn test_capture_timeout_is_bounded() {
    assert!(timing::CAPTURE_TIMEOUT.as_secs() >= 1);
    assert!(timing::CAPTURE_TIMEOUT.as_secs() <= 10);
}
