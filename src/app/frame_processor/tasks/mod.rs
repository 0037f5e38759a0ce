// SPDX-License-Identifier: GPL-3.0-only

//! Frame processing tasks

pub mod emotion_classifier;

pub use emotion_classifier::{EmotionClassifier, ModelSettings};
