// SPDX-License-Identifier: MPL-2.0

//! Frame processor module for captured frame analysis
//!
//! Captured frames are handed to the emotion classifier, which runs the
//! ONNX model off the UI thread and reports a ranked result.

pub mod model;
pub mod tasks;
pub mod types;

pub use model::{EmotionModel, OnnxEmotionModel, rank};
pub use tasks::{EmotionClassifier, ModelSettings};
pub use types::{Classification, Prediction};
