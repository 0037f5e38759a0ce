// SPDX-License-Identifier: GPL-3.0-only

//! Emotion classification task
//!
//! Converts a captured frame to a centered square grayscale crop at the
//! model's input size and runs one inference on a blocking worker. The model
//! is loaded on first use; a load failure is reported like any other
//! classification failure and retried on the next capture.

use crate::app::frame_processor::model::{EmotionModel, OnnxEmotionModel};
use crate::app::frame_processor::types::{Classification, Prediction};
use crate::backends::camera::types::CameraFrame;
use crate::config::Config;
use crate::constants::InputLayout;
use crate::errors::ClassifyError;
use image::{DynamicImage, GrayImage, imageops};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Where to load the model from
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub path: PathBuf,
    pub labels: Vec<String>,
    pub layout: InputLayout,
}

impl From<&Config> for ModelSettings {
    fn from(config: &Config) -> Self {
        Self {
            path: PathBuf::from(&config.model_path),
            labels: config.model_labels.clone(),
            layout: config.model_input_layout,
        }
    }
}

/// Emotion classifier
///
/// Clones share the loaded model.
#[derive(Clone)]
pub struct EmotionClassifier {
    settings: Option<ModelSettings>,
    model: Arc<Mutex<Option<Arc<dyn EmotionModel>>>>,
}

impl EmotionClassifier {
    /// Classifier that loads its model lazily from `settings`
    pub fn new(settings: ModelSettings) -> Self {
        Self {
            settings: Some(settings),
            model: Arc::new(Mutex::new(None)),
        }
    }

    /// Classifier over an already constructed model
    pub fn with_model(model: Arc<dyn EmotionModel>) -> Self {
        Self {
            settings: None,
            model: Arc::new(Mutex::new(Some(model))),
        }
    }

    /// Classify a captured frame
    ///
    /// Never fails: errors end up in the returned classification.
    pub async fn classify(&self, capture_id: u64, frame: Arc<CameraFrame>) -> Classification {
        let classifier = self.clone();
        let ranked = tokio::task::spawn_blocking(move || classifier.classify_frame(&frame))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Classification task panicked");
                Err(ClassifyError::InferenceFailed(e.to_string()))
            });

        if let Err(e) = &ranked {
            warn!(capture_id, error = %e, "Classification failed");
        }
        Classification::from_ranked(capture_id, ranked)
    }

    /// Synchronous classification of a frame
    pub fn classify_frame(&self, frame: &CameraFrame) -> Result<Vec<Prediction>, ClassifyError> {
        let model = self.model()?;
        let start = std::time::Instant::now();
        let input = preprocess(frame, model.input_size())?;
        let ranked = model.predict(&input)?;
        debug!(
            elapsed_ms = start.elapsed().as_millis(),
            top = ?ranked.first(),
            "Classification complete"
        );
        Ok(ranked)
    }

    /// Synchronous classification of a decoded image file
    pub fn classify_image(&self, image: &DynamicImage) -> Result<Vec<Prediction>, ClassifyError> {
        let rgba = image.to_rgba8();
        let frame = CameraFrame::from_rgba(rgba.width(), rgba.height(), rgba.into_raw());
        self.classify_frame(&frame)
    }

    fn model(&self) -> Result<Arc<dyn EmotionModel>, ClassifyError> {
        let mut cached = self.model.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(model) = cached.as_ref() {
            return Ok(Arc::clone(model));
        }

        let settings = self.settings.as_ref().ok_or_else(|| {
            ClassifyError::ModelLoadFailed("no model configured".to_string())
        })?;
        let model: Arc<dyn EmotionModel> = Arc::new(OnnxEmotionModel::load(
            &settings.path,
            settings.labels.clone(),
            settings.layout,
        )?);
        *cached = Some(Arc::clone(&model));
        Ok(model)
    }
}

/// Centered square grayscale crop resized to `size`x`size`
pub fn preprocess(frame: &CameraFrame, size: u32) -> Result<GrayImage, ClassifyError> {
    let rgba = frame.to_rgba_image()?;
    let gray = DynamicImage::ImageRgba8(rgba).to_luma8();

    let (width, height) = gray.dimensions();
    let side = width.min(height);
    let square = imageops::crop_imm(&gray, (width - side) / 2, (height - side) / 2, side, side)
        .to_image();

    Ok(imageops::resize(
        &square,
        size,
        size,
        imageops::FilterType::Triangle,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedModel(Vec<Prediction>);

    impl EmotionModel for FixedModel {
        fn predict(&self, input: &GrayImage) -> Result<Vec<Prediction>, ClassifyError> {
            assert_eq!(input.dimensions(), (48, 48));
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_preprocess_crops_to_square() {
        // Left half black, right half white, 8x4
        let mut pixels = Vec::new();
        for _y in 0..4 {
            for x in 0..8 {
                let v = if x < 4 { 0 } else { 255 };
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }
        let frame = CameraFrame::from_rgba(8, 4, pixels);

        let input = preprocess(&frame, 2).unwrap();
        assert_eq!(input.dimensions(), (2, 2));
        // The centered crop spans columns 2..6, so both halves survive
        assert!(input.get_pixel(0, 0)[0] < 128);
        assert!(input.get_pixel(1, 0)[0] > 128);
    }

    #[test]
    fn test_preprocess_rejects_broken_frame() {
        let frame = CameraFrame {
            width: 10,
            height: 10,
            data: Arc::from(vec![0u8; 8]),
            stride: 40,
            captured_at: std::time::Instant::now(),
        };
        assert!(matches!(
            preprocess(&frame, 48),
            Err(ClassifyError::ImageDecodeFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_classify_returns_top_label() {
        let classifier = EmotionClassifier::with_model(Arc::new(FixedModel(vec![
            Prediction::new("happy", 0.91),
            Prediction::new("neutral", 0.05),
        ])));
        let frame = Arc::new(CameraFrame::from_rgba(64, 64, vec![200; 64 * 64 * 4]));

        let classification = classifier.classify(7, frame).await;
        assert_eq!(classification.capture_id, 7);
        assert_eq!(classification.label, "happy");
        assert!(classification.error.is_none());
    }

    #[tokio::test]
    async fn test_missing_model_yields_unknown() {
        let classifier = EmotionClassifier::new(ModelSettings {
            path: PathBuf::from("/nonexistent/emotion.onnx"),
            labels: vec!["happy".to_string()],
            layout: InputLayout::Nchw,
        });
        let frame = Arc::new(CameraFrame::from_rgba(4, 4, vec![0; 64]));

        let classification = classifier.classify(1, frame).await;
        assert_eq!(classification.label, "Unknown");
        assert!(classification.error.is_some());
    }
}
