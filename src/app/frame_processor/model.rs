// SPDX-License-Identifier: GPL-3.0-only

//! Emotion model backed by an ONNX file

use super::types::Prediction;
use crate::app::mood::Emotion;
use crate::constants::{InputLayout, model};
use crate::errors::ClassifyError;
use image::GrayImage;
use std::path::Path;
use tracing::{debug, info};
use tract_onnx::prelude::*;

/// Anything that scores a square grayscale face image
pub trait EmotionModel: Send + Sync {
    /// Ranked predictions, best first
    fn predict(&self, input: &GrayImage) -> Result<Vec<Prediction>, ClassifyError>;

    /// Side length the input is resized to
    fn input_size(&self) -> u32 {
        model::INPUT_SIZE
    }
}

type OnnxPlan = TypedRunnableModel<TypedModel>;

/// Model loaded and optimized with tract
pub struct OnnxEmotionModel {
    plan: OnnxPlan,
    labels: Vec<String>,
    layout: InputLayout,
}

impl std::fmt::Debug for OnnxEmotionModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmotionModel")
            .field("labels", &self.labels)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

impl OnnxEmotionModel {
    pub fn load(
        path: &Path,
        labels: Vec<String>,
        layout: InputLayout,
    ) -> Result<Self, ClassifyError> {
        if labels.is_empty() {
            return Err(ClassifyError::ModelLoadFailed(
                "no class labels configured".to_string(),
            ));
        }
        check_labels(&labels)?;
        if !path.exists() {
            return Err(ClassifyError::ModelLoadFailed(format!(
                "{} does not exist",
                path.display()
            )));
        }

        let size = model::INPUT_SIZE as usize;
        let shape = layout.shape(size, size);
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|m| m.with_input_fact(0, f32::fact(shape).into()))
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| ClassifyError::ModelLoadFailed(e.to_string()))?;

        info!(
            path = %path.display(),
            labels = labels.len(),
            layout = layout.display_name(),
            "Emotion model loaded"
        );
        Ok(Self {
            plan,
            labels,
            layout,
        })
    }
}

impl EmotionModel for OnnxEmotionModel {
    fn predict(&self, input: &GrayImage) -> Result<Vec<Prediction>, ClassifyError> {
        let (width, height) = input.dimensions();
        // Single channel: NCHW and NHWC share the same memory order
        let pixels: Vec<f32> = input
            .as_raw()
            .iter()
            .copied()
            .map(model::normalize_pixel)
            .collect();
        let shape = self.layout.shape(width as usize, height as usize);
        let tensor = Tensor::from_shape(&shape, &pixels)
            .map_err(|e| ClassifyError::InferenceFailed(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| ClassifyError::InferenceFailed(e.to_string()))?;
        let output = outputs.first().ok_or(ClassifyError::EmptyResult)?;
        let scores: Vec<f32> = output
            .to_array_view::<f32>()
            .map_err(|e| ClassifyError::InferenceFailed(e.to_string()))?
            .iter()
            .copied()
            .collect();
        debug!(scores = ?scores, "Model output");

        rank(&scores, &self.labels)
    }
}

/// Every class label must name an emotion the mood screen can present
pub fn check_labels(labels: &[String]) -> Result<(), ClassifyError> {
    match labels.iter().find(|l| Emotion::from_label(l).is_none()) {
        Some(label) => Err(ClassifyError::ModelLoadFailed(format!(
            "unrecognized class label \"{}\"",
            label
        ))),
        None => Ok(()),
    }
}

/// Pair scores with labels and sort best first.
///
/// Raw logits are turned into probabilities with a softmax.
pub fn rank(scores: &[f32], labels: &[String]) -> Result<Vec<Prediction>, ClassifyError> {
    if scores.is_empty() {
        return Err(ClassifyError::EmptyResult);
    }
    if scores.len() != labels.len() {
        return Err(ClassifyError::InferenceFailed(format!(
            "model produced {} scores for {} labels",
            scores.len(),
            labels.len()
        )));
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(ClassifyError::InferenceFailed(
            "model produced non-finite scores".to_string(),
        ));
    }

    let probabilities = if is_distribution(scores) {
        scores.to_vec()
    } else {
        softmax(scores)
    };

    let mut ranked: Vec<Prediction> = labels
        .iter()
        .zip(probabilities)
        .map(|(label, confidence)| Prediction::new(label.clone(), confidence))
        .collect();
    ranked.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    Ok(ranked)
}

fn is_distribution(scores: &[f32]) -> bool {
    let sum: f32 = scores.iter().sum();
    scores.iter().all(|s| (0.0..=1.0).contains(s)) && (sum - 1.0).abs() < 1e-3
}

fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
