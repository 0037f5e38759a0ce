// SPDX-License-Identifier: MPL-2.0

//! Types for emotion classification results

use crate::app::mood::Emotion;
use crate::constants::mood;
use crate::errors::ClassifyError;
use chrono::{DateTime, Local};

/// One scored class from the model output
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
}

impl Prediction {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// Outcome of classifying one captured frame
///
/// Failures are folded in: the label becomes "Unknown" and `error` carries
/// the message to show.
#[derive(Debug, Clone)]
pub struct Classification {
    /// Capture request this result belongs to
    pub capture_id: u64,
    /// Top label, or "Unknown" on failure
    pub label: String,
    /// Confidence of the top label
    pub confidence: Option<f32>,
    /// Full ranking, best first
    pub predictions: Vec<Prediction>,
    pub error: Option<String>,
    pub classified_at: DateTime<Local>,
}

impl Classification {
    /// Build from ranked model output
    pub fn from_ranked(capture_id: u64, ranked: Result<Vec<Prediction>, ClassifyError>) -> Self {
        let ranked = ranked.and_then(|predictions| match predictions.first() {
            None => Err(ClassifyError::EmptyResult),
            Some(top) if Emotion::from_label(&top.label).is_none() => Err(
                ClassifyError::InferenceFailed(format!("unrecognized label \"{}\"", top.label)),
            ),
            Some(_) => Ok(predictions),
        });

        match ranked {
            Ok(predictions) => Self {
                capture_id,
                label: predictions[0].label.clone(),
                confidence: Some(predictions[0].confidence),
                predictions,
                error: None,
                classified_at: Local::now(),
            },
            Err(e) => Self {
                capture_id,
                label: mood::UNKNOWN_EMOTION.to_string(),
                confidence: None,
                predictions: Vec::new(),
                error: Some(e.to_string()),
                classified_at: Local::now(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
