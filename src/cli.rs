// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! This module provides command-line functionality for:
//! - Listing available cameras
//! - Classifying an image file
//! - Taking one photo and classifying it

use emotrack::app::frame_processor::{EmotionClassifier, ModelSettings, Prediction};
use emotrack::app::mood::color_for;
use emotrack::backends::camera::CameraFrame;
use emotrack::backends::camera::CaptureController;
use emotrack::backends::camera::pipewire::enumerate_cameras;
use emotrack::backends::permission::GrantedAuthorizer;
use emotrack::config::Config;
use emotrack::errors::{AppResult, CameraError, ClassifyError};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// List all available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize GStreamer
    gstreamer::init()?;

    let cameras = enumerate_cameras();
    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, camera.name);
        println!("      {} {}", camera.api, camera.path);
        println!();
    }

    Ok(())
}

/// Classify the emotion in an image file
pub fn classify_image(image: PathBuf, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (_, config) = Config::load();
    let classifier = EmotionClassifier::new(ModelSettings::from(&config));

    let ranked = classify_file(&image, &classifier)?;
    print_ranked(&ranked, json)
}

fn classify_file(path: &Path, classifier: &EmotionClassifier) -> AppResult<Vec<Prediction>> {
    let decoded = image::open(path).map_err(ClassifyError::from)?;
    Ok(classifier.classify_image(&decoded)?)
}

/// Take one photo using the specified camera and print the detected mood
pub fn snap(camera_index: usize) -> Result<(), Box<dyn std::error::Error>> {
    // Initialize GStreamer
    gstreamer::init()?;

    let cameras = enumerate_cameras();
    if cameras.is_empty() {
        return Err("No cameras found".into());
    }
    let camera = cameras.get(camera_index).ok_or_else(|| {
        format!(
            "Camera index {} out of range (0-{})",
            camera_index,
            cameras.len() - 1
        )
    })?;
    println!("Using camera: {}", camera.name);

    let (_, config) = Config::load();
    let classifier = EmotionClassifier::new(ModelSettings::from(&config));
    let controller = CaptureController::new(Arc::new(GrantedAuthorizer));
    controller.set_preferred_device(Some(camera.path.clone()));

    let rt = tokio::runtime::Runtime::new()?;
    let frame = rt.block_on(capture_one(&controller))?;

    println!("Captured {}x{}", frame.width, frame.height);
    let ranked = classifier.classify_frame(&frame)?;
    print_ranked(&ranked, false)
}

async fn capture_one(controller: &CaptureController) -> AppResult<CameraFrame> {
    if !controller.request_authorization().await {
        return Err(CameraError::PermissionDenied.into());
    }
    controller.configure_session(None).await?;
    controller.start().await?;

    println!("Capturing...");
    let frame = controller.capture_photo().await;
    controller.teardown().await;
    Ok(frame?)
}

fn print_ranked(ranked: &[Prediction], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let top = ranked.first().ok_or("The emotion model returned no result")?;

    if json {
        let scores: Vec<_> = ranked
            .iter()
            .map(|p| serde_json::json!({ "label": p.label, "confidence": p.confidence }))
            .collect();
        let output = serde_json::json!({
            "label": top.label,
            "color": color_for(&top.label).name(),
            "confidence": top.confidence,
            "scores": scores,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "Mood: {} ({}, {:.1}%)",
        top.label,
        color_for(&top.label).name(),
        top.confidence * 100.0
    );
    for prediction in ranked.iter().skip(1) {
        println!(
            "      {:<10} {:.1}%",
            prediction.label,
            prediction.confidence * 100.0
        );
    }
    Ok(())
}
