// SPDX-License-Identifier: MPL-2.0

//! Error types for the mood tracker
//!
//! Every error here is terminal for the operation that raised it but never for the
//! process: the UI shows the `Display` text and stays interactive.

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    /// Camera permission, session and capture errors
    Camera(CameraError),
    /// Image decoding and inference errors
    Classify(ClassifyError),
    /// Generic error with message
    Other(String),
}

/// Capture Controller errors
#[derive(Debug, Clone, PartialEq)]
pub enum CameraError {
    /// The user (or the sandbox) refused camera access
    PermissionDenied,
    /// No video source device is present
    NoCameraDevice,
    /// The device could not be opened as a pipeline source
    InputAttachFailed(String),
    /// The photo/preview output could not be linked to the source
    OutputAttachFailed(String),
    /// Any other failure while bringing the session up
    SessionSetupFailed(String),
    /// The capture request produced no frame
    CaptureFailed(String),
    /// A capture is already pending
    CaptureInProgress,
}

/// Classifier Adapter errors
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifyError {
    /// Frame bytes could not be turned into an image
    ImageDecodeFailed(String),
    /// The model file could not be read or compiled
    ModelLoadFailed(String),
    /// Running the model failed
    InferenceFailed(String),
    /// The model ran but produced no scores
    EmptyResult,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "{}", e),
            AppError::Classify(e) => write!(f, "{}", e),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::PermissionDenied => write!(
                f,
                "Camera access denied. Please allow camera access in your privacy settings."
            ),
            CameraError::NoCameraDevice => write!(f, "No camera available."),
            CameraError::InputAttachFailed(msg) => {
                write!(f, "Could not add camera input to session: {}", msg)
            }
            CameraError::OutputAttachFailed(msg) => {
                write!(f, "Could not add photo output to session: {}", msg)
            }
            CameraError::SessionSetupFailed(msg) => {
                write!(f, "Failed to set up camera: {}", msg)
            }
            CameraError::CaptureFailed(msg) => write!(f, "Failed to capture photo: {}", msg),
            CameraError::CaptureInProgress => write!(f, "A photo is already being captured."),
        }
    }
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifyError::ImageDecodeFailed(msg) => {
                write!(f, "Failed to process captured image: {}", msg)
            }
            ClassifyError::ModelLoadFailed(msg) => {
                write!(f, "Failed to load emotion model: {}", msg)
            }
            ClassifyError::InferenceFailed(msg) => write!(f, "Failed to predict emotion: {}", msg),
            ClassifyError::EmptyResult => write!(f, "The emotion model returned no result."),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for ClassifyError {}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<ClassifyError> for AppError {
    fn from(err: ClassifyError) -> Self {
        AppError::Classify(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<image::ImageError> for ClassifyError {
    fn from(err: image::ImageError) -> Self {
        ClassifyError::ImageDecodeFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_has_a_message() {
        let errors: Vec<AppError> = vec![
            CameraError::PermissionDenied.into(),
            CameraError::NoCameraDevice.into(),
            CameraError::InputAttachFailed("busy".into()).into(),
            CameraError::OutputAttachFailed("caps".into()).into(),
            CameraError::SessionSetupFailed("bus".into()).into(),
            CameraError::CaptureFailed("eos".into()).into(),
            CameraError::CaptureInProgress.into(),
            ClassifyError::ImageDecodeFailed("size".into()).into(),
            ClassifyError::ModelLoadFailed("missing".into()).into(),
            ClassifyError::InferenceFailed("shape".into()).into(),
            ClassifyError::EmptyResult.into(),
        ];

        for error in errors {
            assert!(!error.to_string().is_empty(), "{:?} has no message", error);
        }
    }

    #[test]
    fn test_permission_denied_message_mentions_camera() {
        let message = CameraError::PermissionDenied.to_string();
        assert!(message.contains("Camera access denied"));
    }
}
