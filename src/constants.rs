// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};

/// Memory layout of the model's input tensor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputLayout {
    /// `[batch, channels, height, width]` (PyTorch exports)
    #[default]
    Nchw,
    /// `[batch, height, width, channels]` (Keras/TensorFlow exports)
    Nhwc,
}

impl InputLayout {
    /// Get all layouts for UI iteration
    pub const ALL: [InputLayout; 2] = [InputLayout::Nchw, InputLayout::Nhwc];

    /// Get display name for the layout
    pub fn display_name(&self) -> &'static str {
        match self {
            InputLayout::Nchw => "NCHW",
            InputLayout::Nhwc => "NHWC",
        }
    }

    /// Tensor shape for a single grayscale image of the given size
    pub fn shape(&self, width: usize, height: usize) -> [usize; 4] {
        match self {
            InputLayout::Nchw => [1, 1, height, width],
            InputLayout::Nhwc => [1, height, width, 1],
        }
    }
}

/// Mood defaults
pub mod mood {
    /// Label shown before any classification and after "clear"
    pub const DEFAULT_EMOTION: &str = "Confused";

    /// Label emitted when classification fails
    pub const UNKNOWN_EMOTION: &str = "Unknown";
}

/// Classifier model defaults
pub mod model {
    /// Side length of the square grayscale input the FER2013 family of models expects
    pub const INPUT_SIZE: u32 = 48;

    /// FER2013 class order
    pub const FER2013_LABELS: &[&str] = &[
        "Angry", "Disgust", "Fear", "Happy", "Sad", "Surprise", "Neutral",
    ];

    /// File name looked up under the user data directory
    pub const DEFAULT_MODEL_FILE: &str = "emotion.onnx";

    /// Default model location: `$XDG_DATA_HOME/emotrack/emotion.onnx`
    pub fn default_model_path() -> String {
        dirs::data_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("emotrack")
            .join(DEFAULT_MODEL_FILE)
            .to_string_lossy()
            .into_owned()
    }

    /// Convert 8-bit luma to the model's input range
    pub fn normalize_pixel(value: u8) -> f32 {
        value as f32 / 255.0
    }
}

/// UI dimensions and styling
pub mod ui {
    /// Capture button outer diameter
    pub const CAPTURE_BUTTON_OUTER: f32 = 60.0;

    /// Capture button inner diameter
    pub const CAPTURE_BUTTON_INNER: f32 = 50.0;

    /// Capture button border radius (half of inner diameter for a circle)
    pub const CAPTURE_BUTTON_RADIUS: f32 = 25.0;

    /// Diameter of the mood color badge
    pub const MOOD_BADGE_SIZE: f32 = 120.0;

    /// Text size of the mood label inside the result card
    pub const MOOD_TEXT_SIZE: u16 = 28;

    /// Preview area height on the mood page
    pub const PREVIEW_HEIGHT: f32 = 360.0;

    /// Overlay background transparency
    pub const OVERLAY_BACKGROUND_ALPHA: f32 = 0.6;
}

/// GStreamer pipeline configuration
pub mod pipeline {
    /// Maximum buffers queued in appsink
    pub const MAX_BUFFERS: u32 = 2;

    /// Output format for the appsink (RGBA feeds both preview and classifier)
    pub const OUTPUT_FORMAT: &str = "RGBA";
}

/// Timing constants
pub mod timing {
    use std::time::Duration;

    /// Log a preview frame every N frames
    pub const FRAME_LOG_INTERVAL: u64 = 30;

    /// Timeout for pipeline start (seconds)
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// Timeout for pipeline stop (seconds)
    pub const STOP_TIMEOUT_SECS: u64 = 2;

    /// Upper bound for a capture request to yield a frame
    pub const CAPTURE_TIMEOUT: Duration = Duration::from_secs(5);

    /// Preview frames buffered between the appsink and the UI
    pub const PREVIEW_CHANNEL_CAPACITY: usize = 2;
}

/// Application information utilities
pub mod app_info {
    use std::path::Path;

    /// Application ID in RDNN format (config namespace and portal app id)
    pub const APP_ID: &str = "io.github.emotrack.EmoTrack";

    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }

    /// Check if the application is running inside a Flatpak sandbox
    pub fn is_flatpak() -> bool {
        Path::new("/.flatpak-info").exists()
    }

    /// Get the runtime environment string (e.g., "Flatpak" or "Native")
    pub fn runtime_environment() -> &'static str {
        if is_flatpak() { "Flatpak" } else { "Native" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_layout_shapes() {
        assert_eq!(InputLayout::Nchw.shape(48, 48), [1, 1, 48, 48]);
        assert_eq!(InputLayout::Nhwc.shape(64, 32), [1, 32, 64, 1]);
    }

    #[test]
    fn test_normalize_pixel_bounds() {
        assert_eq!(model::normalize_pixel(0), 0.0);
        assert_eq!(model::normalize_pixel(255), 1.0);
    }
}
