// SPDX-License-Identifier: MPL-2.0

//! EmoTrack - A mood tracker for the COSMIC desktop environment
//!
//! Captures a still from the camera, runs an on-device emotion model on it and
//! shows the detected mood as a label and a color.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`app`]: Main application logic and UI, mood state and the classifier
//! - [`backends`]: Camera session, capture and permission handling
//! - [`config`]: User configuration handling
//! - [`errors`]: Error types shown to the user
//!
//! # Example
//!
//! ```ignore
//! // This is a GUI application, typically run via:
//! // emotrack
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod i18n;

// Re-export commonly used types
pub use app::frame_processor::{Classification, Prediction};
pub use app::mood::{MoodColor, MoodPhase, MoodScreen, MoodStore};
pub use app::{AppModel, Message, Page};
pub use config::Config;
