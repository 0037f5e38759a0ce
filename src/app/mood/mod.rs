// SPDX-License-Identifier: GPL-3.0-only

//! Mood state: the current emotion label, its color and the page state machine

pub mod emotion;
pub mod palette;
pub mod screen;
pub mod store;

pub use emotion::Emotion;
pub use palette::{MoodColor, color_for};
pub use screen::{MoodPhase, MoodScreen, PreviewStatus};
pub use store::MoodStore;
