// SPDX-License-Identifier: GPL-3.0-only

//! Static label to color mapping

use super::emotion::Emotion;
use cosmic::iced::Color;

/// Badge colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MoodColor {
    Yellow,
    Red,
    Green,
    Purple,
    Blue,
    Orange,
    #[default]
    Gray,
}

impl MoodColor {
    pub fn name(&self) -> &'static str {
        match self {
            MoodColor::Yellow => "yellow",
            MoodColor::Red => "red",
            MoodColor::Green => "green",
            MoodColor::Purple => "purple",
            MoodColor::Blue => "blue",
            MoodColor::Orange => "orange",
            MoodColor::Gray => "gray",
        }
    }

    pub fn to_color(&self) -> Color {
        match self {
            MoodColor::Yellow => Color::from_rgb8(0xF6, 0xD3, 0x2D),
            MoodColor::Red => Color::from_rgb8(0xE0, 0x1B, 0x24),
            MoodColor::Green => Color::from_rgb8(0x33, 0xD1, 0x7A),
            MoodColor::Purple => Color::from_rgb8(0x91, 0x41, 0xAC),
            MoodColor::Blue => Color::from_rgb8(0x35, 0x84, 0xE4),
            MoodColor::Orange => Color::from_rgb8(0xFF, 0x78, 0x00),
            MoodColor::Gray => Color::from_rgb8(0x9A, 0x99, 0x96),
        }
    }
}

impl std::fmt::Display for MoodColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Color for a label; anything outside the table is gray
pub fn color_for(label: &str) -> MoodColor {
    match Emotion::from_label(label) {
        Some(Emotion::Happy) => MoodColor::Yellow,
        Some(Emotion::Angry) => MoodColor::Red,
        Some(Emotion::Disgust) => MoodColor::Green,
        Some(Emotion::Fear) => MoodColor::Purple,
        Some(Emotion::Sad) => MoodColor::Blue,
        Some(Emotion::Surprise) => MoodColor::Orange,
        Some(Emotion::Neutral | Emotion::Unknown | Emotion::Confused) | None => MoodColor::Gray,
    }
}
