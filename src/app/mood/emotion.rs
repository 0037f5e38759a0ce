// SPDX-License-Identifier: GPL-3.0-only

//! Emotion vocabulary

/// Labels the mood screen knows how to present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emotion {
    Happy,
    Angry,
    Disgust,
    Fear,
    Sad,
    Surprise,
    Neutral,
    Unknown,
    Confused,
}

impl Emotion {
    pub const ALL: [Emotion; 9] = [
        Emotion::Happy,
        Emotion::Angry,
        Emotion::Disgust,
        Emotion::Fear,
        Emotion::Sad,
        Emotion::Surprise,
        Emotion::Neutral,
        Emotion::Unknown,
        Emotion::Confused,
    ];

    /// Parse a model or config label, ignoring case and surrounding whitespace
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|emotion| emotion.label().eq_ignore_ascii_case(label))
    }

    /// Capitalized display label
    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Happy => "Happy",
            Emotion::Angry => "Angry",
            Emotion::Disgust => "Disgust",
            Emotion::Fear => "Fear",
            Emotion::Sad => "Sad",
            Emotion::Surprise => "Surprise",
            Emotion::Neutral => "Neutral",
            Emotion::Unknown => "Unknown",
            Emotion::Confused => "Confused",
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
