// SPDX-License-Identifier: GPL-3.0-only

//! Observable emotion label

use super::palette::{MoodColor, color_for};
use tokio::sync::watch;
use tracing::{debug, info};

/// Holds the current emotion label and notifies subscribers of every change
#[derive(Debug)]
pub struct MoodStore {
    sender: watch::Sender<String>,
    default_label: String,
}

impl MoodStore {
    pub fn new(default_label: impl Into<String>) -> Self {
        let default_label = default_label.into();
        let (sender, _) = watch::channel(default_label.clone());
        Self {
            sender,
            default_label,
        }
    }

    /// Current label
    pub fn label(&self) -> String {
        self.sender.borrow().clone()
    }

    /// Color derived from the current label
    pub fn color(&self) -> MoodColor {
        color_for(&self.sender.borrow())
    }

    pub fn default_label(&self) -> &str {
        &self.default_label
    }

    /// Deliver a classification result
    pub fn publish(&self, label: impl Into<String>) {
        let label = label.into();
        debug!(label = %label, "Mood updated");
        self.sender.send_replace(label);
    }

    /// Set the label directly, bypassing classification
    pub fn override_label(&self, label: impl Into<String>) {
        let label = label.into();
        info!(label = %label, "Mood manually overridden");
        self.sender.send_replace(label);
    }

    /// Back to the default label
    pub fn reset(&self) {
        self.sender.send_replace(self.default_label.clone());
    }

    /// Change the default; the current label is left alone
    pub fn set_default(&mut self, label: impl Into<String>) {
        self.default_label = label.into();
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.sender.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_default() {
        let store = MoodStore::new("Confused");
        assert_eq!(store.label(), "Confused");
        assert_eq!(store.color(), MoodColor::Gray);
    }

    #[test]
    fn test_publish_notifies_subscribers() {
        let store = MoodStore::new("Confused");
        let mut receiver = store.subscribe();
        assert!(!receiver.has_changed().unwrap());

        store.publish("happy");
        assert!(receiver.has_changed().unwrap());
        assert_eq!(*receiver.borrow_and_update(), "happy");
        assert_eq!(store.color(), MoodColor::Yellow);
    }

    #[test]
    fn test_reset_restores_default() {
        let mut store = MoodStore::new("Confused");
        store.set_default("Neutral");
        store.publish("Sad");
        store.reset();
        assert_eq!(store.label(), "Neutral");
    }
}
