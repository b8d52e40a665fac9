//! New chatter detection
//!
//! Decides what a chat event should trigger. Nothing here talks to the
//! host; the resulting actions are carried out by [`crate::NewChatter`].

use std::path::PathBuf;

use crate::config::Settings;

/// A chat event delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEvent {
    /// Name of the user who triggered the event
    pub user_name: String,
}

impl ChatEvent {
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
        }
    }

    /// Whether the event came from the channel owner
    pub fn is_from(&self, channel_name: &str) -> bool {
        self.user_name == channel_name
    }
}

/// Actions the script asks the host to perform
#[derive(Debug, Clone, PartialEq)]
pub enum NewChatterAction {
    /// Play the configured sound
    PlaySound { path: PathBuf, volume: f32 },
    /// Configured sound is missing, play the system alert instead
    SystemAlert,
    /// Send a chat message
    SendMessage { text: String },
}

/// The sound to play for a new chatter, falling back to the system alert
/// when the configured file is gone
pub fn sound_action(settings: &Settings) -> NewChatterAction {
    if settings.sound_location.is_file() {
        NewChatterAction::PlaySound {
            path: settings.sound_location.clone(),
            volume: settings.volume_fraction(),
        }
    } else {
        log::warn!(
            "Sound file {} not found, using system alert",
            settings.sound_location.display()
        );
        NewChatterAction::SystemAlert
    }
}

/// Actions for greeting `user_name`, in the order they should run
pub fn plan_greeting(settings: &Settings, user_name: &str) -> Vec<NewChatterAction> {
    let mut actions = Vec::with_capacity(2);

    if settings.sound_enabled() {
        actions.push(sound_action(settings));
    }

    if settings.message_enabled() {
        actions.push(NewChatterAction::SendMessage {
            text: settings.format_message(user_name),
        });
    }

    actions
}
