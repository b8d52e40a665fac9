//! Host application bridge
//!
//! The chatbot host owns the chat connection, the sound device and the
//! settings dialogs. This module defines what the script needs from it and
//! the entry points the host calls.

pub mod bridge;

use std::path::Path;

pub use bridge::*;

/// Capabilities the chatbot host provides to the script
pub trait Host: Send {
    /// Name of the channel the bot is connected to (the streamer)
    fn channel_name(&self) -> String;

    /// Play an audio file at `volume` (0.0-1.0). Returns false if the host
    /// could not start playback.
    fn play_sound(&mut self, path: &Path, volume: f32) -> bool;

    /// Play the operating system's alert sound
    fn system_alert(&mut self);

    /// Send a message to the stream chat
    fn send_stream_message(&mut self, message: &str);

    /// Write a line to the host's script log
    fn log(&mut self, script_name: &str, message: &str);

    /// Ask the streamer a yes/no question
    fn confirm(&mut self, title: &str, prompt: &str) -> bool;

    /// Show an informational notice
    fn notify(&mut self, title: &str, message: &str);
}
