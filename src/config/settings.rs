//! User settings for new chatter notifications
//!
//! The settings file is shared with the host's settings UI, so the on-disk
//! key names follow the UI config rather than Rust naming.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Byte order mark the host writes at the start of its settings files
const UTF8_BOM: char = '\u{feff}';

/// File name of the bundled notification sound
pub const DEFAULT_SOUND_FILE: &str = "newchatter.mp3";

/// Welcome message used until the streamer configures one
pub const DEFAULT_MESSAGE: &str = "Welcome to the stream {0}! <3";

/// Volume used until the streamer configures one
pub const DEFAULT_VOLUME: u8 = 50;

/// Main settings structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Sound played when a new chatter shows up
    #[serde(rename = "NewChatterSoundLocation")]
    pub sound_location: PathBuf,
    /// Whether to play the sound at all
    #[serde(rename = "PlayNewChatterSound")]
    pub play_sound: bool,
    /// Playback volume (percentage 0-100)
    #[serde(rename = "Volume")]
    pub volume: u8,
    /// Welcome message template, `{0}` is replaced with the user name
    #[serde(rename = "NewChatterMessage")]
    pub message: String,
    /// Whether to send the welcome message to chat
    #[serde(rename = "SendNewChatterMessage")]
    pub send_message: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_location: PathBuf::from(DEFAULT_SOUND_FILE),
            play_sound: false,
            volume: DEFAULT_VOLUME,
            message: DEFAULT_MESSAGE.to_string(),
            send_message: false,
        }
    }
}

impl Settings {
    /// Default settings with the bundled sound resolved inside `script_dir`
    pub fn with_script_dir(script_dir: &Path) -> Self {
        Self {
            sound_location: script_dir.join(DEFAULT_SOUND_FILE),
            ..Default::default()
        }
    }

    /// Load settings from `path`, falling back to defaults if the file does
    /// not exist.
    ///
    /// A file that exists but cannot be decoded is an error; it is not
    /// silently replaced with defaults.
    pub fn load(path: &Path, script_dir: &Path) -> Result<Self, SettingsError> {
        if !path.is_file() {
            log::info!(
                "No settings file at {}, using defaults",
                path.display()
            );
            return Ok(Self::with_script_dir(script_dir));
        }

        let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let settings = Self::from_json(&raw)?;
        log::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Decode settings from JSON text, tolerating a leading BOM
    pub fn from_json(raw: &str) -> Result<Self, SettingsError> {
        let raw = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
        let settings: Settings = serde_json::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Replace every field with the values decoded from `raw`.
    ///
    /// On error the current values are left untouched.
    pub fn reload(&mut self, raw: &str) -> Result<(), SettingsError> {
        *self = Self::from_json(raw)?;
        Ok(())
    }

    /// Save to `path` as JSON and to the `.js` sibling as a script variable
    /// the settings UI can include directly.
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let pretty = serde_json::to_string_pretty(self).map_err(SettingsError::Serialize)?;
        write_with_bom(path, &pretty)?;

        let compact = serde_json::to_string(self).map_err(SettingsError::Serialize)?;
        write_with_bom(
            &mirror_path(path),
            &format!("var settings = {};", compact),
        )?;

        log::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Render the welcome message for `user_name`
    pub fn format_message(&self, user_name: &str) -> String {
        format_template(&self.message, user_name)
    }

    /// Volume as a playback fraction (0.0-1.0)
    pub fn volume_fraction(&self) -> f32 {
        f32::from(self.volume) / 100.0
    }

    /// Whether a sound should be played for new chatters
    pub fn sound_enabled(&self) -> bool {
        self.play_sound && !self.sound_location.as_os_str().is_empty()
    }

    /// Whether a welcome message should be sent for new chatters
    pub fn message_enabled(&self) -> bool {
        self.send_message && !self.message.is_empty()
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.volume > 100 {
            return Err(SettingsError::InvalidVolume(self.volume));
        }
        Ok(())
    }
}

/// Path of the script-variable mirror written next to the JSON file
pub fn mirror_path(path: &Path) -> PathBuf {
    path.with_extension("js")
}

fn write_with_bom(path: &Path, contents: &str) -> Result<(), SettingsError> {
    let mut data = String::with_capacity(contents.len() + UTF8_BOM.len_utf8());
    data.push(UTF8_BOM);
    data.push_str(contents);

    fs::write(path, data).map_err(|source| SettingsError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Substitute `user_name` into a message template.
///
/// `{0}` and `{}` are the name slot, `{{` and `}}` are literal braces.
/// Anything else between braces is copied through unchanged.
pub fn format_template(template: &str, user_name: &str) -> String {
    let mut out = String::with_capacity(template.len() + user_name.len());
    let mut rest = template;

    while let Some(idx) = rest.find(['{', '}']) {
        out.push_str(&rest[..idx]);
        rest = &rest[idx..];

        if let Some(tail) = rest.strip_prefix("{{") {
            out.push('{');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("}}") {
            out.push('}');
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("{0}") {
            out.push_str(user_name);
            rest = tail;
        } else if let Some(tail) = rest.strip_prefix("{}") {
            out.push_str(user_name);
            rest = tail;
        } else {
            // Lone brace
            out.push_str(&rest[..1]);
            rest = &rest[1..];
        }
    }

    out.push_str(rest);
    out
}

/// Settings errors
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings from {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to write settings to {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("Invalid settings data: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to serialize settings: {0}")]
    Serialize(serde_json::Error),
    #[error("Volume must be between 0 and 100, got {0}")]
    InvalidVolume(u8),
}
