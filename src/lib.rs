//! New Chatter Notification - greet first-time chatters on stream
//!
//! A script for streaming chatbot hosts. Whenever someone who has not been
//! seen yet this session shows up in chat, it can play a sound and post a
//! welcome message, then remembers the user so they are only greeted once.
//!
//! ## Host integration
//!
//! The host supplies its capabilities through the [`host::Host`] trait and
//! drives the script through the entry points in [`host::bridge`].

pub mod config;
pub mod events;
pub mod host;
pub mod ledger;

use crate::config::{ScriptPaths, Settings, SettingsError};
use crate::events::{ChatEvent, NewChatterAction};
use crate::host::Host;
use crate::ledger::{LedgerError, SeenUsers};

/// Script name shown by the host and used to tag log lines
pub const SCRIPT_NAME: &str = "New Chatter Notification";
pub const CREATOR: &str = "MasterKriff";
pub const VERSION: &str = "1.0";
pub const DESCRIPTION: &str = "Play a sound if there is a new chatter in the stream.";

/// Per-session script state
pub struct NewChatter {
    pub settings: Settings,
    pub users: SeenUsers,
    paths: ScriptPaths,
    host: Box<dyn Host>,
}

impl NewChatter {
    /// Start a session: load settings and clear the seen-users ledger
    pub fn init(host: Box<dyn Host>, paths: ScriptPaths) -> Result<Self, NewChatterError> {
        log::info!("Initializing {} v{}", SCRIPT_NAME, VERSION);

        let settings = Settings::load(&paths.settings_file, paths.script_dir())?;
        let users = SeenUsers::new(&paths.user_list_file);
        users.reset()?;

        Ok(Self {
            settings,
            users,
            paths,
            host,
        })
    }

    pub fn paths(&self) -> &ScriptPaths {
        &self.paths
    }

    /// Handle a chat event and return the actions that were carried out.
    ///
    /// The channel owner and users already in the ledger are ignored
    /// without touching anything.
    pub fn on_chat_event(
        &mut self,
        event: &ChatEvent,
    ) -> Result<Vec<NewChatterAction>, NewChatterError> {
        let channel = self.host.channel_name();
        if event.is_from(&channel) || self.users.contains(&event.user_name)? {
            return Ok(Vec::new());
        }

        log::info!("New chatter: {}", event.user_name);

        let actions = events::plan_greeting(&self.settings, &event.user_name);
        for action in &actions {
            self.perform(action);
        }

        self.users.add(&event.user_name)?;
        Ok(actions)
    }

    /// Periodic host callback; nothing to do between events
    pub fn tick(&mut self) {}

    /// Adopt settings pushed by the host's settings UI.
    ///
    /// A payload that fails to decode is logged and the current settings
    /// are kept.
    pub fn reload_settings(&mut self, json: &str) -> Result<(), SettingsError> {
        if let Err(e) = self.settings.reload(json) {
            self.log_error(&format!("Failed to reload settings: {}", e));
            return Err(e);
        }
        log::debug!("Settings reloaded");
        Ok(())
    }

    /// Persist the current settings. Failures are logged and otherwise
    /// ignored; returns whether the save succeeded.
    pub fn save_settings(&mut self) -> bool {
        let result = self.settings.save(&self.paths.settings_file);
        self.check_saved(result)
    }

    /// "Restore defaults" button: after confirmation, write default
    /// settings to disk and adopt them. Returns whether the reset happened.
    ///
    /// The defaults are only adopted once they are on disk, so a failed
    /// save leaves the session running with the streamer's settings.
    pub fn reset_defaults(&mut self) -> bool {
        self.host.system_alert();
        let confirmed = self.host.confirm(
            "Reset settings file?",
            "You are about to reset the settings, are you sure you want to continue?",
        );
        if !confirmed {
            return false;
        }

        let defaults = Settings::with_script_dir(self.paths.script_dir());
        let result = defaults.save(&self.paths.settings_file);
        if !self.check_saved(result) {
            return false;
        }

        self.settings = defaults;
        self.host.notify(
            "Reset complete!",
            "Settings successfully restored to default values",
        );
        true
    }

    /// "Test sound" button: play the configured sound whether or not the
    /// sound toggle is on
    pub fn test_sound(&mut self) {
        let action = events::sound_action(&self.settings);
        self.perform(&action);
    }

    /// "Reset user list" button: after confirmation, forget everyone seen
    /// so far. Returns whether the reset happened.
    pub fn reset_user_list(&mut self) -> Result<bool, NewChatterError> {
        let confirmed = self.host.confirm(
            "Reset user list?",
            "You are about to reset the list of seen chatters, are you sure you want to continue?",
        );
        if !confirmed {
            return Ok(false);
        }

        self.users.reset()?;
        self.host.notify(
            "User list reset",
            "The user list for new chatters has been reset.",
        );
        Ok(true)
    }

    fn perform(&mut self, action: &NewChatterAction) {
        match action {
            NewChatterAction::PlaySound { path, volume } => {
                if !self.host.play_sound(path, *volume) {
                    log::warn!("Host could not play {}", path.display());
                }
            }
            NewChatterAction::SystemAlert => self.host.system_alert(),
            NewChatterAction::SendMessage { text } => self.host.send_stream_message(text),
        }
    }

    fn check_saved(&mut self, result: Result<(), SettingsError>) -> bool {
        match result {
            Ok(()) => true,
            Err(e) => {
                self.log_error(&format!("Failed to save settings to file: {}", e));
                false
            }
        }
    }

    fn log_error(&mut self, message: &str) {
        log::error!("{}", message);
        self.host.log(SCRIPT_NAME, message);
    }
}

/// Script errors
#[derive(Debug, thiserror::Error)]
pub enum NewChatterError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::host::testing::{HostCall, RecordingHost};

    fn session(settings_json: Option<&str>) -> (tempfile::TempDir, RecordingHost, NewChatter) {
        let dir = tempfile::tempdir().unwrap();
        if let Some(json) = settings_json {
            fs::write(dir.path().join("settings.json"), json).unwrap();
        }
        let host = RecordingHost::new("bob");
        let chatter =
            NewChatter::init(Box::new(host.clone()), ScriptPaths::new(dir.path())).unwrap();
        (dir, host, chatter)
    }

    const WELCOME_ONLY: &str = r#"{
        "NewChatterSoundLocation": "newchatter.mp3",
        "PlayNewChatterSound": false,
        "Volume": 50,
        "NewChatterMessage": "Welcome {0}!",
        "SendNewChatterMessage": true
    }"#;

    #[test]
    fn test_welcome_new_chatter() {
        let (_dir, host, mut chatter) = session(Some(WELCOME_ONLY));

        let actions = chatter.on_chat_event(&ChatEvent::new("alice")).unwrap();
        assert_eq!(
            actions,
            vec![NewChatterAction::SendMessage {
                text: "Welcome alice!".to_string()
            }]
        );
        assert_eq!(
            host.actions(),
            vec![HostCall::SendMessage("Welcome alice!".to_string())]
        );
        assert!(chatter.users.contains("alice").unwrap());
    }

    #[test]
    fn test_repeat_chatter_is_ignored() {
        let (_dir, host, mut chatter) = session(Some(WELCOME_ONLY));

        chatter.on_chat_event(&ChatEvent::new("alice")).unwrap();
        let second = chatter.on_chat_event(&ChatEvent::new("alice")).unwrap();

        assert!(second.is_empty());
        assert_eq!(host.actions().len(), 1);
        assert_eq!(chatter.users.entries().unwrap(), vec!["alice"]);
    }

    #[test]
    fn test_channel_owner_is_ignored() {
        let (_dir, host, mut chatter) = session(Some(WELCOME_ONLY));

        let actions = chatter.on_chat_event(&ChatEvent::new("bob")).unwrap();
        assert!(actions.is_empty());
        assert!(host.actions().is_empty());
        assert!(chatter.users.entries().unwrap().is_empty());
    }

    #[test]
    fn test_new_chatter_recorded_even_with_nothing_enabled() {
        let (_dir, host, mut chatter) = session(None);

        let actions = chatter.on_chat_event(&ChatEvent::new("carol")).unwrap();
        assert!(actions.is_empty());
        assert!(host.actions().is_empty());
        assert!(chatter.users.contains("carol").unwrap());
    }

    #[test]
    fn test_init_resets_ledger() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("userlist.txt"), "alice\n").unwrap();

        let chatter = NewChatter::init(
            Box::new(RecordingHost::new("bob")),
            ScriptPaths::new(dir.path()),
        )
        .unwrap();
        assert!(!chatter.users.contains("alice").unwrap());
    }

    #[test]
    fn test_init_with_malformed_settings_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.json"), "nope").unwrap();

        let result = NewChatter::init(
            Box::new(RecordingHost::new("bob")),
            ScriptPaths::new(dir.path()),
        );
        assert!(matches!(result, Err(NewChatterError::Settings(_))));
    }

    #[test]
    fn test_sound_plays_at_volume_fraction() {
        let (dir, host, mut chatter) = session(None);
        let sound = dir.path().join("newchatter.mp3");
        fs::write(&sound, b"ID3").unwrap();
        chatter.settings.play_sound = true;
        chatter.settings.volume = 30;

        chatter.on_chat_event(&ChatEvent::new("alice")).unwrap();
        assert_eq!(
            host.actions(),
            vec![HostCall::PlaySound {
                path: sound,
                volume: 0.3
            }]
        );
    }

    #[test]
    fn test_reload_settings() {
        let (_dir, host, mut chatter) = session(None);

        chatter.reload_settings(WELCOME_ONLY).unwrap();
        assert!(chatter.settings.send_message);

        assert!(chatter.reload_settings("{}").is_err());
        assert!(chatter.settings.send_message);
        assert!(matches!(host.calls().last(), Some(HostCall::Log(_))));
    }

    #[test]
    fn test_save_failure_is_logged() {
        let (dir, host, mut chatter) = session(None);
        fs::create_dir(dir.path().join("settings.json")).unwrap();

        assert!(!chatter.save_settings());
        let calls = host.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(&calls[0], HostCall::Log(msg) if msg.starts_with("Failed to save")));
    }

    #[test]
    fn test_reset_defaults_keeps_settings_when_save_fails() {
        let (dir, host, mut chatter) = session(Some(WELCOME_ONLY));
        let settings_file = dir.path().join("settings.json");
        fs::remove_file(&settings_file).unwrap();
        fs::create_dir(&settings_file).unwrap();

        assert!(!chatter.reset_defaults());
        assert!(chatter.settings.send_message);
        assert_eq!(chatter.settings.message, "Welcome {0}!");
        assert_eq!(
            host.actions(),
            vec![
                HostCall::SystemAlert,
                HostCall::Confirm("Reset settings file?".to_string()),
            ]
        );
        assert!(matches!(host.calls().last(), Some(HostCall::Log(msg)) if msg.starts_with("Failed to save")));

        let actions = chatter.on_chat_event(&ChatEvent::new("alice")).unwrap();
        assert_eq!(
            actions,
            vec![NewChatterAction::SendMessage {
                text: "Welcome alice!".to_string()
            }]
        );
    }

    #[test]
    fn test_reset_defaults_confirmed() {
        let (dir, host, mut chatter) = session(Some(WELCOME_ONLY));

        assert!(chatter.reset_defaults());
        assert_eq!(chatter.settings, Settings::with_script_dir(dir.path()));
        assert_eq!(
            host.actions(),
            vec![
                HostCall::SystemAlert,
                HostCall::Confirm("Reset settings file?".to_string()),
                HostCall::Notify("Reset complete!".to_string()),
            ]
        );

        let on_disk = Settings::load(&dir.path().join("settings.json"), dir.path()).unwrap();
        assert_eq!(on_disk, chatter.settings);
        assert!(dir.path().join("settings.js").is_file());
    }

    #[test]
    fn test_reset_defaults_declined() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.json"), WELCOME_ONLY).unwrap();
        let mut host = RecordingHost::new("bob");
        host.confirm_answer = false;
        let mut chatter =
            NewChatter::init(Box::new(host.clone()), ScriptPaths::new(dir.path())).unwrap();

        assert!(!chatter.reset_defaults());
        assert!(chatter.settings.send_message);
        assert_eq!(
            fs::read_to_string(dir.path().join("settings.json")).unwrap(),
            WELCOME_ONLY
        );
    }

    #[test]
    fn test_test_sound_ignores_toggle() {
        let (_dir, host, mut chatter) = session(None);
        assert!(!chatter.settings.play_sound);

        chatter.test_sound();
        // Default sound file was never installed in the temp dir
        assert_eq!(host.actions(), vec![HostCall::SystemAlert]);
    }

    #[test]
    fn test_reset_user_list() {
        let (_dir, host, mut chatter) = session(None);
        chatter.on_chat_event(&ChatEvent::new("alice")).unwrap();

        assert!(chatter.reset_user_list().unwrap());
        assert!(!chatter.users.contains("alice").unwrap());
        assert_eq!(
            host.actions(),
            vec![
                HostCall::Confirm("Reset user list?".to_string()),
                HostCall::Notify("User list reset".to_string()),
            ]
        );
    }
}
