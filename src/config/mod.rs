//! Configuration module
//!
//! Handles the user settings file and where the script keeps its files.

pub mod settings;

use std::path::{Path, PathBuf};

pub use settings::{Settings, SettingsError};

/// File locations inside the directory the host loaded the script from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPaths {
    /// Script directory
    pub script_dir: PathBuf,
    /// JSON settings shared with the host's settings UI
    pub settings_file: PathBuf,
    /// Ledger of users already greeted this session
    pub user_list_file: PathBuf,
}

impl ScriptPaths {
    /// Resolve all file locations relative to `script_dir`
    pub fn new(script_dir: impl Into<PathBuf>) -> Self {
        let script_dir = script_dir.into();
        Self {
            settings_file: script_dir.join("settings.json"),
            user_list_file: script_dir.join("userlist.txt"),
            script_dir,
        }
    }

    /// The `.js` mirror of the settings file
    pub fn settings_mirror_file(&self) -> PathBuf {
        settings::mirror_path(&self.settings_file)
    }

    pub fn script_dir(&self) -> &Path {
        &self.script_dir
    }
}
