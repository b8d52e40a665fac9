//! Entry points called by the chatbot host
//!
//! The host loads the script once and then calls into it by name, so the
//! session lives in a process-wide slot. Every entry point is a no-op until
//! [`init`] has succeeded.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;

use super::Host;
use crate::config::ScriptPaths;
use crate::events::{ChatEvent, NewChatterAction};
use crate::{NewChatter, NewChatterError};

/// Global session for host access
static INSTANCE: Lazy<Mutex<Option<NewChatter>>> = Lazy::new(|| Mutex::new(None));

/// Start (or restart) the session
///
/// Called by the host when the script is loaded.
pub fn init(host: Box<dyn Host>, script_dir: impl Into<PathBuf>) -> Result<(), NewChatterError> {
    let chatter = NewChatter::init(host, ScriptPaths::new(script_dir))?;
    *lock_session() = Some(chatter);

    log::info!("Session initialized successfully");
    Ok(())
}

/// Handle one chat event. Returns the actions carried out.
pub fn execute(event: &ChatEvent) -> Vec<NewChatterAction> {
    with_session(|chatter| match chatter.on_chat_event(event) {
        Ok(actions) => actions,
        Err(e) => {
            chatter.log_error(&format!("Failed to handle chat event: {}", e));
            Vec::new()
        }
    })
    .unwrap_or_default()
}

/// Periodic host callback
pub fn tick() {
    with_session(|chatter| chatter.tick());
}

/// Settings UI saved new values
pub fn reload_settings(json: &str) -> bool {
    with_session(|chatter| chatter.reload_settings(json).is_ok()).unwrap_or(false)
}

/// "Restore defaults" button
pub fn btn_reset_defaults() -> bool {
    with_session(|chatter| chatter.reset_defaults()).unwrap_or(false)
}

/// "Test sound" button
pub fn btn_test_sound() {
    with_session(|chatter| chatter.test_sound());
}

/// "Reset user list" button
pub fn btn_reset_user_list() -> bool {
    with_session(|chatter| match chatter.reset_user_list() {
        Ok(done) => done,
        Err(e) => {
            chatter.log_error(&format!("Failed to reset user list: {}", e));
            false
        }
    })
    .unwrap_or(false)
}

/// Lock the session slot, recovering it if a previous holder panicked
fn lock_session() -> MutexGuard<'static, Option<NewChatter>> {
    INSTANCE.lock().unwrap_or_else(|e| {
        log::warn!("Session lock was poisoned, recovering");
        INSTANCE.clear_poison();
        e.into_inner()
    })
}

/// Run `f` against the live session, if there is one
fn with_session<T>(f: impl FnOnce(&mut NewChatter) -> T) -> Option<T> {
    let mut slot = lock_session();
    let Some(chatter) = slot.as_mut() else {
        log::error!("Session not initialized");
        return None;
    };

    Some(f(chatter))
}
