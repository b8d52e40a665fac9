//! New Chatter CLI - desktop harness for the script
//!
//! Feeds user names from stdin through the same entry points the chatbot
//! host uses, with a console stand-in for the host.
//!
//! Usage: `new-chatter [SCRIPT_DIR] [CHANNEL_NAME]`
//!
//! Each input line is a chatting user's name. Lines starting with `!` press
//! the settings buttons: `!test-sound`, `!reset-users`, `!reset-defaults`,
//! and `!reload <json>`.

use std::io::{self, BufRead};
use std::path::Path;

use new_chatter::events::ChatEvent;
use new_chatter::host::{self, Host};
use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is not set
const DEFAULT_LOG_FILTER: &str = "new_chatter=info,warn";

/// Host that prints every request to the console
struct ConsoleHost {
    channel: String,
}

impl Host for ConsoleHost {
    fn channel_name(&self) -> String {
        self.channel.clone()
    }

    fn play_sound(&mut self, path: &Path, volume: f32) -> bool {
        println!("[sound] {} at {:.0}%", path.display(), volume * 100.0);
        true
    }

    fn system_alert(&mut self) {
        println!("[sound] system alert");
    }

    fn send_stream_message(&mut self, message: &str) {
        println!("[chat] {}", message);
    }

    fn log(&mut self, script_name: &str, message: &str) {
        eprintln!("[{}] {}", script_name, message);
    }

    fn confirm(&mut self, title: &str, prompt: &str) -> bool {
        println!("[confirm] {}: {} (yes)", title, prompt);
        true
    }

    fn notify(&mut self, title: &str, message: &str) {
        println!("[notice] {}: {}", title, message);
    }
}

/// Send the library's `log` records to stderr
fn init_logging() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();
}

fn main() {
    init_logging();

    let mut args = std::env::args().skip(1);
    let script_dir = args.next().unwrap_or_else(|| ".".to_string());
    let channel = args.next().unwrap_or_else(|| "streamer".to_string());

    println!("{} v{}", new_chatter::SCRIPT_NAME, new_chatter::VERSION);
    println!("Script directory: {}", script_dir);
    println!("Channel: {}", channel);
    println!();

    if let Err(e) = host::init(Box::new(ConsoleHost { channel }), &script_dir) {
        eprintln!("Failed to initialize: {}", e);
        std::process::exit(1);
    }

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Failed to read input: {}", e);
                break;
            }
        };
        let line = line.trim();

        match line {
            "" => {}
            "!test-sound" => host::btn_test_sound(),
            "!reset-users" => {
                host::btn_reset_user_list();
            }
            "!reset-defaults" => {
                host::btn_reset_defaults();
            }
            _ => {
                if let Some(json) = line.strip_prefix("!reload ") {
                    host::reload_settings(json);
                } else {
                    host::execute(&ChatEvent::new(line));
                }
            }
        }
        host::tick();
    }
}
