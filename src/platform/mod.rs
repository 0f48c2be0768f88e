//! # Platform Capabilities
//!
//! Voice input and audio output depend on what the host machine provides.
//! Each is resolved once at startup into a capability that is either
//! `Available(impl)` or `Unavailable`. The rest of the crate only ever sees
//! the capability, never "is this installed?" checks.
//!
//! Both capabilities are backed by user-configured shell commands so any
//! recorder/transcriber or audio player can be plugged in.

pub mod audio;
pub mod speech;

pub use audio::{AudioCapability, AudioError, AudioPlayer, CommandPlayer, decode_audio, play_audio};
pub use speech::{CommandRecognizer, SpeechCapability, SpeechError, SpeechRecognizer};

use tokio::process::Command;

/// Build a command that runs `script` through the platform shell.
pub(crate) fn shell_command(script: &str) -> Command {
    if cfg!(target_os = "windows") {
        let mut c = Command::new("cmd");
        c.args(["/C", script]);
        c
    } else {
        let mut c = Command::new("sh");
        c.args(["-c", script]);
        c
    }
}

/// Quote a single argument for `sh`.
pub(crate) fn shell_quote(arg: &str) -> String {
    if cfg!(target_os = "windows") {
        return format!("\"{}\"", arg);
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}
