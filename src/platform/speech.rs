//! Single-shot speech-to-text.
//!
//! A recognition run records one utterance and yields one transcript. There
//! is no interim output and no continuous mode. Stopping a run is done by
//! dropping (aborting) the future; the child process is killed on drop.

use std::fmt;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::shell_command;

#[derive(Debug)]
pub enum SpeechError {
    /// The recognizer finished without hearing anything.
    NoSpeech,
    /// The recognizer could not be started.
    Spawn(String),
    /// The recognizer exited unsuccessfully.
    Failed { code: Option<i32>, stderr: String },
}

impl fmt::Display for SpeechError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeechError::NoSpeech => write!(f, "no speech detected"),
            SpeechError::Spawn(msg) => write!(f, "failed to start recognizer: {msg}"),
            SpeechError::Failed { code, stderr } => match code {
                Some(code) => write!(f, "recognizer exited with {code}: {stderr}"),
                None => write!(f, "recognizer terminated by signal: {stderr}"),
            },
        }
    }
}

impl std::error::Error for SpeechError {}

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    fn name(&self) -> &str;

    /// Capture one utterance in `locale` (e.g. `"ar-AE"`) and return its transcript.
    async fn recognize(&self, locale: &str) -> Result<String, SpeechError>;
}

/// Runs a shell command that prints the transcript on stdout.
///
/// `{locale}` in the command is replaced with the locale, which is also
/// exported as `EVEREST_SPEECH_LOCALE`.
pub struct CommandRecognizer {
    command: String,
}

impl CommandRecognizer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn render(&self, locale: &str) -> String {
        self.command.replace("{locale}", locale)
    }
}

#[async_trait]
impl SpeechRecognizer for CommandRecognizer {
    fn name(&self) -> &str {
        "command"
    }

    async fn recognize(&self, locale: &str) -> Result<String, SpeechError> {
        let script = self.render(locale);
        info!("Starting speech recognition (locale={})", locale);
        debug!("Speech command: {}", script);

        let output = shell_command(&script)
            .env("EVEREST_SPEECH_LOCALE", locale)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| SpeechError::Spawn(e.to_string()))?;

        if !output.status.success() {
            return Err(SpeechError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if transcript.is_empty() {
            return Err(SpeechError::NoSpeech);
        }
        debug!("Transcript received ({} bytes)", transcript.len());
        Ok(transcript)
    }
}

/// Whether voice input exists on this machine.
#[derive(Clone, Default)]
pub enum SpeechCapability {
    Available(Arc<dyn SpeechRecognizer>),
    #[default]
    Unavailable,
}

impl SpeechCapability {
    /// Resolve from the configured speech command.
    pub fn detect(command: Option<&str>) -> Self {
        match command {
            Some(cmd) if !cmd.trim().is_empty() => {
                info!("Speech recognition available");
                SpeechCapability::Available(Arc::new(CommandRecognizer::new(cmd)))
            }
            _ => {
                info!("Speech recognition unavailable (no speech command configured)");
                SpeechCapability::Unavailable
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, SpeechCapability::Available(_))
    }

    pub fn recognizer(&self) -> Option<Arc<dyn SpeechRecognizer>> {
        match self {
            SpeechCapability::Available(r) => Some(r.clone()),
            SpeechCapability::Unavailable => None,
        }
    }
}

impl fmt::Debug for SpeechCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeechCapability::Available(r) => write!(f, "Available({})", r.name()),
            SpeechCapability::Unavailable => write!(f, "Unavailable"),
        }
    }
}
