//! Playback of synthesized replies.
//!
//! The backend sends MP3 audio as a base64 string. Playback only ever
//! happens on explicit request, and a failure is logged rather than shown.

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use log::{debug, info, warn};

use super::{shell_command, shell_quote};

#[derive(Debug)]
pub enum AudioError {
    Decode(base64::DecodeError),
    Empty,
    Io(std::io::Error),
    Player { code: Option<i32>, stderr: String },
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Decode(e) => write!(f, "invalid audio payload: {e}"),
            AudioError::Empty => write!(f, "audio payload is empty"),
            AudioError::Io(e) => write!(f, "audio I/O error: {e}"),
            AudioError::Player { code, stderr } => {
                write!(f, "player exited with {:?}: {}", code, stderr)
            }
        }
    }
}

impl std::error::Error for AudioError {}

/// Decode a base64 audio payload. A `data:audio/...;base64,` prefix is accepted.
pub fn decode_audio(payload: &str) -> Result<Vec<u8>, AudioError> {
    let payload = payload.trim();
    let encoded = match payload.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => payload,
    };
    let bytes = BASE64_STANDARD.decode(encoded).map_err(AudioError::Decode)?;
    if bytes.is_empty() {
        return Err(AudioError::Empty);
    }
    Ok(bytes)
}

#[async_trait]
pub trait AudioPlayer: Send + Sync {
    fn name(&self) -> &str;

    /// Play the encoded audio bytes to completion.
    async fn play(&self, audio: &[u8]) -> Result<(), AudioError>;
}

/// Plays audio by writing it to a scratch file and running a player command.
///
/// `{file}` in the command is replaced with the quoted path; without a
/// placeholder the path is appended as the last argument.
pub struct CommandPlayer {
    command: String,
    scratch_dir: PathBuf,
}

impl CommandPlayer {
    pub fn new(command: impl Into<String>) -> Self {
        Self::with_scratch_dir(command, std::env::temp_dir())
    }

    pub fn with_scratch_dir(command: impl Into<String>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn render(&self, file: &str) -> String {
        let quoted = shell_quote(file);
        if self.command.contains("{file}") {
            self.command.replace("{file}", &quoted)
        } else {
            format!("{} {}", self.command, quoted)
        }
    }
}

#[async_trait]
impl AudioPlayer for CommandPlayer {
    fn name(&self) -> &str {
        "command"
    }

    async fn play(&self, audio: &[u8]) -> Result<(), AudioError> {
        let path = self
            .scratch_dir
            .join(format!("everest-{}.mp3", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, audio).await.map_err(AudioError::Io)?;

        let script = self.render(&path.to_string_lossy());
        debug!("Player command: {}", script);

        let result = shell_command(&script)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await;

        if let Err(e) = tokio::fs::remove_file(&path).await {
            debug!("Could not remove {}: {}", path.display(), e);
        }

        let output = result.map_err(AudioError::Io)?;
        if !output.status.success() {
            return Err(AudioError::Player {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Whether audio output exists on this machine.
#[derive(Clone, Default)]
pub enum AudioCapability {
    Available(Arc<dyn AudioPlayer>),
    #[default]
    Unavailable,
}

impl AudioCapability {
    /// Resolve from the configured player command.
    pub fn detect(command: Option<&str>) -> Self {
        match command {
            Some(cmd) if !cmd.trim().is_empty() => {
                info!("Audio playback available");
                AudioCapability::Available(Arc::new(CommandPlayer::new(cmd)))
            }
            _ => {
                info!("Audio playback unavailable (no player command configured)");
                AudioCapability::Unavailable
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, AudioCapability::Available(_))
    }
}

impl fmt::Debug for AudioCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioCapability::Available(p) => write!(f, "Available({})", p.name()),
            AudioCapability::Unavailable => write!(f, "Unavailable"),
        }
    }
}

/// Decode and play a reply's audio. Returns whether anything was played.
///
/// A missing payload or missing capability is a silent no-op; decode and
/// playback failures are logged.
pub async fn play_audio(capability: &AudioCapability, audio_base64: Option<&str>) -> bool {
    let Some(payload) = audio_base64.filter(|p| !p.trim().is_empty()) else {
        return false;
    };
    let AudioCapability::Available(player) = capability else {
        debug!("Skipping playback: no audio capability");
        return false;
    };

    let bytes = match decode_audio(payload) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Audio init failed: {}", e);
            return false;
        }
    };

    match player.play(&bytes).await {
        Ok(()) => {
            debug!("Played {} bytes of audio", bytes.len());
            true
        }
        Err(e) => {
            warn!("Audio play failed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::RecordingPlayer;

    #[test]
    fn test_decode_plain_and_data_url() {
        assert_eq!(decode_audio("SUQz").unwrap(), b"ID3");
        assert_eq!(decode_audio("data:audio/mp3;base64,SUQz").unwrap(), b"ID3");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_audio("not base64!"), Err(AudioError::Decode(_))));
        assert!(matches!(decode_audio(""), Err(AudioError::Empty)));
    }

    #[cfg(unix)]
    #[test]
    fn test_render_appends_or_substitutes_path() {
        let player = CommandPlayer::new("mpv --really-quiet");
        assert_eq!(player.render("/tmp/a.mp3"), "mpv --really-quiet '/tmp/a.mp3'");

        let player = CommandPlayer::new("ffplay -nodisp {file} -autoexit");
        assert_eq!(
            player.render("/tmp/a.mp3"),
            "ffplay -nodisp '/tmp/a.mp3' -autoexit"
        );
    }

    #[tokio::test]
    async fn test_play_audio_without_payload_is_noop() {
        let player = Arc::new(RecordingPlayer::default());
        let capability = AudioCapability::Available(player.clone());
        assert!(!play_audio(&capability, None).await);
        assert!(!play_audio(&capability, Some("")).await);
        assert!(player.played().is_empty());
    }

    #[tokio::test]
    async fn test_play_audio_without_capability_is_noop() {
        assert!(!play_audio(&AudioCapability::Unavailable, Some("SUQz")).await);
    }

    #[tokio::test]
    async fn test_play_audio_decodes_before_playing() {
        let player = Arc::new(RecordingPlayer::default());
        let capability = AudioCapability::Available(player.clone());
        assert!(play_audio(&capability, Some("SUQz")).await);
        assert_eq!(player.played(), vec![b"ID3".to_vec()]);
    }

    #[tokio::test]
    async fn test_bad_payload_is_logged_not_played() {
        let player = Arc::new(RecordingPlayer::default());
        let capability = AudioCapability::Available(player.clone());
        assert!(!play_audio(&capability, Some("%%%")).await);
        assert!(player.played().is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_player_receives_file_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let copy = dir.path().join("copy.mp3");
        let command = format!("cp {{file}} {}", shell_quote(&copy.to_string_lossy()));
        let player = CommandPlayer::with_scratch_dir(command, dir.path());

        player.play(b"ID3").await.unwrap();

        assert_eq!(std::fs::read(&copy).unwrap(), b"ID3");
        // Only the copy remains; the scratch file was removed
        let remaining = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(remaining, 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_player_failure_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let player = CommandPlayer::with_scratch_dir("exit 1; true", dir.path());
        assert!(matches!(
            player.play(b"ID3").await,
            Err(AudioError::Player { code: Some(1), .. })
        ));
    }
}
