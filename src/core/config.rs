//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.everest/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::language::Language;
use crate::core::message::DEFAULT_GREETING;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct EverestConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub language: Option<Language>,
    pub greeting: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct VoiceConfig {
    /// Records one utterance and prints the transcript on stdout.
    pub speech_command: Option<String>,
    /// Plays the audio file passed as its last argument.
    pub player_command: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

// ============================================================================
// Resolved Config (concrete values, no Options except truly optional ones)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub backend_url: String,
    pub language: Language,
    pub greeting: String,
    pub speech_command: Option<String>,
    pub player_command: Option<String>,
}

/// Overrides collected from CLI flags (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub backend_url: Option<String>,
    pub language: Option<Language>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.everest/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".everest").join("config.toml"))
}

/// Load config from `~/.everest/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `EverestConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<EverestConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(EverestConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<EverestConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(EverestConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: EverestConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Everest Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# language = "en"                    # "en", "ar", "fr" or "es"
# greeting = "Marhaba! I am your Everest View assistant."

# [backend]
# base_url = "http://localhost:8000" # Or set EVEREST_BACKEND_URL

# [voice]
# Records one utterance and prints the transcript. {locale} becomes e.g. "ar-AE".
# speech_command = "my-dictation --lang {locale}"
# Plays a synthesized reply. {file} becomes the audio path (appended if absent).
# player_command = "mpv --really-quiet"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &EverestConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env(
    config: &EverestConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Backend URL: CLI → env → config → default
    // A blank value at any level falls through to the next one.
    let backend_url = non_blank(cli.backend_url.clone())
        .or_else(|| non_blank(env("EVEREST_BACKEND_URL")))
        .or_else(|| non_blank(config.backend.base_url.clone()))
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

    // Language: CLI → env → config → default
    let language = cli
        .language
        .or_else(|| {
            env("EVEREST_LANGUAGE").and_then(|code| match code.parse() {
                Ok(lang) => Some(lang),
                Err(e) => {
                    warn!("Ignoring EVEREST_LANGUAGE: {}", e);
                    None
                }
            })
        })
        .or(config.general.language)
        .unwrap_or_default();

    let speech_command = non_blank(env("EVEREST_SPEECH_COMMAND"))
        .or_else(|| non_blank(config.voice.speech_command.clone()));

    let player_command = non_blank(env("EVEREST_PLAYER_COMMAND"))
        .or_else(|| non_blank(config.voice.player_command.clone()));

    ResolvedConfig {
        backend_url: normalize_base_url(&backend_url),
        language,
        greeting: config
            .general
            .greeting
            .clone()
            .unwrap_or_else(|| DEFAULT_GREETING.to_string()),
        speech_command,
        player_command,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}
