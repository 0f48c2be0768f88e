//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::backend::{BackendError, ChatBackend, ChatReply, ChatRequest};
use crate::core::identity::Identity;
use crate::core::state::App;
use crate::platform::{AudioError, AudioPlayer, SpeechError, SpeechRecognizer};

/// Answers every request with the same outcome and records what it was sent.
pub struct ScriptedBackend {
    outcome: Result<ChatReply, u16>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    pub fn replying(reply: ChatReply) -> Self {
        Self {
            outcome: Ok(reply),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails every request with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        Self {
            outcome: Err(status),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.outcome {
            Ok(reply) => Ok(reply.clone()),
            Err(status) => Err(BackendError::Api {
                status: *status,
                message: "scripted failure".to_string(),
            }),
        }
    }
}

/// Returns a fixed transcript (or error) and records the locales it was asked for.
pub struct ScriptedRecognizer {
    transcript: Option<String>,
    locales: Mutex<Vec<String>>,
}

impl ScriptedRecognizer {
    pub fn transcript(text: &str) -> Self {
        Self {
            transcript: Some(text.to_string()),
            locales: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            transcript: None,
            locales: Mutex::new(Vec::new()),
        }
    }

    pub fn locales(&self) -> Vec<String> {
        self.locales.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn recognize(&self, locale: &str) -> Result<String, SpeechError> {
        self.locales.lock().unwrap().push(locale.to_string());
        self.transcript.clone().ok_or(SpeechError::NoSpeech)
    }
}

/// Records decoded audio instead of playing it.
#[derive(Default)]
pub struct RecordingPlayer {
    played: Mutex<Vec<Vec<u8>>>,
}

impl RecordingPlayer {
    pub fn played(&self) -> Vec<Vec<u8>> {
        self.played.lock().unwrap().clone()
    }
}

#[async_trait]
impl AudioPlayer for RecordingPlayer {
    fn name(&self) -> &str {
        "recording"
    }

    async fn play(&self, audio: &[u8]) -> Result<(), AudioError> {
        self.played.lock().unwrap().push(audio.to_vec());
        Ok(())
    }
}

pub fn test_identity() -> Identity {
    Identity {
        session_id: "test-session".to_string(),
        user_id: "test-user".to_string(),
    }
}

pub fn test_backend() -> Arc<dyn ChatBackend> {
    Arc::new(ScriptedBackend::replying(ChatReply::text("ok")))
}

/// Creates a test App with a backend that always replies "ok".
pub fn test_app() -> App {
    App::new(test_backend(), test_identity())
}

pub fn test_app_with(backend: Arc<dyn ChatBackend>) -> App {
    App::new(backend, test_identity())
}
