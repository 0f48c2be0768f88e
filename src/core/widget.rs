//! # Chat Widget
//!
//! Drives `App` through complete operations without a terminal: every
//! method dispatches actions through `update()` and performs the resulting
//! effect inline. The one-shot CLI and the integration tests use this; the
//! TUI performs the same effects on background tasks instead.

use log::debug;

use crate::core::action::{Action, Effect, update};
use crate::core::language::Language;
use crate::core::message::{Conversation, Message};
use crate::core::state::{App, WidgetFlags};
use crate::platform::play_audio;

pub struct ChatWidget {
    app: App,
}

impl ChatWidget {
    pub fn new(app: App) -> Self {
        Self { app }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn flags(&self) -> WidgetFlags {
        self.app.flags
    }

    pub fn conversation(&self) -> &Conversation {
        &self.app.conversation
    }

    pub fn composer(&self) -> &str {
        &self.app.composer
    }

    pub fn set_composer(&mut self, text: impl Into<String>) {
        self.app.composer = text.into();
    }

    pub fn language(&self) -> Language {
        self.app.language
    }

    pub fn open(&mut self) {
        update(&mut self.app, Action::OpenPanel);
    }

    pub fn close(&mut self) {
        update(&mut self.app, Action::ClosePanel);
    }

    pub fn toggle(&mut self) {
        update(&mut self.app, Action::TogglePanel);
    }

    pub fn set_language(&mut self, language: Language) {
        update(&mut self.app, Action::SetLanguage(language));
    }

    /// Send `text` and wait for the reply.
    ///
    /// Returns the assistant message appended for this send (the reply or
    /// the fallback), or `None` when nothing was sent.
    pub async fn send_message(&mut self, text: &str) -> Option<&Message> {
        let Effect::SpawnRequest(request) = update(&mut self.app, Action::Submit(text.to_string()))
        else {
            return None;
        };

        let result = self.app.backend.send(&request).await;
        update(&mut self.app, Action::from_backend_result(result));
        self.app.conversation.last()
    }

    /// Send whatever is in the composer.
    pub async fn send_composer(&mut self) -> Option<&Message> {
        let text = self.app.composer.clone();
        self.send_message(&text).await
    }

    /// Run one recognition to completion. On success the transcript lands in
    /// the composer. Returns whether a transcript was received.
    pub async fn listen_once(&mut self) -> bool {
        let Effect::StartRecognition { locale } = update(&mut self.app, Action::StartListening)
        else {
            return false;
        };
        let Some(recognizer) = self.app.speech.recognizer() else {
            update(&mut self.app, Action::ListeningEnded);
            return false;
        };

        match recognizer.recognize(locale).await {
            Ok(transcript) => {
                update(&mut self.app, Action::TranscriptReady(transcript));
                true
            }
            Err(e) => {
                update(&mut self.app, Action::ListeningFailed(e.to_string()));
                false
            }
        }
    }

    pub fn stop_listening(&mut self) {
        if update(&mut self.app, Action::StopListening) == Effect::StopRecognition {
            debug!("Recognition stopped");
        }
    }

    /// Play a payload through the audio capability. Failures are logged.
    pub async fn play_audio(&self, audio_base64: Option<&str>) -> bool {
        play_audio(&self.app.audio, audio_base64).await
    }

    /// Play the most recent reply that carries audio.
    pub async fn play_latest_audio(&mut self) -> bool {
        match update(&mut self.app, Action::PlayLatestAudio) {
            Effect::PlayAudio(audio) => self.play_audio(Some(&audio)).await,
            _ => false,
        }
    }
}
