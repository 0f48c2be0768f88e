//! # Application State
//!
//! Core state for the chat widget. Domain logic only, no TUI types.
//! Presentation state (scroll offsets, cursor position) lives in `tui`.
//!
//! ```text
//! App
//! ├── backend: Arc<dyn ChatBackend>   // the /chat endpoint
//! ├── identity: Identity              // session + user ids
//! ├── conversation: Conversation      // append-only message list
//! ├── composer: String                // text waiting to be sent
//! ├── language: Language              // en | ar | fr | es
//! ├── flags: WidgetFlags              // open / loading / listening
//! ├── speech: SpeechCapability        // voice input, if any
//! ├── audio: AudioCapability          // reply playback, if any
//! ├── lead_status: Option<LeadStatus> // latest qualification info
//! └── status_message: String          // header status text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::backend::{ChatBackend, LeadStatus};
use crate::core::config::ResolvedConfig;
use crate::core::identity::Identity;
use crate::core::language::Language;
use crate::core::message::{Conversation, DEFAULT_GREETING};
use crate::platform::{AudioCapability, SpeechCapability};

/// The three independent widget flags.
///
/// None is derived from another; each is set directly by the action that
/// owns it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidgetFlags {
    /// Panel is visible.
    pub open: bool,
    /// A chat request is outstanding.
    pub loading: bool,
    /// A speech recognition run is outstanding.
    pub listening: bool,
}

pub struct App {
    pub backend: Arc<dyn ChatBackend>,
    pub identity: Identity,
    pub conversation: Conversation,
    pub composer: String,
    pub language: Language,
    pub flags: WidgetFlags,
    pub speech: SpeechCapability,
    pub audio: AudioCapability,
    pub lead_status: Option<LeadStatus>,
    pub status_message: String,
}

impl App {
    pub fn new(backend: Arc<dyn ChatBackend>, identity: Identity) -> Self {
        Self {
            backend,
            identity,
            conversation: Conversation::with_greeting(DEFAULT_GREETING),
            composer: String::new(),
            language: Language::default(),
            flags: WidgetFlags::default(),
            speech: SpeechCapability::Unavailable,
            audio: AudioCapability::Unavailable,
            lead_status: None,
            status_message: String::from("Online"),
        }
    }

    pub fn from_config(
        backend: Arc<dyn ChatBackend>,
        identity: Identity,
        config: &ResolvedConfig,
    ) -> Self {
        let mut app = Self::new(backend, identity);
        app.conversation = Conversation::with_greeting(&config.greeting);
        app.language = config.language;
        app.speech = SpeechCapability::detect(config.speech_command.as_deref());
        app.audio = AudioCapability::detect(config.player_command.as_deref());
        app
    }

    pub fn with_speech(mut self, speech: SpeechCapability) -> Self {
        self.speech = speech;
        self
    }

    pub fn with_audio(mut self, audio: AudioCapability) -> Self {
        self.audio = audio;
        self
    }

    /// The send control is enabled only with something to send and nothing in flight.
    pub fn can_send(&self) -> bool {
        !self.flags.loading && !self.composer.trim().is_empty()
    }
}
