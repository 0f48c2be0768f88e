//! # Actions
//!
//! Everything that can happen in the widget becomes an `Action`.
//! Visitor presses Enter? That's `Action::Submit(text)`.
//! Backend answers? That's `Action::ReplyReceived(reply)`.
//!
//! `update()` applies an action to the state and returns an `Effect`
//! describing the I/O the caller should perform. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};

use crate::backend::{BackendError, ChatReply, ChatRequest};
use crate::core::language::Language;
use crate::core::message::{FALLBACK_REPLY, Message};
use crate::core::state::App;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    OpenPanel,
    ClosePanel,
    TogglePanel,
    SetLanguage(Language),
    CycleLanguage,
    StartListening,
    StopListening,
    ToggleListening,
    /// Recognition finished with a transcript.
    TranscriptReady(String),
    /// Recognition reported an error.
    ListeningFailed(String),
    /// Recognition ended without a result (stopped or no speech).
    ListeningEnded,
    /// Send the given text as the visitor's message.
    Submit(String),
    ReplyReceived(ChatReply),
    RequestFailed(String),
    /// Play the audio attached to the message at this index.
    PlayAudio(usize),
    PlayLatestAudio,
    Quit,
}

impl Action {
    /// Turn the outcome of a chat request into the action that settles it.
    pub fn from_backend_result(result: Result<ChatReply, BackendError>) -> Self {
        match result {
            Ok(reply) => Action::ReplyReceived(reply),
            Err(e) => Action::RequestFailed(e.to_string()),
        }
    }
}

/// I/O requested by `update()`. Performed by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    SpawnRequest(ChatRequest),
    StartRecognition { locale: &'static str },
    StopRecognition,
    PlayAudio(String),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::OpenPanel => {
            app.flags.open = true;
            Effect::None
        }
        Action::ClosePanel => {
            app.flags.open = false;
            Effect::None
        }
        Action::TogglePanel => {
            app.flags.open = !app.flags.open;
            Effect::None
        }
        Action::SetLanguage(language) => {
            app.language = language;
            app.status_message = format!("Language: {}", language.label());
            Effect::None
        }
        Action::CycleLanguage => {
            let next = app.language.next();
            update(app, Action::SetLanguage(next))
        }
        Action::StartListening => {
            if !app.speech.is_available() {
                debug!("Ignoring StartListening: speech recognition unavailable");
                return Effect::None;
            }
            if app.flags.listening {
                return Effect::None;
            }
            app.composer.clear();
            app.flags.listening = true;
            app.status_message = String::from("Listening...");
            Effect::StartRecognition {
                locale: app.language.locale(),
            }
        }
        Action::StopListening => {
            if !app.flags.listening {
                return Effect::None;
            }
            app.flags.listening = false;
            app.status_message = String::from("Online");
            Effect::StopRecognition
        }
        Action::ToggleListening => {
            if app.flags.listening {
                update(app, Action::StopListening)
            } else {
                update(app, Action::StartListening)
            }
        }
        Action::TranscriptReady(text) => {
            if !app.flags.listening {
                debug!("Ignoring transcript that arrived after listening stopped");
                return Effect::None;
            }
            app.flags.listening = false;
            app.composer = text;
            app.status_message = String::from("Online");
            Effect::None
        }
        Action::ListeningFailed(error) => {
            warn!("Speech recognition error: {}", error);
            app.flags.listening = false;
            app.status_message = String::from("Online");
            Effect::None
        }
        Action::ListeningEnded => {
            app.flags.listening = false;
            app.status_message = String::from("Online");
            Effect::None
        }
        Action::Submit(text) => {
            if text.trim().is_empty() {
                return Effect::None;
            }
            if app.flags.loading {
                debug!("Dropping submit while a request is outstanding");
                return Effect::None;
            }
            app.conversation.push(Message::user(text.clone()));
            app.composer.clear();
            app.flags.loading = true;
            app.status_message = String::from("Typing...");
            info!("Submitting message ({} bytes)", text.len());
            Effect::SpawnRequest(ChatRequest {
                user_id: app.identity.user_id.clone(),
                session_id: app.identity.session_id.clone(),
                user_message: text,
                language: app.language,
            })
        }
        Action::ReplyReceived(reply) => {
            if let Some(status) = reply.lead_status() {
                app.lead_status = Some(status);
            }
            app.conversation
                .push(Message::assistant(reply.reply, reply.audio_base64));
            app.flags.loading = false;
            app.status_message = String::from("Online");
            Effect::None
        }
        Action::RequestFailed(error) => {
            warn!("Chat Error: {}", error);
            app.conversation.push(Message::assistant(FALLBACK_REPLY, None));
            app.flags.loading = false;
            app.status_message = String::from("Online");
            Effect::None
        }
        Action::PlayAudio(index) => match app
            .conversation
            .messages()
            .get(index)
            .and_then(|m| m.audio_base64.clone())
        {
            Some(audio) => Effect::PlayAudio(audio),
            None => Effect::None,
        },
        Action::PlayLatestAudio => match app.conversation.latest_audio() {
            Some(message) => Effect::PlayAudio(message.audio_base64.clone().unwrap_or_default()),
            None => Effect::None,
        },
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Role;
    use crate::platform::SpeechCapability;
    use crate::test_support::{ScriptedRecognizer, test_app};
    use std::sync::Arc;

    fn listening_app() -> App {
        let recognizer = Arc::new(ScriptedRecognizer::transcript("hello"));
        test_app().with_speech(SpeechCapability::Available(recognizer))
    }

    #[test]
    fn test_submit_appends_user_message_and_spawns_request() {
        let mut app = test_app();
        app.composer = "Hi".to_string();
        let before = app.conversation.len();

        let effect = update(&mut app, Action::Submit("Hi".to_string()));

        assert_eq!(app.conversation.len(), before + 1);
        let last = app.conversation.last().unwrap();
        assert_eq!(last.role, Role::User);
        assert_eq!(last.content, "Hi");
        assert!(app.composer.is_empty());
        assert!(app.flags.loading);
        match effect {
            Effect::SpawnRequest(request) => {
                assert_eq!(request.user_message, "Hi");
                assert_eq!(request.user_id, app.identity.user_id);
                assert_eq!(request.session_id, app.identity.session_id);
                assert_eq!(request.language, Language::En);
            }
            other => panic!("expected SpawnRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_submit_does_nothing() {
        for text in ["", "   ", "\n\t "] {
            let mut app = test_app();
            let before = app.conversation.clone();
            assert_eq!(update(&mut app, Action::Submit(text.to_string())), Effect::None);
            assert_eq!(app.conversation, before);
            assert!(!app.flags.loading);
        }
    }

    #[test]
    fn test_submit_while_loading_is_dropped() {
        let mut app = test_app();
        update(&mut app, Action::Submit("first".to_string()));
        let len = app.conversation.len();

        let effect = update(&mut app, Action::Submit("second".to_string()));

        assert_eq!(effect, Effect::None);
        assert_eq!(app.conversation.len(), len);
    }

    #[test]
    fn test_submit_sends_selected_language() {
        let mut app = test_app();
        update(&mut app, Action::SetLanguage(Language::Ar));
        match update(&mut app, Action::Submit("مرحبا".to_string())) {
            Effect::SpawnRequest(request) => assert_eq!(request.language, Language::Ar),
            other => panic!("expected SpawnRequest, got {other:?}"),
        }
    }

    #[test]
    fn test_reply_appends_assistant_message_with_audio() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Hi".to_string()));
        let mut reply = ChatReply::text("Hello! Looking to buy?");
        reply.audio_base64 = Some("SUQz".to_string());

        update(&mut app, Action::ReplyReceived(reply));

        let last = app.conversation.last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "Hello! Looking to buy?");
        assert_eq!(last.audio_base64.as_deref(), Some("SUQz"));
        assert!(!app.flags.loading);
    }

    #[test]
    fn test_failure_appends_fallback_and_clears_loading() {
        let mut app = test_app();
        update(&mut app, Action::Submit("Hi".to_string()));

        update(
            &mut app,
            Action::from_backend_result(Err(BackendError::Api {
                status: 500,
                message: "boom".to_string(),
            })),
        );

        let last = app.conversation.last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, FALLBACK_REPLY);
        assert!(!app.flags.loading);
    }

    #[test]
    fn test_reply_records_lead_status() {
        let mut app = test_app();
        let mut reply = ChatReply::text("Noted.");
        reply.qualification_status = Some(crate::backend::QualificationStatus::Discovery);
        reply.lead_score = Some(20);
        update(&mut app, Action::ReplyReceived(reply));

        let status = app.lead_status.unwrap();
        assert_eq!(status.score, Some(20));

        // A later reply without lead info keeps the last known status
        update(&mut app, Action::ReplyReceived(ChatReply::text("Sure.")));
        assert_eq!(app.lead_status.unwrap().score, Some(20));
    }

    #[test]
    fn test_toggle_twice_restores_visibility_without_touching_messages() {
        let mut app = test_app();
        let before = app.conversation.clone();
        let was_open = app.flags.open;

        assert_eq!(update(&mut app, Action::TogglePanel), Effect::None);
        assert_ne!(app.flags.open, was_open);
        update(&mut app, Action::TogglePanel);

        assert_eq!(app.flags.open, was_open);
        assert_eq!(app.conversation, before);
    }

    #[test]
    fn test_open_close_are_idempotent() {
        let mut app = test_app();
        update(&mut app, Action::OpenPanel);
        update(&mut app, Action::OpenPanel);
        assert!(app.flags.open);
        update(&mut app, Action::ClosePanel);
        assert!(!app.flags.open);
    }

    #[test]
    fn test_start_listening_without_capability_is_silent() {
        let mut app = test_app();
        app.composer = "draft".to_string();
        assert_eq!(update(&mut app, Action::StartListening), Effect::None);
        assert!(!app.flags.listening);
        assert_eq!(app.composer, "draft");
    }

    #[test]
    fn test_start_listening_uses_current_locale_and_clears_composer() {
        let mut app = listening_app();
        app.composer = "draft".to_string();
        update(&mut app, Action::SetLanguage(Language::Fr));

        let effect = update(&mut app, Action::StartListening);

        assert_eq!(effect, Effect::StartRecognition { locale: "fr-FR" });
        assert!(app.flags.listening);
        assert!(app.composer.is_empty());
    }

    #[test]
    fn test_second_start_while_listening_is_ignored() {
        let mut app = listening_app();
        update(&mut app, Action::StartListening);
        assert_eq!(update(&mut app, Action::StartListening), Effect::None);
    }

    #[test]
    fn test_transcript_after_stop_is_ignored() {
        let mut app = listening_app();
        update(&mut app, Action::StartListening);
        update(&mut app, Action::StopListening);
        app.composer = "typed meanwhile".to_string();

        update(&mut app, Action::TranscriptReady("late".to_string()));
        assert_eq!(app.composer, "typed meanwhile");
    }

    #[test]
    fn test_transcript_populates_composer_without_sending() {
        let mut app = listening_app();
        update(&mut app, Action::StartListening);
        let before = app.conversation.len();

        update(&mut app, Action::TranscriptReady("two bedroom flat".to_string()));

        assert_eq!(app.composer, "two bedroom flat");
        assert!(!app.flags.listening);
        assert_eq!(app.conversation.len(), before);
        assert!(!app.flags.loading);
    }

    #[test]
    fn test_recognition_error_clears_listening() {
        let mut app = listening_app();
        update(&mut app, Action::StartListening);
        update(&mut app, Action::ListeningFailed("not-allowed".to_string()));
        assert!(!app.flags.listening);
    }

    #[test]
    fn test_toggle_listening_stops_an_active_run() {
        let mut app = listening_app();
        assert!(matches!(
            update(&mut app, Action::ToggleListening),
            Effect::StartRecognition { .. }
        ));
        assert_eq!(update(&mut app, Action::ToggleListening), Effect::StopRecognition);
        assert!(!app.flags.listening);
    }

    #[test]
    fn test_play_audio_targets_message_payload() {
        let mut app = test_app();
        let mut reply = ChatReply::text("Listen");
        reply.audio_base64 = Some("SUQz".to_string());
        update(&mut app, Action::ReplyReceived(reply));
        let index = app.conversation.len() - 1;

        assert_eq!(
            update(&mut app, Action::PlayAudio(index)),
            Effect::PlayAudio("SUQz".to_string())
        );
        // The greeting has no audio
        assert_eq!(update(&mut app, Action::PlayAudio(0)), Effect::None);
        assert_eq!(update(&mut app, Action::PlayAudio(99)), Effect::None);
        assert_eq!(
            update(&mut app, Action::PlayLatestAudio),
            Effect::PlayAudio("SUQz".to_string())
        );
    }

    #[test]
    fn test_cycle_language_updates_status() {
        let mut app = test_app();
        update(&mut app, Action::CycleLanguage);
        assert_eq!(app.language, Language::Ar);
        assert_eq!(app.status_message, "Language: AR");
    }
}
