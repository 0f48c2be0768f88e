//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the landing
//! screen and chat panel, and translates keyboard events into
//! `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! - **Animating** (request outstanding, listening): draws every ~80ms so
//!   the typing indicator and listening dot move.
//! - **Idle**: sleeps up to 500ms and only redraws on events or when a
//!   background task reports back.
//!
//! ## Background Work
//!
//! Chat requests, speech recognition and audio playback run as tokio tasks.
//! Each reports its outcome as an `Action` over a channel drained once per
//! loop iteration, so state only ever changes on this thread.

pub mod component;
pub mod components;
pub mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use tokio::task::AbortHandle;

use crate::backend::{ChatBackend, ChatRequest};
use crate::core::action::{Action, Effect, update};
use crate::core::state::App;
use crate::platform::{AudioCapability, SpeechError, SpeechRecognizer, play_audio};
use crate::tui::component::EventHandler;
use crate::tui::components::{Composer, ComposerEvent, ComposerState, MessageListState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const ANIMATION_POLL: Duration = Duration::from_millis(80);
const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
#[derive(Default)]
pub struct TuiState {
    pub message_list: MessageListState,
    pub composer: ComposerState,
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock, // Non-blinking: redraws reset the blink timer
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, steady block cursor)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste, Hide);
    }
}

/// Handles to background work that can be cancelled.
struct Tasks {
    tx: mpsc::Sender<Action>,
    recognition: Option<AbortHandle>,
}

impl Tasks {
    fn new(tx: mpsc::Sender<Action>) -> Self {
        Self {
            tx,
            recognition: None,
        }
    }

    fn stop_recognition(&mut self) {
        if let Some(handle) = self.recognition.take() {
            handle.abort();
            debug!("Recognition task aborted");
        }
    }
}

/// Route a terminal event. Returns the action to apply, if any.
///
/// Composer editing and scrolling are handled here directly since they only
/// touch the composer text and presentation state.
pub fn dispatch_event(app: &mut App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::Quit => return Some(Action::Quit),
        TuiEvent::TogglePanel => return Some(Action::TogglePanel),
        TuiEvent::Resize => return None,
        _ => {}
    }

    if !app.flags.open {
        // Only the landing screen is visible
        return match event {
            TuiEvent::Submit => Some(Action::OpenPanel),
            TuiEvent::InputChar('q') => Some(Action::Quit),
            _ => None,
        };
    }

    match event {
        TuiEvent::Escape => Some(Action::ClosePanel),
        TuiEvent::CycleLanguage => Some(Action::CycleLanguage),
        TuiEvent::ToggleListening => Some(Action::ToggleListening),
        TuiEvent::PlayAudio => Some(Action::PlayLatestAudio),
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(event);
            None
        }
        _ => {
            let mut composer = Composer::new(
                &mut app.composer,
                &mut tui.composer,
                app.language,
                app.flags.loading,
            );
            match composer.handle_event(event) {
                Some(ComposerEvent::Submit(text)) => {
                    // Follow the conversation to the new message
                    tui.message_list.jump_to_bottom();
                    Some(Action::Submit(text))
                }
                Some(ComposerEvent::ContentChanged) | None => None,
            }
        }
    }
}

/// Apply an action and perform the effect it asks for.
/// Returns true when the application should exit.
fn apply(app: &mut App, tui: &mut TuiState, tasks: &mut Tasks, action: Action) -> bool {
    let transcript = matches!(action, Action::TranscriptReady(_));
    let effect = update(app, action);
    if transcript {
        tui.composer.place_at_end(&app.composer);
    }

    match effect {
        Effect::None => {}
        Effect::Quit => return true,
        Effect::SpawnRequest(request) => {
            spawn_request(app.backend.clone(), request, tasks.tx.clone());
        }
        Effect::StartRecognition { locale } => match app.speech.recognizer() {
            Some(recognizer) => {
                tasks.stop_recognition();
                tasks.recognition = Some(spawn_recognition(recognizer, locale, tasks.tx.clone()));
            }
            None => {
                update(app, Action::ListeningEnded);
            }
        },
        Effect::StopRecognition => tasks.stop_recognition(),
        Effect::PlayAudio(audio) => spawn_playback(app.audio.clone(), audio),
    }
    false
}

pub fn run(mut app: App) -> std::io::Result<()> {
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut tasks = Tasks::new(tx);

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        let animating = app.flags.open && (app.flags.loading || app.flags.listening);
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 6.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &mut app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating { ANIMATION_POLL } else { IDLE_POLL };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain all pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = dispatch_event(&mut app, &mut tui, &event)
                && apply(&mut app, &mut tui, &mut tasks, action)
            {
                break 'main;
            }
        }

        // Results from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if apply(&mut app, &mut tui, &mut tasks, action) {
                break 'main;
            }
        }
    }

    tasks.stop_recognition();
    ratatui::restore();
    info!("Everest shutting down");
    Ok(())
}

fn send_action(tx: &mpsc::Sender<Action>, action: Action) {
    if tx.send(action).is_err() {
        warn!("Failed to deliver background result: receiver dropped");
    }
}

fn spawn_request(backend: Arc<dyn ChatBackend>, request: ChatRequest, tx: mpsc::Sender<Action>) {
    info!("Spawning chat request via {}", backend.name());
    tokio::spawn(async move {
        let started = Instant::now();
        let result = backend.send(&request).await;
        debug!(
            "Chat request settled in {:?} (ok={})",
            started.elapsed(),
            result.is_ok()
        );
        send_action(&tx, Action::from_backend_result(result));
    });
}

fn spawn_recognition(
    recognizer: Arc<dyn SpeechRecognizer>,
    locale: &'static str,
    tx: mpsc::Sender<Action>,
) -> AbortHandle {
    info!("Starting speech recognition ({}, {})", recognizer.name(), locale);
    tokio::spawn(async move {
        let action = match recognizer.recognize(locale).await {
            Ok(transcript) => Action::TranscriptReady(transcript),
            Err(SpeechError::NoSpeech) => Action::ListeningEnded,
            Err(e) => Action::ListeningFailed(e.to_string()),
        };
        send_action(&tx, action);
    })
    .abort_handle()
}

fn spawn_playback(audio: AudioCapability, payload: String) {
    tokio::spawn(async move {
        play_audio(&audio, Some(&payload)).await;
    });
}
