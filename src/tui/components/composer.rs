//! # Composer Component
//!
//! The message input at the bottom of the panel.
//!
//! The text itself belongs to the core (`App::composer`) because sending
//! and voice transcription both change it. This component edits that string
//! through a mutable reference and keeps only the cursor as its own state.
//!
//! Arabic input is laid out right-to-left: the line is right-aligned and
//! the placeholder switches language.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::core::language::Language;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally.
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Offset from the area edge to the text (border + padding).
const TEXT_OFFSET: u16 = 2;
pub const COMPOSER_HEIGHT: u16 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum ComposerEvent {
    /// Enter with non-blank text.
    Submit(String),
    ContentChanged,
}

/// Persistent cursor state. Lives in `TuiState`.
#[derive(Debug, Default)]
pub struct ComposerState {
    /// Byte offset into the buffer (0..=buffer.len())
    pub cursor: usize,
}

impl ComposerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the cursor after the last character (after a transcript arrives).
    pub fn place_at_end(&mut self, buffer: &str) {
        self.cursor = buffer.len();
    }

    /// Keep the cursor valid after the buffer was changed from outside.
    pub fn clamp(&mut self, buffer: &str) {
        if self.cursor > buffer.len() || !buffer.is_char_boundary(self.cursor) {
            self.cursor = buffer.len();
        }
    }
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(text.len())
}

/// Byte offset where the visible window starts so that the cursor stays in view.
fn visible_start(buffer: &str, cursor: usize, width: usize) -> usize {
    if width == 0 {
        return cursor;
    }
    let mut start = 0;
    // Leave one cell for the cursor itself
    while start < cursor && buffer[start..cursor].width() >= width {
        start = next_char_boundary(buffer, start);
    }
    start
}

/// Transient component wrapping the composer text and its cursor.
pub struct Composer<'a> {
    pub buffer: &'a mut String,
    pub state: &'a mut ComposerState,
    pub language: Language,
    /// A request is outstanding; the send control is disabled.
    pub loading: bool,
}

impl<'a> Composer<'a> {
    pub fn new(
        buffer: &'a mut String,
        state: &'a mut ComposerState,
        language: Language,
        loading: bool,
    ) -> Self {
        state.clamp(buffer);
        Self {
            buffer,
            state,
            language,
            loading,
        }
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.state.cursor, text);
        self.state.cursor += text.len();
    }
}

impl Component for Composer<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(HORIZONTAL_OVERHEAD) as usize;
        let alignment = if self.language.is_rtl() {
            Alignment::Right
        } else {
            Alignment::Left
        };

        let send_hint = if self.loading || self.buffer.trim().is_empty() {
            Span::styled(" ⏎ ", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(" ⏎ ", Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD))
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Blue).add_modifier(Modifier::DIM))
            .title_bottom(Line::from(send_hint).right_aligned())
            .padding(Padding::horizontal(1));

        if self.buffer.is_empty() {
            let placeholder = Paragraph::new(self.language.placeholder())
                .style(Style::default().fg(Color::DarkGray))
                .alignment(alignment)
                .block(block);
            frame.render_widget(placeholder, area);
        } else {
            let start = visible_start(self.buffer.as_str(), self.state.cursor, inner_width);
            let visible = &self.buffer[start..];
            let paragraph = Paragraph::new(visible)
                .style(Style::default().fg(Color::White))
                .alignment(alignment)
                .block(block);
            frame.render_widget(paragraph, area);
        }

        let (x, y) = self.cursor_position(area);
        frame.set_cursor_position((x, y));
    }
}

impl Composer<'_> {
    /// Screen position of the cursor within `area`.
    pub fn cursor_position(&self, area: Rect) -> (u16, u16) {
        let inner_width = area.width.saturating_sub(HORIZONTAL_OVERHEAD) as usize;
        let left = area.x + TEXT_OFFSET;
        let right = area.x + area.width.saturating_sub(TEXT_OFFSET);
        let y = area.y + 1;

        let start = visible_start(self.buffer.as_str(), self.state.cursor, inner_width);
        let before = self.buffer[start..self.state.cursor].width() as u16;

        if self.language.is_rtl() {
            let line_width = (self.buffer[start..].width() as u16).min(inner_width as u16);
            let line_start = right.saturating_sub(line_width);
            ((line_start + before).min(right.saturating_sub(1).max(left)), y)
        } else {
            ((left + before).min(right), y)
        }
    }
}

impl EventHandler for Composer<'_> {
    type Event = ComposerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut tmp = [0u8; 4];
                self.insert(c.encode_utf8(&mut tmp));
                Some(ComposerEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single-line input: fold line breaks into spaces
                let flat = text.replace("\r\n", " ").replace(['\n', '\r'], " ");
                self.insert(&flat);
                Some(ComposerEvent::ContentChanged)
            }
            TuiEvent::Backspace => {
                if self.state.cursor == 0 {
                    return None;
                }
                let prev = prev_char_boundary(self.buffer.as_str(), self.state.cursor);
                self.buffer.drain(prev..self.state.cursor);
                self.state.cursor = prev;
                Some(ComposerEvent::ContentChanged)
            }
            TuiEvent::Delete => {
                if self.state.cursor >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(self.buffer.as_str(), self.state.cursor);
                self.buffer.drain(self.state.cursor..next);
                Some(ComposerEvent::ContentChanged)
            }
            TuiEvent::CursorLeft => (self.state.cursor > 0).then(|| {
                self.state.cursor = prev_char_boundary(self.buffer.as_str(), self.state.cursor);
                ComposerEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.state.cursor < self.buffer.len()).then(|| {
                self.state.cursor = next_char_boundary(self.buffer.as_str(), self.state.cursor);
                ComposerEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.state.cursor != 0).then(|| {
                self.state.cursor = 0;
                ComposerEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.state.cursor != self.buffer.len()).then(|| {
                self.state.cursor = self.buffer.len();
                ComposerEvent::ContentChanged
            }),
            TuiEvent::Submit => {
                // Blank or in-flight: the send control is disabled
                if self.loading || self.buffer.trim().is_empty() {
                    return None;
                }
                Some(ComposerEvent::Submit(self.buffer.clone()))
            }
            _ => None,
        }
    }
}
