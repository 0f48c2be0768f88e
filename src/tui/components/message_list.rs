//! # MessageList Component
//!
//! Scrollable view of the conversation inside the chat panel.
//!
//! `MessageList` is a transient component (created each frame) wrapping
//! `&'a mut MessageListState` (persistent) and the `Conversation` (props).
//! Visitor bubbles sit on the right, assistant bubbles on the left, and
//! while a request is outstanding a typing indicator follows the last bubble.
//!
//! The conversation is append-only, so measured heights stay valid until
//! the width changes. Only new messages are measured on each frame.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message::{Conversation, Role};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Bubble;
use crate::tui::event::TuiEvent;

/// Bubbles take this share of the list width.
const BUBBLE_WIDTH_PERCENT: u16 = 85;
/// Blank row between bubbles.
const BUBBLE_GAP: u16 = 1;
const TYPING_HEIGHT: u16 = 3;
const TYPING_WIDTH: u16 = 9;
const TYPING_FRAMES: [&str; 4] = ["●○○", "○●○", "○○●", "○●○"];

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    /// Row height per message, gap included
    pub heights: Vec<u16>,
    /// Width the heights were measured at
    measured_width: u16,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            heights: Vec::new(),
            measured_width: 0,
            stick_to_bottom: true,
            viewport_height: 0,
        }
    }

    fn content_height(&self) -> u16 {
        self.heights.iter().sum()
    }

    /// Measure any messages not yet measured at `width`.
    pub fn measure(&mut self, conversation: &Conversation, width: u16) {
        if width != self.measured_width || self.heights.len() > conversation.len() {
            self.heights.clear();
            self.measured_width = width;
        }
        let bubble_width = bubble_width(width);
        for message in conversation.messages().iter().skip(self.heights.len()) {
            self.heights
                .push(Bubble::calculate_height(message, bubble_width) + BUBBLE_GAP);
        }
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.content_height().saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the visitor scrolls back to the end.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.content_height().saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    pub fn jump_to_bottom(&mut self) {
        self.stick_to_bottom = true;
        self.scroll_state.scroll_to_bottom();
    }
}

fn bubble_width(list_width: u16) -> u16 {
    (list_width as u32 * BUBBLE_WIDTH_PERCENT as u32 / 100) as u16
}

/// Scrollable conversation view component.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub conversation: &'a Conversation,
    pub is_loading: bool,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        conversation: &'a Conversation,
        is_loading: bool,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            conversation,
            is_loading,
            spinner_frame,
        }
    }
}

impl Component for MessageList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        let bubble_w = bubble_width(content_width);

        self.state.measure(self.conversation, content_width);
        let messages_height = self.state.content_height();
        let typing_height = if self.is_loading { TYPING_HEIGHT } else { 0 };
        let canvas_height = messages_height + typing_height;

        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y: u16 = 0;
        for (message, height) in self.conversation.messages().iter().zip(&self.state.heights) {
            let x = match message.role {
                Role::User => content_width.saturating_sub(bubble_w),
                Role::Assistant => 0,
            };
            let rect = Rect::new(x, y, bubble_w, height.saturating_sub(BUBBLE_GAP));
            scroll_view.render_widget(Bubble::new(message), rect);
            y += height;
        }

        if self.is_loading {
            let dots = TYPING_FRAMES[self.spinner_frame % TYPING_FRAMES.len()];
            let indicator = Paragraph::new(Span::styled(dots, Style::default().fg(Color::Gray)))
                .block(
                    Block::bordered()
                        .border_type(BorderType::Rounded)
                        .border_style(Style::default().fg(Color::DarkGray)),
                );
            let rect = Rect::new(0, y, TYPING_WIDTH.min(content_width), TYPING_HEIGHT);
            scroll_view.render_widget(indicator, rect);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => self.jump_to_bottom(),
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::Message;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn conversation(n: usize) -> Conversation {
        let mut conversation = Conversation::new();
        for i in 0..n {
            conversation.push(Message::user(format!("message {i}")));
        }
        conversation
    }

    #[test]
    fn test_measure_appends_only_new_messages() {
        let mut state = MessageListState::new();
        let mut conv = conversation(2);
        state.measure(&conv, 40);
        assert_eq!(state.heights.len(), 2);

        conv.push(Message::assistant("reply", None));
        state.measure(&conv, 40);
        assert_eq!(state.heights.len(), 3);
        // Bubble (3) + gap (1)
        assert!(state.heights.iter().all(|&h| h == 4));
    }

    #[test]
    fn test_measure_resets_on_width_change() {
        let mut state = MessageListState::new();
        let conv = Conversation::with_greeting("a fairly long greeting that will wrap at narrow widths");
        state.measure(&conv, 80);
        let wide = state.heights[0];
        state.measure(&conv, 20);
        assert!(state.heights[0] > wide);
    }

    #[test]
    fn test_scroll_up_unpins_and_end_repins() {
        let mut state = MessageListState::new();
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);
        state.handle_event(&TuiEvent::ScrollToBottom);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_scroll_down_repins_at_bottom() {
        let mut state = MessageListState::new();
        state.heights = vec![4, 4];
        state.viewport_height = 20;
        state.stick_to_bottom = false;
        state.handle_event(&TuiEvent::ScrollDown);
        assert!(state.stick_to_bottom);
        assert_eq!(state.scroll_state.offset().y, 0);
    }

    #[test]
    fn test_render_places_bubbles_by_role() {
        let mut conv = Conversation::new();
        conv.push(Message::user("Hi"));
        conv.push(Message::assistant("Hello", None));

        let backend = TestBackend::new(41, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = MessageListState::new();

        terminal
            .draw(|f| MessageList::new(&mut state, &conv, false, 0).render(f, f.area()))
            .unwrap();

        let buffer = terminal.backend().buffer();
        // User bubble is right-aligned: its left border starts past column 0
        assert_eq!(buffer[(0, 0)].symbol(), " ");
        // Assistant bubble starts at the left edge
        assert_eq!(buffer[(0, 4)].symbol(), "╭");
    }

    #[test]
    fn test_typing_indicator_while_loading() {
        let conv = conversation(1);
        let backend = TestBackend::new(40, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut state = MessageListState::new();

        terminal
            .draw(|f| MessageList::new(&mut state, &conv, true, 0).render(f, f.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("●○○"));
    }
}
