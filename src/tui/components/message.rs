use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::language::contains_arabic;
use crate::core::message::{Message, Role};
use crate::tui::component::Component;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

pub const ASSISTANT_NAME: &str = "Everest View AI";

/// A single chat bubble.
///
/// Transient: built each frame by `MessageList` for the visible messages.
/// Visitor bubbles are blue, assistant bubbles are gray. A bubble whose text
/// contains Arabic is laid out right-to-left.
///
/// [`calculate_height`](Self::calculate_height) predicts the rendered height
/// with `textwrap` so the list can size its scroll canvas before drawing.
#[derive(Clone, Copy)]
pub struct Bubble<'a> {
    pub message: &'a Message,
}

impl<'a> Bubble<'a> {
    pub fn new(message: &'a Message) -> Self {
        Self { message }
    }

    /// Height needed for `message` at `width`, borders included.
    ///
    /// The wrapping options must match ratatui's `Paragraph` wrapping so the
    /// prediction and the real layout agree.
    pub fn calculate_height(message: &Message, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        let content = message.content.trim();
        if content.is_empty() {
            return VERTICAL_OVERHEAD + 1;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines: usize = content
            .lines()
            .map(|line| textwrap::wrap(line, &options).len().max(1))
            .sum();
        (lines as u16).max(1) + VERTICAL_OVERHEAD
    }

    fn title(&self) -> Line<'static> {
        let (name, color) = match self.message.role {
            Role::User => ("You", Color::Blue),
            Role::Assistant => (ASSISTANT_NAME, Color::Gray),
        };
        let mut spans = vec![
            Span::styled(
                format!(" {} ", name),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{} ", self.message.sent_at.with_timezone(&chrono::Local).format("%H:%M")),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        if self.message.has_audio() {
            spans.push(Span::styled("♪ ", Style::default().fg(Color::Yellow)));
        }
        Line::from(spans)
    }
}

impl Widget for Bubble<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let (text_style, border_style) = match self.message.role {
            Role::User => (
                Style::default().fg(Color::White),
                Style::default().fg(Color::Blue),
            ),
            Role::Assistant => (
                Style::default().fg(Color::Gray),
                Style::default().fg(Color::DarkGray),
            ),
        };

        let content = self.message.content.trim();
        let alignment = if contains_arabic(content) {
            Alignment::Right
        } else {
            Alignment::Left
        };

        let block = Block::bordered()
            .title(self.title())
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        Paragraph::new(content)
            .style(text_style)
            .alignment(alignment)
            .wrap(Wrap { trim: true })
            .render(inner_area, buf);
    }
}

impl Component for Bubble<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
