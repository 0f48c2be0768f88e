//! # Landing Page Component
//!
//! The property site behind the chat panel: title, welcome text, a content
//! placeholder and the launcher hint in the bottom-right corner.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

use crate::tui::component::Component;

pub const TITLE: &str = "Everest View Property";
pub const WELCOME: &str =
    "Welcome to our premium real estate platform. Browse the finest properties in Dubai.";
const PLACEHOLDER: &str = "Content Placeholder";

pub struct LandingPage {
    /// The chat panel is showing; the launcher offers to close it.
    pub panel_open: bool,
}

impl LandingPage {
    pub fn new(panel_open: bool) -> Self {
        Self { panel_open }
    }

    fn launcher(&self) -> Line<'static> {
        let (key, label) = if self.panel_open {
            ("Esc", "close chat")
        } else {
            ("Ctrl+T", "chat with Everest View AI")
        };
        Line::from(vec![
            Span::styled(
                format!(" {} ", key),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!(" {} ", label), Style::default().fg(Color::Blue)),
        ])
    }
}

impl Component for LandingPage {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [body, launcher_row] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);

        let card_width = body.width.saturating_sub(4).min(72);
        let [column] = Layout::horizontal([Constraint::Length(card_width)])
            .flex(Flex::Center)
            .areas(body);

        let [title_area, _, welcome_area, _, card_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Length(7),
        ])
        .flex(Flex::Center)
        .areas(column);

        frame.render_widget(
            Paragraph::new(Span::styled(
                TITLE,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            title_area,
        );

        frame.render_widget(
            Paragraph::new(WELCOME)
                .style(Style::default().fg(Color::Gray))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            welcome_area,
        );

        let card = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));
        let card_inner = card.inner(card_area);
        frame.render_widget(card, card_area);
        let [placeholder_row] = Layout::vertical([Constraint::Length(1)])
            .flex(Flex::Center)
            .areas(card_inner);
        frame.render_widget(
            Paragraph::new(PLACEHOLDER)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            placeholder_row,
        );

        frame.render_widget(
            Paragraph::new(self.launcher()).alignment(Alignment::Right),
            launcher_row,
        );
    }
}
