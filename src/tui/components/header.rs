//! # Header Component
//!
//! First row of the chat panel: assistant name, status, language and,
//! once the backend has qualified the visitor, the lead status.
//!
//! Stateless. All data arrives as props, so the header renders whatever
//! it is given and tests build it directly.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::backend::LeadStatus;
use crate::core::language::Language;
use crate::tui::component::Component;
use crate::tui::components::message::ASSISTANT_NAME;

pub struct Header<'a> {
    pub language: Language,
    /// "Online", "Typing...", "Listening..." and so on
    pub status_message: &'a str,
    pub lead_status: Option<&'a LeadStatus>,
    /// Voice input is configured on this machine
    pub voice_available: bool,
}

impl<'a> Header<'a> {
    pub fn new(
        language: Language,
        status_message: &'a str,
        lead_status: Option<&'a LeadStatus>,
        voice_available: bool,
    ) -> Self {
        Self {
            language,
            status_message,
            lead_status,
            voice_available,
        }
    }

    fn status_color(&self) -> Color {
        match self.status_message {
            "Online" => Color::Green,
            "Listening..." => Color::Red,
            _ => Color::Yellow,
        }
    }

    fn left(&self) -> Line<'a> {
        Line::from(vec![
            Span::styled(
                ASSISTANT_NAME,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled("● ", Style::default().fg(self.status_color())),
            Span::styled(self.status_message, Style::default().fg(Color::Gray)),
        ])
    }

    fn right(&self) -> Line<'a> {
        let mut spans = Vec::new();
        if let Some(lead) = self.lead_status {
            let mut text = lead.status.map(|s| s.label().to_string()).unwrap_or_default();
            if let Some(score) = lead.score {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(&score.to_string());
            }
            text.push(' ');
            spans.push(Span::styled(text, Style::default().fg(Color::Magenta)));
        }
        if self.voice_available {
            spans.push(Span::styled("mic ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            format!("[{}]", self.language.label()),
            Style::default().fg(Color::Cyan),
        ));
        Line::from(spans).right_aligned()
    }
}

impl Component for Header<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let right = self.right();
        let right_width = (right.width() as u16).min(area.width);
        let [left_area, right_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(right_width)]).areas(area);

        frame.render_widget(Paragraph::new(self.left()), left_area);
        frame.render_widget(Paragraph::new(right), right_area);
    }
}
