use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    COMPOSER_HEIGHT, Composer, Header, LandingPage, MessageList,
};

/// Preferred chat panel size; shrinks to fit small terminals.
const PANEL_WIDTH: u16 = 56;
const PANEL_HEIGHT: u16 = 30;
/// Gap kept between the panel and the screen edges.
const PANEL_MARGIN: u16 = 1;
/// The launcher hint occupies the last row.
const LAUNCHER_ROWS: u16 = 1;

/// Where the chat panel sits: anchored bottom-right, above the launcher.
pub fn panel_area(area: Rect) -> Rect {
    let max_width = area.width.saturating_sub(PANEL_MARGIN * 2);
    let max_height = area.height.saturating_sub(PANEL_MARGIN + LAUNCHER_ROWS);
    let width = PANEL_WIDTH.min(max_width);
    let height = PANEL_HEIGHT.min(max_height);
    let x = area.x + area.width.saturating_sub(width + PANEL_MARGIN);
    let y = area.y + area.height.saturating_sub(height + LAUNCHER_ROWS);
    Rect::new(x, y, width, height)
}

fn footer(app: &App) -> Line<'static> {
    let key = Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD);
    let label = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled("Ctrl+L", key),
        Span::styled(" language  ", label),
    ];
    if app.speech.is_available() {
        let text = if app.flags.listening { " stop  " } else { " speak  " };
        spans.push(Span::styled("Ctrl+V", key));
        spans.push(Span::styled(text, label));
    }
    if app.audio.is_available() && app.conversation.latest_audio().is_some() {
        spans.push(Span::styled("Ctrl+P", key));
        spans.push(Span::styled(" play  ", label));
    }
    spans.push(Span::styled("Esc", key));
    spans.push(Span::styled(" close", label));
    Line::from(spans)
}

pub fn draw_ui(frame: &mut Frame, app: &mut App, tui: &mut TuiState, spinner_frame: usize) {
    let area = frame.area();
    LandingPage::new(app.flags.open).render(frame, area);

    if !app.flags.open {
        return;
    }

    let panel = panel_area(area);
    frame.render_widget(Clear, panel);
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Blue));
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let listening_rows = if app.flags.listening { 1 } else { 0 };
    let [header_area, list_area, listening_area, composer_area, footer_area] =
        Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(listening_rows),
            Constraint::Length(COMPOSER_HEIGHT),
            Constraint::Length(1),
        ])
        .areas(inner);

    Header::new(
        app.language,
        &app.status_message,
        app.lead_status.as_ref(),
        app.speech.is_available(),
    )
    .render(frame, header_area);

    MessageList::new(
        &mut tui.message_list,
        &app.conversation,
        app.flags.loading,
        spinner_frame,
    )
    .render(frame, list_area);

    if app.flags.listening {
        let dot = if spinner_frame % 2 == 0 { "● " } else { "○ " };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(dot, Style::default().fg(Color::Red)),
                Span::styled("Listening...", Style::default().fg(Color::Red)),
            ])),
            listening_area,
        );
    }

    Composer::new(
        &mut app.composer,
        &mut tui.composer,
        app.language,
        app.flags.loading,
    )
    .render(frame, composer_area);

    frame.render_widget(Paragraph::new(footer(app)), footer_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::platform::SpeechCapability;
    use crate::test_support::{ScriptedRecognizer, test_app};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn draw(app: &mut App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut tui = TuiState::new();
        terminal.draw(|f| draw_ui(f, app, &mut tui, 0)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_panel_area_anchors_bottom_right() {
        let area = Rect::new(0, 0, 120, 40);
        let panel = panel_area(area);
        assert_eq!(panel.width, PANEL_WIDTH);
        assert_eq!(panel.height, PANEL_HEIGHT);
        assert_eq!(panel.right(), 119);
        assert_eq!(panel.bottom(), 39);
    }

    #[test]
    fn test_panel_area_shrinks_on_small_terminal() {
        let area = Rect::new(0, 0, 40, 12);
        let panel = panel_area(area);
        assert_eq!(panel.width, 38);
        assert_eq!(panel.height, 10);
        assert!(panel.right() <= area.right());
        assert!(panel.bottom() <= area.bottom());
    }

    #[test]
    fn test_panel_area_zero_sized_terminal() {
        assert_eq!(panel_area(Rect::new(0, 0, 0, 0)).area(), 0);
    }

    #[test]
    fn test_closed_panel_shows_only_landing() {
        let mut app = test_app();
        let text = draw(&mut app, 100, 32);
        assert!(text.contains("Everest View Property"));
        assert!(!text.contains("Marhaba"));
    }

    #[test]
    fn test_open_panel_shows_greeting_and_placeholder() {
        let mut app = test_app();
        update(&mut app, Action::OpenPanel);
        let text = draw(&mut app, 100, 32);
        assert!(text.contains("Marhaba"));
        assert!(text.contains("Type your message..."));
        assert!(text.contains("Online"));
    }

    #[test]
    fn test_listening_indicator_and_voice_hint() {
        let recognizer = Arc::new(ScriptedRecognizer::transcript("hello"));
        let mut app = test_app().with_speech(SpeechCapability::Available(recognizer));
        update(&mut app, Action::OpenPanel);
        let idle = draw(&mut app, 100, 32);
        assert!(idle.contains("speak"));

        update(&mut app, Action::StartListening);
        let listening = draw(&mut app, 100, 32);
        assert!(listening.contains("Listening..."));
        assert!(listening.contains("stop"));
    }

    #[test]
    fn test_voice_hint_hidden_without_speech() {
        let mut app = test_app();
        update(&mut app, Action::OpenPanel);
        assert!(!draw(&mut app, 100, 32).contains("Ctrl+V"));
    }
}
