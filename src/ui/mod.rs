//! Terminal user interface components.
//!
//! This module provides the visual components for the converter: the input
//! line, the output area, the key hint bar and the status line.

mod help;

use crate::app::App;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

pub use help::render_help;

/// Key hints shown in the bottom bar, mirroring the converter's buttons.
const HINTS: &[(&str, &str)] = &[
    ("Enter", "Convert"),
    ("^E", "To Morse"),
    ("^D", "To Text"),
    ("^L", "Clear"),
    ("^Y", "Copy"),
    ("^P", "Play"),
    ("^W", "Export"),
    ("F1", "Help"),
    ("Esc", "Exit"),
];

/// Renders the complete UI layout.
///
/// The layout is divided into:
/// - Top: Title
/// - Input line with cursor
/// - Output area (wraps long Morse lines)
/// - Bottom: Key hints and status line
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(3), // Input
            Constraint::Min(3),    // Output
            Constraint::Length(1), // Key hints
            Constraint::Length(1), // Status
        ])
        .split(frame.area());

    render_title(frame, chunks[0], app);
    render_input(frame, chunks[1], app);
    render_output(frame, chunks[2], app);
    render_hints(frame, chunks[3]);
    render_status(frame, chunks[4], app);

    if app.show_help {
        render_help(frame);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![Span::styled(
        " Morse Code Converter ",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )];
    if app.is_playing() {
        spans.push(Span::styled(
            " ♪ playing",
            Style::default().fg(Color::Green),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" Input ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);

    // Keep the cursor visible on long input by scrolling horizontally.
    let width = inner.width.max(1) as usize;
    let scroll = app.cursor().saturating_sub(width - 1);
    let visible: String = app.input().chars().skip(scroll).take(width).collect();

    frame.render_widget(Paragraph::new(visible).block(block), area);

    if !app.show_help {
        frame.set_cursor_position((inner.x + (app.cursor() - scroll) as u16, inner.y));
    }
}

fn render_output(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(app.output_kind.title())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let paragraph = if app.output().is_empty() {
        Paragraph::new(Span::styled(
            "Type text or Morse above and press Enter",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        Paragraph::new(app.output()).wrap(Wrap { trim: false })
    };

    frame.render_widget(paragraph.block(block), area);
}

fn render_hints(frame: &mut Frame, area: Rect) {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(Color::Gray);

    let spans: Vec<Span> = HINTS
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(format!(" {}", key), key_style),
                Span::styled(format!(" {} ", desc), desc_style),
            ]
        })
        .collect();

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    if let Some((message, _)) = &app.status_message {
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {}", message),
                Style::default().fg(Color::Yellow),
            )),
            area,
        );
    }
}

/// Helper function to center a rectangle within another rectangle.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::TonePlayer;
    use crate::morse::Codec;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_shows_input_and_output() {
        let mut app = App::new(Codec::default(), TonePlayer::default());
        for c in "SOS".chars() {
            app.insert_char(c);
        }
        app.convert_to_morse();

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("SOS"));
        assert!(text.contains("... --- ..."));
        assert!(text.contains("Output (Morse)"));
    }

    #[test]
    fn test_render_help_overlay() {
        let mut app = App::new(Codec::default(), TonePlayer::default());
        app.show_help = true;

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();

        assert!(screen_text(&terminal).contains("Keyboard Shortcuts"));
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let rect = centered_rect(50, 50, area);
        assert_eq!(rect.width, 50);
        assert_eq!(rect.height, 25);
        assert_eq!(rect.x, 25);
    }
}
