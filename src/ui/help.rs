//! Help overlay rendering.
//!
//! Displays keyboard shortcuts and commands in a modal overlay.

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use super::centered_rect;

/// Key binding entry for the help display.
struct KeyBinding {
    key: &'static str,
    description: &'static str,
}

const CONVERT_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "Enter",
        description: "Convert (direction picked from the input)",
    },
    KeyBinding {
        key: "Ctrl+e",
        description: "Text to Morse",
    },
    KeyBinding {
        key: "Ctrl+d",
        description: "Morse to text",
    },
    KeyBinding {
        key: "Ctrl+y",
        description: "Copy output into the input line",
    },
    KeyBinding {
        key: "Ctrl+l",
        description: "Clear input and output",
    },
];

const AUDIO_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "Ctrl+p",
        description: "Play Morse (output, else input)",
    },
    KeyBinding {
        key: "Ctrl+w",
        description: "Export Morse to WAV",
    },
];

const EDIT_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "Left / Right",
        description: "Move cursor",
    },
    KeyBinding {
        key: "Home / End",
        description: "Jump to start / end",
    },
    KeyBinding {
        key: "Backspace / Del",
        description: "Delete character",
    },
];

const GENERAL_BINDINGS: &[KeyBinding] = &[
    KeyBinding {
        key: "F1",
        description: "Toggle this help",
    },
    KeyBinding {
        key: "Esc / Ctrl+c",
        description: "Exit",
    },
];

/// Renders the help overlay.
pub fn render_help(frame: &mut Frame) {
    let area = centered_rect(70, 80, frame.area());

    // Clear the area behind the popup
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help - Keyboard Shortcuts ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Fixed footer
        ])
        .split(inner);

    let section_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(Color::White);

    let mut lines: Vec<Line<'static>> = Vec::new();
    for (title, bindings) in [
        ("Convert", CONVERT_BINDINGS),
        ("Audio", AUDIO_BINDINGS),
        ("Editing", EDIT_BINDINGS),
        ("General", GENERAL_BINDINGS),
    ] {
        lines.push(Line::from(Span::styled(title, section_style)));
        for binding in bindings {
            lines.push(Line::from(vec![
                Span::styled(format!("{:17}", binding.key), key_style),
                Span::styled(binding.description, desc_style),
            ]));
        }
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), chunks[0]);

    let footer = Paragraph::new(Line::from(Span::styled(
        "Close: F1/Esc",
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    )));
    frame.render_widget(footer, chunks[1]);
}
