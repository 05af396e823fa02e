//! Application state and event handling.
//!
//! This module defines the main application state that coordinates
//! between the Morse codec, the tone player, and the TUI interface.

use crate::audio::tone::{plan, total_duration};
use crate::audio::{export_to_wav, PlaybackHandle, TonePlayer};
use crate::morse::{looks_like_morse, Codec};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// How long a status message stays visible.
const STATUS_TIMEOUT: Duration = Duration::from_secs(3);

/// Default WAV export destination, relative to the working directory.
pub const DEFAULT_EXPORT_PATH: &str = "morse.wav";

/// What the output area currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputKind {
    /// Nothing converted yet.
    #[default]
    Empty,
    /// Result of a text to Morse conversion.
    Morse,
    /// Result of a Morse to text conversion.
    Text,
}

impl OutputKind {
    /// Title for the output panel.
    pub fn title(&self) -> &'static str {
        match self {
            OutputKind::Empty => " Output ",
            OutputKind::Morse => " Output (Morse) ",
            OutputKind::Text => " Output (Text) ",
        }
    }
}

/// Main application state.
pub struct App {
    /// Converter shared with every conversion action.
    codec: Codec,
    /// Tone player used for playback.
    player: TonePlayer,
    /// The single-line input field.
    input: String,
    /// Cursor position in the input, in characters.
    cursor: usize,
    /// The output area.
    output: String,
    /// What the output area holds.
    pub output_kind: OutputKind,
    /// Temporary status line message and when it was set.
    pub status_message: Option<(String, Instant)>,
    /// Whether the help overlay is visible.
    pub show_help: bool,
    /// Playback currently running, if any.
    playback: Option<PlaybackHandle>,
    /// Where Ctrl+W writes the WAV file.
    pub export_path: PathBuf,
}

impl App {
    /// Creates the application state.
    pub fn new(codec: Codec, player: TonePlayer) -> Self {
        Self {
            codec,
            player,
            input: String::new(),
            cursor: 0,
            output: String::new(),
            output_kind: OutputKind::Empty,
            status_message: None,
            show_help: false,
            playback: None,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// Cursor position in the input, in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Sets a status message to display temporarily.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Clears expired status messages.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() > STATUS_TIMEOUT {
                self.status_message = None;
            }
        }
    }

    // ========== INPUT EDITING ==========

    /// Byte offset of the cursor in the input string.
    fn cursor_byte(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map_or(self.input.len(), |(i, _)| i)
    }

    /// Inserts a character at the cursor.
    pub fn insert_char(&mut self, c: char) {
        let at = self.cursor_byte();
        self.input.insert(at, c);
        self.cursor += 1;
    }

    /// Deletes the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.cursor_byte();
            self.input.remove(at);
        }
    }

    /// Deletes the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let at = self.cursor_byte();
            self.input.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.input.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    // ========== CONVERSION ==========

    /// Encodes the input as Morse into the output area.
    pub fn convert_to_morse(&mut self) {
        self.output = self.codec.text_to_morse(&self.input);
        self.output_kind = OutputKind::Morse;
        self.set_status("Converted text to Morse");
    }

    /// Decodes the input as Morse into the output area.
    pub fn convert_to_text(&mut self) {
        self.output = self.codec.morse_to_text(&self.input);
        self.output_kind = OutputKind::Text;
        self.set_status("Converted Morse to text");
    }

    /// Converts in whichever direction fits the input.
    pub fn convert(&mut self) {
        if looks_like_morse(&self.input) {
            self.convert_to_text();
        } else {
            self.convert_to_morse();
        }
    }

    /// Clears both the input and the output.
    pub fn clear(&mut self) {
        self.input.clear();
        self.cursor = 0;
        self.output.clear();
        self.output_kind = OutputKind::Empty;
        self.set_status("Cleared");
    }

    /// Moves the output into the input field, ready for the reverse conversion.
    pub fn copy_output_to_input(&mut self) {
        if self.output.is_empty() {
            self.set_status("Nothing to copy");
            return;
        }
        self.input = self.output.clone();
        self.move_end();
        self.set_status("Copied output to input");
    }

    /// The Morse string that play and export act on.
    ///
    /// Prefers the output area; falls back to the input when the output is
    /// text (for example right after decoding).
    fn playable_morse(&self) -> Option<String> {
        [&self.output, &self.input]
            .into_iter()
            .find(|s| looks_like_morse(s))
            .cloned()
    }

    // ========== PLAYBACK ==========

    /// Returns true while a playback is running.
    pub fn is_playing(&self) -> bool {
        self.playback.is_some()
    }

    /// Starts playing the current Morse string in the background.
    ///
    /// A request while another playback is running is refused.
    pub fn play(&mut self) {
        if self.is_playing() {
            self.set_status("Playback already in progress");
            return;
        }
        let Some(morse) = self.playable_morse() else {
            self.set_status("Nothing to play - convert some text first");
            return;
        };

        match self.player.play(&morse) {
            Ok(handle) => {
                let length = total_duration(&plan(&morse, self.player.settings()));
                self.playback = Some(handle);
                self.set_status(format!("Playing ({:.1}s)", length.as_secs_f32()));
            }
            Err(e) => {
                tracing::error!("Failed to start playback: {}", e);
                self.set_status(format!("Playback failed: {}", e));
            }
        }
    }

    /// Collects the result of a finished playback, if any.
    ///
    /// Called once per frame from the event loop.
    pub fn update_playback(&mut self) {
        let Some(result) = self.playback.as_mut().and_then(PlaybackHandle::try_finish) else {
            return;
        };
        self.playback = None;

        match result {
            Ok(report) => self.set_status(format!(
                "Played {} tones ({:.1}s)",
                report.tones,
                report.duration.as_secs_f32()
            )),
            Err(e) => self.set_status(format!("Playback failed: {}", e)),
        }
    }

    // ========== EXPORT ==========

    /// Writes the current Morse string to [`App::export_path`] as WAV.
    ///
    /// Returns true on success.
    pub fn export(&mut self) -> bool {
        let Some(morse) = self.playable_morse() else {
            self.set_status("Nothing to export - convert some text first");
            return false;
        };

        match export_to_wav(&morse, self.player.settings(), &self.export_path) {
            Ok(report) => {
                self.set_status(format!(
                    "Exported {:.1}s to {}",
                    report.duration.as_secs_f32(),
                    self.export_path.display()
                ));
                true
            }
            Err(e) => {
                tracing::error!("Export failed: {:?}", e);
                self.set_status(format!("Export failed: {}", e));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Codec::default(), TonePlayer::default())
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.insert_char(c);
        }
    }

    fn status(app: &App) -> &str {
        app.status_message.as_ref().map_or("", |(m, _)| m.as_str())
    }

    #[test]
    fn test_editing() {
        let mut app = app();
        type_str(&mut app, "HLLO");
        app.move_home();
        app.move_right();
        app.insert_char('E');
        assert_eq!(app.input(), "HELLO");
        assert_eq!(app.cursor(), 2);

        app.move_end();
        app.backspace();
        assert_eq!(app.input(), "HELL");

        app.move_home();
        app.delete();
        assert_eq!(app.input(), "ELL");

        app.move_left();
        assert_eq!(app.cursor(), 0);
        app.backspace();
        assert_eq!(app.input(), "ELL");
    }

    #[test]
    fn test_editing_multibyte() {
        let mut app = app();
        type_str(&mut app, "aé");
        app.move_left();
        app.insert_char('ü');
        assert_eq!(app.input(), "aüé");
        app.move_end();
        app.backspace();
        assert_eq!(app.input(), "aü");
    }

    #[test]
    fn test_convert_both_ways() {
        let mut app = app();
        type_str(&mut app, "sos");
        app.convert_to_morse();
        assert_eq!(app.output(), "... --- ...");
        assert_eq!(app.output_kind, OutputKind::Morse);

        app.copy_output_to_input();
        assert_eq!(app.input(), "... --- ...");
        assert_eq!(app.cursor(), 11);

        app.convert_to_text();
        assert_eq!(app.output(), "SOS");
        assert_eq!(app.output_kind, OutputKind::Text);
    }

    #[test]
    fn test_convert_picks_direction() {
        let mut app = app();
        type_str(&mut app, "HI");
        app.convert();
        assert_eq!(app.output(), ".... ..");

        app.clear();
        type_str(&mut app, ".... ..");
        app.convert();
        assert_eq!(app.output(), "HI");
    }

    #[test]
    fn test_clear() {
        let mut app = app();
        type_str(&mut app, "E");
        app.convert_to_morse();
        app.clear();
        assert_eq!(app.input(), "");
        assert_eq!(app.output(), "");
        assert_eq!(app.cursor(), 0);
        assert_eq!(app.output_kind, OutputKind::Empty);
    }

    #[test]
    fn test_copy_empty_output() {
        let mut app = app();
        type_str(&mut app, "keep");
        app.copy_output_to_input();
        assert_eq!(app.input(), "keep");
        assert_eq!(status(&app), "Nothing to copy");
    }

    #[test]
    fn test_playable_morse_prefers_output() {
        let mut app = app();
        assert_eq!(app.playable_morse(), None);

        type_str(&mut app, "E");
        app.convert_to_morse();
        assert_eq!(app.playable_morse().as_deref(), Some("."));

        app.clear();
        type_str(&mut app, "-");
        app.convert_to_text();
        assert_eq!(app.output(), "T");
        assert_eq!(app.playable_morse().as_deref(), Some("-"));
    }

    #[test]
    fn test_play_without_morse() {
        let mut app = app();
        app.play();
        assert!(!app.is_playing());
        assert!(status(&app).starts_with("Nothing to play"));
    }

    #[test]
    fn test_export_writes_file() {
        let mut app = app();
        app.export_path =
            std::env::temp_dir().join(format!("morsetui-app-{}.wav", std::process::id()));
        type_str(&mut app, "E");
        app.convert_to_morse();

        assert!(app.export());
        assert!(app.export_path.exists());
        std::fs::remove_file(&app.export_path).unwrap();
    }

    #[test]
    fn test_export_without_morse() {
        let mut app = app();
        assert!(!app.export());
        assert!(status(&app).starts_with("Nothing to export"));
    }

    #[test]
    fn test_status_expires() {
        let mut app = app();
        app.set_status("hello");
        app.clear_expired_status();
        assert!(app.status_message.is_some());

        app.status_message = Some(("old".to_string(), Instant::now() - Duration::from_secs(10)));
        app.clear_expired_status();
        assert!(app.status_message.is_none());
    }
}
