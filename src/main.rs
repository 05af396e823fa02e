//! morsetui - A terminal Morse code converter and player.
//!
//! This application converts text to Morse code and back, plays Morse as
//! audible tones, and exports it to WAV files.
//!
//! # Features
//!
//! - Text to Morse and Morse to text conversion (A-Z, 0-9)
//! - Background tone playback using rodio
//! - WAV export functionality (8 kHz, 16-bit mono)
//! - Optional JSON tone settings (pitch and timings)
//! - Batch mode for scripting
//!
//! # Usage
//!
//! ```bash
//! cargo run                            # Start the terminal UI
//! cargo run -- --encode "HELLO WORLD"  # Print Morse and exit
//! cargo run -- -d "... --- ..." --play # Print text, play the Morse
//! ```
//!
//! Press F1 for help with keyboard shortcuts.

use morsetui::app::App;
use morsetui::audio::{export_to_wav, ToneSettings, TonePlayer};
use morsetui::morse::{Codec, SymbolTable};
use morsetui::ui;

use anyhow::{bail, Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// What to convert in batch mode.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Conversion {
    /// Encode text to Morse.
    Encode(String),
    /// Decode Morse to text.
    Decode(String),
}

/// Command-line options for the application.
#[derive(Debug, Default)]
struct CliOptions {
    /// Conversion to run without the UI.
    conversion: Option<Conversion>,
    /// Play the Morse after converting.
    play: bool,
    /// Write the Morse to a WAV file.
    export: Option<PathBuf>,
    /// Path to a JSON tone settings file.
    settings: Option<PathBuf>,
}

impl CliOptions {
    /// Parses command-line arguments.
    ///
    /// Supports:
    /// - `--encode <text>` or `-e <text>`: Print the Morse for the text
    /// - `--decode <morse>` or `-d <morse>`: Print the text for the Morse
    /// - `--play` or `-p`: Play the Morse after converting
    /// - `--export <path>` or `-o <path>`: Write the Morse to a WAV file
    /// - `--settings <path>` or `-s <path>`: Load tone settings (JSON)
    /// - `--help` or `-h`: Print help and exit
    fn parse() -> Result<Self> {
        let args: Vec<String> = std::env::args().collect();
        let program = args.first().map_or("morsetui", String::as_str);
        let mut options = Self::default();
        let mut i = 1;

        // Returns the value following a flag.
        let value = |i: usize, flag: &str| -> Result<String> {
            match args.get(i + 1) {
                Some(v) => Ok(v.clone()),
                None => bail!("{} requires an argument", flag),
            }
        };

        while i < args.len() {
            match args[i].as_str() {
                flag @ ("--encode" | "-e") => {
                    options.conversion = Some(Conversion::Encode(value(i, flag)?));
                    i += 1;
                }
                flag @ ("--decode" | "-d") => {
                    options.conversion = Some(Conversion::Decode(value(i, flag)?));
                    i += 1;
                }
                "--play" | "-p" => options.play = true,
                flag @ ("--export" | "-o") => {
                    options.export = Some(PathBuf::from(value(i, flag)?));
                    i += 1;
                }
                flag @ ("--settings" | "-s") => {
                    options.settings = Some(PathBuf::from(value(i, flag)?));
                    i += 1;
                }
                "--help" | "-h" => {
                    print_help(program);
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown option: {}", other);
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
            i += 1;
        }

        if options.conversion.is_none() && (options.play || options.export.is_some()) {
            bail!("--play and --export need --encode or --decode");
        }

        Ok(options)
    }
}

fn print_help(program: &str) {
    eprintln!("morsetui - Morse code converter and player");
    eprintln!();
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -e, --encode TEXT     Print the Morse code for TEXT");
    eprintln!("  -d, --decode MORSE    Print the text for MORSE (words separated by 3 spaces)");
    eprintln!("  -p, --play            Play the Morse code after converting");
    eprintln!("  -o, --export PATH     Write the Morse code to a WAV file");
    eprintln!("  -s, --settings PATH   Load tone settings from a JSON file");
    eprintln!("  -h, --help            Print this help message");
    eprintln!();
    eprintln!("Without --encode or --decode the interactive terminal UI starts.");
}

/// Log filter from `RUST_LOG`, or a quiet default.
///
/// The terminal UI shares stderr with the alternate screen, so it logs
/// nothing unless `RUST_LOG` asks for it. Batch mode reports errors.
fn log_filter(directives: Option<String>, interactive: bool) -> EnvFilter {
    match directives {
        Some(directives) => EnvFilter::new(directives),
        None if interactive => EnvFilter::new("off"),
        None => EnvFilter::new("error"),
    }
}

/// Main entry point.
fn main() -> Result<()> {
    // Parse CLI options first (before any terminal setup)
    let cli = CliOptions::parse()?;

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(
            std::env::var(EnvFilter::DEFAULT_ENV).ok(),
            cli.conversion.is_none(),
        ))
        .with_writer(std::io::stderr)
        .init();

    let settings = match &cli.settings {
        Some(path) => ToneSettings::load(path)?,
        None => ToneSettings::default(),
    };

    // One table for the whole process, shared by every codec.
    let table = Arc::new(SymbolTable::standard());
    let codec = Codec::new(Arc::clone(&table));
    let player = TonePlayer::new(settings);

    if let Some(conversion) = &cli.conversion {
        return run_batch(&cli, conversion, &codec, &player);
    }

    let mut terminal = setup_terminal().context("Failed to setup terminal")?;
    let mut app = App::new(codec, player);

    // Run main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    restore_terminal(&mut terminal).context("Failed to restore terminal")?;

    // Handle any errors from the main loop
    result
}

/// Converts, prints, and optionally exports and plays, without the UI.
fn run_batch(
    cli: &CliOptions,
    conversion: &Conversion,
    codec: &Codec,
    player: &TonePlayer,
) -> Result<()> {
    let morse = match conversion {
        Conversion::Encode(text) => {
            let morse = codec.text_to_morse(text);
            println!("{}", morse);
            morse
        }
        Conversion::Decode(morse) => {
            println!("{}", codec.morse_to_text(morse));
            morse.clone()
        }
    };

    if let Some(path) = &cli.export {
        export_to_wav(&morse, player.settings(), path)?;
    }

    if cli.play {
        let handle = player.play(&morse).context("Failed to start playback")?;
        handle.wait().context("Playback failed")?;
    }

    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.update_playback();
        app.clear_expired_status();

        terminal.draw(|frame| ui::render(frame, app))?;

        // Short timeout so playback completion shows up promptly
        if event::poll(Duration::from_millis(16))? {
            if let Event::Key(key) = event::read()? {
                // Only handle key press events (not release)
                if key.kind == KeyEventKind::Press && handle_key(app, key.code, key.modifiers) {
                    return Ok(());
                }
            }
        }
    }
}

/// Handles a key press. Returns true when the app should exit.
fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> bool {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);

    // Help overlay is visible - only handle close
    if app.show_help {
        if matches!(code, KeyCode::F(1) | KeyCode::Esc) {
            app.show_help = false;
        }
        return false;
    }

    match code {
        KeyCode::Char('c') if ctrl => return true,
        KeyCode::Esc => return true,
        KeyCode::F(1) => app.show_help = true,

        KeyCode::Enter => app.convert(),
        KeyCode::Char('e') if ctrl => app.convert_to_morse(),
        KeyCode::Char('d') if ctrl => app.convert_to_text(),
        KeyCode::Char('l') if ctrl => app.clear(),
        KeyCode::Char('y') if ctrl => app.copy_output_to_input(),
        KeyCode::Char('p') if ctrl => app.play(),
        KeyCode::Char('w') if ctrl => {
            app.export();
        }

        KeyCode::Char(c) if !ctrl && !modifiers.contains(KeyModifiers::ALT) => {
            app.insert_char(c)
        }
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Left => app.move_left(),
        KeyCode::Right => app.move_right(),
        KeyCode::Home => app.move_home(),
        KeyCode::End => app.move_end(),
        _ => {}
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(Codec::default(), TonePlayer::default())
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_key(app, code, KeyModifiers::NONE)
    }

    fn ctrl(app: &mut App, c: char) -> bool {
        handle_key(app, KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_typing_and_converting() {
        let mut app = app();
        for c in "sos".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert!(!press(&mut app, KeyCode::Enter));
        assert_eq!(app.output(), "... --- ...");

        ctrl(&mut app, 'y');
        ctrl(&mut app, 'd');
        assert_eq!(app.output(), "SOS");

        ctrl(&mut app, 'l');
        assert_eq!(app.input(), "");
    }

    #[test]
    fn test_control_keys_do_not_type() {
        let mut app = app();
        ctrl(&mut app, 'e');
        assert_eq!(app.input(), "");
    }

    #[test]
    fn test_help_captures_keys() {
        let mut app = app();
        press(&mut app, KeyCode::F(1));
        assert!(app.show_help);

        // Esc closes help instead of quitting
        assert!(!press(&mut app, KeyCode::Esc));
        assert!(!app.show_help);
    }

    #[test]
    fn test_log_filter_defaults() {
        use tracing_subscriber::filter::LevelFilter;

        assert_eq!(log_filter(None, true).max_level_hint(), Some(LevelFilter::OFF));
        assert_eq!(log_filter(None, false).max_level_hint(), Some(LevelFilter::ERROR));
        assert_eq!(
            log_filter(Some("debug".to_string()), true).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Esc));
        assert!(ctrl(&mut app, 'c'));
    }
}
