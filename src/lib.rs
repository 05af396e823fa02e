//! morsetui - Morse code conversion and playback.
//!
//! This library provides the Morse codec, the tone player and the terminal
//! front-end state used by the `morsetui` binary.

pub mod app;
pub mod audio;
pub mod morse;
pub mod ui;

// Re-export commonly used types
pub use app::App;
pub use audio::{export_to_wav, PlaybackError, PlaybackHandle, ToneSettings, TonePlayer};
pub use morse::{Codec, SymbolTable};
