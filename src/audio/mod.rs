//! Audio rendering for Morse code.
//!
//! This module turns Morse strings into sound. It supports:
//! - Planning dots, dashes and gaps into timed tone events
//! - Sine tone synthesis at 8 kHz, 16-bit mono
//! - Background playback through rodio
//! - WAV export functionality

pub mod engine;
pub mod export;
pub mod tone;

pub use engine::{PlaybackError, PlaybackHandle, PlaybackReport, ToneOutput, TonePlayer};
pub use export::export_to_wav;
pub use tone::ToneSettings;
