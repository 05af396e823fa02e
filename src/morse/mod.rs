//! Morse code conversion.
//!
//! This module provides the symbol table and the codec that turns text
//! into Morse code and back.

mod codec;
mod table;

pub use codec::{Codec, LETTER_SEPARATOR, UNKNOWN_MARKER, WORD_SEPARATOR};
pub use table::SymbolTable;

/// Returns true if the string looks like Morse code rather than text.
///
/// Only dots, dashes, whitespace and the unknown marker are allowed, and at
/// least one dot or dash must be present. Used by the front-ends to pick a
/// sensible default direction for conversion and playback.
///
/// # Examples
///
/// ```
/// use morsetui::morse::looks_like_morse;
///
/// assert!(looks_like_morse("... --- ..."));
/// assert!(!looks_like_morse("SOS"));
/// assert!(!looks_like_morse("   "));
/// ```
pub fn looks_like_morse(input: &str) -> bool {
    let stripped = input.replace(UNKNOWN_MARKER, "");
    stripped.chars().any(|c| c == '.' || c == '-')
        && stripped
            .chars()
            .all(|c| c == '.' || c == '-' || c.is_whitespace())
}
