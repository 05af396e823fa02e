//! Text <-> Morse conversion.
//!
//! Encoded lines separate letters with one space and words with three.
//! Characters or tokens that have no mapping are rendered as
//! [`UNKNOWN_MARKER`] instead of failing the conversion.

use super::table::SymbolTable;
use std::sync::Arc;

/// Gap between the codes of two letters in the same word.
pub const LETTER_SEPARATOR: &str = " ";

/// Gap between two words.
pub const WORD_SEPARATOR: &str = "   ";

/// Placeholder for characters or tokens that have no mapping.
pub const UNKNOWN_MARKER: &str = "[?]";

/// Converts between plain text and Morse code.
///
/// Cloning a codec is cheap: the symbol table is shared.
#[derive(Debug, Clone)]
pub struct Codec {
    table: Arc<SymbolTable>,
}

impl Codec {
    /// Creates a codec that reads from the given shared table.
    pub fn new(table: Arc<SymbolTable>) -> Self {
        Self { table }
    }

    /// Returns the shared symbol table.
    pub fn table(&self) -> &Arc<SymbolTable> {
        &self.table
    }

    /// Encodes text as Morse code.
    ///
    /// Input is uppercased (ASCII) first. Each known character becomes its
    /// code followed by a letter gap; a space widens the preceding letter gap
    /// into a word gap; anything else becomes [`UNKNOWN_MARKER`].
    ///
    /// # Examples
    ///
    /// ```
    /// use morsetui::morse::Codec;
    ///
    /// let codec = Codec::default();
    /// assert_eq!(codec.text_to_morse("sos"), "... --- ...");
    /// assert_eq!(codec.text_to_morse("hi there"), ".... ..   - .... . .-. .");
    /// ```
    pub fn text_to_morse(&self, text: &str) -> String {
        let mut morse = String::with_capacity(text.len() * 5);

        for ch in text.chars().map(|c| c.to_ascii_uppercase()) {
            if ch == ' ' {
                // The previous letter already left one space behind it.
                morse.push_str(&WORD_SEPARATOR[LETTER_SEPARATOR.len()..]);
            } else if let Some(code) = self.table.code_for(ch) {
                morse.push_str(code);
                morse.push_str(LETTER_SEPARATOR);
            } else {
                morse.push_str(UNKNOWN_MARKER);
                morse.push_str(LETTER_SEPARATOR);
            }
        }

        morse.trim().to_string()
    }

    /// Decodes Morse code into text.
    ///
    /// Words are split on [`WORD_SEPARATOR`], letters on single spaces. Empty
    /// tokens from runs of extra spaces are skipped; tokens that are not in
    /// the table decode to [`UNKNOWN_MARKER`].
    ///
    /// # Examples
    ///
    /// ```
    /// use morsetui::morse::Codec;
    ///
    /// let codec = Codec::default();
    /// assert_eq!(codec.morse_to_text("... --- ..."), "SOS");
    /// assert_eq!(codec.morse_to_text(".... ..   - .... . .-. ."), "HI THERE");
    /// ```
    pub fn morse_to_text(&self, code: &str) -> String {
        let words: Vec<String> = code
            .split(WORD_SEPARATOR)
            .map(|word| self.decode_word(word))
            .filter(|word| !word.is_empty())
            .collect();

        words.join(" ").trim().to_string()
    }

    /// Decodes the letter tokens of a single word.
    fn decode_word(&self, word: &str) -> String {
        word.split(LETTER_SEPARATOR)
            .filter(|token| !token.is_empty())
            .fold(String::new(), |mut text, token| {
                match self.table.symbol_for(token) {
                    Some(symbol) => text.push(symbol),
                    None => text.push_str(UNKNOWN_MARKER),
                }
                text
            })
    }
}

impl Default for Codec {
    fn default() -> Self {
        Self::new(Arc::new(SymbolTable::standard()))
    }
}
