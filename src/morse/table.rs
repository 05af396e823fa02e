//! The Morse symbol table.
//!
//! Maps the letters A-Z and digits 0-9 to their International Morse codes
//! and back. The table is built once and then only read, so it is shared
//! between codecs behind an `Arc`.

use std::collections::HashMap;

/// International Morse codes for the supported symbols.
const SYMBOLS: [(char, &str); 36] = [
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
];

const _: () = assert!(is_one_to_one(&SYMBOLS), "Morse table is not one-to-one");

const fn str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

const fn is_dot_dash(code: &str) -> bool {
    let bytes = code.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'.' && bytes[i] != b'-' {
            return false;
        }
        i += 1;
    }
    true
}

/// Returns true if every code is a non-empty dot/dash string and neither
/// symbols nor codes repeat, so the table has an exact inverse.
const fn is_one_to_one(pairs: &[(char, &str)]) -> bool {
    let mut i = 0;
    while i < pairs.len() {
        if !is_dot_dash(pairs[i].1) {
            return false;
        }
        let mut j = i + 1;
        while j < pairs.len() {
            if pairs[i].0 as u32 == pairs[j].0 as u32 || str_eq(pairs[i].1, pairs[j].1) {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

/// Bidirectional character <-> Morse code mapping.
///
/// The forward and inverse maps are always exact inverses of each other:
/// every supported character has exactly one code and no two characters
/// share a code.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    /// Character to code.
    encode: HashMap<char, &'static str>,
    /// Code to character.
    decode: HashMap<&'static str, char>,
}

impl SymbolTable {
    /// Builds the standard A-Z / 0-9 table.
    pub fn standard() -> Self {
        let mut encode = HashMap::with_capacity(SYMBOLS.len());
        let mut decode = HashMap::with_capacity(SYMBOLS.len());

        for &(symbol, code) in SYMBOLS.iter() {
            encode.insert(symbol, code);
            decode.insert(code, symbol);
        }

        Self { encode, decode }
    }

    /// Returns the code for an uppercase letter or digit.
    pub fn code_for(&self, symbol: char) -> Option<&'static str> {
        self.encode.get(&symbol).copied()
    }

    /// Returns the character for a single letter token such as `"-.-."`.
    pub fn symbol_for(&self, code: &str) -> Option<char> {
        self.decode.get(code).copied()
    }

    /// Number of supported symbols.
    pub fn len(&self) -> usize {
        self.encode.len()
    }

    /// Always false for the standard table.
    pub fn is_empty(&self) -> bool {
        self.encode.is_empty()
    }

    /// Iterates over `(symbol, code)` pairs in table order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &'static str)> + '_ {
        SYMBOLS.iter().copied()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_covers_letters_and_digits() {
        let table = SymbolTable::standard();
        assert_eq!(table.len(), 36);
        for c in ('A'..='Z').chain('0'..='9') {
            assert!(table.code_for(c).is_some(), "missing code for {}", c);
        }
    }

    #[test]
    fn test_tables_are_inverse() {
        let table = SymbolTable::standard();
        for (symbol, code) in table.iter() {
            assert_eq!(table.code_for(symbol), Some(code));
            assert_eq!(table.symbol_for(code), Some(symbol));
        }
    }

    #[test]
    fn test_codes_are_unique_and_well_formed() {
        let table = SymbolTable::standard();
        let codes: HashSet<&str> = table.iter().map(|(_, code)| code).collect();
        assert_eq!(codes.len(), table.len());
        for code in codes {
            assert!(!code.is_empty());
            assert!(code.chars().all(|c| c == '.' || c == '-'));
        }
    }

    #[test]
    fn test_one_to_one_check() {
        assert!(is_one_to_one(&SYMBOLS));
        assert!(is_one_to_one(&[]));
        assert!(!is_one_to_one(&[('A', ".-"), ('B', ".-")]));
        assert!(!is_one_to_one(&[('A', ".-"), ('A', "-...")]));
        assert!(!is_one_to_one(&[('A', "")]));
        assert!(!is_one_to_one(&[('A', ".x")]));
    }

    #[test]
    fn test_lookup_misses() {
        let table = SymbolTable::standard();
        assert_eq!(table.code_for('a'), None); // callers uppercase first
        assert_eq!(table.code_for('!'), None);
        assert_eq!(table.symbol_for("......."), None);
        assert_eq!(table.symbol_for(""), None);
    }
}
