//! Morse symbol table
//!
//! Static bidirectional mapping between Morse sequences and output
//! characters: A-Z, 0-9, a fixed punctuation subset, and a single space
//! symbol. Lookup is exact-string; letters always come out uppercase.

use std::collections::HashMap;

/// Sequence/character pairs, International Morse ordering.
const ENCODINGS: &[(&str, char)] = &[
    (".-", 'A'),
    ("-...", 'B'),
    ("-.-.", 'C'),
    ("-..", 'D'),
    (".", 'E'),
    ("..-.", 'F'),
    ("--.", 'G'),
    ("....", 'H'),
    ("..", 'I'),
    (".---", 'J'),
    ("-.-", 'K'),
    (".-..", 'L'),
    ("--", 'M'),
    ("-.", 'N'),
    ("---", 'O'),
    (".--.", 'P'),
    ("--.-", 'Q'),
    (".-.", 'R'),
    ("...", 'S'),
    ("-", 'T'),
    ("..-", 'U'),
    ("...-", 'V'),
    (".--", 'W'),
    ("-..-", 'X'),
    ("-.--", 'Y'),
    ("--..", 'Z'),
    (".----", '1'),
    ("..---", '2'),
    ("...--", '3'),
    ("....-", '4'),
    (".....", '5'),
    ("-....", '6'),
    ("--...", '7'),
    ("---..", '8'),
    ("----.", '9'),
    ("-----", '0'),
    ("--..--", ','),
    (".-.-.-", '.'),
    ("..--..", '?'),
    ("-.-.--", '!'),
    ("-..-.", '/'),
    ("-....-", '-'),
    (".-..-.", '"'),
    (".--.-.", '@'),
    ("---...", ':'),
    ("-.-.-.", ';'),
    ("-...-", '='),
    (".-.-.", '+'),
    ("-.--.", '('),
    ("-.--.-", ')'),
    ("..--.-", '_'),
    ("...-..-", '$'),
    (".-...", '&'),
    (" ", ' '),
];

/// Bidirectional Morse lookup.
pub struct SymbolTable {
    to_char: HashMap<&'static str, char>,
    to_sequence: HashMap<char, &'static str>,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut to_char = HashMap::new();
        let mut to_sequence = HashMap::new();
        for &(sequence, ch) in ENCODINGS {
            to_char.insert(sequence, ch);
            to_sequence.insert(ch, sequence);
        }
        Self {
            to_char,
            to_sequence,
        }
    }

    /// Resolve a sequence of `.`/`-` symbols to its character.
    ///
    /// Unknown sequences are not an error; they resolve to `None` and the
    /// caller discards them.
    pub fn lookup(&self, sequence: &str) -> Option<char> {
        self.to_char.get(sequence).copied()
    }

    /// Reverse direction: the sequence that types `ch`.
    ///
    /// Case-insensitive; letters are folded to uppercase before lookup.
    pub fn sequence_for(&self, ch: char) -> Option<&'static str> {
        let upper = ch.to_ascii_uppercase();
        self.to_sequence.get(&upper).copied()
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_and_digits() {
        let table = SymbolTable::new();
        assert_eq!(table.lookup("..."), Some('S'));
        assert_eq!(table.lookup("---"), Some('O'));
        assert_eq!(table.lookup(".-"), Some('A'));
        assert_eq!(table.lookup("-----"), Some('0'));
        assert_eq!(table.lookup(".----"), Some('1'));
    }

    #[test]
    fn test_punctuation_subset() {
        let table = SymbolTable::new();
        assert_eq!(table.lookup(".-.-.-"), Some('.'));
        assert_eq!(table.lookup("--..--"), Some(','));
        assert_eq!(table.lookup("..--.."), Some('?'));
        assert_eq!(table.lookup(".--.-."), Some('@'));
        assert_eq!(table.lookup("...-..-"), Some('$'));
        assert_eq!(table.lookup(".-..."), Some('&'));
    }

    #[test]
    fn test_space_symbol() {
        let table = SymbolTable::new();
        assert_eq!(table.lookup(" "), Some(' '));
        assert_eq!(table.sequence_for(' '), Some(" "));
    }

    #[test]
    fn test_unknown_sequence_is_none() {
        let table = SymbolTable::new();
        assert_eq!(table.lookup(""), None);
        assert_eq!(table.lookup("........"), None);
        // SOS keyed as one unbroken sequence is not a character
        assert_eq!(table.lookup("...---..."), None);
    }

    #[test]
    fn test_reverse_is_case_insensitive() {
        let table = SymbolTable::new();
        assert_eq!(table.sequence_for('s'), Some("..."));
        assert_eq!(table.sequence_for('S'), Some("..."));
        assert_eq!(table.sequence_for('%'), None);
    }
}
