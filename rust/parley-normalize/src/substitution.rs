//! Whole-word substitution tables.
//!
//! A table maps a word (or a short run of words) to its replacement. Lookup
//! is case-insensitive and the replacement takes on the case of the text it
//! replaces:
//!
//! ```
//! use parley_normalize::SubstitutionTable;
//!
//! let table = SubstitutionTable::from_pairs([("apple", "banana"), ("he", "she")]).unwrap();
//! assert_eq!(table.substitute("An Apple, said he"), "An Banana, said she");
//! assert_eq!(table.substitute("APPLE"), "BANANA");
//! ```
//!
//! Substitution is a single left-to-right pass: replaced text is never
//! substituted again, which is what makes symmetric tables such as
//! `he ↔ she` work.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::SubstitutionError;

/// A case-insensitive, whole-word substitution dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct SubstitutionTable {
    /// Lower-cased key words joined by single spaces → lower-cased replacement.
    entries: BTreeMap<String, String>,
    /// Word count of the longest key.
    max_words: usize,
}

impl SubstitutionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(from, to)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self, SubstitutionError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut table = Self::new();
        for (from, to) in pairs {
            table.insert(from.as_ref(), to.as_ref())?;
        }
        Ok(table)
    }

    /// Add or replace one entry.
    pub fn insert(&mut self, from: &str, to: &str) -> Result<(), SubstitutionError> {
        let words: Vec<String> = from.split_whitespace().map(str::to_lowercase).collect();
        if words.is_empty() {
            return Err(SubstitutionError::EmptyKey);
        }
        if words.iter().any(|w| !w.chars().all(is_word_char)) {
            return Err(SubstitutionError::InvalidKey { key: from.to_string() });
        }

        self.max_words = self.max_words.max(words.len());
        self.entries.insert(words.join(" "), to.trim().to_lowercase());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Substitute every whole-word occurrence of every key in `text`.
    ///
    /// Longer keys win over shorter ones starting at the same word. Text
    /// between words is preserved exactly.
    pub fn substitute(&self, text: &str) -> String {
        if self.entries.is_empty() {
            return text.to_string();
        }

        let pieces = split_pieces(text);
        let mut out = String::with_capacity(text.len());
        let mut index = 0;

        while index < pieces.len() {
            let piece = &pieces[index];
            if !piece.word {
                out.push_str(piece.text);
                index += 1;
                continue;
            }

            match self.longest_match(&pieces, index) {
                Some((end, replacement)) => {
                    let matched: String = pieces[index..end].iter().map(|p| p.text).collect();
                    out.push_str(&apply_case(&matched, replacement));
                    index = end;
                }
                None => {
                    match self.head_match(piece.text) {
                        Some(replaced) => out.push_str(&replaced),
                        None => out.push_str(piece.text),
                    }
                    index += 1;
                }
            }
        }

        out
    }

    /// Substitute the part of `word` before its first apostrophe, so that
    /// `she'd` becomes `he'd` when only `she` is a key.
    fn head_match(&self, word: &str) -> Option<String> {
        let (head, tail) = word.split_at(word.find('\'')?);
        let replacement = self.entries.get(&head.to_lowercase())?;
        Some(format!("{}{tail}", apply_case(head, replacement)))
    }

    /// Find the longest key starting at word piece `start`.
    ///
    /// Returns the index one past the last piece consumed and the stored
    /// replacement.
    fn longest_match(&self, pieces: &[Piece<'_>], start: usize) -> Option<(usize, &str)> {
        let mut word_ends = vec![start];
        let mut cursor = start;
        while word_ends.len() < self.max_words {
            let gap = pieces.get(cursor + 1);
            let next = pieces.get(cursor + 2);
            match (gap, next) {
                (Some(gap), Some(next))
                    if !gap.word && next.word && gap.text.chars().all(char::is_whitespace) =>
                {
                    cursor += 2;
                    word_ends.push(cursor);
                }
                _ => break,
            }
        }

        for count in (1..=word_ends.len()).rev() {
            let key = word_ends[..count]
                .iter()
                .map(|&i| pieces[i].text.to_lowercase())
                .collect::<Vec<_>>()
                .join(" ");
            if let Some(replacement) = self.entries.get(&key) {
                return Some((word_ends[count - 1] + 1, replacement.as_str()));
            }
        }
        None
    }
}

impl TryFrom<BTreeMap<String, String>> for SubstitutionTable {
    type Error = SubstitutionError;

    fn try_from(entries: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        Self::from_pairs(entries)
    }
}

impl From<SubstitutionTable> for BTreeMap<String, String> {
    fn from(table: SubstitutionTable) -> Self {
        table.entries
    }
}

/// The four dictionaries the interpreter consults.
///
/// `normal` is applied to input words by the [`crate::Normalizer`]; the
/// others back the person, person2 and gender template transforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubstitutionTables {
    pub normal: SubstitutionTable,
    pub person: SubstitutionTable,
    pub person2: SubstitutionTable,
    pub gender: SubstitutionTable,
}

impl SubstitutionTables {
    /// Tables with no entries at all.
    pub fn empty() -> Self {
        SubstitutionTables {
            normal: SubstitutionTable::new(),
            person: SubstitutionTable::new(),
            person2: SubstitutionTable::new(),
            gender: SubstitutionTable::new(),
        }
    }
}

impl Default for SubstitutionTables {
    /// The built-in English tables.
    fn default() -> Self {
        SubstitutionTables {
            normal: defaults::table(defaults::NORMAL),
            person: defaults::table(defaults::PERSON),
            person2: defaults::table(defaults::PERSON2),
            gender: defaults::table(defaults::GENDER),
        }
    }
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '\''
}

#[derive(Debug)]
struct Piece<'a> {
    text: &'a str,
    word: bool,
}

/// Split text into alternating word and non-word runs.
fn split_pieces(text: &str) -> Vec<Piece<'_>> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;

    for (index, ch) in text.char_indices() {
        let word = is_word_char(ch);
        match current {
            Some(kind) if kind == word => {}
            Some(kind) => {
                pieces.push(Piece { text: &text[start..index], word: kind });
                start = index;
                current = Some(word);
            }
            None => current = Some(word),
        }
    }
    if let Some(kind) = current {
        pieces.push(Piece { text: &text[start..], word: kind });
    }

    pieces
}

/// Give `replacement` the case shape of `matched`.
///
/// All-caps words of two or more letters produce an all-caps replacement, a
/// leading capital produces capitalized words, anything else stays lower
/// case.
fn apply_case(matched: &str, replacement: &str) -> String {
    let letters: Vec<char> = matched.chars().filter(|c| c.is_alphabetic()).collect();
    let shouting = letters.len() > 1 && letters.iter().all(|c| !c.is_lowercase());
    let leading_capital = letters.first().is_some_and(|c| c.is_uppercase());

    if shouting {
        replacement.to_uppercase()
    } else if leading_capital {
        capitalize_words(replacement)
    } else {
        replacement.to_string()
    }
}

/// Upper-case the first letter of every word and lower-case the rest.
pub(crate) fn capitalize_words(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn fruit() -> SubstitutionTable {
        SubstitutionTable::from_pairs([
            ("apple", "banana"),
            ("orange", "pear"),
            ("banana", "apple"),
            ("he", "she"),
            ("I'd", "I would"),
        ])
        .unwrap()
    }

    #[test]
    fn substitutes_case_insensitively() {
        assert_eq!(
            fruit().substitute("I'd like one apple, one Orange and one BANANA."),
            "I Would like one banana, one Pear and one APPLE."
        );
    }

    #[test]
    fn only_whole_words_are_replaced() {
        assert_eq!(
            fruit().substitute("He said hello to the help desk"),
            "She said hello to the help desk"
        );
    }

    #[test]
    fn contraction_heads_are_substituted() {
        let gender = SubstitutionTable::from_pairs([("she", "he"), ("him", "her")]).unwrap();
        assert_eq!(gender.substitute("She'd told him"), "He'd told her");
        assert_eq!(gender.substitute("'twas"), "'twas");
    }

    #[test]
    fn single_pass_allows_swaps() {
        let swap = SubstitutionTable::from_pairs([("he", "she"), ("she", "he")]).unwrap();
        assert_eq!(swap.substitute("she told he"), "he told she");
    }

    #[test]
    fn longest_key_wins() {
        let table =
            SubstitutionTable::from_pairs([("with you", "with me"), ("you", "I")]).unwrap();
        assert_eq!(table.substitute("stay with you and you"), "stay with me and i");
        assert_eq!(table.substitute("with, you"), "with, i");
    }

    #[test]
    fn rejects_bad_keys() {
        let mut table = SubstitutionTable::new();
        assert_eq!(table.insert("   ", "x"), Err(SubstitutionError::EmptyKey));
        assert!(matches!(
            table.insert("a-b", "x"),
            Err(SubstitutionError::InvalidKey { .. })
        ));
        assert!(table.is_empty());
    }

    #[test]
    fn deserializes_from_a_map() {
        let table: SubstitutionTable =
            serde_json::from_str(r#"{"Apple": "Banana", "with you": "with me"}"#).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.substitute("an apple with you"), "an banana with me");
    }

    #[test]
    fn default_tables_are_populated() {
        let tables = SubstitutionTables::default();
        assert!(!tables.normal.is_empty());
        assert_eq!(tables.gender.substitute("he told her"), "she told him");
        assert!(SubstitutionTables::empty().person.is_empty());
    }
}
