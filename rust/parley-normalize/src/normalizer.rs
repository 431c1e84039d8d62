//! The normalization pipeline.

use crate::sentence::sentences;
use crate::substitution::SubstitutionTable;
use crate::token::Token;

/// Turns raw text into match tokens.
///
/// The normalizer owns its pre-substitution table and holds no other state,
/// so [`Normalizer::normalize`] is a pure function of its input.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    substitutions: SubstitutionTable,
}

impl Normalizer {
    pub fn new(substitutions: SubstitutionTable) -> Self {
        Normalizer { substitutions }
    }

    pub fn substitutions(&self) -> &SubstitutionTable {
        &self.substitutions
    }

    /// Normalize `text` as a single utterance.
    ///
    /// 1. Pre-substitute through the table, longest key first; keys may
    ///    span several words and a replacement may expand into several.
    /// 2. Split on whitespace.
    /// 3. Break each word at punctuation, dropping the punctuation.
    /// 4. Fold each piece to upper case for matching.
    pub fn normalize(&self, text: &str) -> Vec<Token> {
        let substituted = self.substitutions.substitute(text);
        let mut tokens = Vec::new();
        for word in substituted.split_whitespace() {
            push_pieces(&mut tokens, word);
        }
        tokens
    }

    /// Segment `text` into sentences and normalize each one.
    ///
    /// Sentences that normalize to nothing are dropped.
    pub fn normalize_sentences(&self, text: &str) -> Vec<Vec<Token>> {
        sentences(text)
            .iter()
            .map(|sentence| self.normalize(sentence))
            .filter(|tokens| !tokens.is_empty())
            .collect()
    }

    /// Normalize only the last sentence of `text`.
    ///
    /// This is the form a previous reply takes when it is used as match
    /// context.
    pub fn normalize_last_sentence(&self, text: &str) -> Vec<Token> {
        self.normalize_sentences(text).pop().unwrap_or_default()
    }
}

/// Push the alphanumeric runs of `word` as tokens.
fn push_pieces(tokens: &mut Vec<Token>, word: &str) {
    tokens.extend(
        word.split(|c: char| !c.is_alphanumeric())
            .filter(|piece| !piece.is_empty())
            .map(Token::new),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;
    use crate::token::join_values;
    use pretty_assertions::assert_eq;

    fn normalizer() -> Normalizer {
        Normalizer::new(defaults::table(defaults::NORMAL))
    }

    #[test]
    fn folds_case_and_collapses_whitespace() {
        let tokens = normalizer().normalize("  my   name is\tBob ");
        assert_eq!(join_values(&tokens), "MY NAME IS BOB");
        assert_eq!(tokens[3].original, "Bob");
    }

    #[test]
    fn strips_punctuation() {
        let tokens = normalizer().normalize("\"Hello,\" (she) said -- well-known!");
        assert_eq!(join_values(&tokens), "HELLO SHE SAID WELL KNOWN");
    }

    #[test]
    fn expands_contractions_before_splitting() {
        let tokens = normalizer().normalize("What's up? I'm fine, you're late");
        assert_eq!(join_values(&tokens), "WHAT IS UP I AM FINE YOU ARE LATE");
    }

    #[test]
    fn unknown_apostrophes_become_word_breaks() {
        let tokens = normalizer().normalize("Bart's dog");
        assert_eq!(join_values(&tokens), "BART S DOG");
    }

    #[test]
    fn multi_word_keys_are_substituted() {
        let table = SubstitutionTable::from_pairs([("how are you", "how r u"), ("how", "hw")]).unwrap();
        let normalizer = Normalizer::new(table);
        assert_eq!(join_values(&normalizer.normalize("How are you?")), "HOW R U");
        assert_eq!(join_values(&normalizer.normalize("how  are they")), "HW ARE THEY");
    }

    #[test]
    fn keeps_non_latin_text() {
        let tokens = normalizer().normalize("你好");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].original, "你好");
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(normalizer().normalize("").is_empty());
        assert!(normalizer().normalize(" ?! ").is_empty());
    }

    #[test]
    fn segments_before_normalizing() {
        let sentences = normalizer().normalize_sentences("Hi there. How are you?");
        let joined: Vec<String> = sentences.iter().map(|s| join_values(s)).collect();
        assert_eq!(joined, vec!["HI THERE", "HOW ARE YOU"]);
    }

    #[test]
    fn last_sentence_is_used_as_context() {
        let tokens = normalizer().normalize_last_sentence("I like cheese. Do you?");
        assert_eq!(join_values(&tokens), "DO YOU");
        assert!(normalizer().normalize_last_sentence("").is_empty());
    }

    #[test]
    fn normalization_is_deterministic() {
        let n = normalizer();
        assert_eq!(n.normalize("Where's Bob?"), n.normalize("Where's Bob?"));
    }
}
