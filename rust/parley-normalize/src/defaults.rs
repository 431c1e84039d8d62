//! Built-in English substitution tables.

use crate::substitution::SubstitutionTable;

/// Contractions and slang expanded before matching.
pub const NORMAL: &[(&str, &str)] = &[
    ("aren't", "are not"),
    ("can't", "can not"),
    ("couldn't", "could not"),
    ("didn't", "did not"),
    ("doesn't", "does not"),
    ("don't", "do not"),
    ("gonna", "going to"),
    ("hasn't", "has not"),
    ("haven't", "have not"),
    ("he's", "he is"),
    ("i'd", "i would"),
    ("i'll", "i will"),
    ("i'm", "i am"),
    ("i've", "i have"),
    ("isn't", "is not"),
    ("it's", "it is"),
    ("let's", "let us"),
    ("she's", "she is"),
    ("shouldn't", "should not"),
    ("that's", "that is"),
    ("they're", "they are"),
    ("wanna", "want to"),
    ("wasn't", "was not"),
    ("we're", "we are"),
    ("weren't", "were not"),
    ("what's", "what is"),
    ("where's", "where is"),
    ("who's", "who is"),
    ("won't", "will not"),
    ("wouldn't", "would not"),
    ("you'd", "you would"),
    ("you'll", "you will"),
    ("you're", "you are"),
    ("you've", "you have"),
];

/// First person ↔ third person.
pub const PERSON: &[(&str, &str)] = &[
    ("i", "he"),
    ("me", "him"),
    ("my", "his"),
    ("mine", "his"),
    ("myself", "himself"),
    ("he", "i"),
    ("him", "me"),
    ("his", "my"),
    ("himself", "myself"),
    ("she", "i"),
    ("her", "me"),
    ("hers", "mine"),
    ("herself", "myself"),
];

/// First person ↔ second person.
pub const PERSON2: &[(&str, &str)] = &[
    ("i", "you"),
    ("me", "you"),
    ("my", "your"),
    ("mine", "yours"),
    ("myself", "yourself"),
    ("you", "me"),
    ("your", "my"),
    ("yours", "mine"),
    ("yourself", "myself"),
    ("i am", "you are"),
    ("you are", "i am"),
    ("i was", "you were"),
    ("you were", "i was"),
    ("with you", "with me"),
    ("with me", "with you"),
    ("to you", "to me"),
    ("to me", "to you"),
    ("for you", "for me"),
    ("for me", "for you"),
    ("of you", "of me"),
    ("of me", "of you"),
    ("give you", "give me"),
    ("give me", "give you"),
    ("tell you", "tell me"),
    ("tell me", "tell you"),
];

/// He ↔ she.
pub const GENDER: &[(&str, &str)] = &[
    ("he", "she"),
    ("him", "her"),
    ("his", "her"),
    ("himself", "herself"),
    ("she", "he"),
    ("her", "him"),
    ("hers", "his"),
    ("herself", "himself"),
];

/// Build a table from one of the static lists above.
///
/// Every key in these lists is a valid word run, so insertion cannot fail;
/// a key that somehow did would simply be absent from the table.
pub(crate) fn table(pairs: &[(&str, &str)]) -> SubstitutionTable {
    let mut table = SubstitutionTable::new();
    for (from, to) in pairs {
        let _ = table.insert(from, to);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_default_entry_is_kept() {
        for pairs in [NORMAL, PERSON, PERSON2, GENDER] {
            assert_eq!(table(pairs).len(), pairs.len());
        }
    }

    #[test]
    fn person2_swaps_first_and_second_person() {
        let table = table(PERSON2);
        assert_eq!(
            table.substitute("I think you know that your actions threaten me and mine."),
            "You think me know that my actions threaten you and yours."
        );
    }

    #[test]
    fn person_swaps_first_and_third_person() {
        let table = table(PERSON);
        assert_eq!(
            table.substitute("he thinks my cat likes him"),
            "i thinks his cat likes me"
        );
    }
}
