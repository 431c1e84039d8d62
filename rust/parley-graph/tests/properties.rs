use parley_graph::{DuplicatePolicy, MatchKey, MatchPath, PatternGraph, Segment};
use parley_normalize::Token;
use proptest::prelude::*;

fn words() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-e]{1,3}", 1..5)
}

fn tokens(words: &[String]) -> Vec<Token> {
    words.iter().map(Token::new).collect()
}

fn pattern_word() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => "[a-c]{1,2}".prop_map(|w| w.to_uppercase()),
        1 => Just("*".to_string()),
        1 => Just("^".to_string()),
    ]
}

proptest! {
    #[test]
    fn literal_rules_are_found_by_their_own_words(rules in prop::collection::vec(words(), 1..20)) {
        let mut graph = PatternGraph::new();
        for (index, rule) in rules.iter().enumerate() {
            let path = MatchPath::parse(&rule.join(" "), "", "").unwrap();
            graph.insert(&path, index, DuplicatePolicy::Overwrite).unwrap();
        }

        for rule in &rules {
            let expected = rules.iter().rposition(|other| other == rule).unwrap();
            let key = MatchKey::new(tokens(rule), vec![], vec![]);
            let found = graph.find(&key, &[]).unwrap();
            prop_assert_eq!(*found.rule, expected);
        }
    }

    #[test]
    fn captures_stay_inside_their_segment(
        patterns in prop::collection::vec(prop::collection::vec(pattern_word(), 1..5), 1..10),
        input in prop::collection::vec("[a-c]{1,2}", 0..8),
    ) {
        let mut graph = PatternGraph::new();
        for pattern in &patterns {
            // Adjacent wildcards are refused; that is fine here.
            if let Ok(path) = MatchPath::parse(&pattern.join(" "), "", "") {
                let _ = graph.insert(&path, pattern.clone(), DuplicatePolicy::Overwrite);
            }
        }

        let key = MatchKey::new(tokens(&input), vec![], vec![]);
        if let Some(found) = graph.find(&key, &[]) {
            let spans = found.captures.spans(Segment::Pattern);
            let wildcards = found.rule.iter().filter(|w| *w == "*" || *w == "^").count();
            prop_assert_eq!(spans.len(), wildcards);

            let mut last_end = 0;
            for span in spans {
                prop_assert!(span.start >= last_end);
                prop_assert!(span.end <= key.pattern().len());
                last_end = span.end;
            }
        }
    }
}
