//! Case transforms.

use crate::ast::CaseShape;

pub fn apply(shape: CaseShape, text: &str) -> String {
    match shape {
        CaseShape::Upper => text.to_uppercase(),
        CaseShape::Lower => text.to_lowercase(),
        CaseShape::Sentence => sentence(text),
        CaseShape::Formal => formal(text),
    }
}

/// Capitalize the first word of the trimmed text; the rest is untouched.
fn sentence(text: &str) -> String {
    let text = text.trim();
    match text.split_once(' ') {
        Some((first, rest)) => format!("{} {rest}", capitalize(first)),
        None => capitalize(text),
    }
}

/// Capitalize every word, collapsing the whitespace between them.
fn formal(text: &str) -> String {
    text.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
