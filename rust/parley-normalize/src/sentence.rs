//! Sentence segmentation.
//!
//! Multi-sentence input is answered one sentence at a time, and the context
//! used for the next match is the last sentence of the previous reply, so
//! both directions of the conversation go through [`sentences`].

/// Split `text` into trimmed, non-empty sentences.
///
/// A sentence ends at `.`, `!` or `?` when the terminator is followed by
/// whitespace or the end of the text; `3.14` and `e.g.x` stay intact.
pub fn sentences(text: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((index, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
        if at_boundary {
            let end = index + ch.len_utf8();
            push_sentence(&mut result, &text[start..end]);
            start = end;
        }
    }
    push_sentence(&mut result, &text[start..]);

    result
}

fn push_sentence(result: &mut Vec<String>, candidate: &str) {
    let trimmed = candidate.trim();
    if trimmed.chars().any(|c| c.is_alphanumeric()) {
        result.push(trimmed.to_string());
    }
}
