//! Span replacement shared by sanitizing and display masking

/// A byte span to replace with a fixed token
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Replacement<'a> {
    pub start: usize,
    pub end: usize,
    pub token: &'a str,
}

/// Replace every span with its token.
///
/// Overlapping spans are merged into one replacement carrying the token of
/// the earliest span.
pub(crate) fn apply_replacements(text: &str, mut replacements: Vec<Replacement<'_>>) -> String {
    if replacements.is_empty() {
        return text.to_string();
    }

    replacements.sort_by_key(|r| (r.start, std::cmp::Reverse(r.end)));

    let mut merged: Vec<Replacement<'_>> = Vec::with_capacity(replacements.len());
    for replacement in replacements {
        if replacement.start >= replacement.end || replacement.end > text.len() {
            continue;
        }
        match merged.last_mut() {
            Some(last) if replacement.start < last.end => {
                last.end = last.end.max(replacement.end);
            }
            _ => merged.push(replacement),
        }
    }

    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;
    for replacement in &merged {
        result.push_str(&text[cursor..replacement.start]);
        result.push_str(replacement.token);
        cursor = replacement.end;
    }
    result.push_str(&text[cursor..]);
    result
}
