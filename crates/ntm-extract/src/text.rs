//! Narrative normalization, sentence splitting, and token cleaning.

/// Punctuation stripped from both ends of a raw token.
const TOKEN_TRIM: [char; 8] = [',', '.', ';', ' ', ')', '(', ']', '['];

/// Marker appended by upstream preprocessing to protect embedded commas.
const COMMA_MARKER: &str = "<COMMA>";

/// Upper-case a raw narrative field and normalize a leading `"M. "` to
/// `"M "` so the genus abbreviation is not taken for a sentence terminator.
pub fn normalize_narrative(raw: &str) -> String {
    let text = raw.to_uppercase();
    match text.strip_prefix("M. ") {
        Some(rest) => format!("M {rest}"),
        None => text,
    }
}

/// Split normalized narrative into sentences on runs of `.` / `;`.
///
/// Empty segments (consecutive terminators, leading/trailing terminators,
/// empty input) are dropped; a sentence always contains at least one
/// non-terminator character, though it may be all whitespace.
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['.', ';']).filter(|s| !s.is_empty()).collect()
}

/// Split a sentence into raw tokens on single spaces.
///
/// Runs of spaces yield empty tokens, exactly as the source data produces
/// them; the matching rules treat an empty token as a non-match.
pub fn tokenize(sentence: &str) -> Vec<&str> {
    sentence.split(' ').collect()
}

/// Clean a raw token: truncate at the embedded-comma marker, then strip
/// boundary punctuation from both ends.
pub fn strip_token(raw: &str) -> &str {
    let w = if raw.ends_with(COMMA_MARKER) {
        truncate_chars(raw, COMMA_MARKER.len())
    } else {
        raw
    };
    w.trim_matches(|c| TOKEN_TRIM.contains(&c))
}

fn truncate_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
