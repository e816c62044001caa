use crate::Position;
use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[\W_]+").expect("valid regex");
}

/// Normalize a raw token: NFKC, lowercase, keep only letters and digits.
/// May return an empty string, which callers drop.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.nfkc().collect::<String>().to_lowercase();
    NON_WORD.replace_all(&lowered, "").into_owned()
}

/// Tokenize text into (word, position) with positions starting at 1.
/// Empty tokens do not consume a position. Tokens past the last
/// representable position are dropped.
pub fn tokenize(text: &str) -> Vec<(String, Position)> {
    let mut tokens = Vec::new();
    let mut position: Position = 0;
    for raw in text.split_whitespace() {
        let word = normalize(raw);
        if word.is_empty() { continue; }
        let Some(next) = next_position(position) else {
            tracing::warn!(kept = tokens.len(), "position limit reached, ignoring remaining tokens");
            break;
        };
        position = next;
        tokens.push((word, position));
    }
    tokens
}

fn next_position(position: Position) -> Option<Position> {
    position.checked_add(1)
}

/// Split a query line into normalized search terms.
pub fn query_terms(line: &str) -> Vec<String> {
    line.split_whitespace()
        .map(normalize)
        .filter(|w| !w.is_empty())
        .collect()
}
