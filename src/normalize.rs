//! Title cleanup and join keys.
//!
//! Catalog and setlist feeds spell the same song differently: case, `&` vs
//! `and`, a mis-decoded right single quote, stray quote/brace characters.
//! [`join_key`] folds all of that into one comparable string.

use regex::Regex;
use std::sync::LazyLock;

/// UTF-8 `’` (E2 80 99) read back as Windows-1252.
const MOJIBAKE_APOSTROPHE: &str = "\u{e2}\u{20ac}\u{2122}";

// Leading/trailing quotes, braces and whitespace
static SURROUNDING_PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^[\s'"{}]+|[\s'"{}]+$"#).unwrap()
});

/// Repair the mis-decoded apostrophe sequence. Used for album names too.
pub fn repair_encoding(raw: &str) -> String {
    raw.replace(MOJIBAKE_APOSTROPHE, "'")
}

/// Display form of a title: encoding repaired, `&` spelled out, surrounding
/// punctuation stripped, case kept. `None` when nothing is left.
pub fn clean_title(raw: &str) -> Option<String> {
    let repaired = repair_encoding(raw).replace('&', "and");
    let stripped = SURROUNDING_PUNCT_RE.replace_all(&repaired, "");
    if stripped.is_empty() {
        None
    } else {
        Some(stripped.into_owned())
    }
}

/// Join key for a title. Two titles with the same key are the same song.
/// Missing or blank titles have no key and never match anything.
pub fn join_key(raw: Option<&str>) -> Option<String> {
    raw.and_then(clean_title).map(|t| t.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_folding() {
        assert_eq!(join_key(Some("Song X")), join_key(Some("song x")));
        assert_eq!(join_key(Some("SONG X")).as_deref(), Some("song x"));
    }

    #[test]
    fn test_ampersand() {
        assert_eq!(join_key(Some("Rock & Roll")).as_deref(), Some("rock and roll"));
        assert_eq!(join_key(Some("Rock & Roll")), join_key(Some("rock and roll")));
    }

    #[test]
    fn test_mojibake_apostrophe() {
        let broken = "Don\u{e2}\u{20ac}\u{2122}t Stop";
        assert_eq!(join_key(Some(broken)).as_deref(), Some("don't stop"));
        assert_eq!(repair_encoding("Kid A\u{e2}\u{20ac}\u{2122}s"), "Kid A's");
    }

    #[test]
    fn test_surrounding_punctuation() {
        assert_eq!(clean_title("'Song X'}").as_deref(), Some("Song X"));
        assert_eq!(clean_title("{\"Song X\" ").as_deref(), Some("Song X"));
        // Inner apostrophes survive
        assert_eq!(clean_title("Don't Stop").as_deref(), Some("Don't Stop"));
    }

    #[test]
    fn test_missing_titles_have_no_key() {
        assert_eq!(join_key(None), None);
        assert_eq!(join_key(Some("")), None);
        assert_eq!(join_key(Some(" '' ")), None);
    }

    #[test]
    fn test_deterministic() {
        let a = join_key(Some("The Eleven & Co."));
        let b = join_key(Some("The Eleven & Co."));
        assert_eq!(a, b);
    }
}
