//! Site code parsing shared by both normalisers
//!
//! Raw site codes carry a storm number as a numeric suffix (`ABC12` is storm
//! 12 at site `ABC`). Watershed station codes sometimes carry the same kind of
//! suffix and have to be stripped to match.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

static TRAILING_DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+$").expect("valid trailing digits pattern"));

static LEADING_LETTERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]+").expect("valid leading letters pattern"));

/// Remove the numeric suffix of a site code
pub fn strip_trailing_digits(code: &str) -> String {
    TRAILING_DIGITS.replace(code.trim(), "").into_owned()
}

/// Remove the leading letters of a site code, leaving the storm suffix
pub fn strip_leading_letters(code: &str) -> String {
    LEADING_LETTERS.replace(code.trim(), "").into_owned()
}

/// Normalise a watershed station code
///
/// Strips the numeric suffix, then applies exact-match corrections. Applying
/// it to an already-normalised code returns the code unchanged as long as no
/// correction maps a code onto another correction's source.
pub fn normalize_site_code(code: &str, corrections: &BTreeMap<String, String>) -> String {
    let stripped = strip_trailing_digits(code);
    match corrections.get(&stripped) {
        Some(corrected) => corrected.clone(),
        None => stripped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corrections() -> BTreeMap<String, String> {
        BTreeMap::from([("USJ".to_string(), "USJC".to_string())])
    }

    #[test]
    fn test_strip_trailing_digits() {
        assert_eq!(strip_trailing_digits("ABC123"), "ABC");
        assert_eq!(strip_trailing_digits("ABC"), "ABC");
        assert_eq!(strip_trailing_digits("A1B2"), "A1B");
        assert_eq!(strip_trailing_digits(" SJ7 "), "SJ");
    }

    #[test]
    fn test_strip_leading_letters() {
        assert_eq!(strip_leading_letters("ABC12"), "12");
        assert_eq!(strip_leading_letters("ABC"), "");
        assert_eq!(strip_leading_letters("USJC3b"), "3b");
    }

    #[test]
    fn test_normalize_site_code_applies_corrections() {
        let corrections = corrections();
        assert_eq!(normalize_site_code("USJ", &corrections), "USJC");
        assert_eq!(normalize_site_code("USJ4", &corrections), "USJC");
        assert_eq!(normalize_site_code("ABC123", &corrections), "ABC");
    }

    #[test]
    fn test_normalize_site_code_is_idempotent() {
        let corrections = corrections();
        for code in ["USJ", "USJC2", "ABC123", "XYZ", "M1", ""] {
            let once = normalize_site_code(code, &corrections);
            let twice = normalize_site_code(&once, &corrections);
            assert_eq!(once, twice, "normalisation of {:?} is not idempotent", code);
        }
    }
}
