//! Free-text answer matching, tolerant of spelling and punctuation noise.
//!
//! Everything here is pure: same inputs always yield the same verdict, so
//! round scoring stays reproducible and testable independently of the engine.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Maximum edit distance accepted between a guess and the target title in
/// flexible mode. A fixed absolute tolerance, not proportional to length.
const EDIT_DISTANCE_TOLERANCE: usize = 2;

/// Normalized guesses shorter than this never match except by exact equality,
/// so trivial input cannot sneak in through the substring or edit-distance
/// rules.
const MIN_GUESS_CHARS: usize = 2;

/// Normalize a title or guess for comparison: lowercase, canonical
/// decomposition with combining marks stripped, everything that is neither a
/// word character nor whitespace removed, surrounding whitespace trimmed.
pub fn normalize(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    stripped.trim().to_string()
}

/// Standard dynamic-programming edit distance over Unicode code points.
/// Insertion, deletion, and substitution each cost 1.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Decide whether a free-text guess matches the target title.
///
/// An exact match (after [`normalize`]) is always accepted. With `flexible`
/// enabled, a contiguous substring in either direction also matches (handles
/// suffixes like "- Remastered" and partial titles), as does an edit distance
/// of at most [`EDIT_DISTANCE_TOLERANCE`] over the normalized strings.
pub fn validate(input: &str, target: &str, flexible: bool) -> bool {
    let input = normalize(input);
    let target = normalize(target);

    if input == target {
        return true;
    }
    if input.chars().count() < MIN_GUESS_CHARS {
        return false;
    }
    if !flexible {
        return false;
    }

    if target.contains(&input) || input.contains(&target) {
        return true;
    }

    levenshtein(&input, &target) <= EDIT_DISTANCE_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_diacritics_and_punctuation() {
        assert_eq!(normalize("¡Canción!"), "cancion");
        assert_eq!(normalize("  La Flaca — Jarabe "), "la flaca  jarabe");
        assert_eq!(normalize("Don't Stop Me Now"), "dont stop me now");
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in [
            "Imagine - Remastered",
            "¿Dónde Están?",
            "ABBA",
            "",
            "  mixed   CASE  ",
            "Beyoncé",
        ] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn exact_self_match_accepted_without_flexibility() {
        assert!(validate("Imagine", "Imagine", false));
        assert!(validate("beyoncé", "Beyonce", false));
    }

    #[test]
    fn length_floor_rejects_trivial_guesses() {
        assert!(!validate("a", "ab", true));
        assert!(!validate(" ", "Imagine", true));
        assert!(!validate("", "Imagine", true));
    }

    #[test]
    fn substring_leniency_is_gated_by_flexible_flag() {
        assert!(validate("imagine", "Imagine - Remastered", true));
        assert!(!validate("imagine", "Imagine - Remastered", false));
        // And in the other direction: an over-complete guess.
        assert!(validate("Imagine by John Lennon Imagine", "Imagine by John", true));
    }

    #[test]
    fn levenshtein_basics() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("hte beatles", "the beatles"), 2);
    }

    #[test]
    fn edit_distance_tolerance_boundary() {
        // Transposition counts as two substitutions; still within tolerance.
        assert!(validate("hte beatles", "the beatles", true));
        // Three edits away from a target of similar length must be rejected.
        assert_eq!(levenshtein("hte beatlez", "the beatles"), 3);
        assert!(!validate("hte beatlez", "the beatles", true));
    }

    #[test]
    fn edit_distance_requires_flexible_mode() {
        assert!(!validate("hte beatles", "the beatles", false));
    }
}
