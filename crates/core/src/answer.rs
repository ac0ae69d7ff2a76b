//! Answer normalization shared by the lesson engine, the mini-games and the
//! daily challenge.

/// Trims surrounding whitespace and lowercases.
#[must_use]
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Collapses every whitespace run to a single space, trims and lowercases.
#[must_use]
pub fn normalize_collapsed(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Lesson comparison: trimmed, case-insensitive.
#[must_use]
pub fn answers_match(given: &str, expected: &str) -> bool {
    normalize(given) == normalize(expected)
}

/// Mini-game comparison: trimmed, case-sensitive.
#[must_use]
pub fn trimmed_eq(given: &str, expected: &str) -> bool {
    given.trim() == expected.trim()
}
