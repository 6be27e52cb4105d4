//! Text normalization for instruction matching.

/// Reduce a maneuver description to its comparison key.
///
/// Uppercases and keeps only alphanumeric characters, so
/// `"Turn right, onto Main St."` and `"TURN_RIGHT onto main st"` collapse to
/// the same key.  Underscores and punctuation are dropped along with
/// whitespace.
pub fn normalize_key(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_uppercase)
        .collect()
}
