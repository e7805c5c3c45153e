//! Input normalization.
//!
//! Only whitespace is touched. Spelling, punctuation and capitalization are
//! preserved exactly, since they are what the evaluator scores.

/// Trim the text and collapse every whitespace run (including newlines and
/// tabs) to a single space.
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
