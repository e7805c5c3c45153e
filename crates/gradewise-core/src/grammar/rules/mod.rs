//! The detector battery.
//!
//! Every detector is a pure function from a [`SentenceContext`] to an
//! [`ErrorTally`]. The engine runs all of them and sums the results, so
//! detectors never see each other's output and can be reordered freely.

pub mod agreement;
pub mod articles;
pub mod clauses;
pub mod structure;
pub mod surface;

use crate::annotation::{Pos, Token};

use super::context::SentenceContext;
use super::tally::ErrorTally;

/// A single grammar detector.
pub type Detector = fn(&SentenceContext<'_>) -> ErrorTally;

/// All detectors, by name, in the order they run.
pub const DETECTORS: &[(&str, Detector)] = &[
    ("subject_and_verb", structure::subject_and_verb),
    ("run_on", structure::run_on),
    ("roots", structure::roots),
    ("capitalization", surface::capitalization),
    ("whitespace", surface::whitespace),
    ("articles", articles::articles),
    ("agreement", agreement::agreement),
    ("tense", agreement::tense),
    ("preposition", agreement::preposition),
    ("overload", clauses::overload),
    ("comma_splice", clauses::comma_splice),
    ("copula_missing", clauses::copula_missing),
    ("connector_collision", clauses::connector_collision),
];

// -- Shared token predicates ----------------------------------------------

pub(crate) fn is_terminal(token: &Token) -> bool {
    matches!(token.text.as_str(), "." | "!" | "?")
}

pub(crate) fn is_coordinating(token: &Token) -> bool {
    token.pos == Pos::Cconj || token.dep == "cc"
}

pub(crate) fn is_auxiliary_dep(dep: &str) -> bool {
    matches!(dep, "aux" | "auxpass")
}

/// At least one cased character, and no uppercase ones.
pub(crate) fn is_all_lowercase(text: &str) -> bool {
    text.chars().any(char::is_alphabetic) && !text.chars().any(char::is_uppercase)
}

#[cfg(test)]
pub(crate) fn check(detector: Detector, doc: &crate::annotation::Annotation) -> ErrorTally {
    let lexicon = super::lexicon::Lexicon::default();
    let ctx = SentenceContext::new(doc.text(), doc, &lexicon);
    detector(&ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detector_names_are_unique() {
        let mut names: Vec<&str> = DETECTORS.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DETECTORS.len());
    }

    #[test]
    fn lowercase_needs_a_letter() {
        assert!(is_all_lowercase("mat"));
        assert!(!is_all_lowercase("Mat"));
        assert!(!is_all_lowercase("42"));
    }
}
