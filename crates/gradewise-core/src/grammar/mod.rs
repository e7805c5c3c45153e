//! Grammar detection and scoring.
//!
//! - [`kind`] is the closed fourteen-kind error taxonomy
//! - [`rules`] is the detector battery, one pure function per check
//! - [`tally`] holds one sentence's counts and evidence spans
//! - [`score`] turns per-sentence tallies into a 0–4 grade
//!
//! [`detect`] runs the whole battery over one sentence.

pub mod context;
pub mod kind;
pub mod lexicon;
pub mod rules;
pub mod score;
pub mod tally;

pub use context::{Clause, SentenceContext};
pub use kind::{ErrorKind, Severity};
pub use lexicon::Lexicon;
pub use score::{MAX_SCORE, Rubric, score, score_by_error_count, score_with};
pub use tally::ErrorTally;

use crate::annotation::{Annotation, Annotator};
use crate::error::AnnotationResult;

/// Annotate one sentence and run every detector over it.
///
/// Blank sentences produce an empty tally without calling the annotator.
/// Annotation failures propagate.
pub fn detect(
    annotator: &dyn Annotator,
    lexicon: &Lexicon,
    sentence: &str,
) -> AnnotationResult<ErrorTally> {
    if sentence.trim().is_empty() {
        return Ok(ErrorTally::new());
    }
    let doc = annotator.annotate(sentence)?;
    Ok(detect_annotated(&doc, sentence, lexicon))
}

/// Run every detector over an already annotated sentence.
pub fn detect_annotated(doc: &Annotation, sentence: &str, lexicon: &Lexicon) -> ErrorTally {
    let ctx = SentenceContext::new(sentence, doc, lexicon);
    rules::DETECTORS
        .iter()
        .map(|(name, detector)| {
            let tally = detector(&ctx);
            if !tally.is_clean() {
                tracing::trace!(detector = name, errors = tally.total_errors(), "detector fired");
            }
            tally
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::testing::{annotate, row};
    use crate::annotation::{DocumentStore, Pos};

    fn cat_sit() -> Annotation {
        annotate(
            "the cat sit on the mat",
            &[
                row("the", Pos::Det, "DT", "det", 1, "the"),
                row("cat", Pos::Noun, "NN", "nsubj", 2, "cat"),
                row("sit", Pos::Verb, "VBP", "ROOT", 2, "sit"),
                row("on", Pos::Adp, "IN", "prep", 2, "on"),
                row("the", Pos::Det, "DT", "det", 5, "the"),
                row("mat", Pos::Noun, "NN", "pobj", 3, "mat"),
            ],
        )
    }

    #[test]
    fn battery_sums_detector_output() {
        let doc = cat_sit();
        let tally = detect_annotated(&doc, doc.text(), &Lexicon::default());
        assert_eq!(tally.spans(ErrorKind::CapitalizationError), ["the"]);
        assert_eq!(tally.spans(ErrorKind::AgreementError), ["cat sit"]);
        assert_eq!(tally.total_errors(), 2);
        assert_eq!(tally.severity(), Some(Severity::Major));
        assert_eq!(score(&[tally], 1), 3);
    }

    #[test]
    fn detection_is_deterministic() {
        let store = DocumentStore::from_documents(vec![cat_sit()]);
        let lexicon = Lexicon::default();
        let first = detect(&store, &lexicon, "the cat sit on the mat").unwrap();
        let second = detect(&store, &lexicon, "the cat sit on the mat").unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn clean_sentence_has_no_errors() {
        let doc = annotate(
            "The cat sat on the mat.",
            &[
                row("The", Pos::Det, "DT", "det", 1, "the"),
                row("cat", Pos::Noun, "NN", "nsubj", 2, "cat"),
                row("sat", Pos::Verb, "VBD", "ROOT", 2, "sit"),
                row("on", Pos::Adp, "IN", "prep", 2, "on"),
                row("the", Pos::Det, "DT", "det", 5, "the"),
                row("mat", Pos::Noun, "NN", "pobj", 3, "mat"),
                row(".", Pos::Punct, ".", "punct", 2, "."),
            ],
        );
        let tally = detect_annotated(&doc, doc.text(), &Lexicon::default());
        assert!(tally.is_clean(), "unexpected errors: {tally:?}");
    }

    #[test]
    fn long_coordinated_sentence_is_minor_only() {
        const CLAUSES: [[&str; 7]; 5] = [
            ["The", "farmer", "planted", "apples", "near", "the", "barn"],
            ["the", "child", "picked", "berries", "from", "the", "hedge"],
            ["the", "miller", "ground", "oats", "for", "the", "bakery"],
            ["the", "baker", "baked", "loaves", "for", "the", "village"],
            ["the", "neighbour", "shared", "pies", "with", "the", "family"],
        ];
        let text = format!(
            "{}.",
            CLAUSES
                .iter()
                .map(|words| words.join(" "))
                .collect::<Vec<_>>()
                .join(" and ")
        );

        let mut rows = Vec::new();
        for (k, w) in CLAUSES.iter().enumerate() {
            let b = 8 * k;
            let verb_dep = if k == 0 { "ROOT" } else { "conj" };
            rows.push(row(w[0], Pos::Det, "DT", "det", b + 1, w[0]));
            rows.push(row(w[1], Pos::Noun, "NN", "nsubj", b + 2, w[1]));
            rows.push(row(w[2], Pos::Verb, "VBD", verb_dep, 2, w[2]));
            rows.push(row(w[3], Pos::Noun, "NNS", "dobj", b + 2, w[3]));
            rows.push(row(w[4], Pos::Adp, "IN", "prep", b + 2, w[4]));
            rows.push(row(w[5], Pos::Det, "DT", "det", b + 6, w[5]));
            rows.push(row(w[6], Pos::Noun, "NN", "pobj", b + 4, w[6]));
            if k + 1 < CLAUSES.len() {
                rows.push(row("and", Pos::Cconj, "CC", "cc", 2, "and"));
            }
        }
        rows.push(row(".", Pos::Punct, ".", "punct", 2, "."));
        let doc = annotate(&text, &rows);
        assert_eq!(doc.len(), 40);

        let tally = detect_annotated(&doc, doc.text(), &Lexicon::default());
        assert_eq!(tally.fired().collect::<Vec<_>>(), [ErrorKind::ClauseOverload]);
        assert_eq!(tally.count(ErrorKind::RunOn), 0);
        assert_eq!(tally.severity(), Some(Severity::Minor));
        assert_eq!(score(&[tally], 1), 4);
    }

    #[test]
    fn blank_sentence_skips_annotator() {
        let store = DocumentStore::default();
        let tally = detect(&store, &Lexicon::default(), "  ").unwrap();
        assert!(tally.is_clean());
    }

    #[test]
    fn annotation_failure_propagates() {
        let store = DocumentStore::default();
        assert!(detect(&store, &Lexicon::default(), "Unannotated text.").is_err());
    }
}
