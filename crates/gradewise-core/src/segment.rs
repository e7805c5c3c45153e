//! Sentence segmentation.
//!
//! Boundaries come from the annotator. The only policy applied on top is
//! run-on recovery: an annotator may split unpunctuated text on commas or
//! conjunctions, but a student who wrote no terminal punctuation at all has
//! written one run-on sentence, not several sentences.

use serde::{Deserialize, Serialize};

use crate::annotation::{Annotator, Pos};
use crate::error::AnnotationResult;

/// How the segmenter classified a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SentenceKind {
    /// An ordinary sentence.
    Normal,
    /// Several clauses written without terminal punctuation.
    RunOn,
}

/// One sentence-like unit of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Sentence {
    /// Sentence text.
    pub text: String,
    /// Classification.
    #[serde(rename = "type")]
    pub kind: SentenceKind,
}

impl Sentence {
    fn new(text: &str, kind: SentenceKind) -> Self {
        Self {
            text: text.to_string(),
            kind,
        }
    }
}

/// Split normalized text into sentences.
///
/// - Blank input yields no sentences.
/// - One (or no) annotator boundary: the whole input is one `normal` sentence.
/// - Several boundaries, no `.`/`!`/`?` anywhere, and at least two verbs: the
///   whole input is one `run-on` sentence.
/// - Otherwise each boundary-delimited unit is a `normal` sentence.
///
/// Annotator failures propagate; no partial segmentation is returned.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn segment(annotator: &dyn Annotator, text: &str) -> AnnotationResult<Vec<Sentence>> {
    let whole = text.trim();
    if whole.is_empty() {
        return Ok(Vec::new());
    }

    let doc = annotator.annotate(text)?;
    let units: Vec<&str> = doc.sentence_texts().collect();

    if units.len() <= 1 {
        return Ok(vec![Sentence::new(whole, SentenceKind::Normal)]);
    }

    let verb_count = doc.tokens().iter().filter(|t| t.pos == Pos::Verb).count();
    let terminal_count = doc
        .tokens()
        .iter()
        .filter(|t| matches!(t.text.as_str(), "." | "!" | "?"))
        .count();

    if terminal_count == 0 && verb_count >= 2 {
        tracing::debug!(
            boundaries = units.len(),
            verb_count,
            "collapsing unpunctuated boundaries into one run-on sentence"
        );
        return Ok(vec![Sentence::new(whole, SentenceKind::RunOn)]);
    }

    Ok(units
        .into_iter()
        .map(|unit| Sentence::new(unit, SentenceKind::Normal))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::DocumentStore;
    use crate::annotation::testing::{annotate, annotate_sentences, row};

    fn store(doc: crate::annotation::Annotation) -> DocumentStore {
        DocumentStore::from_documents(vec![doc])
    }

    #[test]
    fn blank_input_has_no_sentences() {
        let annotator = DocumentStore::default();
        assert!(segment(&annotator, "").unwrap().is_empty());
        assert!(segment(&annotator, "   ").unwrap().is_empty());
    }

    #[test]
    fn single_boundary_is_one_normal_sentence() {
        let text = "the students studied hard and they passed";
        let doc = annotate(
            text,
            &[
                row("the", Pos::Det, "DT", "det", 1, "the"),
                row("students", Pos::Noun, "NNS", "nsubj", 2, "student"),
                row("studied", Pos::Verb, "VBD", "ROOT", 2, "study"),
                row("hard", Pos::Adv, "RB", "advmod", 2, "hard"),
                row("and", Pos::Cconj, "CC", "cc", 2, "and"),
                row("they", Pos::Pron, "PRP", "nsubj", 6, "they"),
                row("passed", Pos::Verb, "VBD", "conj", 2, "pass"),
            ],
        );
        let sentences = segment(&store(doc), text).unwrap();
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].kind, SentenceKind::Normal);
        assert_eq!(sentences[0].text, text);
    }

    #[test]
    fn unpunctuated_split_collapses_to_run_on() {
        let text = "the river floods every spring farmers move their cattle";
        let doc = annotate_sentences(
            text,
            &[
                row("the", Pos::Det, "DT", "det", 1, "the"),
                row("river", Pos::Noun, "NN", "nsubj", 2, "river"),
                row("floods", Pos::Verb, "VBZ", "ROOT", 2, "flood"),
                row("every", Pos::Det, "DT", "det", 4, "every"),
                row("spring", Pos::Noun, "NN", "npadvmod", 2, "spring"),
                row("farmers", Pos::Noun, "NNS", "nsubj", 6, "farmer"),
                row("move", Pos::Verb, "VBP", "ROOT", 6, "move"),
                row("their", Pos::Pron, "PRP$", "poss", 8, "their"),
                row("cattle", Pos::Noun, "NNS", "dobj", 6, "cattle"),
            ],
            &["the river floods every spring", "farmers move their cattle"],
        );
        let sentences = segment(&store(doc), text).unwrap();
        assert_eq!(sentences.len(), 1);
        assert_eq!(sentences[0].kind, SentenceKind::RunOn);
    }

    #[test]
    fn punctuation_wins_over_verb_density() {
        let text = "Rivers flood. Farmers move cattle.";
        let doc = annotate_sentences(
            text,
            &[
                row("Rivers", Pos::Noun, "NNS", "nsubj", 1, "river"),
                row("flood", Pos::Verb, "VBP", "ROOT", 1, "flood"),
                row(".", Pos::Punct, ".", "punct", 1, "."),
                row("Farmers", Pos::Noun, "NNS", "nsubj", 4, "farmer"),
                row("move", Pos::Verb, "VBP", "ROOT", 4, "move"),
                row("cattle", Pos::Noun, "NNS", "dobj", 4, "cattle"),
                row(".", Pos::Punct, ".", "punct", 4, "."),
            ],
            &["Rivers flood.", "Farmers move cattle."],
        );
        let sentences = segment(&store(doc), text).unwrap();
        assert_eq!(
            sentences,
            vec![
                Sentence::new("Rivers flood.", SentenceKind::Normal),
                Sentence::new("Farmers move cattle.", SentenceKind::Normal),
            ]
        );
    }

    #[test]
    fn annotator_failure_propagates() {
        let annotator = DocumentStore::default();
        assert!(segment(&annotator, "Unknown text.").is_err());
    }
}
