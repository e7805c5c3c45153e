//! Per-sentence view shared by every detector.

use crate::annotation::{Annotation, Token};

use super::lexicon::Lexicon;

/// A clause: a contiguous token range between clause connectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clause {
    /// First token index.
    pub start: usize,
    /// One past the last token index.
    pub end: usize,
    /// Index of the connector token that opened this clause, if any.
    pub opened_by: Option<usize>,
}

impl Clause {
    /// Index of the last token.
    pub const fn last(&self) -> usize {
        self.end - 1
    }
}

/// Everything a detector may look at for one sentence.
///
/// Built once per sentence; detectors only read it.
#[derive(Debug)]
pub struct SentenceContext<'a> {
    /// The sentence text as segmented.
    pub text: &'a str,
    /// The sentence's annotation.
    pub doc: &'a Annotation,
    /// Word lists.
    pub lexicon: &'a Lexicon,
    /// Clauses split on connectors and commas. Empty clauses are skipped.
    pub clauses: Vec<Clause>,
}

impl<'a> SentenceContext<'a> {
    /// Build the context for one annotated sentence.
    pub fn new(text: &'a str, doc: &'a Annotation, lexicon: &'a Lexicon) -> Self {
        let clauses = split_clauses(doc, lexicon);
        Self {
            text,
            doc,
            lexicon,
            clauses,
        }
    }

    /// Tokens of the sentence.
    pub fn tokens(&self) -> &'a [Token] {
        self.doc.tokens()
    }

    /// Tokens of one clause.
    pub fn clause_tokens(&self, clause: &Clause) -> &'a [Token] {
        &self.doc.tokens()[clause.start..clause.end]
    }
}

fn split_clauses(doc: &Annotation, lexicon: &Lexicon) -> Vec<Clause> {
    let mut clauses = Vec::new();
    let mut start = 0;
    let mut opened_by = None;

    for (i, token) in doc.tokens().iter().enumerate() {
        if lexicon.is_clause_connector(&token.text) {
            if i > start {
                clauses.push(Clause {
                    start,
                    end: i,
                    opened_by,
                });
            }
            start = i + 1;
            opened_by = Some(i);
        }
    }
    if doc.len() > start {
        clauses.push(Clause {
            start,
            end: doc.len(),
            opened_by,
        });
    }
    clauses
}
