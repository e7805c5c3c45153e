//! Linguistic annotation consumed by the grammar pipeline.
//!
//! The pipeline never tokenizes or parses on its own. An [`Annotator`]
//! supplies, for any text, the tokens with part-of-speech tags, dependency
//! relations, lemmas and entity types, plus the sentence boundaries it
//! detected. Detection logic in [`crate::grammar`] is written purely against
//! the [`Annotation`] value.
//!
//! Three adapters ship with the crate:
//!
//! - [`DocumentStore`] - pre-annotated documents in spaCy `Doc.to_json()` form
//! - [`RemoteAnnotator`] - an HTTP annotation service speaking the same format
//! - [`LazyAnnotator`] - initialise-once wrapper around either of the above

pub mod lazy;
pub mod remote;
pub mod spacy;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{AnnotationError, AnnotationResult};

pub use lazy::LazyAnnotator;
pub use remote::RemoteAnnotator;
pub use spacy::{SpacyDoc, from_spacy_json};
pub use store::DocumentStore;

/// Coarse universal part-of-speech tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Pos {
    /// Adjective.
    Adj,
    /// Adposition (preposition or postposition).
    Adp,
    /// Adverb.
    Adv,
    /// Auxiliary verb.
    Aux,
    /// Coordinating conjunction.
    Cconj,
    /// Determiner.
    Det,
    /// Interjection.
    Intj,
    /// Common noun.
    Noun,
    /// Numeral.
    Num,
    /// Particle.
    Part,
    /// Pronoun.
    Pron,
    /// Proper noun.
    Propn,
    /// Punctuation.
    Punct,
    /// Subordinating conjunction.
    Sconj,
    /// Symbol.
    Sym,
    /// Main verb.
    Verb,
    /// Whitespace token.
    Space,
    /// Anything else, including tags this crate does not know.
    #[default]
    #[serde(other)]
    X,
}

impl Pos {
    /// Returns `true` for main verbs and auxiliaries.
    pub const fn is_verbal(self) -> bool {
        matches!(self, Self::Verb | Self::Aux)
    }

    /// Returns `true` for common and proper nouns.
    pub const fn is_nominal(self) -> bool {
        matches!(self, Self::Noun | Self::Propn)
    }
}

/// One annotated token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Surface text, exactly as it appears in the source.
    pub text: String,
    /// Byte offset of the token within the annotated text.
    pub idx: usize,
    /// Coarse part of speech.
    pub pos: Pos,
    /// Fine-grained (Penn Treebank) tag, e.g. `NN`, `VBZ`.
    pub tag: String,
    /// Lemma.
    pub lemma: String,
    /// Dependency relation to the head token, e.g. `nsubj`, `ROOT`.
    pub dep: String,
    /// Index of the head token; a root points at itself.
    pub head: usize,
    /// Named-entity label, empty when the token is outside any entity.
    #[serde(default)]
    pub ent_type: String,
}

impl Token {
    /// Byte offset one past the end of the token.
    pub fn end(&self) -> usize {
        self.idx + self.text.len()
    }

    /// Returns `true` if the token is a sentence root.
    pub fn is_root(&self) -> bool {
        self.dep.eq_ignore_ascii_case("root")
    }

    /// Returns `true` if the token carries a subject dependency.
    pub fn is_subject(&self) -> bool {
        matches!(self.dep.as_str(), "nsubj" | "nsubjpass")
    }

    /// Lowercased surface text.
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }
}

/// A sentence boundary reported by the annotator, as byte offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceSpan {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl SentenceSpan {
    /// The span as a byte range.
    pub const fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// The annotation of one text: tokens plus sentence boundaries.
///
/// Token offsets and heads are validated on construction, so accessors never
/// index out of bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    text: String,
    tokens: Vec<Token>,
    sentences: Vec<SentenceSpan>,
}

impl Annotation {
    /// Build an annotation, validating token offsets, heads and sentence spans.
    ///
    /// When `sentences` is empty and the text is not blank, the whole text is
    /// treated as one sentence.
    pub fn new(
        text: impl Into<String>,
        tokens: Vec<Token>,
        mut sentences: Vec<SentenceSpan>,
    ) -> AnnotationResult<Self> {
        let text = text.into();

        for (i, token) in tokens.iter().enumerate() {
            if token.head >= tokens.len() {
                return Err(AnnotationError::InvalidDocument(format!(
                    "token {i} ({:?}) has head {} outside the document",
                    token.text, token.head
                )));
            }
            if text.get(token.idx..token.end()) != Some(token.text.as_str()) {
                return Err(AnnotationError::InvalidDocument(format!(
                    "token {i} ({:?}) does not match the text at offset {}",
                    token.text, token.idx
                )));
            }
        }

        for span in &sentences {
            if span.start > span.end || text.get(span.range()).is_none() {
                return Err(AnnotationError::InvalidDocument(format!(
                    "sentence span {}..{} is outside the document",
                    span.start, span.end
                )));
            }
        }

        if sentences.is_empty() && !text.trim().is_empty() {
            sentences.push(SentenceSpan {
                start: 0,
                end: text.len(),
            });
        }

        Ok(Self {
            text,
            tokens,
            sentences,
        })
    }

    /// An annotation of the empty string.
    pub const fn empty() -> Self {
        Self {
            text: String::new(),
            tokens: Vec::new(),
            sentences: Vec::new(),
        }
    }

    /// The annotated text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// All tokens in document order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns `true` if there are no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Sentence boundaries in document order.
    pub fn sentences(&self) -> &[SentenceSpan] {
        &self.sentences
    }

    /// Sentence texts, trimmed, skipping blank ones.
    pub fn sentence_texts(&self) -> impl Iterator<Item = &str> {
        self.sentences
            .iter()
            .map(|span| self.text[span.range()].trim())
            .filter(|s| !s.is_empty())
    }

    /// Index of the head of token `i`.
    pub fn head_of(&self, i: usize) -> usize {
        self.tokens[i].head
    }

    /// Indices of the direct dependents of token `i`.
    pub fn children(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.tokens
            .iter()
            .enumerate()
            .filter(move |(j, t)| *j != i && t.head == i)
            .map(|(j, _)| j)
    }

    /// Indices of the ancestors of token `i`, nearest first.
    pub fn ancestors(&self, i: usize) -> Ancestors<'_> {
        Ancestors {
            annotation: self,
            current: i,
            remaining: self.tokens.len(),
        }
    }

    /// Source text from the start of token `first` to the end of token `last`.
    pub fn span_text(&self, first: usize, last: usize) -> &str {
        let start = self.tokens[first].idx;
        let end = self.tokens[last].end().max(start);
        &self.text[start..end]
    }

    /// Re-annotate a byte range of this document as a standalone annotation.
    ///
    /// Only tokens fully inside the range are kept. Tokens whose head falls
    /// outside the range become roots. Returns `None` when the range is not a
    /// valid slice of the text.
    pub fn slice(&self, range: Range<usize>) -> Option<Self> {
        let text = self.text.get(range.clone())?;
        let base = range.start;

        let kept: Vec<usize> = (0..self.tokens.len())
            .filter(|&i| self.tokens[i].idx >= range.start && self.tokens[i].end() <= range.end)
            .collect();

        let tokens = kept
            .iter()
            .enumerate()
            .map(|(new_idx, &old_idx)| {
                let old = &self.tokens[old_idx];
                let mut token = old.clone();
                token.idx -= base;
                match kept.iter().position(|&k| k == old.head) {
                    Some(head) => token.head = head,
                    None => {
                        token.head = new_idx;
                        token.dep = "ROOT".to_string();
                    }
                }
                token
            })
            .collect();

        let sentences = self
            .sentences
            .iter()
            .filter_map(|span| {
                let start = span.start.max(range.start);
                let end = span.end.min(range.end);
                (start < end).then(|| SentenceSpan {
                    start: start - base,
                    end: end - base,
                })
            })
            .collect();

        Self::new(text, tokens, sentences).ok()
    }
}

/// Iterator over a token's ancestors, produced by [`Annotation::ancestors`].
///
/// Stops at the root. A malformed head cycle ends the walk after at most
/// as many steps as there are tokens.
#[derive(Debug)]
pub struct Ancestors<'a> {
    annotation: &'a Annotation,
    current: usize,
    remaining: usize,
}

impl Iterator for Ancestors<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let head = self.annotation.head_of(self.current);
        if head == self.current {
            return None;
        }
        self.current = head;
        Some(head)
    }
}

/// Source of linguistic annotations.
///
/// Implementations must be safe to share across threads and must be pure
/// with respect to their input: the same text always yields the same
/// annotation.
pub trait Annotator: Send + Sync {
    /// Annotate `text`, returning tokens and sentence boundaries.
    fn annotate(&self, text: &str) -> AnnotationResult<Annotation>;

    /// Sentence boundaries of `text`.
    fn boundaries(&self, text: &str) -> AnnotationResult<Vec<SentenceSpan>> {
        Ok(self.annotate(text)?.sentences().to_vec())
    }
}

impl<T: Annotator + ?Sized> Annotator for std::sync::Arc<T> {
    fn annotate(&self, text: &str) -> AnnotationResult<Annotation> {
        (**self).annotate(text)
    }
}

impl<T: Annotator + ?Sized> Annotator for Box<T> {
    fn annotate(&self, text: &str) -> AnnotationResult<Annotation> {
        (**self).annotate(text)
    }
}
