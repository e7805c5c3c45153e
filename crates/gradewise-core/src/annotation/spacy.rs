//! spaCy `Doc.to_json()` interchange format.
//!
//! spaCy reports offsets in characters; [`Annotation`] works in bytes so that
//! spans can be sliced straight out of the source text. Conversion happens
//! here, once.

use serde::Deserialize;

use super::{Annotation, Pos, SentenceSpan, Token};
use crate::error::{AnnotationError, AnnotationResult};

/// A document as produced by spaCy's `Doc.to_json()`.
#[derive(Debug, Clone, Deserialize)]
pub struct SpacyDoc {
    /// The document text.
    pub text: String,
    /// Tokens in document order.
    pub tokens: Vec<SpacyToken>,
    /// Sentence boundaries (character offsets).
    #[serde(default)]
    pub sents: Vec<SpacySpan>,
    /// Named entities (character offsets).
    #[serde(default)]
    pub ents: Vec<SpacyEntity>,
}

/// A token as produced by spaCy.
#[derive(Debug, Clone, Deserialize)]
pub struct SpacyToken {
    /// Token index; must equal the token's position.
    pub id: usize,
    /// Character offset of the first character.
    pub start: usize,
    /// Character offset one past the last character.
    pub end: usize,
    /// Coarse part of speech.
    #[serde(default)]
    pub pos: Pos,
    /// Fine-grained tag.
    #[serde(default)]
    pub tag: String,
    /// Dependency label.
    #[serde(default)]
    pub dep: String,
    /// Index of the head token.
    pub head: usize,
    /// Lemma.
    #[serde(default)]
    pub lemma: String,
}

/// A character span.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SpacySpan {
    /// Character offset of the first character.
    pub start: usize,
    /// Character offset one past the last character.
    pub end: usize,
}

/// A labelled entity span.
#[derive(Debug, Clone, Deserialize)]
pub struct SpacyEntity {
    /// Character offset of the first character.
    pub start: usize,
    /// Character offset one past the last character.
    pub end: usize,
    /// Entity label, e.g. `PERSON`.
    pub label: String,
}

/// Parse one spaCy document from JSON.
pub fn from_spacy_json(json: &str) -> AnnotationResult<Annotation> {
    let doc: SpacyDoc = serde_json::from_str(json)?;
    Annotation::try_from(doc)
}

impl TryFrom<SpacyDoc> for Annotation {
    type Error = AnnotationError;

    fn try_from(doc: SpacyDoc) -> AnnotationResult<Self> {
        let offsets = char_to_byte(&doc.text);
        let byte = |char_offset: usize| {
            offsets.get(char_offset).copied().ok_or_else(|| {
                AnnotationError::InvalidDocument(format!(
                    "character offset {char_offset} is past the end of the text"
                ))
            })
        };

        let mut tokens = Vec::with_capacity(doc.tokens.len());
        for (position, raw) in doc.tokens.iter().enumerate() {
            if raw.id != position {
                return Err(AnnotationError::InvalidDocument(format!(
                    "token id {} found at position {position}",
                    raw.id
                )));
            }
            let start = byte(raw.start)?;
            let end = byte(raw.end)?;
            let ent_type = doc
                .ents
                .iter()
                .find(|ent| ent.start <= raw.start && raw.end <= ent.end)
                .map(|ent| ent.label.clone())
                .unwrap_or_default();

            tokens.push(Token {
                text: doc.text[start..end].to_string(),
                idx: start,
                pos: raw.pos,
                tag: raw.tag.clone(),
                lemma: raw.lemma.clone(),
                dep: raw.dep.clone(),
                head: raw.head,
                ent_type,
            });
        }

        let sentences = doc
            .sents
            .iter()
            .map(|span| {
                Ok(SentenceSpan {
                    start: byte(span.start)?,
                    end: byte(span.end)?,
                })
            })
            .collect::<AnnotationResult<Vec<_>>>()?;

        Self::new(doc.text, tokens, sentences)
    }
}

/// Byte offset of every character boundary, including the end of the text.
fn char_to_byte(text: &str) -> Vec<usize> {
    text.char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(text.len()))
        .collect()
}
