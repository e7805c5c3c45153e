//! Annotator backed by pre-annotated documents.

use camino::Utf8Path;

use super::spacy::SpacyDoc;
use super::{Annotation, Annotator};
use crate::error::{AnnotationError, AnnotationResult};

/// An in-memory set of annotated documents.
///
/// Lookup prefers a document whose text equals the request exactly. Failing
/// that, the first document containing the requested text is sliced down to
/// it, which lets one annotated summary answer for each of its sentences.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Vec<Annotation>,
}

impl DocumentStore {
    /// Create a store from already-built annotations.
    pub const fn from_documents(documents: Vec<Annotation>) -> Self {
        Self { documents }
    }

    /// Parse spaCy documents from a JSON array, a single JSON object, or
    /// JSON lines.
    pub fn from_json_str(json: &str) -> AnnotationResult<Self> {
        let trimmed = json.trim_start();
        let raw: Vec<SpacyDoc> = if trimmed.starts_with('[') {
            serde_json::from_str(trimmed)?
        } else {
            serde_json::Deserializer::from_str(trimmed)
                .into_iter::<SpacyDoc>()
                .collect::<Result<_, _>>()?
        };

        let documents = raw
            .into_iter()
            .map(Annotation::try_from)
            .collect::<AnnotationResult<Vec<_>>>()?;
        tracing::debug!(documents = documents.len(), "annotation store loaded");
        Ok(Self { documents })
    }

    /// Load documents from a file (see [`DocumentStore::from_json_str`]).
    pub fn load(path: &Utf8Path) -> AnnotationResult<Self> {
        let json =
            std::fs::read_to_string(path.as_std_path()).map_err(|source| AnnotationError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_json_str(&json)
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns `true` if the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl Annotator for DocumentStore {
    fn annotate(&self, text: &str) -> AnnotationResult<Annotation> {
        if text.trim().is_empty() {
            return Ok(Annotation::empty());
        }

        if let Some(doc) = self.documents.iter().find(|doc| doc.text() == text) {
            return Ok(doc.clone());
        }

        self.documents
            .iter()
            .find_map(|doc| {
                let start = doc.text().find(text)?;
                doc.slice(start..start + text.len())
            })
            .ok_or_else(|| AnnotationError::NotAnnotated {
                text: text.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_SENTENCES: &str = r#"{
        "text": "Dogs bark. Cats sleep.",
        "sents": [{"start": 0, "end": 10}, {"start": 11, "end": 22}],
        "tokens": [
            {"id": 0, "start": 0, "end": 4, "pos": "NOUN", "tag": "NNS", "dep": "nsubj", "head": 1, "lemma": "dog"},
            {"id": 1, "start": 5, "end": 9, "pos": "VERB", "tag": "VBP", "dep": "ROOT", "head": 1, "lemma": "bark"},
            {"id": 2, "start": 9, "end": 10, "pos": "PUNCT", "tag": ".", "dep": "punct", "head": 1, "lemma": "."},
            {"id": 3, "start": 11, "end": 15, "pos": "NOUN", "tag": "NNS", "dep": "nsubj", "head": 4, "lemma": "cat"},
            {"id": 4, "start": 16, "end": 21, "pos": "VERB", "tag": "VBP", "dep": "ROOT", "head": 4, "lemma": "sleep"},
            {"id": 5, "start": 21, "end": 22, "pos": "PUNCT", "tag": ".", "dep": "punct", "head": 4, "lemma": "."}
        ]
    }"#;

    #[test]
    fn exact_match_returns_whole_document() {
        let store = DocumentStore::from_json_str(TWO_SENTENCES).unwrap();
        let doc = store.annotate("Dogs bark. Cats sleep.").unwrap();
        assert_eq!(doc.len(), 6);
        assert_eq!(doc.sentences().len(), 2);
    }

    #[test]
    fn sentence_is_sliced_from_containing_document() {
        let store = DocumentStore::from_json_str(TWO_SENTENCES).unwrap();
        let doc = store.annotate("Cats sleep.").unwrap();
        assert_eq!(doc.text(), "Cats sleep.");
        assert_eq!(doc.len(), 3);
        assert!(doc.tokens()[1].is_root());
        assert_eq!(doc.head_of(0), 1);
    }

    #[test]
    fn unknown_text_is_not_annotated() {
        let store = DocumentStore::from_json_str(TWO_SENTENCES).unwrap();
        let err = store.annotate("Birds sing.").unwrap_err();
        assert!(matches!(err, AnnotationError::NotAnnotated { .. }));
    }

    #[test]
    fn blank_text_annotates_to_empty() {
        let store = DocumentStore::default();
        assert!(store.annotate("  ").unwrap().is_empty());
    }

    #[test]
    fn accepts_arrays_and_json_lines() {
        let array = format!("[{TWO_SENTENCES}, {TWO_SENTENCES}]");
        assert_eq!(DocumentStore::from_json_str(&array).unwrap().len(), 2);

        let compact: serde_json::Value = serde_json::from_str(TWO_SENTENCES).unwrap();
        let lines = format!("{compact}\n{compact}\n");
        assert_eq!(DocumentStore::from_json_str(&lines).unwrap().len(), 2);
    }

    #[test]
    fn boundaries_come_from_the_document() {
        let store = DocumentStore::from_json_str(TWO_SENTENCES).unwrap();
        let spans = store.boundaries("Dogs bark. Cats sleep.").unwrap();
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].start, 11);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = DocumentStore::load(Utf8Path::new("/nonexistent/annotations.json")).unwrap_err();
        assert!(matches!(err, AnnotationError::Io { .. }));
    }
}
