//! Natural-language explanations for detected errors.
//!
//! The explanation service is an untrusted, fallible collaborator. This
//! module decides *what* gets explained (deduplicated candidates built from
//! the tallies), never calls the service when there is nothing to explain,
//! gates every returned label through [`ErrorKind`], and turns every
//! failure into an empty list. Scores are computed before and without it.

pub mod backend;
pub mod prompt;

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub use backend::{BackendRouter, ChatBackend, ChatCompletionsClient};
pub use prompt::{SYSTEM_PROMPT, parse_response, user_prompt};

use crate::grammar::{ErrorKind, ErrorTally};

/// An error to be explained: a kind and the exact text it was found in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Candidate {
    /// Error kind.
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    /// Verbatim evidence text.
    pub text_span: String,
}

impl Candidate {
    /// Create a candidate.
    pub fn new(kind: ErrorKind, text_span: impl Into<String>) -> Self {
        Self {
            kind,
            text_span: text_span.into(),
        }
    }
}

/// An explained error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Explanation {
    /// Error kind, always from the closed taxonomy.
    #[serde(rename = "type")]
    pub kind: ErrorKind,
    /// Span as echoed by the service.
    pub text_span: String,
    /// One-sentence justification.
    pub description: String,
}

/// The `explanation` section of a grammar report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExplanationList {
    /// Explained errors, in the order the service returned them.
    pub errors: Vec<Explanation>,
}

/// Build the deduplicated candidate list.
///
/// Per sentence, every recorded span comes first (in reporting order), then
/// a whole-sentence candidate for each structural kind that fired without a
/// span. A (kind, span) pair appears at most once across all sentences.
pub fn candidates<'a, I>(sentences: I) -> Vec<Candidate>
where
    I: IntoIterator<Item = (&'a str, &'a ErrorTally)>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for (sentence, tally) in sentences {
        let spanned = ErrorKind::ALL.into_iter().flat_map(|kind| {
            tally
                .spans(kind)
                .iter()
                .map(move |span| Candidate::new(kind, span.as_str()))
        });
        let structural = ErrorKind::STRUCTURAL
            .into_iter()
            .filter(|kind| tally.count(*kind) > 0 && tally.spans(*kind).is_empty())
            .map(|kind| Candidate::new(kind, sentence));

        for candidate in spanned.chain(structural) {
            if seen.insert(candidate.clone()) {
                out.push(candidate);
            }
        }
    }
    out
}

/// Explain the errors found in `text`.
///
/// Returns an empty list without calling `backend` when nothing fired.
/// Backend failures and unparseable replies are logged and also produce an
/// empty list.
#[tracing::instrument(skip_all, fields(backend = backend.name(), text_len = text.len()))]
pub fn explain<'a, I>(backend: &dyn ChatBackend, text: &str, sentences: I) -> ExplanationList
where
    I: IntoIterator<Item = (&'a str, &'a ErrorTally)>,
{
    let candidates = candidates(sentences);
    if candidates.is_empty() {
        return ExplanationList::default();
    }

    let reply = match backend.chat(SYSTEM_PROMPT, &user_prompt(text, &candidates)) {
        Ok(reply) => reply,
        Err(e) => {
            tracing::warn!(error = %e, "explanation unavailable");
            return ExplanationList::default();
        }
    };

    let errors = parse_response(&reply, &candidates);
    tracing::debug!(
        candidates = candidates.len(),
        explained = errors.len(),
        "explanations received"
    );
    ExplanationList { errors }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::{ExplainError, ExplainResult};

    /// Records prompts and answers with a fixed reply.
    struct Scripted {
        reply: ExplainResult<String>,
        calls: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(ExplainError::NoBackend),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl ChatBackend for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn chat(&self, _system: &str, user: &str) -> ExplainResult<String> {
            self.calls.lock().unwrap().push(user.to_string());
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err(_) => Err(ExplainError::Transport {
                    backend: "scripted".to_string(),
                    message: "timed out".to_string(),
                }),
            }
        }
    }

    fn cat_sit_tally() -> ErrorTally {
        let mut tally = ErrorTally::new();
        tally.record(ErrorKind::CapitalizationError, "the");
        tally.record(ErrorKind::AgreementError, "cat sit");
        tally
    }

    #[test]
    fn spans_first_then_structural_fallbacks() {
        let mut tally = ErrorTally::new();
        tally.record(ErrorKind::ArticleError, "apple");
        tally.reinforce(ErrorKind::RunOn);
        tally.reinforce(ErrorKind::Fragment);
        tally.reinforce(ErrorKind::CopulaMissing);

        let list = candidates([("she ate apple", &tally)]);
        assert_eq!(
            list,
            vec![
                Candidate::new(ErrorKind::ArticleError, "apple"),
                Candidate::new(ErrorKind::Fragment, "she ate apple"),
                Candidate::new(ErrorKind::RunOn, "she ate apple"),
            ]
        );
    }

    #[test]
    fn duplicates_collapse_across_sentences() {
        let a = cat_sit_tally();
        let b = cat_sit_tally();
        let list = candidates([("the cat sit.", &a), ("the cat sit.", &b)]);
        assert_eq!(list.len(), 2);

        let again = candidates([("the cat sit.", &a), ("the cat sit.", &b)]);
        assert_eq!(list, again);
    }

    #[test]
    fn clean_text_never_calls_the_backend() {
        let backend = Scripted::replying("{\"errors\": []}");
        let clean = ErrorTally::new();
        let result = explain(&backend, "The cat sat.", [("The cat sat.", &clean)]);
        assert!(result.errors.is_empty());
        assert_eq!(backend.call_count(), 0);
    }

    #[test]
    fn backend_failure_degrades_to_empty() {
        let backend = Scripted::failing();
        let tally = cat_sit_tally();
        let result = explain(&backend, "the cat sit", [("the cat sit", &tally)]);
        assert!(result.errors.is_empty());
        assert_eq!(backend.call_count(), 1);
    }

    #[test]
    fn reply_is_gated_to_taxonomy() {
        let backend = Scripted::replying(
            r#"Here: {"errors":[
                {"type":"grammar","text_span":"cat sit","description":"Needs sits."},
                {"type":"spelling_error","text_span":"zzz","description":"x"}
            ]}"#,
        );
        let tally = cat_sit_tally();
        let result = explain(&backend, "the cat sit", [("the cat sit", &tally)]);
        assert_eq!(
            result.errors,
            vec![Explanation {
                kind: ErrorKind::AgreementError,
                text_span: "cat sit".to_string(),
                description: "Needs sits.".to_string(),
            }]
        );
    }

    #[test]
    fn candidate_serializes_with_type_key() {
        let json = serde_json::to_value(Candidate::new(ErrorKind::RunOn, "x")).unwrap();
        assert_eq!(json, serde_json::json!({"type": "run_on", "text_span": "x"}));
    }
}
