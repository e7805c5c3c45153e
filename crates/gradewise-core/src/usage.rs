//! Usage and clarity hints.
//!
//! These are style observations, not grammar errors. They are reported
//! alongside the grammar result and never affect any score.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::annotation::{Annotation, Pos};
use crate::grammar::Lexicon;

/// Kind of usage hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UsageKind {
    /// A general fact stated in the past tense.
    TensePreference,
    /// An infinitive clause used as a subject before a finite verb.
    InfinitiveSubjectMissing,
}

/// One usage hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UsageIssue {
    /// Hint kind.
    #[serde(rename = "type")]
    pub kind: UsageKind,
    /// Text the hint refers to.
    pub text_span: String,
    /// Fixed human-readable description.
    pub description: String,
}

impl UsageIssue {
    fn new(kind: UsageKind, text_span: &str) -> Self {
        let description = match kind {
            UsageKind::TensePreference => {
                "General facts are usually expressed in the present tense."
            }
            UsageKind::InfinitiveSubjectMissing => {
                "An infinitive clause usually needs a clear subject when a finite verb follows it."
            }
        };
        Self {
            kind,
            text_span: text_span.to_string(),
            description: description.to_string(),
        }
    }
}

/// The `usage_clarity` section of a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UsageReport {
    /// Hints across all sentences, in sentence order.
    pub issues: Vec<UsageIssue>,
}

fn mentions_past(doc: &Annotation, lexicon: &Lexicon) -> bool {
    doc.tokens()
        .iter()
        .any(|t| lexicon.is_past_time_marker(&t.text) || t.lower() == "previous")
}

/// Usage hints for one annotated sentence.
pub fn usage_issues(doc: &Annotation, lexicon: &Lexicon) -> Vec<UsageIssue> {
    let tokens = doc.tokens();
    let mut issues = Vec::new();

    if !mentions_past(doc, lexicon) {
        for (s, subject) in tokens.iter().enumerate() {
            let verb = &tokens[subject.head];
            if subject.dep == "nsubj"
                && matches!(subject.tag.as_str(), "NNS" | "NNPS")
                && verb.lemma == "be"
                && verb.tag == "VBD"
            {
                let (a, b) = (s.min(subject.head), s.max(subject.head));
                issues.push(UsageIssue::new(
                    UsageKind::TensePreference,
                    doc.span_text(a, b),
                ));
            }
        }
    }

    for (i, window) in tokens.windows(2).enumerate() {
        if window[0].lower() != "to" || window[1].pos != Pos::Verb {
            continue;
        }
        let governing = tokens[i + 2..]
            .iter()
            .position(|t| matches!(t.lemma.as_str(), "need" | "require"));
        if let Some(offset) = governing {
            issues.push(UsageIssue::new(
                UsageKind::InfinitiveSubjectMissing,
                doc.span_text(i, i + 2 + offset),
            ));
        }
    }

    issues
}
