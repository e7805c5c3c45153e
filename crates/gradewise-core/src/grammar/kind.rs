//! The closed error taxonomy.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::UnknownErrorKind;

/// Severity bucket used by the scoring rubric.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Surface or local problem; never lowers the score on its own.
    Minor,
    /// Tense or agreement problem.
    Major,
    /// The sentence is structurally broken.
    Critical,
}

impl Severity {
    /// Returns the severity as a lowercase string slice.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minor => "minor",
            Self::Major => "major",
            Self::Critical => "critical",
        }
    }
}

/// One of the fourteen grammar error categories.
///
/// This is the only vocabulary the pipeline reports in. Labels coming back
/// from the explanation service are parsed into it and anything that does
/// not parse is repaired or dropped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Subject–verb, copula, comparative or pronoun–antecedent mismatch.
    AgreementError,
    /// Missing or wrong article.
    ArticleError,
    /// Present-tense verb in a past-time context.
    TenseError,
    /// Wrong preposition after a governing word.
    PrepositionError,
    /// Sentence does not start with a capital letter.
    CapitalizationError,
    /// No verb or auxiliary.
    MissingVerb,
    /// No grammatical subject.
    MissingSubject,
    /// Neither subject nor verb.
    Fragment,
    /// Several independent clauses without adequate punctuation.
    RunOn,
    /// Very long sentence stacked with connectors.
    ClauseOverload,
    /// Independent clauses joined by a bare comma.
    ConjunctionMissing,
    /// Clause with a subject but no verb.
    CopulaMissing,
    /// Two coordinating conjunctions back to back.
    ConnectorCollision,
    /// Whitespace before punctuation.
    WhitespaceError,
}

impl ErrorKind {
    /// Number of kinds in the taxonomy.
    pub const COUNT: usize = 14;

    /// Every kind, in reporting order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::AgreementError,
        Self::ArticleError,
        Self::TenseError,
        Self::PrepositionError,
        Self::CapitalizationError,
        Self::MissingVerb,
        Self::MissingSubject,
        Self::Fragment,
        Self::RunOn,
        Self::ClauseOverload,
        Self::ConjunctionMissing,
        Self::CopulaMissing,
        Self::ConnectorCollision,
        Self::WhitespaceError,
    ];

    /// Kinds that get a whole-sentence explanation when they fired without
    /// recording a span of their own.
    pub const STRUCTURAL: [Self; 5] = [
        Self::MissingVerb,
        Self::MissingSubject,
        Self::Fragment,
        Self::RunOn,
        Self::ClauseOverload,
    ];

    /// Position of this kind in [`ErrorKind::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The snake_case wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AgreementError => "agreement_error",
            Self::ArticleError => "article_error",
            Self::TenseError => "tense_error",
            Self::PrepositionError => "preposition_error",
            Self::CapitalizationError => "capitalization_error",
            Self::MissingVerb => "missing_verb",
            Self::MissingSubject => "missing_subject",
            Self::Fragment => "fragment",
            Self::RunOn => "run_on",
            Self::ClauseOverload => "clause_overload",
            Self::ConjunctionMissing => "conjunction_missing",
            Self::CopulaMissing => "copula_missing",
            Self::ConnectorCollision => "connector_collision",
            Self::WhitespaceError => "whitespace_error",
        }
    }

    /// Severity bucket this kind contributes to.
    pub const fn severity(self) -> Severity {
        match self {
            Self::MissingSubject | Self::MissingVerb | Self::Fragment | Self::RunOn => {
                Severity::Critical
            }
            Self::TenseError | Self::AgreementError => Severity::Major,
            _ => Severity::Minor,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = UnknownErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownErrorKind(s.to_string()))
    }
}
