//! Per-sentence error counts and evidence spans.

use std::borrow::Cow;
use std::iter::Sum;
use std::ops::AddAssign;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::kind::{ErrorKind, Severity};

/// Error counts and evidence spans for one sentence.
///
/// A detector either *records* an error (count plus the offending text) or
/// *reinforces* one (count only). The total is always derived from the
/// counts, never stored.
///
/// Serializes as a flat object: one count per kind, then `total_errors`,
/// then one `<kind>_spans` list per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorTally {
    counts: [usize; ErrorKind::COUNT],
    spans: [Vec<String>; ErrorKind::COUNT],
}

impl ErrorTally {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one error of `kind` with its evidence span.
    pub fn record(&mut self, kind: ErrorKind, span: impl Into<String>) {
        self.counts[kind.index()] += 1;
        self.spans[kind.index()].push(span.into());
    }

    /// Count one error of `kind` without evidence.
    pub fn reinforce(&mut self, kind: ErrorKind) {
        self.counts[kind.index()] += 1;
    }

    /// Count for one kind.
    pub const fn count(&self, kind: ErrorKind) -> usize {
        self.counts[kind.index()]
    }

    /// Evidence spans for one kind, in detection order.
    pub fn spans(&self, kind: ErrorKind) -> &[String] {
        &self.spans[kind.index()]
    }

    /// Sum of all per-kind counts.
    pub fn total_errors(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Returns `true` when nothing fired.
    pub fn is_clean(&self) -> bool {
        self.total_errors() == 0
    }

    /// Kinds with a non-zero count, in reporting order.
    pub fn fired(&self) -> impl Iterator<Item = ErrorKind> + '_ {
        ErrorKind::ALL
            .into_iter()
            .filter(|kind| self.count(*kind) > 0)
    }

    /// Worst severity among the kinds that fired.
    pub fn severity(&self) -> Option<Severity> {
        self.fired().map(ErrorKind::severity).max()
    }
}

impl AddAssign<Self> for ErrorTally {
    fn add_assign(&mut self, other: Self) {
        for (i, spans) in other.spans.into_iter().enumerate() {
            self.counts[i] += other.counts[i];
            self.spans[i].extend(spans);
        }
    }
}

impl Sum for ErrorTally {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut acc, tally| {
            acc += tally;
            acc
        })
    }
}

impl Serialize for ErrorTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(ErrorKind::COUNT * 2 + 1))?;
        for kind in ErrorKind::ALL {
            map.serialize_entry(kind.as_str(), &self.count(kind))?;
        }
        map.serialize_entry("total_errors", &self.total_errors())?;
        for kind in ErrorKind::ALL {
            map.serialize_entry(&format!("{}_spans", kind.as_str()), self.spans(kind))?;
        }
        map.end()
    }
}

impl JsonSchema for ErrorTally {
    fn schema_name() -> Cow<'static, str> {
        "ErrorTally".into()
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "object",
            "description": "Per-kind error counts, total_errors, and per-kind <kind>_spans lists",
            "additionalProperties": {
                "anyOf": [
                    { "type": "integer", "minimum": 0 },
                    { "type": "array", "items": { "type": "string" } }
                ]
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_derived_from_counts() {
        let mut tally = ErrorTally::new();
        assert!(tally.is_clean());
        tally.record(ErrorKind::ArticleError, "mat");
        tally.record(ErrorKind::ArticleError, "apple");
        tally.reinforce(ErrorKind::Fragment);
        assert_eq!(tally.count(ErrorKind::ArticleError), 2);
        assert_eq!(tally.spans(ErrorKind::ArticleError), ["mat", "apple"]);
        assert!(tally.spans(ErrorKind::Fragment).is_empty());
        assert_eq!(tally.total_errors(), 3);
    }

    #[test]
    fn summing_merges_counts_and_spans() {
        let mut a = ErrorTally::new();
        a.record(ErrorKind::TenseError, "go");
        let mut b = ErrorTally::new();
        b.record(ErrorKind::TenseError, "walk");
        b.reinforce(ErrorKind::RunOn);

        let merged: ErrorTally = [a, b].into_iter().sum();
        assert_eq!(merged.count(ErrorKind::TenseError), 2);
        assert_eq!(merged.spans(ErrorKind::TenseError), ["go", "walk"]);
        assert_eq!(merged.total_errors(), 3);
        assert_eq!(merged.severity(), Some(Severity::Critical));
    }

    #[test]
    fn severity_is_worst_fired_kind() {
        let mut tally = ErrorTally::new();
        assert_eq!(tally.severity(), None);
        tally.record(ErrorKind::CapitalizationError, "the");
        assert_eq!(tally.severity(), Some(Severity::Minor));
        tally.record(ErrorKind::AgreementError, "cat sit");
        assert_eq!(tally.severity(), Some(Severity::Major));
    }

    #[test]
    fn serializes_flat_with_total_and_spans() {
        let mut tally = ErrorTally::new();
        tally.record(ErrorKind::WhitespaceError, " .");
        let value = serde_json::to_value(&tally).unwrap();
        assert_eq!(value["whitespace_error"], 1);
        assert_eq!(value["fragment"], 0);
        assert_eq!(value["total_errors"], 1);
        assert_eq!(value["whitespace_error_spans"][0], " .");
        assert_eq!(value["run_on_spans"].as_array().unwrap().len(), 0);
        assert_eq!(value.as_object().unwrap().len(), ErrorKind::COUNT * 2 + 1);
    }
}
