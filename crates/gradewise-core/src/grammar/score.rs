//! Aggregate per-sentence tallies into a 0–4 grammar score.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::kind::Severity;
use super::tally::ErrorTally;

/// Highest possible grammar score.
pub const MAX_SCORE: u8 = 4;

/// How tallies are turned into a score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum Rubric {
    /// Classify each sentence by its worst error and score by how many
    /// sentences are critical or major.
    #[default]
    Severity,
    /// Score by the total number of errors across all sentences.
    ErrorCount,
}

impl Rubric {
    /// Kebab-case name, as used in configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Severity => "severity",
            Self::ErrorCount => "error-count",
        }
    }
}

/// Sentence counts per severity class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Classes {
    critical: usize,
    major: usize,
}

fn classify(tallies: &[ErrorTally]) -> Classes {
    tallies
        .iter()
        .fold(Classes::default(), |mut acc, tally| {
            match tally.severity() {
                Some(Severity::Critical) => acc.critical += 1,
                Some(Severity::Major) => acc.major += 1,
                Some(Severity::Minor) | None => {}
            }
            acc
        })
}

/// Severity-rubric score.
///
/// First match wins:
///
/// 1. every sentence critical → 0
/// 2. at least half critical → 1
/// 3. no critical, no major → 4
/// 4. no critical, one major → 3
/// 5. no critical, several major → 2
/// 6. some critical → 1
///
/// Minor-only sentences never lower the score. No sentences scores 0.
pub fn score(tallies: &[ErrorTally], sentence_count: usize) -> u8 {
    if sentence_count == 0 {
        return 0;
    }
    let Classes { critical, major } = classify(tallies);

    if critical >= sentence_count {
        0
    } else if critical * 2 >= sentence_count {
        1
    } else if critical == 0 && major == 0 {
        MAX_SCORE
    } else if critical == 0 && major == 1 {
        3
    } else if critical == 0 {
        2
    } else {
        1
    }
}

/// Error-count score: ≤1 → 4, ≤4 → 3, ≤8 → 2, ≤12 → 1, else 0.
pub fn score_by_error_count(tallies: &[ErrorTally], sentence_count: usize) -> u8 {
    if sentence_count == 0 {
        return 0;
    }
    match tallies.iter().map(ErrorTally::total_errors).sum::<usize>() {
        0..=1 => 4,
        2..=4 => 3,
        5..=8 => 2,
        9..=12 => 1,
        _ => 0,
    }
}

/// Score with the given rubric.
pub fn score_with(rubric: Rubric, tallies: &[ErrorTally], sentence_count: usize) -> u8 {
    match rubric {
        Rubric::Severity => score(tallies, sentence_count),
        Rubric::ErrorCount => score_by_error_count(tallies, sentence_count),
    }
}
